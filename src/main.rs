use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use maze_chase::player::command_for_key;
use maze_chase::render::Renderer;
use maze_chase::{Command, Game, Settings, Status};

fn main() -> Result<()> {
    let settings = Settings::from_env().context("reading startup settings")?;
    if let Some(level) = settings.log_level {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .init();
    }

    let mut game = Game::new(settings.ghosts).context("setting up the board")?;
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(seed = ?settings.seed, ghosts = settings.ghosts, "starting");

    let mut stdout = io::stdout();
    terminal::enable_raw_mode().context("enabling raw mode")?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &mut game, &mut rng);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    let status = result.context("terminal I/O failed")?;
    print_outcome(&mut stdout, status)?;
    Ok(())
}

fn run(stdout: &mut Stdout, game: &mut Game, rng: &mut StdRng) -> io::Result<Status> {
    let mut renderer = Renderer::new(game.grid().width(), game.grid().height());
    loop {
        renderer.draw(stdout, &game.snapshot(), terminal::size()?)?;
        let Some(command) = read_command()? else {
            continue;
        };
        let status = game.tick(command, rng);
        if status.is_over() {
            return Ok(status);
        }
    }
}

/// Blocks until a key maps to a command. A resize returns `None` so the
/// caller redraws; unknown keys are skipped.
fn read_command() -> io::Result<Option<Command>> {
    loop {
        match event::read()? {
            Event::Key(key) => {
                if let Some(command) = command_for_key(key) {
                    return Ok(Some(command));
                }
            }
            Event::Resize(_, _) => return Ok(None),
            _ => {}
        }
    }
}

fn print_outcome(stdout: &mut Stdout, status: Status) -> io::Result<()> {
    let (message, color) = match status {
        Status::Lost => ("Game Over! Pacman was caught by a ghost.", Color::Red),
        Status::Won => ("Congratulations! Pacman cleared all dots and wins!", Color::Green),
        Status::Running | Status::Quit => return Ok(()),
    };
    stdout.execute(SetForegroundColor(color))?;
    stdout.execute(Print(message))?;
    stdout.execute(ResetColor)?;
    stdout.execute(Print("\n"))?;
    Ok(())
}
