use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::components::{Command, Dir};

/// Arrow keys or vi keys move, `q`/Esc quits. Releases and unknown keys map
/// to nothing so the caller simply reads again.
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let command = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Command::Move(Dir::Up),
        KeyCode::Down | KeyCode::Char('j') => Command::Move(Dir::Down),
        KeyCode::Left | KeyCode::Char('h') => Command::Move(Dir::Left),
        KeyCode::Right | KeyCode::Char('l') => Command::Move(Dir::Right),
        KeyCode::Esc | KeyCode::Char('q') => Command::Quit,
        _ => return None,
    };
    Some(command)
}
