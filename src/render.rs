use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::components::Cell;
use crate::game::{GhostReport, Snapshot};
use crate::ghost::GhostColor;

const CELL_W: usize = 2;

pub fn ghost_color(color: GhostColor) -> Color {
    match color {
        GhostColor::Red => Color::Red,
        GhostColor::Green => Color::Green,
        GhostColor::Blue => Color::Blue,
        GhostColor::Magenta => Color::Magenta,
    }
}

/// `20% Right, 60% Left`; empty when the ghost is boxed in.
pub fn format_predictions(report: &GhostReport) -> String {
    report
        .predictions
        .iter()
        .map(|p| format!("{}% {}", p.percent, p.dir.name()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Text shown under the board, each line with its colour.
pub fn status_lines(snapshot: &Snapshot) -> Vec<(String, Color)> {
    let mut lines = Vec::with_capacity(snapshot.ghosts.len() + 2);
    lines.push((format!("Pacman {}", snapshot.player), Color::Cyan));
    for report in &snapshot.ghosts {
        lines.push((
            format!(
                "{} {} -> Next Move: {}",
                report.id,
                report.pos,
                format_predictions(report)
            ),
            ghost_color(report.color),
        ));
    }
    lines.push((
        format!("Dots left: {}  (arrows/hjkl move, q quits)", snapshot.dots_left),
        Color::White,
    ));
    lines
}

fn glyph(cell: Cell, snapshot: &Snapshot) -> (String, Color) {
    match cell {
        Cell::Player => ("P".to_string(), Color::Yellow),
        Cell::Ghost(id) => {
            let color = snapshot
                .ghosts
                .iter()
                .find(|g| g.id == id)
                .map(|g| ghost_color(g.color))
                .unwrap_or(Color::Red);
            let label = id.to_string();
            if label.width() <= CELL_W {
                (label, color)
            } else {
                ("G".to_string(), color)
            }
        }
        Cell::Wall => ("##".to_string(), Color::Grey),
        Cell::Collectible => ("·".to_string(), Color::White),
        Cell::Empty => (String::new(), Color::Reset),
    }
}

pub struct Renderer {
    last: Vec<Cell>,
    last_status: Vec<String>,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![Cell::Empty; width * height],
            last_status: Vec::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 0,
        }
    }

    /// Draws only the cells that changed since the previous frame unless the
    /// layout moved.
    pub fn draw<W: Write>(
        &mut self,
        out: &mut W,
        snapshot: &Snapshot,
        (term_w, term_h): (u16, u16),
    ) -> io::Result<()> {
        let height = snapshot.cells.len();
        let width = snapshot.cells.first().map_or(0, |row| row.len());
        let status = status_lines(snapshot);
        let needed_w = (width * CELL_W) as u16;
        let needed_h = (height + 1 + status.len()) as u16;

        out.queue(MoveTo(0, 0))?;
        if term_w < needed_w || term_h < needed_h {
            out.queue(Clear(ClearType::All))?;
            out.queue(Print(format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            )))?;
            out.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            out.queue(Clear(ClearType::All))?;
            self.last = vec![Cell::Empty; width * height];
        }

        for (y, row) in snapshot.cells.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                let idx = y * width + x;
                if self.needs_full || self.last[idx] != cell {
                    self.last[idx] = cell;
                    self.draw_cell(out, x, y, cell, snapshot)?;
                }
            }
        }

        let status_top = self.origin_y + height as u16 + 1;
        for (i, (line, color)) in status.iter().enumerate() {
            if !self.needs_full && self.last_status.get(i) == Some(line) {
                continue;
            }
            out.queue(MoveTo(self.origin_x, status_top + i as u16))?;
            out.queue(Clear(ClearType::UntilNewLine))?;
            out.queue(SetForegroundColor(*color))?;
            out.queue(Print(line))?;
            out.queue(ResetColor)?;
        }
        self.last_status = status.into_iter().map(|(line, _)| line).collect();
        self.needs_full = false;

        out.flush()
    }

    fn draw_cell<W: Write>(
        &self,
        out: &mut W,
        x: usize,
        y: usize,
        cell: Cell,
        snapshot: &Snapshot,
    ) -> io::Result<()> {
        let (text, color) = glyph(cell, snapshot);
        let x_pos = self.origin_x + (x * CELL_W) as u16;
        let y_pos = self.origin_y + y as u16;
        out.queue(MoveTo(x_pos, y_pos))?;
        out.queue(SetForegroundColor(color))?;
        out.queue(Print(&text))?;
        let w = UnicodeWidthStr::width(text.as_str());
        for _ in w..CELL_W {
            out.queue(Print(' '))?;
        }
        out.queue(ResetColor)?;
        Ok(())
    }
}
