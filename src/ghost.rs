use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::components::{Cell, Dir, GhostId, Marker, Pos};
use crate::level::Grid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GhostColor {
    Red,
    Green,
    Blue,
    Magenta,
}

impl GhostColor {
    pub const PALETTE: [GhostColor; 4] = [
        GhostColor::Red,
        GhostColor::Green,
        GhostColor::Blue,
        GhostColor::Magenta,
    ];

    /// Ids are 1-based; the palette wraps once it runs out.
    pub fn for_id(id: GhostId) -> Self {
        let slot = (id.0 as usize).saturating_sub(1) % Self::PALETTE.len();
        Self::PALETTE[slot]
    }
}

/// Likelihood, in whole percent, that a ghost heads in `dir`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prediction {
    pub dir: Dir,
    pub percent: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ghost {
    id: GhostId,
    pos: Pos,
    color: GhostColor,
}

impl Ghost {
    pub fn new(id: GhostId, pos: Pos) -> Self {
        Self {
            id,
            pos,
            color: GhostColor::for_id(id),
        }
    }

    /// Start cell of the ghost with 0-based index `idx`. Saturates instead
    /// of wrapping for absurd indices; such cells are off any real grid.
    pub fn start_pos(idx: usize) -> Pos {
        Pos::new(idx.saturating_mul(2).saturating_add(2), 3 + (idx % 2) * 2)
    }

    pub fn id(&self) -> GhostId {
        self.id
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn color(&self) -> GhostColor {
        self.color
    }

    /// Directions this ghost may take right now, in probe order. Cells
    /// holding another ghost are blocked; the player's cell is not.
    pub fn legal_moves(&self, grid: &Grid) -> Vec<(Dir, Pos)> {
        Dir::PROBE_ORDER
            .iter()
            .filter_map(|&dir| {
                let next = grid.neighbor(self.pos, dir)?;
                match grid.cell(next) {
                    Cell::Wall | Cell::Ghost(_) => None,
                    _ => Some((dir, next)),
                }
            })
            .collect()
    }

    /// Takes one uniformly random legal step. Returns the direction taken,
    /// or `None` when boxed in.
    pub fn step_random(&mut self, grid: &mut Grid, rng: &mut impl Rng) -> Option<Dir> {
        let options = self.legal_moves(grid);
        let &(dir, next) = options.choose(rng)?;
        grid.clear_marker(self.pos);
        self.pos = next;
        grid.place_marker(Marker::Ghost(self.id), next);
        debug!(ghost = %self.id, dir = dir.name(), to = %next, "ghost moved");
        Some(dir)
    }

    /// Weights each legal direction by closeness to the player. This is a
    /// display aid only; `step_random` ignores it.
    ///
    /// Weight `100 / (d + 1)` for manhattan distance `d`, percentage
    /// `floor(100 * weight / total)`. The fractions are scaled by the lcm of
    /// the `d + 1` terms so the division is exact.
    pub fn predict(&self, grid: &Grid, player: Pos) -> Vec<Prediction> {
        let spans: Vec<(Dir, u128)> = self
            .legal_moves(grid)
            .into_iter()
            .map(|(dir, next)| (dir, player.manhattan(next) as u128 + 1))
            .collect();
        let scale = spans.iter().fold(1u128, |acc, &(_, span)| lcm(acc, span));
        let total: u128 = spans.iter().map(|&(_, span)| scale / span).sum();

        let predictions: Vec<Prediction> = spans
            .into_iter()
            .map(|(dir, span)| Prediction {
                dir,
                percent: (100 * (scale / span) / total) as u32,
            })
            .collect();
        trace!(ghost = %self.id, ?predictions, "prediction");
        predictions
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn lcm(a: u128, b: u128) -> u128 {
    a / gcd(a, b) * b
}
