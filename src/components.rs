use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: Pos) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({};{})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    /// Order in which ghosts probe their neighbours. Prediction output and
    /// its truncation ties depend on it.
    pub const PROBE_ORDER: [Dir; 4] = [Dir::Right, Dir::Left, Dir::Down, Dir::Up];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dir::Up => "Up",
            Dir::Down => "Down",
            Dir::Left => "Left",
            Dir::Right => "Right",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GhostId(pub u32);

impl fmt::Display for GhostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

/// Visible content of a grid cell. Whether a dot lies underneath a marker is
/// tracked separately by the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Empty,
    Collectible,
    Player,
    Ghost(GhostId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Player,
    Ghost(GhostId),
}

impl From<Marker> for Cell {
    fn from(marker: Marker) -> Self {
        match marker {
            Marker::Player => Cell::Player,
            Marker::Ghost(id) => Cell::Ghost(id),
        }
    }
}

/// One decoded input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Dir),
    Quit,
}
