use std::io;

use thiserror::Error;

use crate::components::Pos;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("grid {width}x{height} is too small, need at least 3x3")]
    GridTooSmall { width: usize, height: usize },

    #[error("{who} starts outside the maze at {pos}")]
    StartOutsideMaze { who: String, pos: Pos },

    #[error("{who} starts inside a wall at {pos}")]
    StartBlocked { who: String, pos: Pos },

    #[error("{who} starts on an occupied cell at {pos}")]
    StartOccupied { who: String, pos: Pos },

    #[error("grid {width}x{height} has no dots left to eat once everyone is placed")]
    NothingToEat { width: usize, height: usize },

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}
