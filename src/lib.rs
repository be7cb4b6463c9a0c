//! Turn-based maze chase: eat every dot on a pillar maze before one of the
//! wandering ghosts lands on you.

pub mod components;
pub mod config;
pub mod error;
pub mod game;
pub mod ghost;
pub mod level;
pub mod player;
pub mod render;

pub use components::{Cell, Command, Dir, GhostId, Marker, Pos};
pub use config::Settings;
pub use error::Error;
pub use game::{Game, GhostReport, Snapshot, Status};
pub use ghost::{Ghost, GhostColor, Prediction};
pub use level::Grid;
