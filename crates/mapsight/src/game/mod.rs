mod enums;
mod tables;

use serde::{Deserialize, Serialize};

pub use enums::*;
pub use tables::*;

/// Stable id the game assigns to a unit.
pub type UnitId = u32;

/// World position in game tile units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}
