//! Per-frame snapshot of one game process.

mod builder;
mod fault;
mod summary;

use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::game::{Area, Difficulty, Position};
use crate::session::{ItemLogEntry, ProcessSession};
use crate::unit::{ItemUnit, MonsterUnit, PlayerUnit};
use crate::world::{HoverData, MenuData, Roster, RosterMember};

pub use builder::SnapshotBuilder;
pub use fault::{FaultKind, FaultLatch};
pub use summary::SnapshotSummary;

/// Outcome of one frame for one process.
#[derive(Debug)]
pub enum Frame {
    /// No attachable process with that id.
    Unavailable,
    /// The process is at the menus; its session state was torn down.
    NotInGame,
    /// A transient fault that was already reported and is still latched.
    Suppressed(FaultKind),
    Ready(Box<GameData>),
}

impl Frame {
    pub fn game_data(&self) -> Option<&GameData> {
        match self {
            Frame::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_game_data(self) -> Option<GameData> {
        match self {
            Frame::Ready(data) => Some(*data),
            _ => None,
        }
    }
}

/// A player unit joined with its roster entry.
#[derive(Debug, Clone)]
pub struct PlayerView {
    pub unit: Arc<PlayerUnit>,
    pub roster: Option<RosterMember>,
    /// Shares the local player's party.
    pub in_party: bool,
}

/// One frame's validated view of a game process. Never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct GameData {
    pub process_id: u32,
    pub main_window_handle: isize,
    pub captured_at: DateTime<Local>,
    pub in_game: bool,
    pub map_seed: u32,
    /// The seed differed from the previous frame's.
    pub new_instance: bool,
    pub area: Area,
    pub area_level: Option<u8>,
    pub difficulty: Difficulty,
    pub player_unit: Arc<PlayerUnit>,
    pub player_name: String,
    pub player_position: Position,
    /// Every non-corpse player in the scan, the local one included.
    pub players: Vec<PlayerView>,
    pub corpses: Vec<Arc<PlayerUnit>>,
    /// Living monsters, mercenaries excluded.
    pub monsters: Vec<Arc<MonsterUnit>>,
    pub mercs: Vec<Arc<MonsterUnit>>,
    /// Items on the ground this frame.
    pub items: Vec<Arc<ItemUnit>>,
    pub item_log: Vec<ItemLogEntry>,
    pub session: ProcessSession,
    pub roster: Roster,
    pub menu_open: u8,
    pub menu: MenuData,
    pub hover: HoverData,
    pub interacted_npc: Option<u32>,
}

impl GameData {
    pub fn summary(&self, now: std::time::Instant) -> SnapshotSummary {
        SnapshotSummary::new(self, now)
    }

    pub fn in_town(&self) -> bool {
        self.area.is_town()
    }
}
