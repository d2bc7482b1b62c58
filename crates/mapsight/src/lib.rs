//! # mapsight
//!
//! Live-memory reader for a running game client.
//!
//! This crate provides:
//! - Process access (Windows, and `/proc` for Wine/Proton on Linux)
//! - Unit hash table traversal with an identity-stable unit cache
//! - Session and area tracking with new-game detection
//! - A per-frame, validated [`GameData`] snapshot
//!
//! A [`Monitor`] ties these together:
//!
//! ```ignore
//! use mapsight::prelude::*;
//!
//! let builder = SnapshotBuilder::new(OffsetsCollection::default(), Tables::default());
//! let mut monitor = Monitor::new(SystemProcessProvider::new("D2R.exe"), builder);
//! for (pid, frame) in monitor.poll()? {
//!     if let Ok(Frame::Ready(data)) = frame {
//!         println!("{} in {}", data.player_name, data.area);
//!     }
//! }
//! ```

pub mod error;
pub mod game;
pub mod monitor;
pub mod offset;
pub mod prelude;
pub mod process;
pub mod registry;
pub mod scan;
pub mod session;
pub mod snapshot;
pub mod unit;
pub mod world;

#[cfg(test)]
mod fixture;

pub use error::{Error, Result};
pub use game::{Area, AreaLevels, Difficulty, Position, Tables, UnitId, UnitType};
pub use monitor::Monitor;
pub use offset::{OffsetsCollection, load_offsets, save_offsets};
pub use process::{
    ProcessContext, ProcessHandle, ProcessInfo, ProcessProvider, ReadMemory,
    SystemProcessProvider,
};
pub use registry::{ProcessState, Registry};
pub use scan::{IdentityCache, ScanResult, ScanStats, UnitScanner};
pub use session::{AreaTracker, ItemLogEntry, ItemTracker, ProcessSession, SessionInfo};
pub use snapshot::{
    FaultKind, FaultLatch, Frame, GameData, PlayerView, SnapshotBuilder, SnapshotSummary,
};
pub use unit::{
    EntityIdentity, ItemData, ItemUnit, Life, MonsterData, MonsterKind, MonsterUnit, PlayerData,
    PlayerUnit, Unit,
};
pub use world::{HoverData, MenuData, Roster, RosterMember};
