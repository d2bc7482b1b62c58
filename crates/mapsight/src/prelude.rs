//! Prelude module for convenient imports
//!
//! ```ignore
//! use mapsight::prelude::*;
//! ```

// Entry points
pub use crate::monitor::Monitor;
pub use crate::snapshot::{Frame, GameData, SnapshotBuilder, SnapshotSummary};

// Error handling
pub use crate::error::{Error, Result};

// Configuration
pub use crate::game::{AreaLevels, Tables};
pub use crate::offset::{OffsetsCollection, load_offsets};

// Process access
pub use crate::process::{ProcessContext, ProcessProvider, SystemProcessProvider};

// World types
pub use crate::game::{Area, Difficulty, Position};
pub use crate::snapshot::FaultKind;
