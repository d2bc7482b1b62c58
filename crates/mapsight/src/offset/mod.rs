//! Module-relative offsets of the game structures the snapshot builder reads.
//!
//! Offsets change with every game patch, so they live in a JSON file next to
//! the binary and fall back to the built-in set for the last known version.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetsCollection {
    pub version: String,
    pub unit_hash_table: u64,
    pub menu_open: u64,
    pub menu_data: u64,
    pub last_hover_data: u64,
    pub roster_data: u64,
    pub game_name: u64,
    pub map_seed: u64,
    pub interacted_npc: u64,
}

impl Default for OffsetsCollection {
    fn default() -> Self {
        Self {
            version: "2.7.80249".to_string(),
            unit_hash_table: 0x1E9_E350,
            menu_open: 0x1EA_E1A6,
            menu_data: 0x1EA_0750,
            last_hover_data: 0x1DA_F3F0,
            roster_data: 0x1EB_B5A8,
            game_name: 0x2_3FE_6B0,
            map_seed: 0x1DF_4B48,
            interacted_npc: 0x2_3E5_C98,
        }
    }
}

impl OffsetsCollection {
    /// All offsets the builder cannot work without are set.
    pub fn is_valid(&self) -> bool {
        !self.version.is_empty()
            && self.unit_hash_table != 0
            && self.menu_data != 0
            && self.map_seed != 0
    }
}

/// Load offsets from a JSON file.
pub fn load_offsets<P: AsRef<Path>>(path: P) -> Result<OffsetsCollection> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let offsets: OffsetsCollection = serde_json::from_str(&content)?;
    debug!("Parsed offsets from {}: {:?}", path.display(), offsets);

    if !offsets.is_valid() {
        return Err(Error::InvalidOffset(format!(
            "{} is missing required offsets",
            path.display()
        )));
    }
    Ok(offsets)
}

/// Save offsets to a JSON file.
pub fn save_offsets<P: AsRef<Path>>(path: P, offsets: &OffsetsCollection) -> Result<()> {
    let content = serde_json::to_string_pretty(offsets)?;
    fs::write(path.as_ref(), content)?;
    info!("Saved offsets to {}", path.as_ref().display());
    Ok(())
}
