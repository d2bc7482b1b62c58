use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::process::ReadMemory;
use crate::process::layout::stats;

/// Current and maximum life of a unit, in whole points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Life {
    pub current: u32,
    pub max: u32,
}

impl Life {
    pub fn percent(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f64 / self.max as f64 * 100.0
    }
}

/// Read life and max life from a unit's stat list.
///
/// Returns `Ok(None)` when the list holds neither stat.
pub fn read_life<R: ReadMemory>(reader: &R, stat_list: u64) -> Result<Option<Life>> {
    let array = reader.read_ptr(stat_list.wrapping_add(stats::ARRAY))?;
    let count = reader.read_u64(stat_list.wrapping_add(stats::COUNT))?.min(stats::MAX_ENTRIES);
    let bytes = reader.read_bytes(array, count as usize * stats::ENTRY_SIZE)?;

    let mut current = None;
    let mut max = None;
    for entry in bytes.chunks_exact(stats::ENTRY_SIZE) {
        let stat = u16::from_le_bytes([entry[2], entry[3]]);
        let value = u32::from_le_bytes([entry[4], entry[5], entry[6], entry[7]]);
        match stat {
            stats::STAT_LIFE => current = Some(value >> stats::LIFE_SHIFT),
            stats::STAT_MAX_LIFE => max = Some(value >> stats::LIFE_SHIFT),
            _ => {}
        }
    }

    Ok(match (current, max) {
        (None, None) => None,
        (current, max) => Some(Life {
            current: current.unwrap_or(0),
            max: max.unwrap_or(0),
        }),
    })
}
