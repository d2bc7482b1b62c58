//! Validity and lookup tables consumed by the snapshot builder.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::game::{Area, Difficulty};

/// Monster level of each area, per difficulty (normal, nightmare, hell).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaLevels {
    levels: HashMap<Area, [u8; 3]>,
}

impl AreaLevels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, area: Area, levels: [u8; 3]) {
        self.levels.insert(area, levels);
    }

    pub fn level(&self, area: Area, difficulty: Difficulty) -> Option<u8> {
        self.levels
            .get(&area)
            .map(|levels| levels[difficulty as usize])
            .filter(|&level| level > 0)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Valid area and difficulty sets plus the area level lookup.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub area_levels: AreaLevels,
}

impl Tables {
    pub fn new(area_levels: AreaLevels) -> Self {
        Self { area_levels }
    }

    /// Load the area level table from a JSON file keyed by area name.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let area_levels: AreaLevels = serde_json::from_str(&content)?;
        info!(
            "Loaded {} area levels from {}",
            area_levels.len(),
            path.as_ref().display()
        );
        Ok(Self { area_levels })
    }

    pub fn valid_area(&self, raw: u32) -> Option<Area> {
        Area::from_u32(raw)
    }

    pub fn valid_difficulty(&self, raw: u16) -> Option<Difficulty> {
        Difficulty::from_u16(raw)
    }

    pub fn area_level(&self, area: Area, difficulty: Difficulty) -> Option<u8> {
        self.area_levels.level(area, difficulty)
    }
}
