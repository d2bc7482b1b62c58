use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use crate::error::Result;
use crate::game::{Position, UnitType};
use crate::process::layout::monster;
use crate::process::ReadMemory;
use crate::unit::player::DynamicPath;
use crate::unit::{UnitAny, UnitData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr, Display)]
pub enum MonsterKind {
    Monster,
    Merc,
}

impl MonsterKind {
    pub fn from_txt_file_no(txt_file_no: u32) -> Self {
        if monster::MERC_TXT_IDS.contains(&txt_file_no) {
            Self::Merc
        } else {
            Self::Monster
        }
    }
}

/// Decoded monster unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterData {
    pub position: Position,
    pub kind: MonsterKind,
    /// Champion / unique / minion bits.
    pub flags: u8,
    pub is_dead: bool,
}

impl UnitData for MonsterData {
    const UNIT_TYPE: UnitType = UnitType::Monster;

    fn read<R: ReadMemory>(reader: &R, raw: &UnitAny) -> Result<Self> {
        let flags = reader.read_u8(raw.unit_data.wrapping_add(monster::FLAGS))?;
        let dynamic_path: DynamicPath = reader.read_at(raw.path)?;

        Ok(Self {
            position: dynamic_path.position(),
            kind: MonsterKind::from_txt_file_no(raw.txt_file_no),
            flags,
            is_dead: raw.mode == monster::MODE_DEATH || raw.mode == monster::MODE_DEAD,
        })
    }
}
