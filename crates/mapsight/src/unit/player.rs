use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::Result;
use crate::game::{Position, UnitType};
use crate::process::layout::{act, path, player, room};
use crate::process::{ByteBuffer, FromMemory, ReadMemory, decode_name};
use crate::unit::stats::{Life, read_life};
use crate::unit::{UnitAny, UnitData};

/// Path block of a moving unit (players, monsters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DynamicPath {
    pub x: u16,
    pub y: u16,
    pub room: u64,
}

impl FromMemory for DynamicPath {
    const SIZE: usize = path::SIZE;

    fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
        let buf = ByteBuffer::new(bytes);
        Some(Self {
            x: buf.u16_at(path::DYNAMIC_X)?,
            y: buf.u16_at(path::DYNAMIC_Y)?,
            room: buf.u64_at(path::ROOM)?,
        })
    }
}

impl DynamicPath {
    pub fn position(&self) -> Position {
        Position::new(self.x as u32, self.y as u32)
    }
}

/// Decoded player unit.
///
/// Area and difficulty stay raw here; the snapshot builder validates them
/// against the tables for the local player only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    pub name: String,
    pub position: Position,
    /// Carries the local inventory marker.
    pub is_local: bool,
    /// Left behind after a death.
    pub is_corpse: bool,
    pub act_id: Option<u32>,
    pub area_raw: Option<u32>,
    pub difficulty_raw: Option<u16>,
    pub life: Option<Life>,
}

impl PlayerData {
    /// Key used by the corpse cache.
    pub fn corpse_key(&self) -> String {
        format!("{}/{}/{}", self.name, self.position.x, self.position.y)
    }
}

impl UnitData for PlayerData {
    const UNIT_TYPE: UnitType = UnitType::Player;

    fn read<R: ReadMemory>(reader: &R, raw: &UnitAny) -> Result<Self> {
        let name_bytes =
            reader.read_bytes(raw.unit_data.wrapping_add(player::NAME), player::NAME_LEN)?;
        let dynamic_path: DynamicPath = reader.read_at(raw.path)?;

        let is_local = raw.inventory != 0
            && reader
                .read_u64(raw.inventory.wrapping_add(player::INVENTORY_LOCAL_MARKER))
                .map(|marker| marker != 0)
                .unwrap_or(false);

        let act_id = reader.read_u32(raw.act.wrapping_add(act::ACT_ID)).ok();
        let difficulty_raw = read_difficulty(reader, raw.act)
            .inspect_err(|e| trace!("unit {} difficulty unreadable: {}", raw.unit_id, e))
            .ok();
        let area_raw = read_area(reader, dynamic_path.room)
            .inspect_err(|e| trace!("unit {} area unreadable: {}", raw.unit_id, e))
            .ok();
        let life = if raw.stats != 0 {
            read_life(reader, raw.stats).ok().flatten()
        } else {
            None
        };

        Ok(Self {
            name: decode_name(&name_bytes),
            position: dynamic_path.position(),
            is_local,
            is_corpse: raw.mode == player::MODE_DEAD,
            act_id,
            area_raw,
            difficulty_raw,
            life,
        })
    }
}

/// Follow Act → ActMisc to the game difficulty.
fn read_difficulty<R: ReadMemory>(reader: &R, act_ptr: u64) -> Result<u16> {
    let misc = reader.read_ptr(act_ptr.wrapping_add(act::ACT_MISC))?;
    reader.read_u16(misc.wrapping_add(act::MISC_DIFFICULTY))
}

/// Follow Room → RoomEx → Level to the level id.
fn read_area<R: ReadMemory>(reader: &R, room_ptr: u64) -> Result<u32> {
    let room_ex = reader.read_ptr(room_ptr.wrapping_add(room::ROOM_EX))?;
    let level = reader.read_ptr(room_ex.wrapping_add(room::ROOM_EX_LEVEL))?;
    reader.read_u32(level.wrapping_add(room::LEVEL_ID))
}
