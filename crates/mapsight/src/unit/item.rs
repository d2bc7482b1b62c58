use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::game::{Position, UnitType};
use crate::process::layout::{item, static_path};
use crate::process::{ByteBuffer, FromMemory, ReadMemory};
use crate::unit::{UnitAny, UnitData};

/// Path block of a static unit (items, objects).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StaticPath {
    pub x: u32,
    pub y: u32,
}

impl FromMemory for StaticPath {
    const SIZE: usize = static_path::SIZE;

    fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
        let buf = ByteBuffer::new(bytes);
        Some(Self {
            x: buf.u32_at(static_path::POS_X)?,
            y: buf.u32_at(static_path::POS_Y)?,
        })
    }
}

/// Item unit data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct RawItemData {
    quality: u32,
    owner_id: u32,
    flags: u32,
    inv_page: u8,
}

impl FromMemory for RawItemData {
    const SIZE: usize = item::SIZE;

    fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
        let buf = ByteBuffer::new(bytes);
        Some(Self {
            quality: buf.u32_at(item::QUALITY)?,
            owner_id: buf.u32_at(item::OWNER_ID)?,
            flags: buf.u32_at(item::FLAGS)?,
            inv_page: buf.u8_at(item::INV_PAGE)?,
        })
    }
}

/// Where an item currently is, derived from the unit mode and page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemPlace {
    OnGround,
    Owned,
    Vendor,
    Other,
}

/// Decoded item unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    pub txt_file_no: u32,
    pub position: Position,
    pub quality: u32,
    pub owner_id: u32,
    pub flags: u32,
    pub place: ItemPlace,
}

impl ItemData {
    /// Identity of a ground item that survives unit id reuse.
    pub fn hash_key(&self) -> String {
        format!("{}/{}/{}", self.txt_file_no, self.position.x, self.position.y)
    }
}

fn item_place(mode: u32, inv_page: u8) -> ItemPlace {
    match mode {
        item::MODE_ON_GROUND | item::MODE_DROPPING => ItemPlace::OnGround,
        item::MODE_STORED if inv_page == item::PAGE_VENDOR => ItemPlace::Vendor,
        item::MODE_STORED | item::MODE_EQUIPPED | item::MODE_IN_BELT => ItemPlace::Owned,
        _ => ItemPlace::Other,
    }
}

impl UnitData for ItemData {
    const UNIT_TYPE: UnitType = UnitType::Item;

    fn read<R: ReadMemory>(reader: &R, raw: &UnitAny) -> Result<Self> {
        let data: RawItemData = reader.read_at(raw.unit_data)?;
        let path: StaticPath = reader.read_at(raw.path)?;

        Ok(Self {
            txt_file_no: raw.txt_file_no,
            position: Position::new(path.x, path.y),
            quality: data.quality,
            owner_id: data.owner_id,
            flags: data.flags,
            place: item_place(raw.mode, data.inv_page),
        })
    }
}
