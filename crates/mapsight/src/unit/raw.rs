use crate::game::{UnitId, UnitType};
use crate::process::layout::unit;
use crate::process::{ByteBuffer, FromMemory};

/// One UnitAny record as laid out in the game's unit hash table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitAny {
    pub unit_type: u32,
    pub txt_file_no: u32,
    pub unit_id: UnitId,
    pub mode: u32,
    pub unit_data: u64,
    pub act: u64,
    pub path: u64,
    pub stats: u64,
    pub inventory: u64,
    /// Next unit in the same hash bucket, 0 at the end of the chain.
    pub list_next: u64,
}

impl FromMemory for UnitAny {
    const SIZE: usize = unit::SIZE;

    fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
        let buf = ByteBuffer::new(bytes);
        Some(Self {
            unit_type: buf.u32_at(unit::UNIT_TYPE)?,
            txt_file_no: buf.u32_at(unit::TXT_FILE_NO)?,
            unit_id: buf.u32_at(unit::UNIT_ID)?,
            mode: buf.u32_at(unit::MODE)?,
            unit_data: buf.u64_at(unit::UNIT_DATA)?,
            act: buf.u64_at(unit::ACT)?,
            path: buf.u64_at(unit::PATH)?,
            stats: buf.u64_at(unit::STATS)?,
            inventory: buf.u64_at(unit::INVENTORY)?,
            list_next: buf.u64_at(unit::LIST_NEXT)?,
        })
    }
}

impl UnitAny {
    /// A record is usable when its type tag matches the table being walked,
    /// its id is not the "no unit" sentinel and it carries type-specific data.
    pub fn is_valid_for(&self, unit_type: UnitType) -> bool {
        self.unit_type == unit_type as u32 && self.unit_id < UnitId::MAX && self.unit_data != 0
    }
}
