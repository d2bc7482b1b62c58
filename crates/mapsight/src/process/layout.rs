//! Field offsets of the D2R client's in-memory records
//!
//! One module per foreign record, from the unit hash table down to the seed
//! block. Offsets count from the start of their record unless a comment says
//! otherwise.

/// Unit hash table (one per unit type, laid out back to back)
pub mod unit_table {
    /// Buckets per unit type
    pub const BUCKETS: usize = 128;

    /// Pointer width
    pub const POINTER: u64 = 8;

    /// Byte stride between the tables of two consecutive unit types
    pub const TYPE_STRIDE: u64 = BUCKETS as u64 * POINTER;

    /// Upper bound on nodes followed in one bucket chain
    pub const MAX_CHAIN_LENGTH: usize = 4096;
}

/// UnitAny record
pub mod unit {
    pub const UNIT_TYPE: u64 = 0x00;
    pub const TXT_FILE_NO: u64 = 0x04;
    pub const UNIT_ID: u64 = 0x08;
    pub const MODE: u64 = 0x0C;
    pub const UNIT_DATA: u64 = 0x10;
    pub const ACT: u64 = 0x20;
    pub const PATH: u64 = 0x38;
    pub const STATS: u64 = 0x88;
    pub const INVENTORY: u64 = 0x90;
    pub const LIST_NEXT: u64 = 0x150;

    /// Bytes read for one record
    pub const SIZE: usize = 0x158;
}

/// Path of a player or monster unit
pub mod path {
    pub const DYNAMIC_X: u64 = 0x02;
    pub const DYNAMIC_Y: u64 = 0x06;
    pub const ROOM: u64 = 0x20;

    pub const SIZE: usize = 0x28;
}

/// Path of an item or object unit
pub mod static_path {
    pub const POS_X: u64 = 0x10;
    pub const POS_Y: u64 = 0x14;

    pub const SIZE: usize = 0x18;
}

/// Room → RoomEx → Level chain used to resolve the current area
pub mod room {
    pub const ROOM_EX: u64 = 0x18;
    pub const ROOM_EX_LEVEL: u64 = 0x90;
    pub const LEVEL_ID: u64 = 0x1F8;
}

/// Act and ActMisc
pub mod act {
    pub const ACT_ID: u64 = 0x20;
    pub const ACT_MISC: u64 = 0x78;

    pub const SIZE: usize = 0x80;

    pub const MISC_DIFFICULTY: u64 = 0x830;
}

/// Player unit data
pub mod player {
    pub const NAME: u64 = 0x00;
    pub const NAME_LEN: usize = 16;

    /// Inventory field holding a non-null pointer only for the local player
    pub const INVENTORY_LOCAL_MARKER: u64 = 0x70;

    /// Player mode: dead (corpse)
    pub const MODE_DEAD: u32 = 17;
}

/// Monster unit data
pub mod monster {
    pub const FLAGS: u64 = 0x1A;

    pub const SIZE: usize = 0x20;

    pub const MODE_DEATH: u32 = 0;
    pub const MODE_DEAD: u32 = 12;

    /// Mercenary txt ids (Rogue, Desert, Iron Wolf, Barbarian x2)
    pub const MERC_TXT_IDS: [u32; 5] = [271, 338, 359, 560, 561];
}

/// Item unit data
pub mod item {
    pub const QUALITY: u64 = 0x00;
    pub const OWNER_ID: u64 = 0x0C;
    pub const FLAGS: u64 = 0x18;
    pub const INV_PAGE: u64 = 0x55;

    pub const SIZE: usize = 0x58;

    pub const MODE_STORED: u32 = 0;
    pub const MODE_EQUIPPED: u32 = 1;
    pub const MODE_IN_BELT: u32 = 2;
    pub const MODE_ON_GROUND: u32 = 3;
    pub const MODE_DROPPING: u32 = 5;

    /// Inventory page used by vendor stores
    pub const PAGE_VENDOR: u8 = 0xFF;
}

/// Stat list attached to a unit
pub mod stats {
    pub const ARRAY: u64 = 0x30;
    pub const COUNT: u64 = 0x38;

    pub const ENTRY_SIZE: usize = 8;

    /// Sanity bound on the number of stat entries
    pub const MAX_ENTRIES: u64 = 512;

    pub const STAT_LIFE: u16 = 6;
    pub const STAT_MAX_LIFE: u16 = 7;

    /// Life values are stored in fixed point with 8 fractional bits
    pub const LIFE_SHIFT: u32 = 8;
}

/// Roster member (party screen) linked list
pub mod roster {
    pub const NAME: u64 = 0x00;
    pub const NAME_LEN: usize = 16;
    pub const UNIT_ID: u64 = 0x48;
    pub const LIFE_PERCENT: u64 = 0x4C;
    pub const LEVEL: u64 = 0x58;
    pub const PARTY_ID: u64 = 0x5A;
    pub const NEXT: u64 = 0x148;

    pub const SIZE: usize = 0x150;

    /// Party id of a member that is not in any party
    pub const NO_PARTY: u16 = u16::MAX;

    /// Upper bound on members followed in the list
    pub const MAX_MEMBERS: usize = 64;
}

/// Menu state block
pub mod menu {
    pub const IN_GAME: u64 = 0x00;
    pub const INVENTORY: u64 = 0x01;
    pub const CHARACTER: u64 = 0x02;
    pub const SKILL_TREE: u64 = 0x04;
    pub const ESC_MENU: u64 = 0x08;
    pub const MAP: u64 = 0x09;
    pub const NPC_INTERACT: u64 = 0x0A;
    pub const STASH: u64 = 0x18;

    pub const SIZE: usize = 0x20;
}

/// Mouse hover state
pub mod hover {
    pub const IS_HOVERED: u64 = 0x00;
    pub const UNIT_TYPE: u64 = 0x04;
    pub const UNIT_ID: u64 = 0x08;

    pub const SIZE: usize = 0x0C;
}

/// Game name / password / IP block
pub mod session {
    pub const GAME_NAME: u64 = 0x40;
    pub const GAME_PASS: u64 = 0x78;
    pub const GAME_IP: u64 = 0x1D0;
    pub const FIELD_LEN: usize = 24;
}

/// World seed block (reached through a pointer at the map seed offset)
pub mod seed {
    pub const VALUE: u64 = 0x840;
}
