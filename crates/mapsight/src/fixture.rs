//! Fake game memory for scanner, snapshot and monitor tests.

use crate::game::UnitType;
use crate::offset::OffsetsCollection;
use crate::process::layout::{
    act, hover, item, menu, monster, path, player, room, seed, session, static_path, unit,
    unit_table,
};
use crate::process::{MockMemoryBuilder, MockProcess, ReadMemory};

pub(crate) const BASE: u64 = 0x1_4000_0000;
const HEAP: u64 = 0x2_0000_0000;
pub(crate) const WINDOW: isize = 0x1234;
pub(crate) const GAME_NAME: &str = "mf-run";
pub(crate) const SEED: u64 = 0xABCD;

/// Addresses of the blocks behind one fake player.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlayerHandle {
    pub record: u64,
    pub path: u64,
    pub level: u64,
    pub misc: u64,
}

/// A mock process laid out like the game: unit tables, menu block, session
/// block and seed block, plus a bump allocator for unit records.
pub(crate) struct FakeGame {
    pub process: MockProcess,
    pub offsets: OffsetsCollection,
    seed_block: u64,
    next_free: u64,
}

impl FakeGame {
    pub fn new(pid: u32) -> Self {
        let offsets = OffsetsCollection {
            version: "test".to_string(),
            unit_hash_table: 0x1000,
            menu_open: 0x100,
            menu_data: 0x200,
            last_hover_data: 0x300,
            roster_data: 0x400,
            game_name: 0x800,
            map_seed: 0x40,
            interacted_npc: 0x48,
        };
        let process = MockMemoryBuilder::new()
            .pid(pid)
            .base_address(BASE)
            .main_window(WINDOW)
            .build();

        let mut game = Self {
            process,
            offsets,
            seed_block: 0,
            next_free: HEAP,
        };

        let tables_len = unit_table::TYPE_STRIDE as usize * 6;
        game.process
            .map_zeroed(BASE + game.offsets.unit_hash_table, tables_len);
        game.process.map_zeroed(BASE + game.offsets.menu_open, 1);
        game.process.map_zeroed(BASE + game.offsets.menu_data, menu::SIZE);
        game.process
            .map_zeroed(BASE + game.offsets.last_hover_data, hover::SIZE);
        game.process.map_zeroed(BASE + game.offsets.roster_data, 8);
        game.process.map_zeroed(BASE + game.offsets.interacted_npc, 4);

        let name_block = BASE + game.offsets.game_name;
        game.process
            .map_zeroed(name_block, session::GAME_IP as usize + session::FIELD_LEN);
        game.process
            .write_bytes(name_block + session::GAME_NAME, GAME_NAME.as_bytes());

        game.seed_block = game.alloc(seed::VALUE as usize + 8);
        game.process
            .write_u64(BASE + game.offsets.map_seed, game.seed_block);
        game.set_seed(SEED);
        game.set_in_game(true);
        game
    }

    fn alloc(&mut self, len: usize) -> u64 {
        let address = self.next_free;
        self.next_free += (len as u64 + 0x1F) & !0xF;
        self.process.map_zeroed(address, len);
        address
    }

    pub fn set_in_game(&mut self, in_game: bool) {
        self.process.write_u8(
            BASE + self.offsets.menu_data + menu::IN_GAME,
            in_game as u8,
        );
    }

    pub fn set_seed(&mut self, value: u64) {
        self.process.write_u64(self.seed_block + seed::VALUE, value);
    }

    pub fn set_interacted_npc(&mut self, npc: u32) {
        self.process
            .write_u32(BASE + self.offsets.interacted_npc, npc);
    }

    fn bucket_head(&self, unit_type: UnitType, bucket: usize) -> u64 {
        BASE + self.offsets.unit_hash_table
            + unit_table::TYPE_STRIDE * unit_type as u64
            + bucket as u64 * unit_table::POINTER
    }

    /// Prepend `record` to the chain of `bucket`.
    pub fn link(&mut self, unit_type: UnitType, bucket: usize, record: u64) {
        let head = self.bucket_head(unit_type, bucket);
        let old = self.process.read_u64(head).unwrap_or(0);
        self.process.write_u64(record + unit::LIST_NEXT, old);
        self.process.write_u64(head, record);
    }

    pub fn clear_bucket(&mut self, unit_type: UnitType, bucket: usize) {
        let head = self.bucket_head(unit_type, bucket);
        self.process.write_u64(head, 0);
    }

    pub fn set_next(&mut self, record: u64, next: u64) {
        self.process.write_u64(record + unit::LIST_NEXT, next);
    }

    pub fn set_mode(&mut self, record: u64, mode: u32) {
        self.process.write_u32(record + unit::MODE, mode);
    }

    /// Make a whole unit record unreadable.
    pub fn unmap_record(&mut self, record: u64) {
        self.process.unmap(record, unit::SIZE);
    }

    fn record(
        &mut self,
        unit_type: UnitType,
        txt_file_no: u32,
        unit_id: u32,
        mode: u32,
        unit_data: u64,
        path_block: u64,
    ) -> u64 {
        let record = self.alloc(unit::SIZE);
        self.process.write_u32(record + unit::UNIT_TYPE, unit_type as u32);
        self.process.write_u32(record + unit::TXT_FILE_NO, txt_file_no);
        self.process.write_u32(record + unit::UNIT_ID, unit_id);
        self.process.write_u32(record + unit::MODE, mode);
        self.process.write_u64(record + unit::UNIT_DATA, unit_data);
        self.process.write_u64(record + unit::PATH, path_block);
        record
    }

    pub fn add_player(
        &mut self,
        id: u32,
        name: &str,
        area: u32,
        difficulty: u16,
        local: bool,
    ) -> PlayerHandle {
        let data = self.alloc(player::NAME_LEN);
        self.process.write_bytes(data + player::NAME, name.as_bytes());

        let room_block = self.alloc(room::ROOM_EX as usize + 8);
        let room_ex = self.alloc(room::ROOM_EX_LEVEL as usize + 8);
        let level = self.alloc(room::LEVEL_ID as usize + 4);
        self.process.write_u64(room_block + room::ROOM_EX, room_ex);
        self.process.write_u64(room_ex + room::ROOM_EX_LEVEL, level);
        self.process.write_u32(level + room::LEVEL_ID, area);

        let path_block = self.alloc(path::SIZE);
        self.process.write_u16(path_block + path::DYNAMIC_X, 5000);
        self.process.write_u16(path_block + path::DYNAMIC_Y, 4000 + id as u16);
        self.process.write_u64(path_block + path::ROOM, room_block);

        let act_block = self.alloc(act::SIZE);
        let misc = self.alloc(act::MISC_DIFFICULTY as usize + 2);
        self.process.write_u64(act_block + act::ACT_MISC, misc);
        self.process.write_u16(misc + act::MISC_DIFFICULTY, difficulty);

        let record = self.record(UnitType::Player, 0, id, 1, data, path_block);
        self.process.write_u64(record + unit::ACT, act_block);
        if local {
            let inventory = self.alloc(player::INVENTORY_LOCAL_MARKER as usize + 8);
            self.process
                .write_u64(inventory + player::INVENTORY_LOCAL_MARKER, 1);
            self.process.write_u64(record + unit::INVENTORY, inventory);
        }

        self.link(UnitType::Player, id as usize % unit_table::BUCKETS, record);
        PlayerHandle {
            record,
            path: path_block,
            level,
            misc,
        }
    }

    pub fn set_player_area(&mut self, handle: PlayerHandle, area: u32) {
        self.process.write_u32(handle.level + room::LEVEL_ID, area);
    }

    pub fn set_player_difficulty(&mut self, handle: PlayerHandle, difficulty: u16) {
        self.process
            .write_u16(handle.misc + act::MISC_DIFFICULTY, difficulty);
    }

    pub fn set_player_x(&mut self, handle: PlayerHandle, x: u16) {
        self.process.write_u16(handle.path + path::DYNAMIC_X, x);
    }

    pub fn add_monster(&mut self, id: u32, txt_file_no: u32, mode: u32) -> u64 {
        let data = self.alloc(monster::SIZE);
        let path_block = self.alloc(path::SIZE);
        self.process.write_u16(path_block + path::DYNAMIC_X, 100 + id as u16);
        let record = self.record(UnitType::Monster, txt_file_no, id, mode, data, path_block);
        self.link(UnitType::Monster, id as usize % unit_table::BUCKETS, record);
        record
    }

    pub fn add_item(&mut self, id: u32, txt_file_no: u32, mode: u32, x: u32, owner: u32) -> u64 {
        let data = self.alloc(item::SIZE);
        self.process.write_u32(data + item::OWNER_ID, owner);
        let path_block = self.alloc(static_path::SIZE);
        self.process.write_u32(path_block + static_path::POS_X, x);
        self.process.write_u32(path_block + static_path::POS_Y, 20);
        let record = self.record(UnitType::Item, txt_file_no, id, mode, data, path_block);
        self.link(UnitType::Item, id as usize % unit_table::BUCKETS, record);
        record
    }
}
