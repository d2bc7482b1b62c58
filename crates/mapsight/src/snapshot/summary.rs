use std::time::Instant;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::game::{Area, Difficulty, Position};
use crate::snapshot::GameData;

/// Flattened, serializable view of a [`GameData`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotSummary {
    pub process_id: u32,
    pub captured_at: DateTime<Local>,
    pub game_name: String,
    pub map_seed: String,
    pub new_instance: bool,
    pub area: Area,
    pub area_id: u32,
    pub area_level: Option<u8>,
    pub difficulty: Difficulty,
    pub player_name: String,
    pub player_position: Position,
    pub life_percent: Option<f64>,
    pub players: usize,
    pub party_members: usize,
    pub corpses: usize,
    pub monsters: usize,
    pub mercs: usize,
    pub ground_items: usize,
    pub item_log: usize,
    pub area_time_secs: f64,
    pub game_time_secs: f64,
}

impl SnapshotSummary {
    pub fn new(data: &GameData, now: Instant) -> Self {
        Self {
            process_id: data.process_id,
            captured_at: data.captured_at,
            game_name: data.session.info.game_name.clone(),
            map_seed: format!("{:#010x}", data.map_seed),
            new_instance: data.new_instance,
            area: data.area,
            area_id: data.area.id(),
            area_level: data.area_level,
            difficulty: data.difficulty,
            player_name: data.player_name.clone(),
            player_position: data.player_position,
            life_percent: data.player_unit.data.life.map(|life| life.percent()),
            players: data.players.len(),
            party_members: data.players.iter().filter(|p| p.in_party).count(),
            corpses: data.corpses.len(),
            monsters: data.monsters.len(),
            mercs: data.mercs.len(),
            ground_items: data.items.len(),
            item_log: data.item_log.len(),
            area_time_secs: data.session.area_time_elapsed(now).as_secs_f64(),
            game_time_secs: data.session.game_time_elapsed(now).as_secs_f64(),
        }
    }
}
