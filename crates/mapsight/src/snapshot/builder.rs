use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::game::Tables;
use crate::offset::OffsetsCollection;
use crate::process::layout;
use crate::process::{ProcessContext, ReadMemory};
use crate::registry::ProcessState;
use crate::scan::UnitScanner;
use crate::session::SessionInfo;
use crate::snapshot::{FaultKind, Frame, GameData, PlayerView};
use crate::unit::{ItemPlace, MonsterKind, PlayerData, UnitRead};
use crate::world::{HoverData, MenuData, Roster};

/// Builds one [`GameData`] per call from a process context and that
/// process's state.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    offsets: OffsetsCollection,
    tables: Tables,
}

impl SnapshotBuilder {
    pub fn new(offsets: OffsetsCollection, tables: Tables) -> Self {
        Self { offsets, tables }
    }

    pub fn offsets(&self) -> &OffsetsCollection {
        &self.offsets
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Build the frame.
    ///
    /// A transient fault is returned as `Err(Error::Transient)` on its first
    /// occurrence and as `Ok(Frame::Suppressed)` while it stays latched. Other
    /// errors are read failures of blocks the frame cannot do without.
    pub fn build<C: ProcessContext>(
        &self,
        ctx: &C,
        state: &mut ProcessState,
        now: Instant,
    ) -> Result<Frame> {
        match self.try_build(ctx, state, now) {
            Ok(Some(data)) => {
                if state.latch.clear() {
                    info!("Process {} recovered, snapshot ready", ctx.process_id());
                }
                state.frames += 1;
                Ok(Frame::Ready(Box::new(data)))
            }
            Ok(None) => Ok(Frame::NotInGame),
            Err(Error::Transient(kind)) => {
                if state.latch.trip(kind) {
                    warn!("Process {}: {}", ctx.process_id(), kind);
                    Err(Error::Transient(kind))
                } else {
                    debug!("Process {}: {} (suppressed)", ctx.process_id(), kind);
                    Ok(Frame::Suppressed(kind))
                }
            }
            Err(e) => Err(e),
        }
    }

    fn try_build<C: ProcessContext>(
        &self,
        ctx: &C,
        state: &mut ProcessState,
        now: Instant,
    ) -> Result<Option<GameData>> {
        let menu_open: u8 = ctx.read(self.offsets.menu_open)?;
        let menu: MenuData = ctx.read(self.offsets.menu_data)?;
        if !menu.in_game {
            state.leave_game();
            return Ok(None);
        }
        let hover: HoverData = ctx
            .read(self.offsets.last_hover_data)
            .inspect_err(|e| debug!("Hover data unreadable: {}", e))
            .unwrap_or_default();

        let game_name_offset = self.offsets.game_name;
        state
            .tracker
            .ensure_session(now, || SessionInfo::read(ctx, game_name_offset));

        let scanner = UnitScanner::new(ctx, self.offsets.unit_hash_table);
        let (player_reads, _) = scanner.read_units::<PlayerData>()?;
        let local = select_local(&player_reads)
            .ok_or(Error::Transient(FaultKind::PlayerUnitMissing))?;
        let local_id = local.id();

        let area = local
            .data
            .area_raw
            .and_then(|raw| self.tables.valid_area(raw))
            .ok_or(Error::Transient(FaultKind::InvalidArea))?;
        let difficulty_raw = local.data.difficulty_raw;

        let map_seed = self.read_seed(ctx)?;
        let new_instance = state.tracker.observe_seed(map_seed);
        if new_instance {
            state.new_instance();
        }

        let difficulty = difficulty_raw
            .and_then(|raw| self.tables.valid_difficulty(raw))
            .ok_or(Error::Transient(FaultKind::InvalidDifficulty))?;

        state.tracker.update_area(area, now);

        let players = state.players.merge(player_reads);
        let player_unit = players
            .get(local_id)
            .cloned()
            .ok_or(Error::Transient(FaultKind::PlayerUnitMissing))?;
        for corpse in players.iter().filter(|p| p.data.is_corpse) {
            state
                .corpses
                .entry(corpse.data.corpse_key())
                .or_insert_with(|| Arc::clone(corpse));
        }

        let monster_scan = scanner.scan(&mut state.monsters)?;
        let (mercs, monsters): (Vec<_>, Vec<_>) = monster_scan
            .into_units()
            .into_iter()
            .partition(|m| m.data.kind == MonsterKind::Merc);
        let monsters = monsters.into_iter().filter(|m| !m.data.is_dead).collect();

        let item_scan = scanner.scan(&mut state.items)?;
        let interacted_npc = ctx
            .read::<u32>(self.offsets.interacted_npc)
            .ok()
            .filter(|&npc| npc != 0);
        state
            .item_tracker
            .observe(&item_scan, area, interacted_npc, local_id, Local::now());
        let items = item_scan
            .iter()
            .filter(|i| i.data.place == ItemPlace::OnGround)
            .cloned()
            .collect();

        let roster = Roster::read(ctx, self.offsets.roster_data)
            .inspect_err(|e| debug!("Roster unreadable: {}", e))
            .unwrap_or_default();
        let players = players
            .iter()
            .filter(|p| !p.data.is_corpse)
            .map(|p| PlayerView {
                unit: Arc::clone(p),
                roster: roster.get(p.id).cloned(),
                in_party: roster.same_party(local_id, p.id),
            })
            .collect();

        let session = state
            .tracker
            .ensure_session(now, SessionInfo::default)
            .clone();

        Ok(Some(GameData {
            process_id: ctx.process_id(),
            main_window_handle: ctx.main_window_handle(),
            captured_at: Local::now(),
            in_game: true,
            map_seed,
            new_instance,
            area,
            area_level: self.tables.area_level(area, difficulty),
            difficulty,
            player_name: player_unit.data.name.clone(),
            player_position: player_unit.data.position,
            player_unit,
            players,
            corpses: state.corpses.values().cloned().collect(),
            monsters,
            mercs,
            items,
            item_log: state.item_tracker.log().cloned().collect(),
            session,
            roster,
            menu_open,
            menu,
            hover,
            interacted_npc,
        }))
    }

    /// The seed sits in a separately allocated block; a null or unreadable
    /// pointer means the block is not set up yet.
    fn read_seed<C: ProcessContext>(&self, ctx: &C) -> Result<u32> {
        let value = ctx
            .read_ptr(ctx.base_address().wrapping_add(self.offsets.map_seed))
            .and_then(|block| ctx.read_u64(block.wrapping_add(layout::seed::VALUE)))
            .inspect_err(|e| debug!("Map seed unreadable: {}", e))
            .unwrap_or(0);

        match u32::try_from(value) {
            Ok(seed) if seed != 0 => Ok(seed),
            _ => Err(Error::Transient(FaultKind::SeedOutOfRange)),
        }
    }
}

/// The one local, living player of the scan. Several candidates are treated
/// like none.
fn select_local(reads: &[UnitRead<PlayerData>]) -> Option<&UnitRead<PlayerData>> {
    let mut candidates = reads
        .iter()
        .filter(|r| r.data.is_local && !r.data.is_corpse);
    let first = candidates.next()?;
    if candidates.next().is_some() {
        debug!("More than one local player candidate");
        return None;
    }
    Some(first)
}
