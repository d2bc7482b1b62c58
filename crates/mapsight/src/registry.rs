//! Per-process state, keyed by process id.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::game::{Area, UnitId};
use crate::scan::IdentityCache;
use crate::session::{AreaTracker, ItemTracker, ProcessSession};
use crate::snapshot::FaultLatch;
use crate::unit::{ItemData, MonsterData, PlayerData, PlayerUnit};

/// Everything remembered about one monitored process between frames.
#[derive(Debug)]
pub struct ProcessState {
    pid: u32,
    attached_at: DateTime<Local>,
    pub(crate) tracker: AreaTracker,
    pub(crate) players: IdentityCache<PlayerData>,
    pub(crate) monsters: IdentityCache<MonsterData>,
    pub(crate) items: IdentityCache<ItemData>,
    pub(crate) item_tracker: ItemTracker,
    /// Player corpses by name and position.
    pub(crate) corpses: HashMap<String, Arc<PlayerUnit>>,
    pub(crate) latch: FaultLatch,
    pub(crate) frames: u64,
}

impl ProcessState {
    pub fn new(pid: u32) -> Self {
        Self {
            pid,
            attached_at: Local::now(),
            tracker: AreaTracker::new(),
            players: IdentityCache::new(),
            monsters: IdentityCache::new(),
            items: IdentityCache::new(),
            item_tracker: ItemTracker::new(),
            corpses: HashMap::new(),
            latch: FaultLatch::new(),
            frames: 0,
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn attached_at(&self) -> DateTime<Local> {
        self.attached_at
    }

    pub fn session(&self) -> Option<&ProcessSession> {
        self.tracker.session()
    }

    pub fn current_area(&self) -> Option<Area> {
        self.tracker.current_area()
    }

    pub fn last_seed(&self) -> Option<u32> {
        self.tracker.last_seed()
    }

    pub fn tracker(&self) -> &AreaTracker {
        &self.tracker
    }

    pub fn item_tracker(&self) -> &ItemTracker {
        &self.item_tracker
    }

    pub fn corpses(&self) -> impl Iterator<Item = &Arc<PlayerUnit>> {
        self.corpses.values()
    }

    pub fn latch(&self) -> &FaultLatch {
        &self.latch
    }

    /// Successful snapshots built for this process.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Cached players, monsters and items, for monitoring cache growth.
    pub fn cached_units(&self) -> usize {
        self.players.len() + self.monsters.len() + self.items.len()
    }

    pub fn cached_player(&self, id: UnitId) -> Option<Arc<PlayerUnit>> {
        self.players.get(id)
    }

    /// The process left the game.
    pub fn leave_game(&mut self) {
        if self.tracker.teardown() {
            debug!(
                "Dropping {} cached units and {} corpses for pid {}",
                self.cached_units(),
                self.corpses.len(),
                self.pid
            );
        }
        self.corpses.clear();
        self.clear_caches();
    }

    /// A new world instance started in this process.
    pub fn new_instance(&mut self) {
        self.item_tracker.reset();
        self.corpses.clear();
        self.clear_caches();
    }

    fn clear_caches(&mut self) {
        self.players.clear();
        self.monsters.clear();
        self.items.clear();
    }
}

/// Owned collection of [`ProcessState`]s, one per attached process.
#[derive(Debug, Default)]
pub struct Registry {
    processes: HashMap<u32, ProcessState>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for `pid`, created on first use.
    pub fn attach(&mut self, pid: u32) -> &mut ProcessState {
        self.processes.entry(pid).or_insert_with(|| {
            info!("Attached to process {}", pid);
            ProcessState::new(pid)
        })
    }

    pub fn detach(&mut self, pid: u32) -> Option<ProcessState> {
        let state = self.processes.remove(&pid);
        if state.is_some() {
            info!("Detached from process {}", pid);
        }
        state
    }

    pub fn get(&self, pid: u32) -> Option<&ProcessState> {
        self.processes.get(&pid)
    }

    pub fn get_mut(&mut self, pid: u32) -> Option<&mut ProcessState> {
        self.processes.get_mut(&pid)
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.processes.contains_key(&pid)
    }

    /// Attached pids in ascending order.
    pub fn pids(&self) -> Vec<u32> {
        let mut pids: Vec<u32> = self.processes.keys().copied().collect();
        pids.sort_unstable();
        pids
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Detach every process not in `alive`. Returns the detached pids.
    pub fn retain_alive(&mut self, alive: &[u32]) -> Vec<u32> {
        let gone: Vec<u32> = self
            .pids()
            .into_iter()
            .filter(|pid| !alive.contains(pid))
            .collect();
        for pid in &gone {
            self.detach(*pid);
        }
        gone
    }
}
