use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::game::Area;
use crate::session::{ProcessSession, SessionInfo};

/// Observable state of an [`AreaTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    NoSession,
    /// `None` until the first valid area of the session has been seen.
    InGame(Option<Area>),
}

/// Session lifecycle, area timers and seed change detection for one process.
#[derive(Debug, Default)]
pub struct AreaTracker {
    session: Option<ProcessSession>,
    current_area: Option<Area>,
    last_seed: Option<u32>,
}

impl AreaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TrackerState {
        match self.session {
            None => TrackerState::NoSession,
            Some(_) => TrackerState::InGame(self.current_area),
        }
    }

    pub fn session(&self) -> Option<&ProcessSession> {
        self.session.as_ref()
    }

    pub fn current_area(&self) -> Option<Area> {
        self.current_area
    }

    pub fn last_seed(&self) -> Option<u32> {
        self.last_seed
    }

    /// Start a session if there is none. `info` is only read on creation.
    pub fn ensure_session<F>(&mut self, now: Instant, info: F) -> &ProcessSession
    where
        F: FnOnce() -> SessionInfo,
    {
        self.session.get_or_insert_with(|| {
            let info = info();
            info!("Session started (game '{}')", info.game_name);
            ProcessSession::new(info, now)
        })
    }

    /// Record the seed just read. Returns true when it differs from the last
    /// one seen, which includes the first read of a session.
    pub fn observe_seed(&mut self, seed: u32) -> bool {
        if self.last_seed == Some(seed) {
            return false;
        }
        info!(
            "New game instance: seed {:#x} (previous {:?})",
            seed,
            self.last_seed.map(|s| format!("{:#x}", s))
        );
        self.last_seed = Some(seed);
        true
    }

    /// Move to `area`. On an actual change the time spent in the area being
    /// left is flushed to the session totals. Returns true on a change.
    pub fn update_area(&mut self, area: Area, now: Instant) -> bool {
        if self.current_area == Some(area) {
            return false;
        }

        if let Some(session) = self.session.as_mut()
            && let Some(previous) = self.current_area
        {
            let spent = session.area_time_elapsed(now);
            session.total_area_time.insert(previous, spent);
            session.last_area_change = Some(now);
            session.previous_area_time = session
                .total_area_time
                .get(&area)
                .copied()
                .unwrap_or(Duration::ZERO);
            debug!(
                "Area changed {} -> {} after {:.1}s",
                previous,
                area,
                spent.as_secs_f64()
            );
        } else {
            debug!("Entered {}", area);
        }

        self.current_area = Some(area);
        true
    }

    /// Leave the game: drop the session, the current area and the last seed.
    pub fn teardown(&mut self) -> bool {
        let had_session = self.session.take().is_some();
        if had_session {
            info!("Session ended");
        }
        self.current_area = None;
        self.last_seed = None;
        had_session
    }
}
