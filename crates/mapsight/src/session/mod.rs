//! Per-process session state: area timers, new-instance detection and the
//! "seen so far" item bookkeeping.

mod items;
mod tracker;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

use crate::game::Area;
use crate::process::layout::session;
use crate::process::{ProcessContext, ReadMemory, decode_name};

pub use items::{ItemLogEntry, ItemTracker, MAX_ITEM_LOG};
pub use tracker::{AreaTracker, TrackerState};

/// Game name, password and server address of the current game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub game_name: String,
    pub game_pass: String,
    pub game_ip: String,
}

impl SessionInfo {
    /// Read the game name block at `offset`. Fields that cannot be read are
    /// left empty; the block is not populated yet for single player games.
    pub fn read<C: ProcessContext>(ctx: &C, offset: u64) -> Self {
        let base = ctx.base_address().wrapping_add(offset);
        let field = |at: u64| {
            let address = base.wrapping_add(at);
            ctx.read_bytes(address, session::FIELD_LEN)
                .map(|bytes| decode_name(&bytes))
                .inspect_err(|e| debug!("Session field at {:#x} unreadable: {}", address, e))
                .unwrap_or_default()
        };
        Self {
            game_name: field(session::GAME_NAME),
            game_pass: field(session::GAME_PASS),
            game_ip: field(session::GAME_IP),
        }
    }
}

/// One stay in game for one process.
#[derive(Debug, Clone)]
pub struct ProcessSession {
    pub info: SessionInfo,
    pub started_at: Instant,
    pub started_wall: DateTime<Local>,
    /// Unset until the first area change of the session.
    pub last_area_change: Option<Instant>,
    /// Total time already spent in the current area when it was entered.
    pub previous_area_time: Duration,
    pub total_area_time: HashMap<Area, Duration>,
}

impl ProcessSession {
    pub fn new(info: SessionInfo, now: Instant) -> Self {
        Self {
            info,
            started_at: now,
            started_wall: Local::now(),
            last_area_change: None,
            previous_area_time: Duration::ZERO,
            total_area_time: HashMap::new(),
        }
    }

    /// Time spent in the current area, including earlier visits.
    pub fn area_time_elapsed(&self, now: Instant) -> Duration {
        let since = self.last_area_change.unwrap_or(self.started_at);
        self.previous_area_time + now.saturating_duration_since(since)
    }

    pub fn game_time_elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Recorded total for `area`; the current area's total is only flushed
    /// when it is left.
    pub fn total_time_in(&self, area: Area) -> Duration {
        self.total_area_time
            .get(&area)
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::MockMemoryBuilder;

    #[test]
    fn test_new_session_is_empty() {
        let now = Instant::now();
        let session = ProcessSession::new(SessionInfo::default(), now);
        assert!(session.total_area_time.is_empty());
        assert!(session.last_area_change.is_none());
        assert_eq!(session.previous_area_time, Duration::ZERO);
    }

    #[test]
    fn test_elapsed_counts_from_start_then_from_change() {
        let t0 = Instant::now();
        let mut session = ProcessSession::new(SessionInfo::default(), t0);
        assert_eq!(
            session.area_time_elapsed(t0 + Duration::from_secs(3)),
            Duration::from_secs(3)
        );

        session.last_area_change = Some(t0 + Duration::from_secs(10));
        session.previous_area_time = Duration::from_secs(5);
        assert_eq!(
            session.area_time_elapsed(t0 + Duration::from_secs(12)),
            Duration::from_secs(7)
        );
        assert_eq!(
            session.game_time_elapsed(t0 + Duration::from_secs(12)),
            Duration::from_secs(12)
        );
    }

    #[test]
    fn test_read_session_info() {
        let mut process = MockMemoryBuilder::new().base_address(0x1000).build();
        let block = 0x1000 + 0x800;
        process.map_zeroed(block, session::GAME_IP as usize);
        process.write_bytes(block + session::GAME_NAME, b"cows-1");
        process.write_bytes(block + session::GAME_PASS, b"moo");

        let info = SessionInfo::read(&process, 0x800);
        assert_eq!(info.game_name, "cows-1");
        assert_eq!(info.game_pass, "moo");
        // GAME_IP lies past the mapped block
        assert_eq!(info.game_ip, "");
    }
}
