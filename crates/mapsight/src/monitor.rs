//! Top-level entry point: attach, snapshot and detach game processes.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::process::ProcessProvider;
use crate::registry::Registry;
use crate::snapshot::{Frame, SnapshotBuilder};

/// Owns the registry of per-process state and produces one frame per call.
///
/// Not thread safe; callers serialize calls, which also serializes access to
/// every process's state.
pub struct Monitor<P: ProcessProvider> {
    provider: P,
    builder: SnapshotBuilder,
    registry: Registry,
}

impl<P: ProcessProvider> Monitor<P> {
    pub fn new(provider: P, builder: SnapshotBuilder) -> Self {
        Self {
            provider,
            builder,
            registry: Registry::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Snapshot `pid` now.
    pub fn get(&mut self, pid: u32) -> Result<Frame> {
        self.get_at(pid, Instant::now())
    }

    /// Snapshot `pid` with an explicit clock reading.
    ///
    /// The process context lives for this call only and is released on every
    /// return path.
    pub fn get_at(&mut self, pid: u32, now: Instant) -> Result<Frame> {
        let Some(ctx) = self.provider.open(pid)? else {
            debug!("Process {} not available", pid);
            return Ok(Frame::Unavailable);
        };
        let state = self.registry.attach(pid);
        self.builder.build(&ctx, state, now)
    }

    /// Snapshot every running game process and detach state of processes
    /// that are gone.
    pub fn poll(&mut self) -> Result<Vec<(u32, Result<Frame>)>> {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> Result<Vec<(u32, Result<Frame>)>> {
        let alive: Vec<u32> = self.provider.list()?.into_iter().map(|p| p.pid).collect();
        for pid in self.registry.retain_alive(&alive) {
            info!("Process {} exited", pid);
        }

        Ok(alive
            .into_iter()
            .map(|pid| (pid, self.get_at(pid, now)))
            .collect())
    }

    /// Forget the state of `pid`.
    pub fn detach(&mut self, pid: u32) -> bool {
        self.registry.detach(pid).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::FakeGame;
    use crate::game::{Area, Tables};
    use crate::process::MockProvider;

    fn game(pid: u32) -> FakeGame {
        let mut game = FakeGame::new(pid);
        game.add_player(1, "Sorc", Area::Harrogath.id(), 1, true);
        game
    }

    fn monitor(games: Vec<FakeGame>) -> Monitor<MockProvider> {
        let offsets = games[0].offsets.clone();
        let mut provider = MockProvider::default();
        for game in games {
            provider.insert(game.process);
        }
        Monitor::new(provider, SnapshotBuilder::new(offsets, Tables::default()))
    }

    #[test]
    fn test_get_ready_and_unavailable() {
        let mut monitor = monitor(vec![game(100)]);

        let frame = monitor.get(100).unwrap();
        assert_eq!(frame.game_data().unwrap().area, Area::Harrogath);
        assert!(monitor.registry().contains(100));

        assert!(matches!(monitor.get(555).unwrap(), Frame::Unavailable));
        assert!(!monitor.registry().contains(555));
    }

    #[test]
    fn test_processes_are_isolated() {
        let mut second = game(200);
        second.set_seed(0x7777);
        let mut monitor = monitor(vec![game(100), second]);

        let frames = monitor.poll().unwrap();
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|(_, f)| matches!(f, Ok(Frame::Ready(_)))));

        let registry = monitor.registry();
        assert_eq!(registry.get(100).unwrap().last_seed(), Some(0xABCD));
        assert_eq!(registry.get(200).unwrap().last_seed(), Some(0x7777));
    }

    #[test]
    fn test_poll_detaches_exited_processes() {
        let mut monitor = monitor(vec![game(100), game(200)]);
        monitor.poll().unwrap();
        assert_eq!(monitor.registry().pids(), vec![100, 200]);

        monitor.provider.processes.remove(&100);
        let frames = monitor.poll().unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(monitor.registry().pids(), vec![200]);
    }

    #[test]
    fn test_detach() {
        let mut monitor = monitor(vec![game(100)]);
        monitor.get(100).unwrap();
        assert!(monitor.detach(100));
        assert!(!monitor.detach(100));
    }
}
