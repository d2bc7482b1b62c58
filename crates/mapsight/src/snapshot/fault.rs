use std::collections::HashSet;

use serde::Serialize;
use strum::{Display, EnumIter, IntoStaticStr};

/// Invariant violations that are expected while the game is loading and
/// clear up on a later frame.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter, IntoStaticStr,
)]
pub enum FaultKind {
    #[strum(serialize = "player unit missing")]
    PlayerUnitMissing,
    #[strum(serialize = "invalid area")]
    InvalidArea,
    #[strum(serialize = "invalid difficulty")]
    InvalidDifficulty,
    #[strum(serialize = "seed out of range")]
    SeedOutOfRange,
}

/// Reports each fault kind once per onset.
///
/// A kind stays latched until [`FaultLatch::clear`] is called after a fully
/// successful snapshot.
#[derive(Debug, Default)]
pub struct FaultLatch {
    latched: HashSet<FaultKind>,
}

impl FaultLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an occurrence of `kind`. Returns true when it should be raised,
    /// false when an earlier occurrence is still latched.
    pub fn trip(&mut self, kind: FaultKind) -> bool {
        self.latched.insert(kind)
    }

    /// Release every kind. Returns true if anything was latched.
    pub fn clear(&mut self) -> bool {
        let any = !self.latched.is_empty();
        self.latched.clear();
        any
    }

    pub fn is_latched(&self, kind: FaultKind) -> bool {
        self.latched.contains(&kind)
    }
}
