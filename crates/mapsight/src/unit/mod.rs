//! Units discovered in the game's unit hash tables.
//!
//! A [`Unit`] is an immutable value: one decoded read of one unit, tagged with
//! the identity the cache gave its id on first sighting and a generation that
//! grows whenever a later read differs.

mod item;
mod monster;
mod player;
mod raw;
mod stats;

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::game::{UnitId, UnitType};
use crate::process::ReadMemory;

pub use item::{ItemData, ItemPlace, StaticPath};
pub use monster::{MonsterData, MonsterKind};
pub use player::{DynamicPath, PlayerData};
pub use raw::UnitAny;
pub use stats::{Life, read_life};

/// Type-specific part of a unit, decoded from its data block.
pub trait UnitData: Sized + Clone + PartialEq + fmt::Debug {
    /// Table this kind of unit lives in.
    const UNIT_TYPE: UnitType;

    /// Decode the type-specific data of a record that already passed
    /// [`UnitAny::is_valid_for`].
    fn read<R: ReadMemory>(reader: &R, raw: &UnitAny) -> Result<Self>;
}

/// Identity handed out by the cache on an id's first sighting.
///
/// Two units with equal identity are the same game object seen on different
/// frames. Identities are never reused within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityIdentity(pub u64);

/// One decoded read of a unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit<D> {
    pub id: UnitId,
    pub identity: EntityIdentity,
    /// Bumped each time a read differs from the previous one for this id.
    pub generation: u64,
    pub txt_file_no: u32,
    pub mode: u32,
    pub data: D,
}

/// A validated record paired with its decoded data, before identity is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitRead<D> {
    pub raw: UnitAny,
    pub data: D,
}

impl<D> UnitRead<D> {
    pub fn id(&self) -> UnitId {
        self.raw.unit_id
    }
}

pub type PlayerUnit = Unit<PlayerData>;
pub type MonsterUnit = Unit<MonsterData>;
pub type ItemUnit = Unit<ItemData>;
