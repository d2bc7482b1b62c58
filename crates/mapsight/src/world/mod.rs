//! Game state blocks that live outside the unit tables.

mod menu;
mod roster;

pub use menu::{HoverData, MenuData};
pub use roster::{Roster, RosterMember};
