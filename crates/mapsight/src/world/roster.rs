use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::game::UnitId;
use crate::process::layout::roster;
use crate::process::{ByteBuffer, FromMemory, ProcessContext, ReadMemory};

/// One entry of the party roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterMember {
    pub name: String,
    pub unit_id: UnitId,
    pub life_percent: u8,
    pub level: u16,
    pub party_id: u16,
}

impl RosterMember {
    pub fn in_party(&self) -> bool {
        self.party_id != roster::NO_PARTY
    }
}

struct RawRosterMember {
    member: RosterMember,
    next: u64,
}

impl FromMemory for RawRosterMember {
    const SIZE: usize = roster::SIZE;

    fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
        let buf = ByteBuffer::new(bytes);
        Some(Self {
            member: RosterMember {
                name: buf.name_at(roster::NAME, roster::NAME_LEN)?,
                unit_id: buf.u32_at(roster::UNIT_ID)?,
                life_percent: buf.u8_at(roster::LIFE_PERCENT)?,
                level: buf.u16_at(roster::LEVEL)?,
                party_id: buf.u16_at(roster::PARTY_ID)?,
            },
            next: buf.u64_at(roster::NEXT)?,
        })
    }
}

/// Party roster of the current game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub members: Vec<RosterMember>,
}

impl Roster {
    /// Walk the roster list whose head pointer sits at `offset`.
    ///
    /// The walk stops at the first unreadable member or when the list loops.
    pub fn read<C: ProcessContext>(ctx: &C, offset: u64) -> Result<Self> {
        let mut address = ctx.read::<u64>(offset)?;
        let mut visited = HashSet::new();
        let mut members = Vec::new();

        while address != 0 && members.len() < roster::MAX_MEMBERS {
            if !visited.insert(address) {
                debug!("Roster list loops back at {:#x}", address);
                break;
            }
            match ctx.read_at::<RawRosterMember>(address) {
                Ok(raw) => {
                    members.push(raw.member);
                    address = raw.next;
                }
                Err(e) => {
                    debug!("Roster member at {:#x} unreadable: {}", address, e);
                    break;
                }
            }
        }

        Ok(Self { members })
    }

    pub fn get(&self, unit_id: UnitId) -> Option<&RosterMember> {
        self.members.iter().find(|m| m.unit_id == unit_id)
    }

    /// Both units are in the same party.
    pub fn same_party(&self, a: UnitId, b: UnitId) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(a), Some(b)) => a.in_party() && a.party_id == b.party_id,
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
