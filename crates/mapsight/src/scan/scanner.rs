use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::Result;
use crate::game::UnitType;
use crate::process::ProcessContext;
use crate::process::layout::unit_table;
use crate::scan::cache::{IdentityCache, ScanResult};
use crate::unit::{UnitAny, UnitData, UnitRead};

/// Counters from one table walk, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub buckets: usize,
    pub nodes: usize,
    pub accepted: usize,
    /// Records passed over: failed detail decodes and invalid bucket heads.
    pub skipped: usize,
    /// Chains cut short by an unreadable or invalid record.
    pub truncated: usize,
    /// Chains cut short by the cycle guard or the length bound.
    pub cycles: usize,
}

/// Walks the unit hash table of one unit type.
///
/// The table is an array of bucket heads; each head starts a singly linked
/// chain through [`UnitAny::list_next`]. The game mutates these chains while
/// we read them, so every read is allowed to fail and only ends the affected
/// bucket.
pub struct UnitScanner<'a, C: ProcessContext> {
    ctx: &'a C,
    table_offset: u64,
}

impl<'a, C: ProcessContext> UnitScanner<'a, C> {
    /// `table_offset` is the module-relative offset of the player table; the
    /// other unit types follow it at a fixed stride.
    pub fn new(ctx: &'a C, table_offset: u64) -> Self {
        Self { ctx, table_offset }
    }

    fn table_offset(&self, unit_type: UnitType) -> u64 {
        self.table_offset + unit_table::TYPE_STRIDE * unit_type as u64
    }

    /// Walk the table for `D`'s unit type and fold the reads into `cache`.
    pub fn scan<D: UnitData>(&self, cache: &mut IdentityCache<D>) -> Result<ScanResult<D>> {
        let (reads, _) = self.read_units::<D>()?;
        Ok(cache.merge(reads))
    }

    /// Walk the table without touching any cache.
    ///
    /// Fails only when the bucket array itself is unreadable.
    pub fn read_units<D: UnitData>(&self) -> Result<(Vec<UnitRead<D>>, ScanStats)> {
        let heads = self.read_heads(D::UNIT_TYPE)?;
        let mut reads = Vec::new();
        let mut stats = ScanStats::default();

        for (bucket, head) in heads.into_iter().enumerate() {
            if head == 0 {
                continue;
            }
            stats.buckets += 1;
            self.walk_bucket(bucket, head, &mut reads, &mut stats);
        }

        debug!(
            "Scanned {} table: {} buckets, {} nodes, {} accepted, {} skipped, {} truncated, {} cycles",
            D::UNIT_TYPE,
            stats.buckets,
            stats.nodes,
            stats.accepted,
            stats.skipped,
            stats.truncated,
            stats.cycles
        );
        Ok((reads, stats))
    }

    fn read_heads(&self, unit_type: UnitType) -> Result<Vec<u64>> {
        let address = self
            .ctx
            .base_address()
            .wrapping_add(self.table_offset(unit_type));
        let bytes = self
            .ctx
            .read_bytes(address, unit_table::BUCKETS * unit_table::POINTER as usize)?;
        Ok(bytes
            .chunks_exact(unit_table::POINTER as usize)
            .map(|chunk| {
                u64::from_le_bytes([
                    chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
                ])
            })
            .collect())
    }

    fn walk_bucket<D: UnitData>(
        &self,
        bucket: usize,
        head: u64,
        out: &mut Vec<UnitRead<D>>,
        stats: &mut ScanStats,
    ) {
        let mut visited = HashSet::new();
        let mut start_id = None;
        let mut address = head;

        while address != 0 {
            if !visited.insert(address) || visited.len() > unit_table::MAX_CHAIN_LENGTH {
                debug!(
                    "Bucket {} chain loops back at {:#x}, stopping",
                    bucket, address
                );
                stats.cycles += 1;
                return;
            }

            let raw: UnitAny = match self.ctx.read_at(address) {
                Ok(raw) => raw,
                Err(e) => {
                    trace!("Bucket {} node {:#x} unreadable: {}", bucket, address, e);
                    stats.truncated += 1;
                    return;
                }
            };
            stats.nodes += 1;

            match start_id {
                None => start_id = Some(raw.unit_id),
                Some(id) if id == raw.unit_id => {
                    debug!("Bucket {} chain revisits unit {}, stopping", bucket, id);
                    stats.cycles += 1;
                    return;
                }
                Some(_) => {}
            }

            if !raw.is_valid_for(D::UNIT_TYPE) {
                trace!(
                    "Bucket {} node {:#x} invalid (type {}, id {})",
                    bucket, address, raw.unit_type, raw.unit_id
                );
                // A head that is still being set up is passed over
                if address == head {
                    stats.skipped += 1;
                    address = raw.list_next;
                    continue;
                }
                stats.truncated += 1;
                return;
            }

            match D::read(self.ctx, &raw) {
                Ok(data) => {
                    stats.accepted += 1;
                    out.push(UnitRead { raw, data });
                }
                Err(e) => {
                    trace!("Skipping unit {} in bucket {}: {}", raw.unit_id, bucket, e);
                    stats.skipped += 1;
                }
            }

            address = raw.list_next;
        }
    }
}
