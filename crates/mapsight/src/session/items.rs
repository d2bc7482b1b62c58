use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, trace};

use crate::game::{Area, Position, UnitId};
use crate::scan::ScanResult;
use crate::unit::{ItemData, ItemPlace};

/// Entries kept in the item log before the oldest are dropped.
pub const MAX_ITEM_LOG: usize = 200;

/// A ground item seen for the first time in this game instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemLogEntry {
    pub unit_id: UnitId,
    pub txt_file_no: u32,
    pub quality: u32,
    pub position: Position,
    pub area: Area,
    pub seen_at: DateTime<Local>,
}

/// "Seen so far" item bookkeeping for one game instance.
#[derive(Debug, Default)]
pub struct ItemTracker {
    ids_seen: HashSet<UnitId>,
    hashes_seen: HashSet<String>,
    /// Items the player has owned at some point; dropping them again is not news.
    ids_to_skip: HashSet<UnitId>,
    inventory_ids_to_skip: HashSet<UnitId>,
    /// Vendor item id -> txt id of the NPC selling it.
    vendors: HashMap<UnitId, u32>,
    log: VecDeque<ItemLogEntry>,
}

impl ItemTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one item scan in. Returns the number of new log entries.
    pub fn observe(
        &mut self,
        items: &ScanResult<ItemData>,
        area: Area,
        interacted_npc: Option<u32>,
        local_player: UnitId,
        now: DateTime<Local>,
    ) -> usize {
        let mut added = 0;

        for item in items.iter() {
            match item.data.place {
                ItemPlace::Owned => {
                    self.ids_to_skip.insert(item.id);
                    if item.data.owner_id == local_player {
                        self.inventory_ids_to_skip.insert(item.id);
                    }
                }
                ItemPlace::Vendor => {
                    self.ids_to_skip.insert(item.id);
                    if let Some(npc) = interacted_npc {
                        self.vendors.entry(item.id).or_insert(npc);
                    }
                }
                ItemPlace::OnGround => {
                    if self.ids_to_skip.contains(&item.id)
                        || self.inventory_ids_to_skip.contains(&item.id)
                    {
                        continue;
                    }
                    let hash = item.data.hash_key();
                    if self.ids_seen.contains(&item.id) || self.hashes_seen.contains(&hash) {
                        continue;
                    }
                    self.ids_seen.insert(item.id);
                    self.hashes_seen.insert(hash);

                    trace!(
                        "New ground item {} (txt {}) at {:?}",
                        item.id, item.data.txt_file_no, item.data.position
                    );
                    if self.log.len() == MAX_ITEM_LOG {
                        self.log.pop_front();
                    }
                    self.log.push_back(ItemLogEntry {
                        unit_id: item.id,
                        txt_file_no: item.data.txt_file_no,
                        quality: item.data.quality,
                        position: item.data.position,
                        area,
                        seen_at: now,
                    });
                    added += 1;
                }
                ItemPlace::Other => {}
            }
        }

        added
    }

    /// Forget everything; used when a new game instance starts.
    pub fn reset(&mut self) {
        debug!(
            "Resetting item tracker ({} seen, {} logged)",
            self.ids_seen.len(),
            self.log.len()
        );
        self.ids_seen.clear();
        self.hashes_seen.clear();
        self.ids_to_skip.clear();
        self.inventory_ids_to_skip.clear();
        self.vendors.clear();
        self.log.clear();
    }

    /// True when no item has been tracked since the last reset.
    pub fn is_empty(&self) -> bool {
        self.ids_seen.is_empty()
            && self.hashes_seen.is_empty()
            && self.ids_to_skip.is_empty()
            && self.inventory_ids_to_skip.is_empty()
            && self.vendors.is_empty()
            && self.log.is_empty()
    }

    pub fn log(&self) -> impl Iterator<Item = &ItemLogEntry> {
        self.log.iter()
    }

    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    pub fn vendor_of(&self, item: UnitId) -> Option<u32> {
        self.vendors.get(&item).copied()
    }

    pub fn is_skipped(&self, item: UnitId) -> bool {
        self.ids_to_skip.contains(&item) || self.inventory_ids_to_skip.contains(&item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::IdentityCache;
    use crate::unit::{UnitAny, UnitRead};

    fn item(id: UnitId, txt: u32, x: u32, place: ItemPlace, owner: u32) -> UnitRead<ItemData> {
        UnitRead {
            raw: UnitAny {
                unit_type: 4,
                txt_file_no: txt,
                unit_id: id,
                unit_data: 0x10,
                ..Default::default()
            },
            data: ItemData {
                txt_file_no: txt,
                position: Position::new(x, 10),
                quality: 4,
                owner_id: owner,
                flags: 0,
                place,
            },
        }
    }

    fn scan(reads: Vec<UnitRead<ItemData>>) -> ScanResult<ItemData> {
        IdentityCache::new().merge(reads)
    }

    #[test]
    fn test_ground_items_logged_once() {
        let mut tracker = ItemTracker::new();
        let items = scan(vec![
            item(1, 522, 5, ItemPlace::OnGround, 0),
            item(2, 523, 6, ItemPlace::OnGround, 0),
        ]);

        assert_eq!(tracker.observe(&items, Area::BloodMoor, None, 99, Local::now()), 2);
        assert_eq!(tracker.observe(&items, Area::BloodMoor, None, 99, Local::now()), 0);
        assert_eq!(tracker.log_len(), 2);
        assert!(tracker.log().all(|e| e.area == Area::BloodMoor));
    }

    #[test]
    fn test_same_hash_new_id_not_logged() {
        let mut tracker = ItemTracker::new();
        tracker.observe(
            &scan(vec![item(1, 522, 5, ItemPlace::OnGround, 0)]),
            Area::BloodMoor,
            None,
            99,
            Local::now(),
        );
        let added = tracker.observe(
            &scan(vec![item(7, 522, 5, ItemPlace::OnGround, 0)]),
            Area::BloodMoor,
            None,
            99,
            Local::now(),
        );
        assert_eq!(added, 0);
    }

    #[test]
    fn test_dropped_owned_item_skipped() {
        let mut tracker = ItemTracker::new();
        tracker.observe(
            &scan(vec![item(3, 100, 0, ItemPlace::Owned, 99)]),
            Area::BloodMoor,
            None,
            99,
            Local::now(),
        );
        assert!(tracker.is_skipped(3));

        let added = tracker.observe(
            &scan(vec![item(3, 100, 8, ItemPlace::OnGround, 0)]),
            Area::BloodMoor,
            None,
            99,
            Local::now(),
        );
        assert_eq!(added, 0);
    }

    #[test]
    fn test_vendor_assignment_sticks() {
        let mut tracker = ItemTracker::new();
        let items = scan(vec![item(4, 200, 0, ItemPlace::Vendor, 0)]);
        tracker.observe(&items, Area::RogueEncampment, Some(148), 99, Local::now());
        tracker.observe(&items, Area::RogueEncampment, Some(150), 99, Local::now());
        assert_eq!(tracker.vendor_of(4), Some(148));
    }

    #[test]
    fn test_reset_empties_everything() {
        let mut tracker = ItemTracker::new();
        tracker.observe(
            &scan(vec![
                item(1, 522, 5, ItemPlace::OnGround, 0),
                item(3, 100, 0, ItemPlace::Owned, 99),
                item(4, 200, 0, ItemPlace::Vendor, 0),
            ]),
            Area::BloodMoor,
            Some(148),
            99,
            Local::now(),
        );
        assert!(!tracker.is_empty());

        tracker.reset();
        assert!(tracker.is_empty());
        assert_eq!(tracker.log_len(), 0);
    }

    #[test]
    fn test_log_is_bounded() {
        let mut tracker = ItemTracker::new();
        let reads = (0..MAX_ITEM_LOG as u32 + 5)
            .map(|i| item(i, 500, i, ItemPlace::OnGround, 0))
            .collect();
        tracker.observe(&scan(reads), Area::BloodMoor, None, 99, Local::now());

        assert_eq!(tracker.log_len(), MAX_ITEM_LOG);
        assert_eq!(tracker.log().next().unwrap().unit_id, 5);
    }
}
