use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use crate::game::UnitId;
use crate::unit::{EntityIdentity, Unit, UnitData, UnitRead};

/// Per-process mapping from unit id to the latest generation of that unit.
///
/// The first valid sighting of an id assigns it an [`EntityIdentity`]. Later
/// sightings keep the identity; when the decoded value is unchanged the very
/// same `Arc` is handed out again, otherwise a new generation replaces it.
/// Handed-out units are immutable, so a reference kept from an earlier frame
/// never changes underneath its holder.
///
/// Entries are only dropped by [`IdentityCache::clear`]; ids that stop
/// appearing in the game's table stay cached until the next reset.
#[derive(Debug)]
pub struct IdentityCache<D> {
    entries: HashMap<UnitId, Arc<Unit<D>>>,
    next_identity: u64,
}

impl<D> Default for IdentityCache<D> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            next_identity: 1,
        }
    }
}

impl<D: UnitData> IdentityCache<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the persistent unit for `read`'s id, refreshed to `read`.
    pub fn get_or_create(&mut self, read: UnitRead<D>) -> Arc<Unit<D>> {
        let id = read.id();
        if let Some(cached) = self.entries.get(&id) {
            if cached.data == read.data
                && cached.mode == read.raw.mode
                && cached.txt_file_no == read.raw.txt_file_no
            {
                return Arc::clone(cached);
            }
            let refreshed = Arc::new(Unit {
                id,
                identity: cached.identity,
                generation: cached.generation + 1,
                txt_file_no: read.raw.txt_file_no,
                mode: read.raw.mode,
                data: read.data,
            });
            self.entries.insert(id, Arc::clone(&refreshed));
            return refreshed;
        }

        let identity = EntityIdentity(self.next_identity);
        self.next_identity += 1;
        let unit = Arc::new(Unit {
            id,
            identity,
            generation: 0,
            txt_file_no: read.raw.txt_file_no,
            mode: read.raw.mode,
            data: read.data,
        });
        self.entries.insert(id, Arc::clone(&unit));
        unit
    }

    /// Fold one scan's reads into the cache. The first read of a duplicated
    /// id wins, so ids are unique in the result.
    pub fn merge(&mut self, reads: Vec<UnitRead<D>>) -> ScanResult<D> {
        let mut units = BTreeMap::new();
        for read in reads {
            if units.contains_key(&read.id()) {
                continue;
            }
            let unit = self.get_or_create(read);
            units.insert(unit.id, unit);
        }
        ScanResult { units }
    }

    pub fn get(&self, id: UnitId) -> Option<Arc<Unit<D>>> {
        self.entries.get(&id).cloned()
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every id. Identities handed out before are never reused.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Units that are members of one scan, ordered by id.
#[derive(Debug, Clone)]
pub struct ScanResult<D> {
    units: BTreeMap<UnitId, Arc<Unit<D>>>,
}

impl<D> Default for ScanResult<D> {
    fn default() -> Self {
        Self {
            units: BTreeMap::new(),
        }
    }
}

impl<D> ScanResult<D> {
    pub fn ids(&self) -> BTreeSet<UnitId> {
        self.units.keys().copied().collect()
    }

    pub fn get(&self, id: UnitId) -> Option<&Arc<Unit<D>>> {
        self.units.get(&id)
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Unit<D>>> {
        self.units.values()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn into_units(self) -> Vec<Arc<Unit<D>>> {
        self.units.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;
    use crate::unit::{MonsterData, MonsterKind, UnitAny};

    fn read(id: UnitId, x: u32) -> UnitRead<MonsterData> {
        UnitRead {
            raw: UnitAny {
                unit_type: 1,
                unit_id: id,
                unit_data: 0x10,
                ..Default::default()
            },
            data: MonsterData {
                position: Position::new(x, 0),
                kind: MonsterKind::Monster,
                flags: 0,
                is_dead: false,
            },
        }
    }

    #[test]
    fn test_unchanged_read_returns_same_reference() {
        let mut cache = IdentityCache::new();
        let first = cache.get_or_create(read(5, 10));
        let second = cache.get_or_create(read(5, 10));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.generation, 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_changed_read_keeps_identity() {
        let mut cache = IdentityCache::new();
        let first = cache.get_or_create(read(5, 10));
        let second = cache.get_or_create(read(5, 11));

        assert_eq!(first.identity, second.identity);
        assert_eq!(second.generation, 1);
        // The earlier value is untouched
        assert_eq!(first.data.position.x, 10);
        assert_eq!(second.data.position.x, 11);
        assert!(Arc::ptr_eq(&cache.get(5).unwrap(), &second));
    }

    #[test]
    fn test_clear_never_reuses_identity() {
        let mut cache = IdentityCache::new();
        let before = cache.get_or_create(read(5, 10));
        cache.clear();
        assert!(cache.is_empty());

        let after = cache.get_or_create(read(5, 10));
        assert_ne!(before.identity, after.identity);
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_merge_dedupes_and_keeps_stale_entries_cached() {
        let mut cache = IdentityCache::new();
        cache.merge(vec![read(1, 0), read(2, 0)]);

        let result = cache.merge(vec![read(2, 5), read(3, 0), read(2, 9)]);
        assert_eq!(result.ids().into_iter().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(result.get(2).unwrap().data.position.x, 5);
        assert!(!result.contains(1));
        assert!(cache.contains(1));
        assert_eq!(cache.len(), 3);
    }
}
