//! Fixed-capacity LRU cache of loaded tiles.

use crate::Tile;
use osgrid::GridRef;
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// Counters describing how a cache has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub allocations: u64,
    pub evictions: u64,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hits, {} misses, {} allocations, {} evictions",
            self.hits, self.misses, self.allocations, self.evictions
        )
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    /// Clock value when the slot was last allocated or read.
    stamp: u64,
    key: Option<GridRef>,
}

#[derive(Debug)]
struct Entry<T> {
    slot: usize,
    tile: T,
}

/// LRU cache keyed by each tile's bottom left corner.
///
/// Recency is a logical clock shared by [`read`](Self::read) and
/// [`allocate`](Self::allocate). When the cache is full the slot with the
/// oldest stamp is reused; ties go to the lowest slot index.
#[derive(Debug)]
pub struct TileCache<T> {
    slots: Vec<Slot>,
    entries: HashMap<GridRef, Entry<T>>,
    clock: u64,
    stats: CacheStats,
}

impl<T: Tile> TileCache<T> {
    /// Create a cache holding at most `capacity` tiles (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![Slot::default(); capacity],
            entries: HashMap::with_capacity(capacity),
            clock: 0,
            stats: CacheStats::default(),
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Look up a tile and mark it most recently used.
    pub fn read(&mut self, key: &GridRef) -> Option<&T> {
        let Some(slot) = self.entries.get(key).map(|e| e.slot) else {
            self.stats.misses += 1;
            trace!(%key, "cache miss");
            return None;
        };

        let stamp = self.tick();
        self.slots[slot].stamp = stamp;
        self.stats.hits += 1;
        trace!(%key, slot, "cache hit");
        self.entries.get(key).map(|e| &e.tile)
    }

    /// [`read`](Self::read) `key`, or on a miss allocate the tile returned by
    /// `load`. Nothing is cached when `load` fails.
    pub fn read_or_try_allocate<E>(
        &mut self,
        key: &GridRef,
        load: impl FnOnce() -> Result<T, E>,
    ) -> Result<&T, E> {
        if self.read(key).is_some() {
            return Ok(&self.entries[key].tile);
        }
        let tile = load()?;
        Ok(self.allocate(tile))
    }

    /// Look up a tile without touching its recency or the counters.
    pub fn peek(&self, key: &GridRef) -> Option<&T> {
        self.entries.get(key).map(|e| &e.tile)
    }

    pub fn contains(&self, key: &GridRef) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a tile, evicting the least recently used one if full.
    ///
    /// A tile whose key is already cached is dropped and the cached copy is
    /// returned unchanged.
    pub fn allocate(&mut self, tile: T) -> &T {
        let key = tile.bottom_left();
        if self.entries.contains_key(&key) {
            trace!(%key, "already cached");
            return &self.entries[&key].tile;
        }

        let slot = self.find_slot();
        if let Some(victim) = self.slots[slot].key.take() {
            self.entries.remove(&victim);
            self.stats.evictions += 1;
            trace!(%victim, slot, "evicted");
        }

        let stamp = self.tick();
        self.slots[slot] = Slot {
            stamp,
            key: Some(key),
        };
        self.stats.allocations += 1;
        trace!(%key, slot, "allocated");

        &self.entries.entry(key).or_insert(Entry { slot, tile }).tile
    }

    /// An empty slot if there is one, otherwise the least recently used.
    fn find_slot(&self) -> usize {
        let mut best = 0;
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.key.is_none() {
                return i;
            }
            if slot.stamp < self.slots[best].stamp {
                best = i;
            }
        }
        best
    }

    /// Number of cached tiles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Drop every cached tile. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        for slot in &mut self.slots {
            *slot = Slot::default();
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osgrid::Distance;

    #[derive(Debug, PartialEq)]
    struct Marker(GridRef);

    impl Tile for Marker {
        fn bottom_left(&self) -> GridRef {
            self.0
        }
        fn width(&self) -> Distance {
            Distance::kilometres(10)
        }
        fn height(&self) -> Distance {
            Distance::kilometres(10)
        }
        fn precision(&self) -> Distance {
            Distance::metres(50)
        }
    }

    fn key(s: &str) -> GridRef {
        GridRef::parse(s).unwrap()
    }

    fn tile(s: &str) -> Marker {
        Marker(key(s))
    }

    #[test]
    fn test_empty_cache() {
        let mut cache: TileCache<Marker> = TileCache::new(4);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 4);
        assert!(cache.read(&key("TQ 28")).is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut cache = TileCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.allocate(tile("TQ 28"));
        assert!(cache.read(&key("TQ 28")).is_some());
    }

    #[test]
    fn test_single_slot_evicts() {
        let mut cache = TileCache::new(1);
        cache.allocate(tile("SH 65"));
        assert!(cache.read(&key("SH 65")).is_some());

        cache.allocate(tile("SH 66"));
        assert!(cache.read(&key("SH 65")).is_none());
        assert!(cache.read(&key("SH 66")).is_some());

        let stats = cache.stats();
        assert_eq!(stats.allocations, 2);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_evicts_first_allocated() {
        let mut cache = TileCache::new(3);
        for s in ["NY 00", "NY 01", "NY 02", "NY 03"] {
            cache.allocate(tile(s));
        }
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(&key("NY 00")));
        for s in ["NY 01", "NY 02", "NY 03"] {
            assert!(cache.contains(&key(s)), "{} should be cached", s);
        }
    }

    #[test]
    fn test_read_protects_from_eviction() {
        let mut cache = TileCache::new(3);
        for s in ["NY 00", "NY 01", "NY 02"] {
            cache.allocate(tile(s));
        }
        // Touch the oldest; the next victim is now the second oldest.
        assert!(cache.read(&key("NY 00")).is_some());
        cache.allocate(tile("NY 03"));
        assert!(cache.contains(&key("NY 00")));
        assert!(!cache.contains(&key("NY 01")));

        cache.allocate(tile("NY 04"));
        assert!(!cache.contains(&key("NY 02")));
        assert!(cache.contains(&key("NY 00")));
    }

    #[test]
    fn test_peek_does_not_refresh() {
        let mut cache = TileCache::new(2);
        cache.allocate(tile("SU 11"));
        cache.allocate(tile("SU 12"));
        assert!(cache.peek(&key("SU 11")).is_some());
        cache.allocate(tile("SU 13"));
        assert!(!cache.contains(&key("SU 11")));
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn test_allocate_existing_is_noop() {
        let mut cache = TileCache::new(2);
        cache.allocate(tile("SU 11"));
        cache.allocate(tile("SU 12"));
        // Re-allocating does not refresh recency either.
        cache.allocate(tile("SU 11"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().allocations, 2);

        cache.allocate(tile("SU 13"));
        assert!(!cache.contains(&key("SU 11")));
        assert!(cache.contains(&key("SU 12")));
    }

    #[test]
    fn test_allocate_returns_cached_tile() {
        let mut cache = TileCache::new(2);
        let got = cache.allocate(tile("SD 40"));
        assert_eq!(got, &tile("SD 40"));
    }

    #[test]
    fn test_read_or_try_allocate() {
        let mut cache = TileCache::new(2);
        let loaded = cache
            .read_or_try_allocate(&key("SJ 33"), || Ok::<_, ()>(tile("SJ 33")))
            .unwrap();
        assert_eq!(loaded, &tile("SJ 33"));

        // A hit never calls the loader.
        let hit = cache
            .read_or_try_allocate(&key("SJ 33"), || Err("loaded twice"))
            .unwrap();
        assert_eq!(hit, &tile("SJ 33"));

        let err = cache.read_or_try_allocate(&key("SJ 34"), || Err("unreadable"));
        assert_eq!(err, Err("unreadable"));
        assert!(!cache.contains(&key("SJ 34")));

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.allocations), (1, 2, 1));
    }

    #[test]
    fn test_clear() {
        let mut cache = TileCache::new(2);
        cache.allocate(tile("SU 11"));
        cache.allocate(tile("SU 12"));
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.read(&key("SU 11")).is_none());

        // Both slots are free again, so nothing is evicted.
        cache.allocate(tile("SU 13"));
        cache.allocate(tile("SU 14"));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_stats_display() {
        let stats = CacheStats {
            hits: 3,
            misses: 2,
            allocations: 2,
            evictions: 1,
        };
        assert_eq!(
            stats.to_string(),
            "3 hits, 2 misses, 2 allocations, 1 evictions"
        );
    }
}
