//! A bounded, least-recently-used cache keyed by markup.
use indexmap::IndexMap;
use log::trace;

/// A least-recently-used cache with a fixed capacity.
///
/// Entries are kept in recency order: the front of the map is the least recently used entry,
/// and the back the most recently used one. A capacity of `0` disables caching altogether.
#[derive(Debug, Clone)]
pub struct RenderCache<V> {
    capacity: usize,
    entries: IndexMap<String, V>,
}

impl<V> RenderCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: IndexMap::with_capacity(capacity.min(64)),
        }
    }

    /// Look an entry up, and mark it as the most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let index = self.entries.get_index_of(key)?;
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        trace!("render cache hit for {key:?}");
        self.entries.get_index(last).map(|(_, value)| value)
    }

    /// Look an entry up without touching the recency order.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert an entry as the most recently used, evicting the least recently used one if the
    /// cache is full.
    pub fn insert(&mut self, key: String, value: V) {
        if self.capacity == 0 {
            return;
        }
        if let Some(index) = self.entries.get_index_of(&key) {
            self.entries.shift_remove_index(index);
        } else if self.entries.len() >= self.capacity {
            if let Some((evicted, _)) = self.entries.shift_remove_index(0) {
                trace!("evicting cached render for {evicted:?}");
            }
        }
        self.entries.insert(key, value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = RenderCache::new(2);
        cache.insert("a".to_owned(), 1);
        cache.insert("b".to_owned(), 2);
        assert_eq!(cache.get("a"), Some(&1));
        cache.insert("c".to_owned(), 3);

        assert!(cache.contains_key("a"));
        assert!(!cache.contains_key("b"));
        assert!(cache.contains_key("c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn reinsert_refreshes() {
        let mut cache = RenderCache::new(2);
        cache.insert("a".to_owned(), 1);
        cache.insert("b".to_owned(), 2);
        cache.insert("a".to_owned(), 10);
        cache.insert("c".to_owned(), 3);

        assert_eq!(cache.peek("a"), Some(&10));
        assert!(!cache.contains_key("b"));
    }

    #[test]
    fn zero_capacity() {
        let mut cache = RenderCache::new(0);
        cache.insert("a".to_owned(), 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.capacity(), 0);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut cache = RenderCache::new(3);
        cache.insert("a".to_owned(), 1);
        cache.insert("b".to_owned(), 2);
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 3);
        cache.insert("c".to_owned(), 3);
        assert_eq!(cache.peek("c"), Some(&3));
    }
}
