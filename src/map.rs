use core::hash::Hash;

use hashbrown::HashMap;

/// Sparse two-level map. A row may exist while being empty, which is
/// distinct from the row being absent.
#[derive(Debug)]
pub struct HashMap2<K1, K2, V> {
    map: HashMap<K1, HashMap<K2, V>>,
}

impl<K1, K2, V> HashMap2<K1, K2, V>
where
    K1: Hash + Eq,
    K2: Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key1: K1, key2: K2, value: V) {
        self.row_mut(key1).insert(key2, value);
    }

    /// Returns the row of `key1`, creating an empty one if needed.
    pub fn row_mut(&mut self, key1: K1) -> &mut HashMap<K2, V> {
        self.map
            .raw_entry_mut()
            .from_key(&key1)
            .or_insert_with(|| (key1, HashMap::new()))
            .1
    }

    pub fn row(&self, key1: &K1) -> Option<&HashMap<K2, V>> {
        self.map.get(key1)
    }

    pub fn contains_row(&self, key1: &K1) -> bool {
        self.map.contains_key(key1)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&K1, &HashMap<K2, V>)> {
        self.map.iter()
    }

    /// Total number of entries over all rows.
    pub fn len(&self) -> usize {
        self.map.values().map(HashMap::len).sum()
    }
}

impl<K1, K2, V> Default for HashMap2<K1, K2, V>
where
    K1: Hash + Eq,
    K2: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}
