//! Key-based deduplication of vertex attributes
//!
//! Texture coordinates and normals are rounded to six decimal digits to form
//! a hashable key. The first value seen for a key is kept and every later
//! value with the same key maps to the same index.

use std::hash::Hash;

use hashbrown::HashMap;

/// Scale applied before rounding (six decimal digits)
const KEY_SCALE: f64 = 1_000_000.0;

fn round_component(v: f32) -> i64 {
    (v as f64 * KEY_SCALE).round() as i64
}

/// Key for a texture coordinate
pub fn uv_key(uv: [f32; 2]) -> [i64; 2] {
    uv.map(round_component)
}

/// Key for a normal
pub fn normal_key(normal: [f32; 3]) -> [i64; 3] {
    normal.map(round_component)
}

/// Insertion-ordered set of values addressed by rounded keys
#[derive(Debug, Clone)]
pub struct Deduplicator<K, V> {
    indices: HashMap<K, u32>,
    values: Vec<V>,
}

impl<K: Eq + Hash, V> Deduplicator<K, V> {
    pub fn new() -> Self {
        Self {
            indices: HashMap::new(),
            values: Vec::new(),
        }
    }

    /// Index of `key`, appending `value` if the key has not been seen yet
    pub fn add_or_get(&mut self, key: K, value: V) -> u32 {
        if let Some(&index) = self.indices.get(&key) {
            return index;
        }
        let index = self.values.len() as u32;
        self.indices.insert(key, index);
        self.values.push(value);
        index
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Distinct values in first-encounter order
    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn into_values(self) -> Vec<V> {
        self.values
    }
}

impl<K: Eq + Hash, V> Default for Deduplicator<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Deduplicator for texture coordinates
pub type UvDeduplicator = Deduplicator<[i64; 2], [f32; 2]>;

/// Deduplicator for normals
pub type NormalDeduplicator = Deduplicator<[i64; 3], [f32; 3]>;

impl UvDeduplicator {
    pub fn add_uv(&mut self, uv: [f32; 2]) -> u32 {
        self.add_or_get(uv_key(uv), uv)
    }
}

impl NormalDeduplicator {
    pub fn add_normal(&mut self, normal: [f32; 3]) -> u32 {
        self.add_or_get(normal_key(normal), normal)
    }
}
