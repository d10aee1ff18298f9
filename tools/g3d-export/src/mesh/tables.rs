//! Deduplicated vertex attribute tables

use std::hash::Hash;
use std::ops::Index;

use hashbrown::HashMap;

/// Insertion-ordered table of distinct attribute values
///
/// Keys are quantized onto the grid of the field they are encoded into, so
/// two values are the same entry exactly when they encode to the same bits.
#[derive(Debug, Clone)]
pub struct AttributeTable<K> {
    lookup: HashMap<K, usize>,
    values: Vec<K>,
}

impl<K> Default for AttributeTable<K> {
    fn default() -> Self {
        Self {
            lookup: HashMap::new(),
            values: Vec::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> AttributeTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `key`, appending it if it is new
    pub fn insert(&mut self, key: K) -> usize {
        let values = &mut self.values;
        *self.lookup.entry(key).or_insert_with(|| {
            values.push(key);
            values.len() - 1
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[K] {
        &self.values
    }
}

impl<K> Index<usize> for AttributeTable<K> {
    type Output = K;

    fn index(&self, index: usize) -> &K {
        &self.values[index]
    }
}

/// Position in 1/4096 units, snapped to the FX16 grid (multiples of 8)
pub type PositionKey = [i32; 3];
/// Normal in signed 0.9 units
pub type NormalKey = [i16; 3];
/// Color channels 0-31
pub type ColorKey = [u8; 3];
/// Texture coordinate in 1/16 texel units
pub type TexCoordKey = [i32; 2];

/// Shared attribute tables of one mesh
#[derive(Debug, Clone, Default)]
pub struct AttributeTables {
    pub positions: AttributeTable<PositionKey>,
    pub normals: AttributeTable<NormalKey>,
    pub colors: AttributeTable<ColorKey>,
    pub tex_coords: AttributeTable<TexCoordKey>,
}
