//! Polymorphic element storage.
//!
//! ============================================================================
//! STORAGE SHAPES
//! ============================================================================
//!
//! The index -> value mapping behind an array has three physical shapes:
//!
//! - `Empty`: no cells at all. A fresh array, or one whose length was set
//!   without ever storing an element.
//! - `Dense`: a contiguous vector of cells indexed from zero. Indices at or
//!   beyond the vector read as holes. This is the shape for push/pop and
//!   indexed-fill workloads.
//! - `Hash`: a map from index to value, holes being absent keys. This is the
//!   shape for sparse writes scattered across the 32-bit index space.
//!
//! The shape is an implementation detail: for any operation sequence, reads,
//! `has` and iteration observe identical results whatever shapes the storage
//! moved through.
//!
//! ============================================================================
//! TRANSITION POLICY
//! ============================================================================
//!
//! Transitions trigger only on operations whose natural cost is already
//! linear, or on order-of-magnitude growth, so the amortized per-operation
//! cost stays O(1):
//!
//! - Empty -> Dense: first write lands in the head region, or close enough
//!   that the resulting hole run is acceptable.
//! - Empty -> Hash: first write is large and isolated.
//! - Dense -> Hash: a write would append a hole run beyond the configured
//!   bound, or deletes have made the interior mostly holes.
//! - Hash -> Dense: a truncate or shift leaves the map compact (max key
//!   within twice the live count) and populated. Never triggered by a
//!   single random write.
//!
//! Every transition builds the new representation first and swaps it in
//! whole, so a storage is never observable mid-transition.

use log::debug;
use rustc_hash::FxHashMap;
use skua_value::{Value, MAX_INDEX};

use crate::cell::ValueCell;
use crate::tuning::StorageTuning;

/// The physical shape of an [`ElementStorage`], exposed for observability
/// and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageShape {
    Empty,
    Dense,
    Hash,
}

/// Dense shape: a contiguous run of cells starting at index 0.
///
/// `holes` counts the hole cells inside `cells`, keeping the hole-fraction
/// transition check O(1). The vector never ends in a hole; trailing holes
/// are trimmed as they appear.
#[derive(Clone, Debug, Default)]
pub struct DenseElements {
    cells: Vec<ValueCell>,
    holes: u32,
}

impl DenseElements {
    fn occupied(&self) -> u32 {
        self.cells.len() as u32 - self.holes
    }

    /// Drop trailing holes so the vector always ends in a value.
    fn trim_tail(&mut self) {
        while matches!(self.cells.last(), Some(ValueCell::Hole)) {
            self.cells.pop();
            self.holes -= 1;
        }
    }
}

/// Hash shape: live entries only, holes are absent keys.
#[derive(Clone, Debug, Default)]
pub struct HashElements {
    map: FxHashMap<u32, Value>,
}

impl HashElements {
    fn max_key(&self) -> Option<u32> {
        self.map.keys().copied().max()
    }
}

/// The polymorphic backing store for array elements.
///
/// Storage never consults the prototype and never tracks the array length;
/// both belong to [`ArrayObject`](crate::array::ArrayObject). The one
/// contract the caller must keep is that stored indices never exceed
/// [`MAX_INDEX`].
#[derive(Clone, Debug, Default)]
pub enum ElementStorage {
    #[default]
    Empty,
    Dense(DenseElements),
    Hash(HashElements),
}

impl ElementStorage {
    /// Build storage holding `values` at indices `0..values.len()` with no
    /// holes. Used by the array constructors and the sort commit path.
    pub fn from_packed(values: Vec<Value>) -> ElementStorage {
        if values.is_empty() {
            ElementStorage::Empty
        } else {
            ElementStorage::Dense(DenseElements {
                cells: values.into_iter().map(ValueCell::Value).collect(),
                holes: 0,
            })
        }
    }

    pub fn shape(&self) -> StorageShape {
        match self {
            ElementStorage::Empty => StorageShape::Empty,
            ElementStorage::Dense(_) => StorageShape::Dense,
            ElementStorage::Hash(_) => StorageShape::Hash,
        }
    }

    /// The stored value at `i`, if `i` is not a hole.
    pub fn lookup(&self, i: u32) -> Option<&Value> {
        match self {
            ElementStorage::Empty => None,
            ElementStorage::Dense(d) => d.cells.get(i as usize).and_then(ValueCell::as_value),
            ElementStorage::Hash(h) => h.map.get(&i),
        }
    }

    pub fn has(&self, i: u32) -> bool {
        self.lookup(i).is_some()
    }

    /// Number of stored values.
    pub fn live_count(&self) -> usize {
        match self {
            ElementStorage::Empty => 0,
            ElementStorage::Dense(d) => d.occupied() as usize,
            ElementStorage::Hash(h) => h.map.len(),
        }
    }

    /// The largest stored index, if any value is stored.
    pub fn max_key(&self) -> Option<u32> {
        match self {
            ElementStorage::Empty => None,
            // The dense vector never ends in a hole.
            ElementStorage::Dense(d) => (d.cells.len() as u32).checked_sub(1),
            ElementStorage::Hash(h) => h.max_key(),
        }
    }

    /// Store `v` at `i`, transitioning shape if the write calls for it.
    ///
    /// Length maintenance is the caller's job.
    pub fn set(&mut self, i: u32, v: Value, tuning: &StorageTuning) {
        debug_assert!(i <= MAX_INDEX, "index {i} exceeds the maximum element index");
        match self {
            ElementStorage::Empty => {
                if i < tuning.sparse_first_write
                    && (i < tuning.dense_head_slack || tuning.dense_gap_allowed(i, 0))
                {
                    let mut cells = Vec::with_capacity(i as usize + 1);
                    cells.resize_with(i as usize, || ValueCell::Hole);
                    cells.push(ValueCell::Value(v));
                    *self = ElementStorage::Dense(DenseElements { cells, holes: i });
                } else {
                    debug!("storage: empty -> hash on first write at {i}");
                    let mut map = FxHashMap::default();
                    map.insert(i, v);
                    *self = ElementStorage::Hash(HashElements { map });
                }
            }
            ElementStorage::Dense(d) => {
                let len = d.cells.len();
                if (i as usize) < len {
                    let cell = &mut d.cells[i as usize];
                    if cell.is_hole() {
                        d.holes -= 1;
                    }
                    *cell = ValueCell::Value(v);
                } else {
                    let gap = i - len as u32;
                    if tuning.dense_gap_allowed(gap, d.occupied()) {
                        d.cells.reserve(gap as usize + 1);
                        d.cells.resize_with(i as usize, || ValueCell::Hole);
                        d.cells.push(ValueCell::Value(v));
                        d.holes += gap;
                    } else {
                        debug!(
                            "storage: dense -> hash, write at {i} would append {gap} holes over {} live cells",
                            d.occupied()
                        );
                        let mut hash = dense_to_hash(std::mem::take(d));
                        hash.map.insert(i, v);
                        *self = ElementStorage::Hash(hash);
                    }
                }
            }
            ElementStorage::Hash(h) => {
                h.map.insert(i, v);
            }
        }
    }

    /// Remove the value at `i`, leaving a hole. Returns whether a value was
    /// removed. Never shrinks a dense vector except at the tail.
    pub fn delete(&mut self, i: u32, tuning: &StorageTuning) -> bool {
        let removed = match self {
            ElementStorage::Empty => false,
            ElementStorage::Dense(d) => match d.cells.get_mut(i as usize) {
                None => false,
                Some(cell) if cell.is_hole() => false,
                Some(cell) => {
                    *cell = ValueCell::Hole;
                    d.holes += 1;
                    d.trim_tail();
                    true
                }
            },
            ElementStorage::Hash(h) => h.map.remove(&i).is_some(),
        };
        if removed {
            self.settle_after_delete(tuning);
        }
        removed
    }

    /// Remove every cell at index `>= new_len`.
    pub fn truncate(&mut self, new_len: u32, tuning: &StorageTuning) {
        match self {
            ElementStorage::Empty => {}
            ElementStorage::Dense(d) => {
                if (new_len as usize) < d.cells.len() {
                    for cell in &d.cells[new_len as usize..] {
                        if cell.is_hole() {
                            d.holes -= 1;
                        }
                    }
                    d.cells.truncate(new_len as usize);
                    d.trim_tail();
                }
            }
            ElementStorage::Hash(h) => {
                h.map.retain(|&k, _| k < new_len);
            }
        }
        self.settle_after_shrink(tuning);
    }

    /// Move every stored pair from `i` to `i + k`, dropping pairs that
    /// would land beyond [`MAX_INDEX`]. The vacated head cells read as
    /// holes until the caller fills them.
    pub fn shift_up(&mut self, k: u32) {
        if k == 0 {
            return;
        }
        let emptied = match self {
            ElementStorage::Empty => false,
            ElementStorage::Dense(d) => {
                let keep = if k > MAX_INDEX {
                    0
                } else {
                    (MAX_INDEX - k + 1) as usize
                };
                if d.cells.len() > keep {
                    for cell in &d.cells[keep..] {
                        if cell.is_hole() {
                            d.holes -= 1;
                        }
                    }
                    d.cells.truncate(keep);
                    d.trim_tail();
                }
                if d.cells.is_empty() {
                    true
                } else {
                    // One contiguous move: k fresh holes, then the old cells.
                    let mut cells = Vec::with_capacity(d.cells.len() + k as usize);
                    cells.resize_with(k as usize, || ValueCell::Hole);
                    cells.append(&mut d.cells);
                    d.cells = cells;
                    d.holes += k;
                    false
                }
            }
            ElementStorage::Hash(h) => {
                let map = h
                    .map
                    .drain()
                    .filter_map(|(key, v)| {
                        key.checked_add(k)
                            .filter(|&nk| nk <= MAX_INDEX)
                            .map(|nk| (nk, v))
                    })
                    .collect::<FxHashMap<_, _>>();
                h.map = map;
                h.map.is_empty()
            }
        };
        if emptied {
            *self = ElementStorage::Empty;
        }
    }

    /// Move every stored pair from `i` to `i - k`, discarding pairs with
    /// `i < k`.
    pub fn shift_down(&mut self, k: u32, tuning: &StorageTuning) {
        if k == 0 {
            return;
        }
        match self {
            ElementStorage::Empty => {}
            ElementStorage::Dense(d) => {
                let cut = (k as usize).min(d.cells.len());
                for cell in &d.cells[..cut] {
                    if cell.is_hole() {
                        d.holes -= 1;
                    }
                }
                d.cells.drain(..cut);
                d.trim_tail();
            }
            ElementStorage::Hash(h) => {
                let map = h
                    .map
                    .drain()
                    .filter_map(|(key, v)| key.checked_sub(k).map(|nk| (nk, v)))
                    .collect::<FxHashMap<_, _>>();
                h.map = map;
            }
        }
        self.settle_after_shrink(tuning);
    }

    /// Visit every stored `(index, value)` pair in ascending index order.
    pub fn for_each_present(&self, mut f: impl FnMut(u32, &Value)) {
        match self {
            ElementStorage::Empty => {}
            ElementStorage::Dense(d) => {
                for (i, cell) in d.cells.iter().enumerate() {
                    if let ValueCell::Value(v) = cell {
                        f(i as u32, v);
                    }
                }
            }
            ElementStorage::Hash(h) => {
                let mut keys: Vec<u32> = h.map.keys().copied().collect();
                keys.sort_unstable();
                for key in keys {
                    f(key, &h.map[&key]);
                }
            }
        }
    }

    /// Stored `(index, value)` pairs in ascending index order.
    pub fn present_entries(&self) -> Vec<(u32, Value)> {
        let mut entries = Vec::with_capacity(self.live_count());
        self.for_each_present(|i, v| entries.push((i, v.clone())));
        entries
    }

    /// After a delete: collapse to `Empty`, or give up on a dense vector
    /// that is now mostly holes.
    fn settle_after_delete(&mut self, tuning: &StorageTuning) {
        let replacement = match self {
            ElementStorage::Empty => None,
            ElementStorage::Dense(d) => {
                if d.cells.is_empty() {
                    Some(ElementStorage::Empty)
                } else if tuning.dense_too_holey(d.holes, d.cells.len() as u32) {
                    debug!(
                        "storage: dense -> hash, {} holes across {} cells",
                        d.holes,
                        d.cells.len()
                    );
                    Some(ElementStorage::Hash(dense_to_hash(std::mem::take(d))))
                } else {
                    None
                }
            }
            ElementStorage::Hash(h) => h.map.is_empty().then_some(ElementStorage::Empty),
        };
        if let Some(storage) = replacement {
            *self = storage;
        }
    }

    /// After a truncate or downward shift: collapse to `Empty`, or rehash a
    /// now-compact map into dense cells.
    fn settle_after_shrink(&mut self, tuning: &StorageTuning) {
        let replacement = match self {
            ElementStorage::Empty => None,
            ElementStorage::Dense(d) => d.cells.is_empty().then_some(ElementStorage::Empty),
            ElementStorage::Hash(h) => {
                if h.map.is_empty() {
                    Some(ElementStorage::Empty)
                } else {
                    match h.max_key() {
                        Some(max_key) if tuning.hash_ready_for_dense(h.map.len(), max_key) => {
                            debug!(
                                "storage: hash -> dense, {} live keys under max {max_key}",
                                h.map.len()
                            );
                            Some(ElementStorage::Dense(hash_to_dense(
                                std::mem::take(h),
                                max_key,
                            )))
                        }
                        _ => None,
                    }
                }
            }
        };
        if let Some(storage) = replacement {
            *self = storage;
        }
    }
}

/// Rebuild dense cells as a map, dropping holes.
fn dense_to_hash(d: DenseElements) -> HashElements {
    let mut map = FxHashMap::with_capacity_and_hasher(d.occupied() as usize, Default::default());
    for (i, cell) in d.cells.into_iter().enumerate() {
        if let ValueCell::Value(v) = cell {
            map.insert(i as u32, v);
        }
    }
    HashElements { map }
}

/// Rebuild a map as a dense cell vector reaching `max_key`.
fn hash_to_dense(h: HashElements, max_key: u32) -> DenseElements {
    let len = max_key as usize + 1;
    let mut cells = Vec::with_capacity(len);
    cells.resize_with(len, || ValueCell::Hole);
    let mut live = 0u32;
    for (key, v) in h.map {
        cells[key as usize] = ValueCell::Value(v);
        live += 1;
    }
    DenseElements {
        holes: len as u32 - live,
        cells,
    }
}
