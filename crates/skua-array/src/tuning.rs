//! Storage tuning parameters.
//!
//! All shape-transition thresholds for the element storage live here. The
//! defaults suit the three workloads the engine is built for (dense prefix
//! use, sparse random-index insertion, long-tail holey arrays); the
//! qualitative transition policy does not change with the numbers.

/// Tuning knobs for [`ElementStorage`](crate::storage::ElementStorage)
/// shape transitions.
///
/// # Examples
///
/// ```
/// use skua_array::StorageTuning;
///
/// // Defaults
/// let tuning = StorageTuning::default();
///
/// // A configuration that flips to hash storage eagerly
/// let tuning = StorageTuning {
///     max_grow_holes: 64,
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Copy, Debug)]
pub struct StorageTuning {
    /// Head region size for which a first write always produces dense
    /// storage, however empty the array is.
    ///
    /// Default: 16
    pub dense_head_slack: u32,

    /// First-write index at or beyond which an empty array goes straight to
    /// hash storage.
    ///
    /// Default: 65536
    pub sparse_first_write: u32,

    /// Absolute bound on the run of holes a single dense write may append.
    /// A write that would open a larger gap converts the storage to hash.
    ///
    /// Default: 1024
    pub max_grow_holes: u32,

    /// Occupancy multiplier that relaxes `max_grow_holes` for well-filled
    /// arrays: a gap is also acceptable while it stays within
    /// `dense_grow_factor * occupied`.
    ///
    /// Default: 4
    pub dense_grow_factor: u32,

    /// Dense cell count below which interior holes never force a
    /// conversion, whatever their fraction.
    ///
    /// Default: 64
    pub sparse_hole_floor: u32,

    /// Minimum live count for a hash -> dense rehash. Below this the map
    /// stays a map even when it is compact.
    ///
    /// Default: 16
    pub rehash_min: usize,
}

impl Default for StorageTuning {
    fn default() -> Self {
        Self {
            dense_head_slack: 16,
            sparse_first_write: 1 << 16,
            max_grow_holes: 1024,
            dense_grow_factor: 4,
            sparse_hole_floor: 64,
            rehash_min: 16,
        }
    }
}

impl StorageTuning {
    /// May a dense store append a run of `gap` holes, given `occupied` live
    /// cells?
    pub(crate) fn dense_gap_allowed(&self, gap: u32, occupied: u32) -> bool {
        let limit = self
            .max_grow_holes
            .max(occupied.saturating_mul(self.dense_grow_factor));
        gap <= limit
    }

    /// Have interior holes crossed the point where dense storage wastes
    /// more than it saves?
    pub(crate) fn dense_too_holey(&self, holes: u32, cells: u32) -> bool {
        cells >= self.sparse_hole_floor && holes > cells / 2
    }

    /// Is a hash storage compact and populated enough to rehash into dense
    /// cells?
    pub(crate) fn hash_ready_for_dense(&self, live: usize, max_key: u32) -> bool {
        live >= self.rehash_min && (max_key as usize) < live.saturating_mul(2)
    }
}
