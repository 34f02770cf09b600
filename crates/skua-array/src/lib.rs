//! skua-array - The Dynamic Indexed Array Object
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! The runtime representation and semantics of the ECMA-3 style `Array`: a
//! mapping from 32-bit unsigned indices to boxed values, a `length`
//! attribute, and a shared prototype chain that can supply values for
//! indices the array itself does not store.
//!
//! The interesting engineering is in the storage engine. The same array must
//! stay efficient across three very different workloads:
//!
//! 1. DENSE PREFIX USE
//!    push/pop and indexed fill from zero. Backed by a contiguous cell
//!    vector with O(1) access.
//!
//! 2. SPARSE RANDOM-INDEX INSERTION
//!    writes scattered across the 32-bit key space. Backed by a hash map,
//!    bounding memory by the live count instead of the key range.
//!
//! 3. LONG-TAIL HOLEY ARRAYS
//!    produced by `length` extension, deletion and unshift. Handled by
//!    tracked hole counts and shape transitions in both directions.
//!
//! The shape in use at any moment is invisible from outside: reads, `has`,
//! iteration order and sort results are identical whatever transitions the
//! storage went through.
//!
//! ============================================================================
//! SEMANTIC FINE POINTS
//! ============================================================================
//!
//! - A hole is not a stored `undefined`: `set(i, undefined)` makes `has(i)`
//!   true, `delete(i)` makes it false.
//! - The prototype shows through holes on read, `has` and sort paths, and
//!   its visibility does not depend on `length`.
//! - Valid indices are `[0, 2^32 - 1)`; the sentinel `2^32 - 1` is the
//!   length bound. Inputs that fail index coercion route to the dynamic
//!   property table under the canonical string of the original value.
//! - Sorting partitions into values / undefined / holes, stays stable, and
//!   commits only after the whole operation (including user comparator
//!   calls) has succeeded.
//!
//! ============================================================================
//! EXAMPLE
//! ============================================================================
//!
//! ```
//! use skua_array::{ArrayObject, ProtoRef, SortFlags};
//! use skua_value::Value;
//!
//! let proto = ProtoRef::new();
//! let mut a = ArrayObject::new(proto);
//! a.push(Value::from(3.0));
//! a.push(Value::from(1.0));
//! a.set_element(5, Value::from("tail"));
//! assert_eq!(a.length(), 6);
//! assert!(!a.has_element(3));
//!
//! a.sort(SortFlags::NUMERIC);
//! assert_eq!(a.get_element(0).coerce_to_number(), 1.0);
//! ```

pub mod array;
pub mod cell;
pub mod error;
pub mod ops;
pub mod proto;
pub mod sort;
pub mod storage;
pub mod tuning;

pub use array::{ArrayObject, MAX_LENGTH};
pub use cell::ValueCell;
pub use error::{ArrayError, ArrayResult};
pub use ops::ConcatSource;
pub use proto::{ProtoRef, ProtoSnapshot};
pub use sort::{SortFlags, SortOnField, SortOutcome, SORT_LENGTH_LIMIT};
pub use storage::{ElementStorage, StorageShape};
pub use tuning::StorageTuning;


#[cfg(test)]
mod edge_cases;
