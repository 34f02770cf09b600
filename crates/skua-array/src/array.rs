//! The array object.
//!
//! [`ArrayObject`] is the public value: a `length`, the element storage, the
//! spillover dynamic property table for non-index keys, and a back-reference
//! to the shared prototype. Every observable invariant is enforced here:
//! stored indices stay below `length`, reads fall through holes to the
//! prototype, and writes with invalid indices route to the property table
//! instead of the element storage.

use skua_value::{DynObject, IndexKey, Value, LENGTH_SENTINEL, MAX_INDEX};

use crate::error::{ArrayError, ArrayResult};
use crate::proto::ProtoRef;
use crate::storage::{ElementStorage, StorageShape};
use crate::tuning::StorageTuning;

/// The largest representable `length`, `2^32 - 1`. Also the push saturation
/// point: an array of this length silently refuses further growth.
pub const MAX_LENGTH: u32 = LENGTH_SENTINEL;

/// A dynamic indexed array object.
#[derive(Clone, Debug)]
pub struct ArrayObject {
    length: u32,
    elements: ElementStorage,
    dynamic: DynObject,
    proto: ProtoRef,
    tuning: StorageTuning,
}

impl ArrayObject {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// An empty array: length 0, no cells.
    pub fn new(proto: ProtoRef) -> Self {
        ArrayObject {
            length: 0,
            elements: ElementStorage::Empty,
            dynamic: DynObject::new(),
            proto,
            tuning: StorageTuning::default(),
        }
    }

    /// An array of length `n` with no cells. Allocates nothing.
    pub fn with_length(proto: ProtoRef, n: u32) -> Self {
        let mut array = ArrayObject::new(proto);
        array.length = n;
        array
    }

    /// An array holding `values` at indices `0..values.len()`.
    pub fn from_values(proto: ProtoRef, values: Vec<Value>) -> Self {
        let mut array = ArrayObject::new(proto);
        array.length = values.len().min(MAX_LENGTH as usize) as u32;
        let mut values = values;
        values.truncate(MAX_LENGTH as usize);
        array.elements = ElementStorage::from_packed(values);
        array
    }

    /// The runtime constructor protocol: a single finite numeric argument
    /// is a length request, anything else is an element list.
    ///
    /// Fails with [`ArrayError::LengthNotPositiveInteger`] when the lone
    /// argument is a finite number that is not a representable length.
    pub fn from_args(proto: ProtoRef, args: &[Value]) -> ArrayResult<Self> {
        if let [Value::Number(n)] = args {
            if n.is_finite() {
                let valid = n.trunc() == *n && *n >= 0.0 && *n < 4_294_967_296.0;
                if !valid {
                    return Err(ArrayError::LengthNotPositiveInteger { value: *n });
                }
                return Ok(ArrayObject::with_length(proto, *n as u32));
            }
        }
        Ok(ArrayObject::from_values(proto, args.to_vec()))
    }

    /// Replace the storage tuning. Intended for construction time; an
    /// existing shape is not revisited.
    pub fn with_tuning(mut self, tuning: StorageTuning) -> Self {
        self.tuning = tuning;
        self
    }

    // ------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------

    pub fn length(&self) -> u32 {
        self.length
    }

    /// The prototype handle this array reads through.
    pub fn proto(&self) -> &ProtoRef {
        &self.proto
    }

    /// The physical storage shape, for observability and tests.
    pub fn storage_shape(&self) -> StorageShape {
        self.elements.shape()
    }

    /// Number of own stored elements (holes excluded).
    pub fn present_count(&self) -> usize {
        self.elements.live_count()
    }

    /// The spillover table holding non-index keyed properties.
    pub fn dynamic_properties(&self) -> &DynObject {
        &self.dynamic
    }

    // ------------------------------------------------------------------
    // Indexed access (valid element indices)
    // ------------------------------------------------------------------

    /// Read element `i`: own storage first, then the prototype, then
    /// `undefined`.
    ///
    /// Prototype visibility does not depend on `length`; a prototype entry
    /// at `i >= length` still reads through.
    pub fn get_element(&self, i: u32) -> Value {
        if let Some(v) = self.elements.lookup(i) {
            return v.clone();
        }
        if let Some(v) = self.proto.snapshot().element(i) {
            return v;
        }
        Value::Undefined
    }

    /// True iff `i` is an own stored element or a prototype contribution.
    pub fn has_element(&self, i: u32) -> bool {
        self.elements.has(i) || self.proto.snapshot().has_element(i)
    }

    /// True iff `i` is an own stored element (the prototype is ignored).
    pub fn has_own_element(&self, i: u32) -> bool {
        self.elements.has(i)
    }

    /// Store `v` at `i`, growing `length` to `i + 1` when the write lands
    /// at or beyond it.
    pub fn set_element(&mut self, i: u32, v: Value) {
        debug_assert!(i <= MAX_INDEX, "index {i} exceeds the maximum element index");
        self.elements.set(i, v, &self.tuning);
        if i >= self.length {
            self.length = i + 1;
        }
    }

    /// Remove the own element at `i`, leaving a hole. Returns true iff a
    /// cell was removed; a prototype-only index reports false and stays
    /// visible. `length` is unchanged.
    pub fn delete_element(&mut self, i: u32) -> bool {
        self.elements.delete(i, &self.tuning)
    }

    /// Assign `length`. Shrinking truncates storage; growing materializes
    /// nothing.
    pub fn set_length(&mut self, n: u32) {
        if n < self.length {
            self.elements.truncate(n, &self.tuning);
        }
        self.length = n;
    }

    // ------------------------------------------------------------------
    // Coercing entry points
    // ------------------------------------------------------------------

    /// Read through a coerced key: element index or dynamic property.
    ///
    /// Property reads consult the own dynamic table, then the prototype by
    /// name.
    pub fn get_key(&self, key: &IndexKey) -> Value {
        match key {
            IndexKey::Element(i) => self.get_element(*i),
            IndexKey::Property(name) => {
                if let Some(v) = self.dynamic.get_opt(name) {
                    return v.clone();
                }
                self.proto.snapshot().prop(name).unwrap_or(Value::Undefined)
            }
        }
    }

    pub fn has_key(&self, key: &IndexKey) -> bool {
        match key {
            IndexKey::Element(i) => self.has_element(*i),
            IndexKey::Property(name) => {
                self.dynamic.has(name) || self.proto.snapshot().prop(name).is_some()
            }
        }
    }

    /// Write through a coerced key. Invalid indices land in the dynamic
    /// property table and never touch element storage or `length`.
    pub fn set_key(&mut self, key: IndexKey, v: Value) {
        match key {
            IndexKey::Element(i) => self.set_element(i, v),
            IndexKey::Property(name) => self.dynamic.set(name, v),
        }
    }

    pub fn delete_key(&mut self, key: &IndexKey) -> bool {
        match key {
            IndexKey::Element(i) => self.delete_element(*i),
            IndexKey::Property(name) => self.dynamic.delete(name),
        }
    }

    /// Float-indexed overloads, the common dynamic-dispatch path.
    pub fn get_f64(&self, index: f64) -> Value {
        self.get_key(&IndexKey::from_f64(index))
    }

    pub fn set_f64(&mut self, index: f64, v: Value) {
        self.set_key(IndexKey::from_f64(index), v);
    }

    pub fn has_f64(&self, index: f64) -> bool {
        self.has_key(&IndexKey::from_f64(index))
    }

    pub fn delete_f64(&mut self, index: f64) -> bool {
        self.delete_key(&IndexKey::from_f64(index))
    }

    /// String-keyed overloads.
    pub fn get_str(&self, key: &str) -> Value {
        self.get_key(&IndexKey::from_str_key(key))
    }

    pub fn set_str(&mut self, key: &str, v: Value) {
        self.set_key(IndexKey::from_str_key(key), v);
    }

    pub fn has_str(&self, key: &str) -> bool {
        self.has_key(&IndexKey::from_str_key(key))
    }

    pub fn delete_str(&mut self, key: &str) -> bool {
        self.delete_key(&IndexKey::from_str_key(key))
    }

    /// Signed overloads. The unchecked form routes negatives to the
    /// dynamic property table.
    pub fn get_i32(&self, index: i32) -> Value {
        self.get_key(&IndexKey::from_i32(index))
    }

    pub fn set_i32(&mut self, index: i32, v: Value) {
        self.set_key(IndexKey::from_i32(index), v);
    }

    /// The checked signed writer: negative indices are an error instead of
    /// a property write.
    pub fn set_i32_checked(&mut self, index: i32, v: Value) -> ArrayResult<()> {
        if index < 0 {
            return Err(ArrayError::ArgumentOutOfRange { index });
        }
        self.set_element(index as u32, v);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stack and queue operations
    // ------------------------------------------------------------------

    /// Append one value. Returns the new length. At the maximum length the
    /// push is a silent no-op.
    pub fn push(&mut self, v: Value) -> u32 {
        if self.length == MAX_LENGTH {
            return self.length;
        }
        self.elements.set(self.length, v, &self.tuning);
        self.length += 1;
        self.length
    }

    /// Append a batch, stopping silently at the maximum length.
    pub fn push_many(&mut self, values: &[Value]) -> u32 {
        for v in values {
            if self.length == MAX_LENGTH {
                break;
            }
            self.elements.set(self.length, v.clone(), &self.tuning);
            self.length += 1;
        }
        self.length
    }

    /// Remove and return the last element. The departing slot reads
    /// through the prototype if it is a hole here; popping an empty array
    /// yields `undefined` and leaves length 0.
    pub fn pop(&mut self) -> Value {
        if self.length == 0 {
            return Value::Undefined;
        }
        let i = self.length - 1;
        let v = self.get_element(i);
        self.elements.delete(i, &self.tuning);
        self.length = i;
        v
    }

    /// Remove and return the first element, sliding everything down one.
    pub fn shift(&mut self) -> Value {
        if self.length == 0 {
            return Value::Undefined;
        }
        let v = self.get_element(0);
        self.elements.shift_down(1, &self.tuning);
        self.length -= 1;
        v
    }

    /// Insert `values` at the front, sliding existing elements up. Returns
    /// the new length.
    ///
    /// When the result would exceed the maximum length it clamps there:
    /// the stored tail that would slide past the last valid index is
    /// discarded.
    pub fn unshift(&mut self, values: &[Value]) -> u32 {
        if values.is_empty() {
            return self.length;
        }
        let k = values.len().min(MAX_LENGTH as usize) as u32;
        let new_len = self.length.saturating_add(k).min(MAX_LENGTH);
        let surviving = new_len - k;
        if surviving < self.length {
            self.elements.truncate(surviving, &self.tuning);
        }
        self.elements.shift_up(k);
        for (j, v) in values.iter().take(k as usize).enumerate() {
            self.elements.set(j as u32, v.clone(), &self.tuning);
        }
        self.length = new_len;
        new_len
    }

    // ------------------------------------------------------------------
    // Iteration and cloning
    // ------------------------------------------------------------------

    /// Visit every own stored `(index, value)` pair in ascending order.
    /// Holes and prototype contributions are skipped.
    pub fn for_each(&self, f: impl FnMut(u32, &Value)) {
        self.elements.for_each_present(f);
    }

    /// The elements an index-walking operation observes: the own stored
    /// value at each index, else the prototype contribution, restricted to
    /// indices below `length`. Ascending order. One prototype snapshot
    /// covers the whole merge.
    pub(crate) fn effective_entries(&self) -> Vec<(u32, Value)> {
        let mut entries = self.elements.present_entries();
        let snapshot = self.proto.snapshot();
        if !snapshot.is_empty() {
            let mut merged = false;
            for i in snapshot.element_indices() {
                if i < self.length && !self.elements.has(i) {
                    if let Some(v) = snapshot.element(i) {
                        entries.push((i, v));
                        merged = true;
                    }
                }
            }
            if merged {
                entries.sort_by_key(|&(i, _)| i);
            }
        }
        entries
    }

    /// A shallow copy: fresh storage and dynamic table holding the same
    /// value references, same prototype handle. Mutating the copy's slots
    /// never affects the original and vice versa; mutations *through*
    /// shared object values remain visible to both.
    pub fn clone_array(&self) -> ArrayObject {
        self.clone()
    }

    pub(crate) fn elements(&self) -> &ElementStorage {
        &self.elements
    }

    /// Swap in replacement storage, used by the sort commit path after the
    /// whole operation has succeeded.
    pub(crate) fn replace_elements(&mut self, elements: ElementStorage) {
        self.elements = elements;
    }

    pub(crate) fn tuning(&self) -> &StorageTuning {
        &self.tuning
    }
}
