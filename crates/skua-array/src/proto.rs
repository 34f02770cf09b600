//! The prototype chain adapter.
//!
//! Arrays do not own their prototype; they hold a back-reference to a
//! process-scoped object shared by every array in the runtime. A prototype
//! property whose name is the canonical decimal form of a valid index
//! supplies a value through any array that has a hole at that index.
//!
//! Because the prototype is shared, readers and writers serialize through an
//! advisory lock. Each public array operation takes a single
//! [`ProtoSnapshot`] and uses it for the whole operation, so the operation
//! observes one consistent prototype state.

use std::rc::Rc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use skua_value::{DynObject, IndexKey, Value};

/// A shared handle to the array prototype object.
///
/// Cloning the handle shares the underlying object; this is how every array
/// in a runtime sees the same prototype.
#[derive(Clone, Default)]
pub struct ProtoRef {
    inner: Rc<RwLock<DynObject>>,
}

impl ProtoRef {
    pub fn new() -> Self {
        Self::default()
    }

    /// An immutable view of the prototype, valid for one operation.
    pub fn snapshot(&self) -> ProtoSnapshot<'_> {
        ProtoSnapshot {
            guard: self.inner.read(),
        }
    }

    /// Writer access, for embedders and tests that populate the prototype.
    pub fn write(&self) -> RwLockWriteGuard<'_, DynObject> {
        self.inner.write()
    }

    /// Identity comparison: do two handles name the same prototype object?
    pub fn ptr_eq(&self, other: &ProtoRef) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for ProtoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProtoRef({:p})", Rc::as_ptr(&self.inner))
    }
}

/// A read-locked view of the prototype.
pub struct ProtoSnapshot<'a> {
    guard: RwLockReadGuard<'a, DynObject>,
}

impl ProtoSnapshot<'_> {
    /// The prototype's contribution at element index `i`, if any.
    pub fn element(&self, i: u32) -> Option<Value> {
        self.guard.get_opt(&i.to_string()).cloned()
    }

    pub fn has_element(&self, i: u32) -> bool {
        self.guard.has(&i.to_string())
    }

    /// A non-index property, for reads that fall through the dynamic table.
    pub fn prop(&self, name: &str) -> Option<Value> {
        self.guard.get_opt(name).cloned()
    }

    /// Every property name that parses as a valid element index, in
    /// ascending order.
    pub fn element_indices(&self) -> Vec<u32> {
        let mut indices: Vec<u32> = self
            .guard
            .keys()
            .filter_map(|name| match IndexKey::from_str_key(name) {
                IndexKey::Element(i) => Some(i),
                IndexKey::Property(_) => None,
            })
            .collect();
        indices.sort_unstable();
        indices
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}
