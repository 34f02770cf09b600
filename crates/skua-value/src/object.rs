//! The dynamic property table.
//!
//! [`DynObject`] is the ordered string-keyed map behind every dynamic
//! object: the property bag of `Value::Object`, and the spillover table that
//! array writes with non-index keys land in. Insertion order is preserved so
//! property enumeration stays deterministic.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::value::Value;

/// An ordered string -> value property table.
#[derive(Clone, Debug, Default)]
pub struct DynObject {
    props: IndexMap<Rc<str>, Value>,
}

impl DynObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a property, yielding `undefined` when absent.
    pub fn get(&self, name: &str) -> Value {
        self.props.get(name).cloned().unwrap_or(Value::Undefined)
    }

    /// Read a property without the missing -> `undefined` conversion.
    pub fn get_opt(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    pub fn set(&mut self, name: impl Into<Rc<str>>, value: Value) {
        self.props.insert(name.into(), value);
    }

    /// Remove a property, preserving the order of the survivors.
    pub fn delete(&mut self, name: &str) -> bool {
        self.props.shift_remove(name).is_some()
    }

    pub fn has(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Property names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Rc<str>> {
        self.props.keys()
    }

    /// (name, value) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Rc<str>, &Value)> {
        self.props.iter()
    }
}

/// A shared, mutable reference to a [`DynObject`].
///
/// This is the referent of `Value::Object`; two values holding the same
/// `ObjectRef` observe each other's property writes.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<DynObject>>);

impl ObjectRef {
    pub fn new(props: DynObject) -> Self {
        ObjectRef(Rc::new(RefCell::new(props)))
    }

    pub fn get_prop(&self, name: &str) -> Value {
        self.0.borrow().get(name)
    }

    pub fn set_prop(&self, name: impl Into<Rc<str>>, value: Value) {
        self.0.borrow_mut().set(name, value);
    }

    pub fn has_prop(&self, name: &str) -> bool {
        self.0.borrow().has(name)
    }

    /// Identity comparison, the object half of strict equality.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn borrow(&self) -> Ref<'_, DynObject> {
        self.0.borrow()
    }

    pub(crate) fn as_ptr(&self) -> *const RefCell<DynObject> {
        Rc::as_ptr(&self.0)
    }
}

impl Default for ObjectRef {
    fn default() -> Self {
        ObjectRef::new(DynObject::new())
    }
}

impl std::fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectRef({:p})", self.as_ptr())
    }
}
