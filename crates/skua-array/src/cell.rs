//! The hole / value distinction.

use skua_value::Value;

/// One array slot: either a hole (nothing stored at this index) or a stored
/// value.
///
/// A hole is not the same thing as a stored `undefined`: `has` is false for
/// a hole and true for a stored `undefined`, iteration skips holes, and the
/// prototype can only show through holes.
#[derive(Clone, Debug, Default)]
pub enum ValueCell {
    #[default]
    Hole,
    Value(Value),
}

impl ValueCell {
    pub fn is_hole(&self) -> bool {
        matches!(self, ValueCell::Hole)
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ValueCell::Hole => None,
            ValueCell::Value(v) => Some(v),
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            ValueCell::Hole => None,
            ValueCell::Value(v) => Some(v),
        }
    }
}

impl From<Value> for ValueCell {
    fn from(v: Value) -> Self {
        ValueCell::Value(v)
    }
}

impl From<Option<Value>> for ValueCell {
    fn from(v: Option<Value>) -> Self {
        match v {
            Some(v) => ValueCell::Value(v),
            None => ValueCell::Hole,
        }
    }
}
