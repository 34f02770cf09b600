//! Array index coercion.
//!
//! The single normalization point every public array entry point funnels
//! through (u32, i32, f64 and string overloads alike). An input either is a
//! valid element index, or it becomes a property key under the canonical
//! string of the original value; there is no third outcome.

use std::rc::Rc;

use crate::coerce::number_to_string;
use crate::value::Value;

/// The largest valid element index, `2^32 - 2`.
pub const MAX_INDEX: u32 = u32::MAX - 1;

/// The reserved value `2^32 - 1`. It is the upper bound for `length` and
/// never names an element.
pub const LENGTH_SENTINEL: u32 = u32::MAX;

/// The outcome of index coercion: an element index, or a property name for
/// the dynamic property table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexKey {
    Element(u32),
    Property(Rc<str>),
}

impl IndexKey {
    pub fn from_u32(i: u32) -> IndexKey {
        if i <= MAX_INDEX {
            IndexKey::Element(i)
        } else {
            IndexKey::Property(Rc::from(i.to_string()))
        }
    }

    pub fn from_i32(i: i32) -> IndexKey {
        if i >= 0 {
            IndexKey::Element(i as u32)
        } else {
            IndexKey::Property(Rc::from(i.to_string()))
        }
    }

    /// A float is an element index iff it is a finite non-negative integer
    /// below the sentinel. `-0.0` is index 0; everything else routes under
    /// its canonical formatting (so `2.5` -> `"2.5"`, NaN -> `"NaN"`, and
    /// `4294967295.0` -> `"4294967295"`).
    pub fn from_f64(n: f64) -> IndexKey {
        if n.is_finite() && n.trunc() == n && n >= 0.0 && n <= MAX_INDEX as f64 {
            IndexKey::Element(n as u32)
        } else {
            IndexKey::Property(Rc::from(number_to_string(n)))
        }
    }

    /// A string is an element index iff it is the canonical decimal form of
    /// a valid index: no sign, no leading zeros, value below the sentinel.
    pub fn from_str_key(s: &str) -> IndexKey {
        if let Some(i) = parse_canonical_index(s) {
            IndexKey::Element(i)
        } else {
            IndexKey::Property(Rc::from(s))
        }
    }

    /// Coerce an arbitrary value used in index position.
    pub fn from_value(v: &Value) -> IndexKey {
        match v {
            Value::Number(n) => IndexKey::from_f64(*n),
            Value::String(s) => IndexKey::from_str_key(s),
            other => IndexKey::Property(Rc::from(other.coerce_to_string())),
        }
    }
}

/// Parse `s` as a canonical element index, rejecting non-canonical
/// spellings (`"01"`, `"+1"`, `" 1"`) and out-of-range values.
fn parse_canonical_index(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 10 {
        return None;
    }
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match s.parse::<u32>() {
        Ok(i) if i <= MAX_INDEX => Some(i),
        _ => None,
    }
}
