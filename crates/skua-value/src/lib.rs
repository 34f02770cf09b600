//! skua-value - Boxed Runtime Values and Coercions
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! This crate provides the foundation types shared by every part of the Skua
//! runtime: the boxed [`Value`] type, the dynamic property table
//! ([`DynObject`]), the numeric and string coercion rules, and the array
//! index coercion function ([`IndexKey`]).
//!
//! DESIGN PRINCIPLES:
//! ------------------
//! 1. CHEAP CLONES
//!    A `Value` is at most a pointer plus a tag. Strings, objects and
//!    functions are reference-counted; cloning a value never deep-copies
//!    the referent.
//!
//! 2. ONE COERCION, ONE PLACE
//!    Every conversion the runtime performs (value -> number, value ->
//!    string, number -> canonical string, anything -> index-or-property-key)
//!    lives here, so higher layers never grow their own divergent rules.
//!
//! 3. ECMA-FLAVORED SEMANTICS
//!    Coercions follow the ECMAScript-3 behaviors the AVM inherited:
//!    `undefined` is NaN as a number, `null` is 0, `"0x10"` parses as 16,
//!    `-0` prints as `"0"`, NaN prints as `"NaN"`.
//!
//! ============================================================================
//! INDEX COERCION
//! ============================================================================
//!
//! Array indices occupy `[0, 2^32 - 1)`; the value `2^32 - 1` is the length
//! sentinel and never names an element. Inputs reach the runtime as `u32`,
//! `i32`, `f64` or strings, and a single normalization function decides for
//! each of them whether it is an element index or a plain property name:
//!
//! ```text
//! 3u32        -> Element(3)
//! -1i32       -> Property("-1")
//! 2.0f64      -> Element(2)
//! 2.5f64      -> Property("2.5")
//! "7"         -> Element(7)
//! "07"        -> Property("07")      (not canonical)
//! "4294967295"-> Property("4294967295")  (the sentinel)
//! ```
//!
//! Everything that is not an element index is routed to the dynamic property
//! table under the canonical string form of the original input.

pub mod coerce;
pub mod index;
pub mod object;
pub mod value;

pub use coerce::{fold_case, number_to_string, parse_number, to_uint32};
pub use index::{IndexKey, LENGTH_SENTINEL, MAX_INDEX};
pub use object::{DynObject, ObjectRef};
pub use value::{NativeFn, Value};

#[cfg(test)]
mod tests;
