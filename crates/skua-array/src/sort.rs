//! The sort and sortOn engine.
//!
//! ============================================================================
//! ORDERING MODEL
//! ============================================================================
//!
//! Sorting operates on the *effective* elements of the array: for each index
//! below `length`, the own stored value if present, else the prototype's
//! contribution, else a hole. The result is a three-way partition:
//!
//! ```text
//! [ comparator-ordered values | undefined values | holes ]
//! ```
//!
//! For `sortOn` the middle partition holds the nullish elements (both
//! `undefined` and `null`); for plain `sort` only `undefined` lands there.
//!
//! The ordering is stable: when the active comparator reports a tie, the
//! element with the smaller original index comes first. `DESCENDING` inverts
//! the comparator's answer, not the buffer, so ties keep original order
//! either way.
//!
//! ============================================================================
//! REENTRANCY
//! ============================================================================
//!
//! A user comparator may do anything, including mutating this very array.
//! The engine therefore materializes the full effective-element buffer
//! (taking one prototype snapshot) before the first comparator call, runs
//! the whole ordering against that buffer, and only then commits. A
//! mid-sort mutation affects the next operation, never this one; a failed
//! sort commits nothing.

use std::cmp::Ordering;
use std::rc::Rc;

use bitflags::bitflags;
use log::trace;
use smallvec::SmallVec;
use skua_value::{to_uint32, NativeFn, Value};

use crate::array::ArrayObject;
use crate::error::{ArrayError, ArrayResult};
use crate::storage::ElementStorage;

bitflags! {
    /// Flags accepted by `sort` and `sortOn`. Unknown bits are ignored.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SortFlags: u32 {
        const CASEINSENSITIVE = 1 << 0;
        const DESCENDING = 1 << 1;
        const UNIQUESORT = 1 << 2;
        const RETURNINDEXEDARRAY = 1 << 3;
        const NUMERIC = 1 << 4;
    }
}

/// Arrays longer than this are not sorted; the operation reports
/// [`SortOutcome::Untouched`].
pub const SORT_LENGTH_LIMIT: u32 = 1 << 31;

/// What a sort produced.
#[derive(Debug)]
pub enum SortOutcome {
    /// The array was reordered in place.
    Sorted,
    /// `RETURNINDEXEDARRAY`: the source is untouched and this fresh array
    /// holds the original indices in sorted order.
    Indices(ArrayObject),
    /// `UNIQUESORT` found two elements that compare equal; the source is
    /// untouched. The VM surface reports this as the number 0.
    Duplicate,
    /// The array exceeded [`SORT_LENGTH_LIMIT`] and was left alone.
    Untouched,
}

/// One `sortOn` field: a property name and the flags governing its
/// comparisons.
#[derive(Clone, Debug)]
pub struct SortOnField {
    pub name: Rc<str>,
    pub flags: SortFlags,
}

impl SortOnField {
    pub fn new(name: impl Into<Rc<str>>, flags: SortFlags) -> Self {
        SortOnField {
            name: name.into(),
            flags,
        }
    }
}

/// A materialized element: its original index, the value, and the
/// precomputed comparison key (absent for user comparators, which see the
/// value itself).
struct Keyed {
    original: u32,
    value: Value,
    key: ElemKey,
}

enum ElemKey {
    Raw,
    Num(f64),
    Str(String),
    Fields(SmallVec<[FieldKey; 4]>),
}

enum FieldKey {
    Num(f64),
    Str(String),
}

enum SortOrder<'a> {
    /// Default comparator under the given flags.
    Keys { descending: bool },
    /// Per-component field comparison for sortOn.
    Fields { flags: &'a [SortFlags] },
    /// User-supplied comparator; `DESCENDING` still inverts its answer.
    User {
        func: &'a NativeFn,
        descending: bool,
    },
}

impl ArrayObject {
    /// Sort in place under the default comparator selected by `flags`.
    pub fn sort(&mut self, flags: SortFlags) -> SortOutcome {
        self.run_sort(None, flags)
    }

    /// Sort with a user comparator. `NUMERIC` and `CASEINSENSITIVE` are
    /// ignored in its presence; `DESCENDING`, `UNIQUESORT` and
    /// `RETURNINDEXEDARRAY` keep their meaning.
    pub fn sort_with(&mut self, comparator: &NativeFn, flags: SortFlags) -> SortOutcome {
        self.run_sort(Some(comparator), flags)
    }

    /// The AVM argument protocol for `sort`: no arguments means the default
    /// string sort, a function argument is a comparator (optionally
    /// followed by numeric flags), a numeric argument is a flag set, and
    /// anything else fails to coerce.
    pub fn sort_from_args(&mut self, args: &[Value]) -> ArrayResult<SortOutcome> {
        match args {
            [] => Ok(self.sort(SortFlags::empty())),
            [Value::Function(func), rest @ ..] => {
                let flags = match rest.first() {
                    Some(Value::Number(n)) => SortFlags::from_bits_truncate(to_uint32(*n)),
                    _ => SortFlags::empty(),
                };
                Ok(self.sort_with(func, flags))
            }
            [Value::Number(n), ..] => {
                Ok(self.sort(SortFlags::from_bits_truncate(to_uint32(*n))))
            }
            [other, ..] => Err(ArrayError::TypeCoercionFailed {
                from: other.type_name(),
            }),
        }
    }

    /// Sort by one or more property names, each compared under its own
    /// flags. `UNIQUESORT` and `RETURNINDEXEDARRAY` are honored from the
    /// first field's flags only. Nullish elements sort into the tail
    /// partition without their properties being read.
    pub fn sort_on(&mut self, fields: &[SortOnField]) -> ArrayResult<SortOutcome> {
        if fields.is_empty() {
            return Ok(self.sort(SortFlags::empty()));
        }
        if self.length() > SORT_LENGTH_LIMIT {
            return Ok(SortOutcome::Untouched);
        }

        let entries = self.effective_entries();
        let present: Vec<u32> = entries.iter().map(|&(i, _)| i).collect();

        let mut values: Vec<Keyed> = Vec::new();
        let mut tail: Vec<u32> = Vec::new();
        let mut tail_values: Vec<Value> = Vec::new();
        for (i, v) in entries {
            if v.is_nullish() {
                tail.push(i);
                tail_values.push(v);
            } else {
                values.push(Keyed {
                    original: i,
                    value: v,
                    key: ElemKey::Raw,
                });
            }
        }

        // Every name must resolve somewhere among the non-nullish elements.
        if !values.is_empty() {
            for field in fields {
                if !values.iter().any(|k| k.value.has_prop(&field.name)) {
                    return Err(ArrayError::PropertyNotFound {
                        name: field.name.to_string(),
                    });
                }
            }
        }

        for keyed in &mut values {
            let mut keys: SmallVec<[FieldKey; 4]> = SmallVec::with_capacity(fields.len());
            for field in fields {
                let prop = keyed.value.get_prop(&field.name);
                keys.push(if field.flags.contains(SortFlags::NUMERIC) {
                    FieldKey::Num(prop.coerce_to_number())
                } else if field.flags.contains(SortFlags::CASEINSENSITIVE) {
                    FieldKey::Str(prop.coerce_to_string_folded())
                } else {
                    FieldKey::Str(prop.coerce_to_string())
                });
            }
            keyed.key = ElemKey::Fields(keys);
        }

        let field_flags: Vec<SortFlags> = fields.iter().map(|f| f.flags).collect();
        let order = SortOrder::Fields {
            flags: &field_flags,
        };
        Ok(self.order_and_commit(values, tail, tail_values, present, order, fields[0].flags))
    }

    fn run_sort(&mut self, comparator: Option<&NativeFn>, flags: SortFlags) -> SortOutcome {
        if self.length() > SORT_LENGTH_LIMIT {
            return SortOutcome::Untouched;
        }

        let entries = self.effective_entries();
        let present: Vec<u32> = entries.iter().map(|&(i, _)| i).collect();

        let mut values: Vec<Keyed> = Vec::new();
        let mut tail: Vec<u32> = Vec::new();
        let mut tail_values: Vec<Value> = Vec::new();
        for (i, v) in entries {
            if v.is_undefined() {
                tail.push(i);
                tail_values.push(v);
            } else {
                values.push(Keyed {
                    original: i,
                    value: v,
                    key: ElemKey::Raw,
                });
            }
        }

        let descending = flags.contains(SortFlags::DESCENDING);
        let order = match comparator {
            Some(func) => SortOrder::User { func, descending },
            None => {
                // NUMERIC dominates CASEINSENSITIVE.
                for keyed in &mut values {
                    keyed.key = if flags.contains(SortFlags::NUMERIC) {
                        ElemKey::Num(keyed.value.coerce_to_number())
                    } else if flags.contains(SortFlags::CASEINSENSITIVE) {
                        ElemKey::Str(keyed.value.coerce_to_string_folded())
                    } else {
                        ElemKey::Str(keyed.value.coerce_to_string())
                    };
                }
                SortOrder::Keys { descending }
            }
        };

        self.order_and_commit(values, tail, tail_values, present, order, flags)
    }

    /// Order the scratch buffer, apply the uniqueness gate, and either
    /// commit in place or build the index array. Nothing before this point
    /// has touched the array.
    fn order_and_commit(
        &mut self,
        mut values: Vec<Keyed>,
        tail: Vec<u32>,
        tail_values: Vec<Value>,
        present: Vec<u32>,
        order: SortOrder<'_>,
        flags: SortFlags,
    ) -> SortOutcome {
        values.sort_by(|a, b| compare(&order, a, b));

        if flags.contains(SortFlags::UNIQUESORT) {
            let duplicate = values
                .windows(2)
                .any(|pair| compare(&order, &pair[0], &pair[1]) == Ordering::Equal);
            if duplicate {
                return SortOutcome::Duplicate;
            }
        }

        if flags.contains(SortFlags::RETURNINDEXEDARRAY) {
            let mut indices: Vec<Value> = Vec::with_capacity(self.length() as usize);
            indices.extend(values.iter().map(|k| Value::from(k.original)));
            indices.extend(tail.iter().copied().map(Value::from));
            // Holes contribute their indices last, in ascending order.
            let mut next_present = present.iter().copied().peekable();
            for i in 0..self.length() {
                match next_present.peek() {
                    Some(&p) if p == i => {
                        next_present.next();
                    }
                    _ => indices.push(Value::from(i)),
                }
            }
            return SortOutcome::Indices(ArrayObject::from_values(self.proto().clone(), indices));
        }

        trace!(
            "sort: committing {} values, {} tail, {} holes",
            values.len(),
            tail_values.len(),
            self.length() as u64 - (values.len() + tail_values.len()) as u64
        );
        let mut packed: Vec<Value> = Vec::with_capacity(values.len() + tail_values.len());
        packed.extend(values.into_iter().map(|k| k.value));
        packed.extend(tail_values);
        self.replace_elements(ElementStorage::from_packed(packed));
        SortOutcome::Sorted
    }
}

fn compare(order: &SortOrder<'_>, a: &Keyed, b: &Keyed) -> Ordering {
    match order {
        SortOrder::Keys { descending } => {
            let ord = key_cmp(&a.key, &b.key);
            if *descending {
                ord.reverse()
            } else {
                ord
            }
        }
        SortOrder::Fields { flags } => {
            let (ElemKey::Fields(ka), ElemKey::Fields(kb)) = (&a.key, &b.key) else {
                return Ordering::Equal;
            };
            for ((fa, fb), field_flags) in ka.iter().zip(kb.iter()).zip(flags.iter()) {
                let ord = field_cmp(fa, fb);
                let ord = if field_flags.contains(SortFlags::DESCENDING) {
                    ord.reverse()
                } else {
                    ord
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        }
        SortOrder::User { func, descending } => {
            let result = func(&[a.value.clone(), b.value.clone()]).coerce_to_number();
            let ord = ordering_from_f64(result);
            if *descending {
                ord.reverse()
            } else {
                ord
            }
        }
    }
}

fn key_cmp(a: &ElemKey, b: &ElemKey) -> Ordering {
    match (a, b) {
        (ElemKey::Num(x), ElemKey::Num(y)) => numeric_cmp(*x, *y),
        (ElemKey::Str(x), ElemKey::Str(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn field_cmp(a: &FieldKey, b: &FieldKey) -> Ordering {
    match (a, b) {
        (FieldKey::Num(x), FieldKey::Num(y)) => numeric_cmp(*x, *y),
        (FieldKey::Str(x), FieldKey::Str(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Total numeric order: NaN compares greater than every non-NaN and equal
/// to NaN.
fn numeric_cmp(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Map a comparator's numeric result to an ordering; NaN counts as a tie.
fn ordering_from_f64(r: f64) -> Ordering {
    if r < 0.0 {
        Ordering::Less
    } else if r > 0.0 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}
