//! Standard-library operations over the array surface.
//!
//! These walk the *effective* elements (own storage, else prototype) the
//! same way sort materialization does, and build their results through the
//! ordinary element writers so storage shaping stays uniform.

use skua_value::{Value, MAX_INDEX};

use crate::array::{ArrayObject, MAX_LENGTH};
use crate::storage::ElementStorage;

/// One `concat` argument: a whole array appended element-wise, or a single
/// value appended as one element.
pub enum ConcatSource<'a> {
    Array(&'a ArrayObject),
    One(Value),
}

impl ArrayObject {
    /// Join the elements into one string. Holes and nullish elements
    /// contribute the empty string. The default separator is `","`.
    pub fn join(&self, separator: Option<&str>) -> String {
        let sep = separator.unwrap_or(",");
        let mut out = String::new();
        let mut entries = self.effective_entries().into_iter().peekable();
        for i in 0..self.length() {
            if i > 0 {
                out.push_str(sep);
            }
            let here = matches!(entries.peek(), Some(&(p, _)) if p == i);
            if here {
                if let Some((_, v)) = entries.next() {
                    if !v.is_nullish() {
                        out.push_str(&v.coerce_to_string());
                    }
                }
            }
        }
        out
    }

    /// Reverse the array in place. Own stored elements move from `i` to
    /// `length - 1 - i`; holes stay holes (and keep showing prototype
    /// contributions at whatever indices end up holey).
    pub fn reverse(&mut self) {
        let len = self.length();
        if len <= 1 {
            return;
        }
        let tuning = *self.tuning();
        let entries = self.elements().present_entries();
        let mut rebuilt = ElementStorage::Empty;
        for (i, v) in entries.into_iter().rev() {
            rebuilt.set(len - 1 - i, v, &tuning);
        }
        self.replace_elements(rebuilt);
    }

    /// First index at or after `from` whose effective element is strictly
    /// equal to `needle`. Negative `from` counts back from the end.
    pub fn index_of(&self, needle: &Value, from: i32) -> Option<u32> {
        let start = resolve_bound(from as i64, self.length());
        self.effective_entries()
            .into_iter()
            .find(|(i, v)| *i >= start && v.strict_eq(needle))
            .map(|(i, _)| i)
    }

    /// Last index at or before `from` whose effective element is strictly
    /// equal to `needle`. Negative `from` counts back from the end; pass
    /// `i32::MAX` to search the whole array.
    pub fn last_index_of(&self, needle: &Value, from: i32) -> Option<u32> {
        let len = self.length();
        if len == 0 {
            return None;
        }
        let start = if from < 0 {
            len as i64 + from as i64
        } else {
            (from as i64).min(len as i64 - 1)
        };
        if start < 0 {
            return None;
        }
        let start = start as u32;
        self.effective_entries()
            .into_iter()
            .rev()
            .find(|(i, v)| *i <= start && v.strict_eq(needle))
            .map(|(i, _)| i)
    }

    /// The effective elements of `[start, end)` as a new array. Negative
    /// bounds count back from the end; holes stay holes.
    pub fn slice(&self, start: i64, end: i64) -> ArrayObject {
        let len = self.length();
        let a = resolve_bound(start, len);
        let b = resolve_bound(end, len);
        let mut out = ArrayObject::new(self.proto().clone());
        if a >= b {
            return out;
        }
        for (i, v) in self.effective_entries() {
            if i >= a && i < b {
                out.set_element(i - a, v);
            }
        }
        out.set_length(b - a);
        out
    }

    /// A new array holding this array's effective elements followed by
    /// each source in turn. Holes in array sources stay holes.
    pub fn concat(&self, sources: &[ConcatSource<'_>]) -> ArrayObject {
        let mut out = ArrayObject::new(self.proto().clone());
        let mut cursor = append_effective(&mut out, 0, self);
        for source in sources {
            match source {
                ConcatSource::Array(other) => {
                    cursor = append_effective(&mut out, cursor, other);
                }
                ConcatSource::One(v) => {
                    if cursor <= MAX_INDEX {
                        out.set_element(cursor, v.clone());
                    }
                    cursor = cursor.saturating_add(1).min(MAX_LENGTH);
                }
            }
        }
        out.set_length(cursor);
        out
    }

    /// Remove `delete_count` elements starting at `start`, insert
    /// `insertions` in their place, and return the removed slice as a new
    /// array. Negative `start` counts back from the end.
    pub fn splice(&mut self, start: i64, delete_count: i64, insertions: &[Value]) -> ArrayObject {
        let len = self.length();
        let a = resolve_bound(start, len);
        let dc = delete_count.clamp(0, (len - a) as i64) as u32;
        let k = insertions.len().min(MAX_LENGTH as usize) as u32;

        let mut removed = ArrayObject::new(self.proto().clone());
        if dc > 0 {
            for (i, v) in self.effective_entries() {
                if i >= a && i < a + dc {
                    removed.set_element(i - a, v);
                }
            }
            removed.set_length(dc);
        }

        let new_len = ((len - dc) as u64 + k as u64).min(MAX_LENGTH as u64) as u32;
        let tuning = *self.tuning();
        let entries = self.elements().present_entries();
        let mut rebuilt = ElementStorage::Empty;
        for (i, v) in &entries {
            if *i < a {
                rebuilt.set(*i, v.clone(), &tuning);
            }
        }
        for (j, v) in insertions.iter().take(k as usize).enumerate() {
            let dest = a as u64 + j as u64;
            if dest <= MAX_INDEX as u64 {
                rebuilt.set(dest as u32, v.clone(), &tuning);
            }
        }
        for (i, v) in &entries {
            if *i >= a + dc {
                let dest = (*i - dc) as u64 + k as u64;
                if dest <= MAX_INDEX as u64 {
                    rebuilt.set(dest as u32, v.clone(), &tuning);
                }
            }
        }
        self.replace_elements(rebuilt);
        self.set_length(new_len);
        removed
    }
}

/// Clamp a possibly-negative bound into `[0, len]`.
fn resolve_bound(bound: i64, len: u32) -> u32 {
    if bound < 0 {
        (len as i64 + bound).max(0) as u32
    } else {
        (bound).min(len as i64) as u32
    }
}

/// Copy `src`'s effective elements into `out` starting at `cursor`;
/// returns the cursor after `src`'s full length (holes included).
fn append_effective(out: &mut ArrayObject, cursor: u32, src: &ArrayObject) -> u32 {
    for (i, v) in src.effective_entries() {
        if let Some(dest) = cursor.checked_add(i) {
            if dest <= MAX_INDEX {
                out.set_element(dest, v);
            }
        }
    }
    cursor.saturating_add(src.length()).min(MAX_LENGTH)
}
