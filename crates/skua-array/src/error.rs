//! Error types for array operations.
//!
//! The closed set of failures the array surface can produce. Every variant
//! carries the AVM error number via [`ArrayError::code`] so embedders can
//! route errors without matching on variants.

use thiserror::Error;

/// Error type for array operations
#[derive(Debug, Error)]
pub enum ArrayError {
    /// The constructor was handed a finite number that is not a
    /// representable length (negative, fractional, or >= 2^32).
    #[error("Array length is not a positive integer: {value}")]
    LengthNotPositiveInteger { value: f64 },

    /// A checked indexer was handed a negative index.
    #[error("Index {index} is out of range")]
    ArgumentOutOfRange { index: i32 },

    /// The first sort argument was neither a function nor a number.
    #[error("Cannot coerce a {from} to a sort comparator or flag set")]
    TypeCoercionFailed { from: &'static str },

    /// A sortOn property name resolved on no non-nullish element.
    #[error("Property {name} not found on any element")]
    PropertyNotFound { name: String },
}

impl ArrayError {
    /// The AVM error number for external routing.
    pub fn code(&self) -> u32 {
        match self {
            ArrayError::LengthNotPositiveInteger { .. } => 1005,
            ArrayError::ArgumentOutOfRange { .. } => 2006,
            ArrayError::TypeCoercionFailed { .. } => 1034,
            ArrayError::PropertyNotFound { .. } => 1069,
        }
    }
}

/// Result type alias for array operations
pub type ArrayResult<T> = std::result::Result<T, ArrayError>;
