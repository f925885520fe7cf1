//! Error types used to report structural validation failure
//!
//! This module defines [`VerifyError`], the closed set of ways a byte
//! buffer can fail to be a well-formed encoding of its descriptor, and
//! the alias [`VerifyResult<T>`] used throughout the validation engine
//! and the view accessors.
//!
//! Every variant corresponds to a check performed at the boundary
//! closest to the malformed bytes; validation is fail-fast and no
//! partially-decoded result is ever returned alongside an error.

use std::error::Error;
use std::fmt::{Display, Formatter, Result};

/// Enumeration type over all structural-validation failures.
///
/// Each variant carries the offending quantities so that a rejected
/// buffer can be diagnosed without re-parsing it. `compatible` mode
/// (see [`validate`](crate::verify::validate)) changes the acceptance
/// criteria for [`TooManyFields`] only; it never suppresses the
/// visibility of any other error.
///
/// [`TooManyFields`]: VerifyError::TooManyFields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    /// A declared or required byte-length does not equal the actual
    /// buffer length exactly.
    ///
    /// Reported for fixed-width types, fixed-vectors, and the
    /// total-length header word of offset-table composites.
    LengthMismatch { required: usize, actual: usize },
    /// The buffer is smaller than the minimum needed to read a header.
    TooShort { minimum: usize, actual: usize },
    /// The first offset word is not 4-byte aligned, or falls below the
    /// minimal 8-byte header.
    ///
    /// The first offset is doubly load-bearing: it fixes both where
    /// item 0 starts and how many items exist, so no externally-claimed
    /// count is ever consulted instead.
    InvalidOffset { offset: u32 },
    /// A table encodes fewer fields than its schema declares.
    TooFewFields { required: usize, actual: usize },
    /// A table encodes more fields than its schema declares, under
    /// strict (non-compatible) validation.
    TooManyFields { required: usize, actual: usize },
    /// The first offset points past the declared total length.
    OffsetExceedsLength { offset: u32, total: u32 },
    /// An offset-table entry decreases relative to its predecessor
    /// (the final boundary compared against is the total length).
    NonMonotonicOffset { index: usize, offset: u32, next: u32 },
}

impl Display for VerifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match *self {
            VerifyError::LengthMismatch { required, actual } => {
                write!(
                    f,
                    "invalid data length: required {required}, actual {actual}"
                )
            }
            VerifyError::TooShort { minimum, actual } => {
                write!(
                    f,
                    "buffer of {actual} bytes is shorter than the minimal header of {minimum} bytes"
                )
            }
            VerifyError::InvalidOffset { offset } => {
                write!(f, "invalid first offset: {offset}")
            }
            VerifyError::TooFewFields { required, actual } => {
                write!(
                    f,
                    "item count not enough: required {required}, actual {actual}"
                )
            }
            VerifyError::TooManyFields { required, actual } => {
                write!(
                    f,
                    "item count is more than required: required {required}, actual {actual}"
                )
            }
            VerifyError::OffsetExceedsLength { offset, total } => {
                write!(
                    f,
                    "first offset {offset} is larger than total length {total}"
                )
            }
            VerifyError::NonMonotonicOffset {
                index,
                offset,
                next,
            } => {
                write!(
                    f,
                    "offset at index {index}: {offset} is larger than offset at index {}: {next}",
                    index + 1
                )
            }
        }
    }
}

impl Error for VerifyError {}

/// Type alias for Result with an error type of [`VerifyError`]
///
/// Most validation-engine functions and the fallible view accessors
/// have a return type of `VerifyResult<T>` for various `T`.
pub type VerifyResult<T> = std::result::Result<T, VerifyError>;
