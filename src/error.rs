//! Encode-side error types
//!
//! This module contains the error hierarchy reported by the serialization
//! half of the crate: [`WidthError`] for byte-width constraint violations,
//! [`LengthError`] for element-count constraint violations, and [`KindError`]
//! for mismatches between the shape of a structured value and the descriptor
//! it is being encoded against.
//!
//! The umbrella type [`EncodeError`] groups all three so that recursive
//! serializers can propagate any of them through a single `Result` channel.
//!
//! Structural failures detected while *reading* buffers are a separate
//! concern, covered by [`VerifyError`](crate::verify::error::VerifyError).

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Enumerated error type for failures related to schema constructs
/// that impose a check on the byte-width of their prospective values.
///
/// Structurally similar to [`LengthError`], an analogous error-type
/// relating to the number of elements in a collection-type, rather than
/// the number of bytes in a potentially opaque schema type.
#[derive(Clone, PartialEq, PartialOrd, Eq, Ord, Debug)]
pub enum WidthError {
    /// Restriction on maximum byte-width exceeded
    TooWide { limit: usize, actual: usize },
    /// Requirement of precise byte-width not satisfied
    WrongWidth { exact: usize, actual: usize },
}

impl Display for WidthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WidthError::TooWide { limit, actual } => {
                write!(f, "{actual}-byte value exceeded limit of {limit} bytes")
            }
            WidthError::WrongWidth { exact, actual } => {
                write!(
                    f,
                    "{actual}-byte value violated requirement of {exact} bytes"
                )
            }
        }
    }
}

impl Error for WidthError {}

/// Enumerated error type for failures related to schema constructs
/// that impose a check on the element-count of their prospective
/// values, which are typically collection types.
///
/// Structurally similar to [`WidthError`], an analogous error-type
/// relating to the byte-width of a potentially opaque schema type,
/// rather than the number of elements in a collection-type.
#[derive(Clone, PartialEq, PartialOrd, Eq, Ord, Debug)]
pub enum LengthError {
    /// Restriction on maximum element-count exceeded
    TooLong { limit: usize, actual: usize },
    /// Requirement of precise element-count not satisfied
    WrongLength { exact: usize, actual: usize },
}

impl Display for LengthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LengthError::TooLong { limit, actual } => {
                write!(
                    f,
                    "{actual}-element value exceeded limit of {limit} elements"
                )
            }
            LengthError::WrongLength { exact, actual } => {
                write!(
                    f,
                    "{actual}-element value violated requirement of {exact} elements"
                )
            }
        }
    }
}

impl Error for LengthError {}

/// Error type representing a mismatch between the structural kind of
/// a value and the kind that a context requires.
///
/// This is reported both when a structured value of the wrong shape is
/// handed to a serializer (e.g. a byte-sequence where a table was
/// declared), and when a descriptor tree is constructed with a
/// variable-width member in a position that only admits fixed-width
/// layouts.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct KindError {
    /// Kind-name the context required
    pub required: &'static str,
    /// Kind-name actually encountered
    pub actual: &'static str,
}

impl Display for KindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "kind `{}` found where `{}` was required",
            self.actual, self.required
        )
    }
}

impl Error for KindError {}

/// Enumeration type over all errors that may be encountered while
/// serializing a structured value against a layout descriptor.
///
/// Every variant wraps one of the narrower error types defined in this
/// module; the corresponding `From` implementations allow serializer
/// internals to return the narrow type and lift it with `?`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EncodeError {
    /// A byte-width constraint was violated (fixed-width leaf or
    /// composite of the wrong size, or an encoding too large for its
    /// 4-byte header).
    Width(WidthError),
    /// An element-count constraint was violated (wrong member arity for
    /// a struct or table, or an over-long vector).
    Length(LengthError),
    /// The shape of the value does not match the descriptor kind.
    Kind(KindError),
}

impl From<WidthError> for EncodeError {
    fn from(err: WidthError) -> Self {
        Self::Width(err)
    }
}

impl From<LengthError> for EncodeError {
    fn from(err: LengthError) -> Self {
        Self::Length(err)
    }
}

impl From<KindError> for EncodeError {
    fn from(err: KindError) -> Self {
        Self::Kind(err)
    }
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::Width(err) => Display::fmt(err, f),
            EncodeError::Length(err) => Display::fmt(err, f),
            EncodeError::Kind(err) => Display::fmt(err, f),
        }
    }
}

impl Error for EncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EncodeError::Width(err) => Some(err),
            EncodeError::Length(err) => Some(err),
            EncodeError::Kind(err) => Some(err),
        }
    }
}

/// Type alias for Result with an error type of [`EncodeError`]
pub type EncodeResult<T> = std::result::Result<T, EncodeError>;
