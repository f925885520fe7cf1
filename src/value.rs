//! Structured values for serialization
//!
//! This module defines [`Value`], the owned tree handed to the encoder
//! alongside a [`Layout`](crate::schema::Layout) descriptor. A value
//! carries shape but no schema: the same `Value::Seq` may serialize as
//! a struct, a fixed vector, a dynamic vector, or a table depending on
//! the descriptor it is encoded against, and the encoder rejects any
//! shape that does not fit.
//!
//! Conversions from the primitive Rust integer types produce the
//! little-endian leaf bytes the wire convention requires; the fallible
//! extractors reverse them with an exact-width check.

#[cfg(feature = "serde_impls")]
use serde::Serialize;

use crate::buffer::Buffer;
use crate::error::{EncodeError, KindError, WidthError};

/// Structured value tree to be serialized against a layout descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// Leaf payload for fixed-width layouts.
    Bytes(Vec<u8>),
    /// Ordered members of a struct or table, or the elements of a
    /// vector.
    Seq(Vec<Value>),
    /// Absent optional.
    Absent,
    /// Present optional wrapping the inner value.
    Present(Box<Value>),
}

#[cfg(feature = "serde_impls")]
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Bytes(data) => serializer.serialize_bytes(data),
            Value::Seq(items) => serializer.collect_seq(items),
            Value::Absent => serializer.serialize_none(),
            Value::Present(inner) => serializer.serialize_some(inner.as_ref()),
        }
    }
}

impl Value {
    /// Constructs a leaf value from anything convertible to owned bytes.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(data.into())
    }

    /// Constructs a sequence value from its ordered members.
    #[must_use]
    pub fn seq(items: Vec<Value>) -> Self {
        Value::Seq(items)
    }

    /// Wraps a value as a present optional.
    #[must_use]
    pub fn some(inner: Value) -> Self {
        Value::Present(Box::new(inner))
    }

    /// Returns a static name for the shape of this value, for use in
    /// diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Bytes(_) => "bytes",
            Value::Seq(_) => "seq",
            Value::Absent => "absent",
            Value::Present(_) => "present",
        }
    }

    /// Returns the leaf bytes of this value.
    ///
    /// # Errors
    ///
    /// Returns [`KindError`] if the value is not a [`Bytes`](Value::Bytes)
    /// leaf.
    pub fn as_bytes_leaf(&self) -> Result<&[u8], KindError> {
        match self {
            Value::Bytes(data) => Ok(data),
            other => Err(KindError {
                required: "bytes",
                actual: other.kind_name(),
            }),
        }
    }
}

macro_rules! impl_uint_value {
    ( $( $uint:ty ),+ ) => {
        $(
            impl From<$uint> for Value {
                /// Converts to the little-endian leaf encoding of this
                /// integer type.
                fn from(v: $uint) -> Self {
                    Value::Bytes(v.to_le_bytes().to_vec())
                }
            }

            impl TryFrom<&Value> for $uint {
                type Error = EncodeError;

                /// Reads back a little-endian integer leaf, requiring
                /// the exact byte-width of the target type.
                fn try_from(value: &Value) -> Result<Self, Self::Error> {
                    const WIDTH: usize = std::mem::size_of::<$uint>();
                    let data = value.as_bytes_leaf()?;
                    let raw: [u8; WIDTH] =
                        data.try_into().map_err(|_| WidthError::WrongWidth {
                            exact: WIDTH,
                            actual: data.len(),
                        })?;
                    Ok(<$uint>::from_le_bytes(raw))
                }
            }
        )+
    };
}

impl_uint_value!(u8, u16, u32, u64);

impl From<Vec<u8>> for Value {
    fn from(data: Vec<u8>) -> Self {
        Value::Bytes(data)
    }
}

impl From<&'_ [u8]> for Value {
    fn from(data: &'_ [u8]) -> Self {
        Value::Bytes(data.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Value {
    fn from(data: [u8; N]) -> Self {
        Value::Bytes(data.to_vec())
    }
}

impl<const N: usize> From<&'_ [u8; N]> for Value {
    fn from(data: &'_ [u8; N]) -> Self {
        Value::Bytes(data.to_vec())
    }
}

impl From<Buffer> for Value {
    fn from(buf: Buffer) -> Self {
        Value::Bytes(buf.into_vec())
    }
}

impl From<Option<Value>> for Value {
    /// Lifts an `Option` into the optional value shape: `None` becomes
    /// [`Absent`](Value::Absent) and `Some(v)` becomes
    /// [`Present(v)`](Value::Present).
    fn from(opt: Option<Value>) -> Self {
        match opt {
            Some(inner) => Value::some(inner),
            None => Value::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint_leaves_are_little_endian() {
        assert_eq!(Value::from(7u32), Value::Bytes(vec![7, 0, 0, 0]));
        assert_eq!(Value::from(0x0102u16), Value::Bytes(vec![0x02, 0x01]));
        assert_eq!(
            Value::from(u64::MAX),
            Value::Bytes(vec![0xff; 8])
        );
    }

    #[test]
    fn uint_extraction_round_trips() {
        let v = Value::from(0xdead_beefu32);
        assert_eq!(u32::try_from(&v), Ok(0xdead_beefu32));
    }

    #[test]
    fn uint_extraction_requires_exact_width() {
        let v = Value::Bytes(vec![1, 2, 3]);
        assert_eq!(
            u32::try_from(&v),
            Err(EncodeError::Width(WidthError::WrongWidth {
                exact: 4,
                actual: 3
            }))
        );
        let seq = Value::Seq(vec![]);
        assert!(matches!(u8::try_from(&seq), Err(EncodeError::Kind(_))));
    }

    #[test]
    fn option_lift() {
        assert_eq!(Value::from(None), Value::Absent);
        assert_eq!(
            Value::from(Some(Value::from(1u8))),
            Value::some(Value::Bytes(vec![1]))
        );
    }
}
