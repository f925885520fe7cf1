//! Serializers for every layout kind
//!
//! Encoding is structurally inductive over a [`Layout`] descriptor and
//! a [`Value`] of matching shape: sub-values serialize first, and the
//! composite layouts prepend the header their wire form requires.
//! Fixed-width leaves are written as-is (the encoding of an `n`-byte
//! leaf *is* its `n` bytes), fixed vectors gain a 4-byte count, and
//! dynamic vectors and tables gain an offset table sized from their
//! already-encoded items.
//!
//! Byte-vectors (fixed vectors of one-byte elements) additionally
//! accept their payload in packed form, as a single
//! [`Value::Bytes`] leaf whose length is the item count; the itemized
//! [`Value::Seq`] form produces identical bytes.
//!
//! All serializers are generic over [`Target`], and [`encoded_len`]
//! predicts the exact output size without allocating, so [`encode`] can
//! reserve its output buffer up front and fill it without reallocation.

use crate::buffer::Buffer;
use crate::error::{EncodeResult, KindError, LengthError, WidthError};
use crate::internal::offset::header_size;
use crate::schema::{Field, Layout};
use crate::target::Target;
use crate::value::Value;

/// Maximum encoded size of any offset-table or fixed-vector composite:
/// every header word is a `u32`.
const MAX_HEADER_VALUE: usize = u32::MAX as usize;

/// Serializes `value` against `layout` into a fresh [`Buffer`].
///
/// The output is sized with [`encoded_len`] before writing, so the
/// buffer is filled without reallocation.
///
/// # Errors
///
/// Fails with the [`EncodeError`](crate::error::EncodeError) produced
/// by the first constraint violation: a wrong-width fixed leaf, a
/// wrong-arity struct or table, a value shape that does not match the
/// descriptor kind, or a composite too large for its 4-byte header.
pub fn encode(layout: &Layout, value: &Value) -> EncodeResult<Buffer> {
    let mut buf: Vec<u8> = Target::create();
    buf.anticipate(encoded_len(layout, value)?);
    let _ = write_value(layout, value, &mut buf)?;
    Ok(Buffer::from_vec(buf))
}

/// Serializes the canonical default value of `layout` (zeroed leaves,
/// empty vectors, absent options, member-wise defaults).
///
/// # Errors
///
/// Propagates the same errors as [`encode`]; a default value is always
/// well-shaped, so this can fail only for schemas whose defaults exceed
/// the 4-byte header limit.
pub fn encode_default(layout: &Layout) -> EncodeResult<Buffer> {
    encode(layout, &layout.default_value())
}

/// Computes, without allocation, the number of bytes [`encode`] would
/// produce for `value` against `layout`.
///
/// # Errors
///
/// Fails under exactly the width, arity, and shape constraints of
/// [`encode`] itself, so a successful length prediction guarantees a
/// successful encode of the same pair.
pub fn encoded_len(layout: &Layout, value: &Value) -> EncodeResult<usize> {
    match (layout, value) {
        (Layout::Fixed(width), value) => {
            let data = value.as_bytes_leaf()?;
            expect_leaf_width(data, *width)?;
            Ok(*width)
        }
        (Layout::FixedStruct { fields, width }, Value::Seq(members)) => {
            expect_arity(members, fields)?;
            for (field, member) in fields.iter().zip(members) {
                let _ = encoded_len(field.layout(), member)?;
            }
            Ok(*width)
        }
        (Layout::FixVec(element), Value::Bytes(raw)) => {
            expect_byte_vector(element, raw)?;
            Ok(header_size(0) + raw.len())
        }
        (Layout::FixVec(element), Value::Seq(items)) => {
            let mut total = header_size(0);
            for item in items {
                total += encoded_len(element, item)?;
            }
            Ok(total)
        }
        (Layout::DynVec(element), Value::Seq(items)) => {
            let mut total = header_size(items.len());
            for item in items {
                total += encoded_len(element, item)?;
            }
            Ok(total)
        }
        (Layout::Table(fields), Value::Seq(members)) => {
            expect_arity(members, fields)?;
            let mut total = header_size(fields.len());
            for (field, member) in fields.iter().zip(members) {
                total += encoded_len(field.layout(), member)?;
            }
            Ok(total)
        }
        (Layout::Option(_), Value::Absent) => Ok(0),
        (Layout::Option(inner), Value::Present(wrapped)) => encoded_len(inner, wrapped),
        (layout, value) => Err(shape_mismatch(layout, value).into()),
    }
}

/// Appends the serialized bytes of `value` against `layout` to a
/// generic buffer, returning the exact number of bytes written.
///
/// This is the recursive worker behind [`encode`]; it is public so that
/// callers with their own [`Target`] (including the zero-allocation
/// [`ByteCounter`](crate::target::ByteCounter)) can drive serialization
/// directly.
///
/// # Errors
///
/// See [`encode`].
pub fn write_value<U: Target>(layout: &Layout, value: &Value, buf: &mut U) -> EncodeResult<usize> {
    match (layout, value) {
        (Layout::Fixed(width), value) => {
            let data = value.as_bytes_leaf()?;
            expect_leaf_width(data, *width)?;
            Ok(buf.push_all(data))
        }
        (Layout::FixedStruct { fields, width }, Value::Seq(members)) => {
            expect_arity(members, fields)?;
            let mut written = 0usize;
            for (field, member) in fields.iter().zip(members) {
                written += write_value(field.layout(), member, buf)?;
            }
            debug_assert_eq!(written, *width);
            Ok(written)
        }
        (Layout::FixVec(element), Value::Bytes(raw)) => {
            expect_byte_vector(element, raw)?;
            let written = buf.push_word(raw.len() as u32) + buf.push_all(raw);
            Ok(written)
        }
        (Layout::FixVec(element), Value::Seq(items)) => {
            if items.len() > MAX_HEADER_VALUE {
                return Err(LengthError::TooLong {
                    limit: MAX_HEADER_VALUE,
                    actual: items.len(),
                }
                .into());
            }
            let mut written = buf.push_word(items.len() as u32);
            for item in items {
                written += write_value(element, item, buf)?;
            }
            Ok(written)
        }
        (Layout::DynVec(element), Value::Seq(items)) => {
            let encoded = encode_items(items.iter().map(|item| (element.as_ref(), item)))?;
            Ok(write_offset_table(&encoded, buf)?)
        }
        (Layout::Table(fields), Value::Seq(members)) => {
            expect_arity(members, fields)?;
            let encoded = encode_items(
                fields
                    .iter()
                    .zip(members)
                    .map(|(field, member)| (field.layout(), member)),
            )?;
            Ok(write_offset_table(&encoded, buf)?)
        }
        (Layout::Option(_), Value::Absent) => Ok(0),
        (Layout::Option(inner), Value::Present(wrapped)) => write_value(inner, wrapped, buf),
        (layout, value) => Err(shape_mismatch(layout, value).into()),
    }
}

/// Serializes each `(layout, value)` pair into its own buffer, in
/// order, for assembly under an offset table.
fn encode_items<'a>(
    pairs: impl Iterator<Item = (&'a Layout, &'a Value)>,
) -> EncodeResult<Vec<Vec<u8>>> {
    let mut encoded = Vec::new();
    for (layout, value) in pairs {
        let mut item: Vec<u8> = Target::create();
        let _ = write_value(layout, value, &mut item)?;
        encoded.push(item);
    }
    Ok(encoded)
}

/// Writes the offset-table wire form for a list of already-encoded
/// items: total length, one start offset per item, then the item bytes.
///
/// A zero-item list degenerates to the 4-byte buffer holding the value
/// 4, which is the canonical empty-collection encoding.
fn write_offset_table<U: Target>(items: &[Vec<u8>], buf: &mut U) -> Result<usize, WidthError> {
    let header = header_size(items.len());
    let total = header + items.iter().map(Vec::len).sum::<usize>();
    if total > MAX_HEADER_VALUE {
        return Err(WidthError::TooWide {
            limit: MAX_HEADER_VALUE,
            actual: total,
        });
    }
    let mut written = buf.push_word(total as u32);
    let mut offset = header;
    for item in items {
        written += buf.push_word(offset as u32);
        offset += item.len();
    }
    for item in items {
        written += buf.push_all(item);
    }
    debug_assert_eq!(written, total);
    Ok(written)
}

/// Admits the packed form of a byte-vector: a `Bytes` value may stand
/// in for a fixed-vector only when the element width is exactly one
/// byte, in which case the payload length is the item count.
fn expect_byte_vector(element: &Layout, raw: &[u8]) -> EncodeResult<()> {
    if element.fixed_width() != Some(1) {
        return Err(KindError {
            required: "seq",
            actual: "bytes",
        }
        .into());
    }
    if raw.len() > MAX_HEADER_VALUE {
        return Err(LengthError::TooLong {
            limit: MAX_HEADER_VALUE,
            actual: raw.len(),
        }
        .into());
    }
    Ok(())
}

fn expect_leaf_width(data: &[u8], width: usize) -> Result<(), WidthError> {
    if data.len() != width {
        return Err(WidthError::WrongWidth {
            exact: width,
            actual: data.len(),
        });
    }
    Ok(())
}

fn expect_arity(members: &[Value], fields: &[Field]) -> Result<(), LengthError> {
    if members.len() != fields.len() {
        return Err(LengthError::WrongLength {
            exact: fields.len(),
            actual: members.len(),
        });
    }
    Ok(())
}

fn shape_mismatch(layout: &Layout, value: &Value) -> KindError {
    KindError {
        required: layout.kind_name(),
        actual: value.kind_name(),
    }
}
