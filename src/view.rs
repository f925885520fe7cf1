//! Zero-copy decoded views
//!
//! A [`View`] is a typed window over a byte buffer: a borrowed slice
//! paired with the [`Layout`] it is claimed to encode. Views own no
//! storage and are created freely; field and item accessors return
//! further views over sub-ranges of the same backing buffer, lazily —
//! no accessor ever decodes more than the header words it needs.
//!
//! # Two-phase decoding
//!
//! Construction and validation are separate steps:
//!
//! - [`View::decode_checked`] builds a view and runs the full recursive
//!   validation before returning it.
//! - [`View::decode_unchecked`] builds the view only. Every check is
//!   deferred to a later explicit [`validate`](View::validate) call or
//!   to the moment an accessor actually reads the malformed range; a
//!   caller that skips validation and never touches a corrupt field may
//!   never observe the corruption. This is a documented
//!   performance/safety trade-off, not an error-handling gap.
//!
//! Accessors on unchecked views still bound every slice they hand out,
//! so no view ever reads past its backing buffer; what they skip is the
//! recursive well-formedness of ranges they have not been asked for.

use crate::buffer::AsBytes;
use crate::internal::offset::{header_size, read_word, WORD};
use crate::schema::Layout;
use crate::value::Value;
use crate::verify::error::{VerifyError, VerifyResult};
use crate::verify::{fix_vec_size, offset_table_count, validate};

/// Typed, borrowed window over one encoded value.
///
/// The view is bounded by the lifetime of both the backing buffer and
/// the layout descriptor; it holds no independent storage.
#[derive(Clone, Copy, Debug)]
pub struct View<'a> {
    layout: &'a Layout,
    data: &'a [u8],
}

impl<'a> View<'a> {
    /// Wraps `data` as a view of `layout` without any validation.
    ///
    /// See the [module documentation](self) for the checks this defers.
    #[inline]
    #[must_use]
    pub fn decode_unchecked(layout: &'a Layout, data: &'a [u8]) -> Self {
        Self { layout, data }
    }

    /// Wraps `data` as a view of `layout` after validating the entire
    /// encoding recursively.
    ///
    /// `compatible` tolerates extra trailing table fields beyond each
    /// table's declared schema; see [`validate`](crate::verify::validate).
    ///
    /// # Errors
    ///
    /// Propagates the first [`VerifyError`] encountered, fail-fast.
    pub fn decode_checked(
        layout: &'a Layout,
        data: &'a [u8],
        compatible: bool,
    ) -> VerifyResult<Self> {
        validate(layout, data, compatible)?;
        Ok(Self { layout, data })
    }

    /// Re-runs full recursive validation of this view's range.
    ///
    /// Validation is a pure read: calling it any number of times never
    /// changes the outcome nor the buffer.
    pub fn validate(&self, compatible: bool) -> VerifyResult<()> {
        validate(self.layout, self.data, compatible)
    }

    /// Returns the exact byte range this view covers.
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the layout descriptor this view is typed by.
    #[inline]
    #[must_use]
    pub fn layout(&self) -> &'a Layout {
        self.layout
    }

    /// Returns the byte at position `i` of this view's range, if any.
    ///
    /// This is the byte-indexed access of fixed-width leaves, but is
    /// defined over any view's raw range.
    #[inline]
    #[must_use]
    pub fn byte_at(&self, i: usize) -> Option<u8> {
        self.data.get(i).copied()
    }

    /// Returns the logical length of this view.
    ///
    /// The meaning is kind-dependent: the data-derived item count for
    /// vectors and tables (recomputed from the header on every call,
    /// never cached), `1` or `0` for present/absent options, and the
    /// byte-length of the range for fixed-width kinds.
    ///
    /// # Errors
    ///
    /// For vectors and tables, fails if the header words cannot be
    /// read or the first offset is malformed.
    pub fn len(&self) -> VerifyResult<usize> {
        match self.layout {
            Layout::Fixed(_) | Layout::FixedStruct { .. } => Ok(self.data.len()),
            Layout::FixVec(_) => {
                if self.data.len() < WORD {
                    return Err(VerifyError::TooShort {
                        minimum: WORD,
                        actual: self.data.len(),
                    });
                }
                Ok(read_word(self.data, 0) as usize)
            }
            Layout::DynVec(_) | Layout::Table(_) => offset_table_count(self.data),
            Layout::Option(_) => Ok(usize::from(!self.data.is_empty())),
        }
    }

    /// Returns `true` if [`len`](Self::len) is `Ok(0)`.
    pub fn is_empty(&self) -> VerifyResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Returns the item or member at position `index`, or `None` when
    /// the index is at or beyond the collection's length.
    ///
    /// For tables, only declared fields are addressable: trailing
    /// compatible-mode extras have no descriptor and yield `None`.
    /// The returned view is *bounded* (it can never read outside its
    /// parent) but not validated; its own internal structure is checked
    /// when it is accessed or explicitly validated.
    ///
    /// # Errors
    ///
    /// Fails if the header words or offsets needed to locate the item
    /// are themselves malformed.
    ///
    /// # Panics
    ///
    /// Panics if this view's layout is a fixed leaf or an option, which
    /// have no positional members.
    pub fn at(&self, index: usize) -> VerifyResult<Option<View<'a>>> {
        match self.layout {
            Layout::Fixed(_) | Layout::Option(_) => {
                panic!(
                    "`at` is not defined for `{}` layouts",
                    self.layout.kind_name()
                )
            }
            Layout::FixedStruct { fields, width } => {
                let field = match fields.get(index) {
                    Some(field) => field,
                    None => return Ok(None),
                };
                if self.data.len() != *width {
                    return Err(VerifyError::LengthMismatch {
                        required: *width,
                        actual: self.data.len(),
                    });
                }
                let start: usize = fields[..index]
                    .iter()
                    .map(|f| f.layout().fixed_width().unwrap_or(0))
                    .sum();
                let end = start + field.layout().fixed_width().unwrap_or(0);
                Ok(Some(View {
                    layout: field.layout(),
                    data: &self.data[start..end],
                }))
            }
            Layout::FixVec(element) => {
                let element_size = element.fixed_width().unwrap_or(0);
                let count = self.len()?;
                if index >= count {
                    return Ok(None);
                }
                // the whole-buffer equation guards the slice below
                let required = fix_vec_size(self.data, element_size)?;
                if self.data.len() != required {
                    return Err(VerifyError::LengthMismatch {
                        required,
                        actual: self.data.len(),
                    });
                }
                let start = WORD + index * element_size;
                Ok(Some(View {
                    layout: element.as_ref(),
                    data: &self.data[start..start + element_size],
                }))
            }
            Layout::DynVec(element) => {
                Ok(self.offset_item(index)?.map(|data| View {
                    layout: element.as_ref(),
                    data,
                }))
            }
            Layout::Table(fields) => {
                let field = match fields.get(index) {
                    Some(field) => field,
                    None => return Ok(None),
                };
                Ok(self.offset_item(index)?.map(|data| View {
                    layout: field.layout(),
                    data,
                }))
            }
        }
    }

    /// Returns the member of a struct or table by declared field name.
    ///
    /// # Errors
    ///
    /// Fails if the surrounding composite is structurally malformed, or
    /// with [`VerifyError::TooFewFields`] if the buffer encodes fewer
    /// fields than the schema requires to reach `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a declared field of this view's layout;
    /// an undeclared name is schema misuse, not a data error.
    pub fn field(&self, name: &str) -> VerifyResult<View<'a>> {
        let index = match self.layout.field_index(name) {
            Some(index) => index,
            None => panic!(
                "no field `{name}` declared in `{}` layout",
                self.layout.kind_name()
            ),
        };
        match self.at(index)? {
            Some(view) => Ok(view),
            None => {
                // only reachable for tables whose data carries fewer
                // items than the schema declares
                let fields = self.layout.fields().map_or(0, <[_]>::len);
                Err(VerifyError::TooFewFields {
                    required: fields,
                    actual: self.len()?,
                })
            }
        }
    }

    /// Returns `true` if this option view holds a value (its range is
    /// non-empty).
    ///
    /// # Panics
    ///
    /// Panics if this view's layout is not an option.
    #[must_use]
    pub fn has_value(&self) -> bool {
        match self.layout {
            Layout::Option(_) => !self.data.is_empty(),
            other => panic!("`has_value` is not defined for `{}` layouts", other.kind_name()),
        }
    }

    /// Re-interprets the entire range of this option view as its inner
    /// type, or `None` when absent. There is no framing to strip.
    ///
    /// # Panics
    ///
    /// Panics if this view's layout is not an option.
    #[must_use]
    pub fn value(&self) -> Option<View<'a>> {
        match self.layout {
            Layout::Option(inner) => {
                if self.data.is_empty() {
                    None
                } else {
                    Some(View {
                        layout: inner.as_ref(),
                        data: self.data,
                    })
                }
            }
            other => panic!("`value` is not defined for `{}` layouts", other.kind_name()),
        }
    }

    /// Returns the number of fields the underlying table data actually
    /// encodes, which may exceed the declared schema under compatible
    /// validation.
    ///
    /// # Errors
    ///
    /// Fails if the header words are malformed.
    ///
    /// # Panics
    ///
    /// Panics if this view's layout is not a table.
    pub fn field_count(&self) -> VerifyResult<usize> {
        match self.layout {
            Layout::Table(_) => offset_table_count(self.data),
            other => panic!(
                "`field_count` is not defined for `{}` layouts",
                other.kind_name()
            ),
        }
    }

    /// Returns the number of encoded fields beyond the declared schema
    /// (zero for an exact-arity buffer).
    ///
    /// # Errors
    ///
    /// Fails if the header words are malformed.
    ///
    /// # Panics
    ///
    /// Panics if this view's layout is not a table.
    pub fn extra_field_count(&self) -> VerifyResult<usize> {
        let declared = self.layout.fields().map_or(0, <[_]>::len);
        Ok(self.field_count()?.saturating_sub(declared))
    }

    /// Reads this view's range as a little-endian `u8`.
    ///
    /// # Errors
    ///
    /// Fails with `LengthMismatch` unless the range is exactly 1 byte.
    pub fn to_u8(&self) -> VerifyResult<u8> {
        Ok(u8::from_le_bytes(self.exact_bytes::<1>()?))
    }

    /// Reads this view's range as a little-endian `u16`.
    ///
    /// # Errors
    ///
    /// Fails with `LengthMismatch` unless the range is exactly 2 bytes.
    pub fn to_u16(&self) -> VerifyResult<u16> {
        Ok(u16::from_le_bytes(self.exact_bytes::<2>()?))
    }

    /// Reads this view's range as a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Fails with `LengthMismatch` unless the range is exactly 4 bytes.
    pub fn to_u32(&self) -> VerifyResult<u32> {
        Ok(u32::from_le_bytes(self.exact_bytes::<4>()?))
    }

    /// Reads this view's range as a little-endian `u64`.
    ///
    /// # Errors
    ///
    /// Fails with `LengthMismatch` unless the range is exactly 8 bytes.
    pub fn to_u64(&self) -> VerifyResult<u64> {
        Ok(u64::from_le_bytes(self.exact_bytes::<8>()?))
    }

    /// Deep-decodes this view into an owned [`Value`] tree.
    ///
    /// This is the explicit copying path out of the zero-copy world.
    /// For tables read in compatible mode, only declared fields are
    /// captured: trailing extras have no descriptor to decode against
    /// and are dropped (re-encoding the value therefore produces the
    /// strict-arity form).
    ///
    /// # Errors
    ///
    /// Fails on any structural error in the ranges it traverses.
    pub fn to_value(&self) -> VerifyResult<Value> {
        match self.layout {
            Layout::Fixed(width) => {
                if self.data.len() != *width {
                    return Err(VerifyError::LengthMismatch {
                        required: *width,
                        actual: self.data.len(),
                    });
                }
                Ok(Value::Bytes(self.data.to_vec()))
            }
            Layout::FixedStruct { fields, .. } | Layout::Table(fields) => {
                let mut members = Vec::with_capacity(fields.len());
                for index in 0..fields.len() {
                    match self.at(index)? {
                        Some(member) => members.push(member.to_value()?),
                        None => {
                            return Err(VerifyError::TooFewFields {
                                required: fields.len(),
                                actual: index,
                            })
                        }
                    }
                }
                Ok(Value::Seq(members))
            }
            Layout::FixVec(element) => {
                let element_size = element.fixed_width().unwrap_or(0);
                let required = fix_vec_size(self.data, element_size)?;
                if self.data.len() != required {
                    return Err(VerifyError::LengthMismatch {
                        required,
                        actual: self.data.len(),
                    });
                }
                if element_size == 1 {
                    // byte-vectors canonically decode to their packed form
                    return Ok(Value::Bytes(self.data[WORD..].to_vec()));
                }
                let count = self.len()?;
                let mut items = Vec::with_capacity(count);
                for index in 0..count {
                    match self.at(index)? {
                        Some(item) => items.push(item.to_value()?),
                        None => break,
                    }
                }
                Ok(Value::Seq(items))
            }
            Layout::DynVec(_) => {
                let count = self.len()?;
                let mut items = Vec::with_capacity(count);
                for index in 0..count {
                    match self.at(index)? {
                        Some(item) => items.push(item.to_value()?),
                        None => break,
                    }
                }
                Ok(Value::Seq(items))
            }
            Layout::Option(_) => match self.value() {
                Some(inner) => Ok(Value::some(inner.to_value()?)),
                None => Ok(Value::Absent),
            },
        }
    }

    /// Slices the item range of an offset-table composite, reading only
    /// the header words involved: the item's own offset and either the
    /// next offset or the end of the buffer for the final item.
    fn offset_item(&self, index: usize) -> VerifyResult<Option<&'a [u8]>> {
        let count = offset_table_count(self.data)?;
        if index >= count {
            return Ok(None);
        }
        // count >= 1 here, so the buffer holds at least count+1 words
        // only if the encoding is honest; bound every read explicitly.
        let words_end = header_size(count);
        if self.data.len() < words_end {
            return Err(VerifyError::TooShort {
                minimum: words_end,
                actual: self.data.len(),
            });
        }
        let start = read_word(self.data, WORD + index * WORD) as usize;
        let end = if index + 1 < count {
            read_word(self.data, WORD + (index + 1) * WORD) as usize
        } else {
            self.data.len()
        };
        if end > self.data.len() {
            return Err(VerifyError::OffsetExceedsLength {
                offset: end as u32,
                total: self.data.len() as u32,
            });
        }
        if start > end {
            return Err(VerifyError::NonMonotonicOffset {
                index,
                offset: start as u32,
                next: end as u32,
            });
        }
        Ok(Some(&self.data[start..end]))
    }

    fn exact_bytes<const N: usize>(&self) -> VerifyResult<[u8; N]> {
        match self.data.try_into() {
            Ok(arr) => Ok(arr),
            Err(_) => Err(VerifyError::LengthMismatch {
                required: N,
                actual: self.data.len(),
            }),
        }
    }
}

impl AsBytes for View<'_> {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;
    use crate::schema::Field;

    fn bytes_layout() -> Layout {
        Layout::fix_vec(Layout::Fixed(1))
    }

    fn record() -> Layout {
        Layout::table(vec![
            Field::new("id", Layout::Fixed(4)),
            Field::new("body", bytes_layout()),
        ])
    }

    fn record_buf() -> Vec<u8> {
        encode(
            &record(),
            &Value::Seq(vec![
                Value::from(7u32),
                Value::from(b"ab".as_slice()),
            ]),
        )
        .unwrap()
        .into_vec()
    }

    #[test]
    fn checked_decode_accepts_and_reads_fields() {
        let layout = record();
        let raw = record_buf();
        let view = View::decode_checked(&layout, &raw, false).unwrap();
        assert_eq!(view.field("id").unwrap().to_u32(), Ok(7));
        let body = view.field("body").unwrap();
        assert_eq!(body.len(), Ok(2));
        assert_eq!(body.raw(), &[2, 0, 0, 0, b'a', b'b']);
        assert_eq!(body.at(0).unwrap().unwrap().to_u8(), Ok(b'a'));
        assert_eq!(body.at(1).unwrap().unwrap().byte_at(0), Some(b'b'));
        assert!(body.at(2).unwrap().is_none());
    }

    #[test]
    fn unchecked_decode_defers_errors_to_access() {
        let layout = record();
        let mut raw = record_buf();
        // corrupt the id field's start offset to be unaligned
        raw[4] = 13;
        let view = View::decode_unchecked(&layout, &raw);
        assert_eq!(
            view.validate(false),
            Err(VerifyError::InvalidOffset { offset: 13 })
        );
        assert_eq!(
            view.field("id").unwrap_err(),
            VerifyError::InvalidOffset { offset: 13 }
        );
    }

    #[test]
    fn round_trip_every_kind() {
        let layout = Layout::table(vec![
            Field::new(
                "header",
                Layout::fixed_struct(vec![
                    Field::new("tag", Layout::Fixed(1)),
                    Field::new("id", Layout::Fixed(4)),
                ]),
            ),
            Field::new("body", bytes_layout()),
            Field::new("chunks", Layout::dyn_vec(bytes_layout())),
            Field::new("note", Layout::option(bytes_layout())),
        ]);
        let value = Value::Seq(vec![
            Value::Seq(vec![Value::from(1u8), Value::from(0xdead_beefu32)]),
            Value::from(b"hello".as_slice()),
            Value::Seq(vec![
                Value::from(b"".as_slice()),
                Value::from(b"xy".as_slice()),
            ]),
            Value::some(Value::from(b"n".as_slice())),
        ]);
        let buf = encode(&layout, &value).unwrap();
        let view = View::decode_checked(&layout, &buf, false).unwrap();
        assert_eq!(view.to_value(), Ok(value));
    }

    #[test]
    fn empty_collections_round_trip() {
        for layout in [Layout::dyn_vec(bytes_layout()), Layout::table(vec![])] {
            let buf = encode(&layout, &Value::Seq(vec![])).unwrap();
            assert_eq!(&buf[..], &[4, 0, 0, 0]);
            let view = View::decode_checked(&layout, &buf, false).unwrap();
            assert_eq!(view.len(), Ok(0));
            assert_eq!(view.to_value(), Ok(Value::Seq(vec![])));
        }
        // a byte-vector canonically decodes to its packed form
        let layout = bytes_layout();
        let buf = encode(&layout, &Value::Seq(vec![])).unwrap();
        assert_eq!(&buf[..], &[0, 0, 0, 0]);
        let view = View::decode_checked(&layout, &buf, false).unwrap();
        assert_eq!(view.len(), Ok(0));
        assert_eq!(view.to_value(), Ok(Value::Bytes(vec![])));
    }

    #[test]
    fn option_round_trip_and_ambiguity() {
        let layout = Layout::option(bytes_layout());
        let absent = encode(&layout, &Value::Absent).unwrap();
        let view = View::decode_checked(&layout, &absent, false).unwrap();
        assert!(!view.has_value());
        assert_eq!(view.to_value(), Ok(Value::Absent));

        let present = encode(&layout, &Value::some(Value::from(b"z".as_slice()))).unwrap();
        let view = View::decode_checked(&layout, &present, false).unwrap();
        assert!(view.has_value());
        assert_eq!(view.value().unwrap().len(), Ok(1));

        // a zero-width inner encoding cannot be told apart from absence
        let zero = Layout::option(Layout::Fixed(0));
        let some_empty = encode(&zero, &Value::some(Value::Bytes(vec![]))).unwrap();
        let view = View::decode_checked(&zero, &some_empty, false).unwrap();
        assert!(!view.has_value());
        assert_eq!(view.to_value(), Ok(Value::Absent));
    }

    #[test]
    fn vector_length_is_rederived_per_call() {
        let layout = Layout::dyn_vec(bytes_layout());
        let buf = encode(
            &layout,
            &Value::Seq(vec![Value::from(b"a".as_slice()); 3]),
        )
        .unwrap();
        let view = View::decode_unchecked(&layout, &buf);
        assert_eq!(view.len(), Ok(3));
        assert_eq!(view.len(), Ok(3));
    }

    #[test]
    fn compatible_extras_are_counted_but_not_addressable() {
        let declared = Layout::table(vec![Field::new("a", Layout::Fixed(1))]);
        let wider = Layout::table(vec![
            Field::new("a", Layout::Fixed(1)),
            Field::new("b", Layout::Fixed(2)),
        ]);
        let buf = encode(
            &wider,
            &Value::Seq(vec![Value::from(1u8), Value::from(7u16)]),
        )
        .unwrap();

        let view = View::decode_checked(&declared, &buf, true).unwrap();
        assert_eq!(view.field_count(), Ok(2));
        assert_eq!(view.extra_field_count(), Ok(1));
        assert_eq!(view.field("a").unwrap().to_u8(), Ok(1));
        assert!(view.at(1).unwrap().is_none());
        // deep decode keeps declared fields only
        assert_eq!(view.to_value(), Ok(Value::Seq(vec![Value::Bytes(vec![1])])));
    }

    #[test]
    fn fixed_struct_members_slice_by_cumulative_offset() {
        let layout = Layout::fixed_struct(vec![
            Field::new("tag", Layout::Fixed(1)),
            Field::new("id", Layout::Fixed(4)),
            Field::new("checksum", Layout::Fixed(2)),
        ]);
        let raw = [9u8, 1, 0, 0, 0, 0xaa, 0xbb];
        let view = View::decode_checked(&layout, &raw, false).unwrap();
        assert_eq!(view.field("tag").unwrap().to_u8(), Ok(9));
        assert_eq!(view.field("id").unwrap().to_u32(), Ok(1));
        assert_eq!(view.field("checksum").unwrap().raw(), &[0xaa, 0xbb]);
    }

    #[test]
    #[should_panic(expected = "no field `missing`")]
    fn undeclared_field_name_is_schema_misuse() {
        let layout = record();
        let raw = record_buf();
        let view = View::decode_unchecked(&layout, &raw);
        let _ = view.field("missing");
    }
}
