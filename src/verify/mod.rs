//! Structural validation engine
//!
//! This module is the dispatch point for recursive validation: given a
//! buffer and the [`Layout`] it is claimed to encode, [`validate`]
//! selects the check matching the descriptor kind and recurses into
//! every sub-range the layout declares.
//!
//! Validation is a pure read over the buffer: it either returns `Ok`
//! (and is idempotent — re-running it can change nothing) or fails fast
//! with the [`VerifyError`](error::VerifyError) closest to the
//! malformed bytes, with no partial result.
//!
//! # Compatible mode
//!
//! The `compatible` flag is a first-class parameter. It relaxes exactly
//! one check: a table may carry more trailing fields than its schema
//! declares (forward-compatible schema extension). Such extra fields
//! have no descriptor by definition, so they receive boundary checks
//! from the offset table but no content validation. The flag propagates
//! through nested composites so that an embedded table is read under
//! the same regime as its root; vectors derive their own arity from the
//! data and always run the shared algorithm with an expected count of
//! zero.

pub mod error;

use crate::internal::offset::{header_size, read_word, verify_and_extract_offsets, WORD};
use crate::schema::Layout;

use self::error::{VerifyError, VerifyResult};

/// Validates that `data` is a well-formed encoding of `layout`,
/// recursing into every declared sub-range.
///
/// `compatible` tolerates extra trailing table fields; see the
/// [module documentation](self).
///
/// # Errors
///
/// Fails with the [`VerifyError`] produced by the first violated check,
/// in buffer order, outermost composite first.
pub fn validate(layout: &Layout, data: &[u8], compatible: bool) -> VerifyResult<()> {
    match layout {
        Layout::Fixed(width) => expect_width(data, *width),
        Layout::FixedStruct { fields, width } => {
            expect_width(data, *width)?;
            let mut start = 0usize;
            for field in fields {
                // members are fixed-width by construction
                let w = field.layout().fixed_width().unwrap_or(0);
                validate(field.layout(), &data[start..start + w], compatible)?;
                start += w;
            }
            Ok(())
        }
        Layout::FixVec(element) => {
            let element_size = element.fixed_width().unwrap_or(0);
            expect_width(data, fix_vec_size(data, element_size)?)
        }
        Layout::DynVec(element) => {
            let boundaries = verify_and_extract_offsets(data, 0, true)?;
            for pair in boundaries.windows(2) {
                let (start, end) = (pair[0] as usize, pair[1] as usize);
                validate(element, &data[start..end], compatible)?;
            }
            Ok(())
        }
        Layout::Table(fields) => {
            let boundaries = verify_and_extract_offsets(data, fields.len(), compatible)?;
            for (field, pair) in fields.iter().zip(boundaries.windows(2)) {
                let (start, end) = (pair[0] as usize, pair[1] as usize);
                validate(field.layout(), &data[start..end], compatible)?;
            }
            Ok(())
        }
        Layout::Option(inner) => {
            if data.is_empty() {
                Ok(())
            } else {
                validate(inner, data, compatible)
            }
        }
    }
}

/// Fails with `LengthMismatch` unless the buffer is exactly `required`
/// bytes long.
fn expect_width(data: &[u8], required: usize) -> VerifyResult<()> {
    if data.len() != required {
        return Err(VerifyError::LengthMismatch {
            required,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Computes the exact byte-length a fixed-vector buffer must have,
/// based on its count header and the schema-declared element size.
pub(crate) fn fix_vec_size(data: &[u8], element_size: usize) -> VerifyResult<usize> {
    if data.len() < WORD {
        return Err(VerifyError::TooShort {
            minimum: WORD,
            actual: data.len(),
        });
    }
    let item_count = read_word(data, 0) as usize;
    match item_count
        .checked_mul(element_size)
        .and_then(|bytes| bytes.checked_add(WORD))
    {
        Some(required) => Ok(required),
        // an unrepresentable requirement can never equal a real length
        None => Err(VerifyError::LengthMismatch {
            required: usize::MAX,
            actual: data.len(),
        }),
    }
}

/// Derives the item count an offset-table buffer claims, reading only
/// the header words (no full boundary extraction).
pub(crate) fn offset_table_count(data: &[u8]) -> VerifyResult<usize> {
    if data.len() < WORD {
        return Err(VerifyError::TooShort {
            minimum: WORD,
            actual: data.len(),
        });
    }
    let total_length = read_word(data, 0) as usize;
    if total_length == WORD {
        return Ok(0);
    }
    if data.len() < header_size(1) {
        return Err(VerifyError::TooShort {
            minimum: header_size(1),
            actual: data.len(),
        });
    }
    let first_offset = read_word(data, WORD);
    if first_offset as usize % WORD != 0 || (first_offset as usize) < header_size(1) {
        return Err(VerifyError::InvalidOffset {
            offset: first_offset,
        });
    }
    Ok(first_offset as usize / WORD - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;
    use crate::schema::Field;
    use crate::value::Value;

    fn record() -> Layout {
        Layout::table(vec![
            Field::new("id", Layout::Fixed(4)),
            Field::new("body", Layout::fix_vec(Layout::Fixed(1))),
            Field::new("note", Layout::option(Layout::fix_vec(Layout::Fixed(1)))),
        ])
    }

    fn record_value() -> Value {
        Value::Seq(vec![
            Value::from(7u32),
            Value::from(*b"ab"),
            Value::Absent,
        ])
    }

    #[test]
    fn fixed_width_must_be_exact() {
        let layout = Layout::Fixed(32);
        assert!(validate(&layout, &[0u8; 32], false).is_ok());
        assert_eq!(
            validate(&layout, &[0u8; 31], false),
            Err(VerifyError::LengthMismatch {
                required: 32,
                actual: 31
            })
        );
        assert_eq!(
            validate(&layout, &[0u8; 33], false),
            Err(VerifyError::LengthMismatch {
                required: 32,
                actual: 33
            })
        );
    }

    #[test]
    fn fix_vec_length_equation() {
        let layout = Layout::fix_vec(Layout::Fixed(8));
        // count = 2, 2 * 8 payload bytes
        let mut buf = vec![2u8, 0, 0, 0];
        buf.extend_from_slice(&[0u8; 16]);
        assert!(validate(&layout, &buf, false).is_ok());
        buf.pop();
        assert_eq!(
            validate(&layout, &buf, false),
            Err(VerifyError::LengthMismatch {
                required: 20,
                actual: 19
            })
        );
    }

    #[test]
    fn table_validates_every_declared_field() {
        let layout = record();
        let buf = encode(&layout, &record_value()).unwrap();
        assert!(validate(&layout, &buf, false).is_ok());
        assert!(validate(&layout, &buf, true).is_ok());
    }

    #[test]
    fn corrupt_nested_field_is_detected() {
        let layout = record();
        let buf = encode(&layout, &record_value()).unwrap();
        let mut raw = buf.into_vec();
        // inflate the inner byte-vector's count header without adding payload
        let body_start = read_word(&raw, 2 * WORD) as usize;
        raw[body_start] = 9;
        assert_eq!(
            validate(&layout, &raw, false),
            Err(VerifyError::LengthMismatch {
                required: 13,
                actual: 6
            })
        );
    }

    #[test]
    fn strict_vs_compatible_arity() {
        let three = Layout::table(vec![
            Field::new("a", Layout::Fixed(1)),
            Field::new("b", Layout::Fixed(1)),
            Field::new("c", Layout::Fixed(1)),
        ]);
        let two = Layout::table(vec![
            Field::new("a", Layout::Fixed(1)),
            Field::new("b", Layout::Fixed(1)),
        ]);
        let four = Layout::table(vec![
            Field::new("a", Layout::Fixed(1)),
            Field::new("b", Layout::Fixed(1)),
            Field::new("c", Layout::Fixed(1)),
            Field::new("d", Layout::Fixed(1)),
        ]);
        let ones = |n: usize| Value::Seq(vec![Value::Bytes(vec![1]); n]);

        let exact = encode(&three, &ones(3)).unwrap();
        assert!(validate(&three, &exact, false).is_ok());
        assert!(validate(&three, &exact, true).is_ok());

        let extra = encode(&four, &ones(4)).unwrap();
        assert_eq!(
            validate(&three, &extra, false),
            Err(VerifyError::TooManyFields {
                required: 3,
                actual: 4
            })
        );
        assert!(validate(&three, &extra, true).is_ok());

        let missing = encode(&two, &ones(2)).unwrap();
        for compatible in [false, true] {
            assert_eq!(
                validate(&three, &missing, compatible),
                Err(VerifyError::TooFewFields {
                    required: 3,
                    actual: 2
                })
            );
        }
    }

    #[test]
    fn compatibility_propagates_to_nested_tables() {
        let inner_two = Layout::table(vec![
            Field::new("x", Layout::Fixed(1)),
            Field::new("y", Layout::Fixed(1)),
        ]);
        let inner_one = Layout::table(vec![Field::new("x", Layout::Fixed(1))]);
        let outer = |inner: Layout| Layout::table(vec![Field::new("inner", inner)]);

        let wide = encode(
            &outer(inner_two),
            &Value::Seq(vec![Value::Seq(vec![
                Value::Bytes(vec![1]),
                Value::Bytes(vec![2]),
            ])]),
        )
        .unwrap();

        let narrow_schema = outer(inner_one);
        assert_eq!(
            validate(&narrow_schema, &wide, false),
            Err(VerifyError::TooManyFields {
                required: 1,
                actual: 2
            })
        );
        assert!(validate(&narrow_schema, &wide, true).is_ok());
    }

    #[test]
    fn option_presence_is_length_alone() {
        let layout = Layout::option(Layout::Fixed(4));
        assert!(validate(&layout, &[], false).is_ok());
        assert!(validate(&layout, &[1, 2, 3, 4], false).is_ok());
        assert_eq!(
            validate(&layout, &[1, 2, 3], false),
            Err(VerifyError::LengthMismatch {
                required: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn validation_is_idempotent() {
        let layout = record();
        let buf = encode(&layout, &record_value()).unwrap();
        let first = validate(&layout, &buf, true);
        let second = validate(&layout, &buf, true);
        assert_eq!(first, second);
        assert!(first.is_ok());
    }
}
