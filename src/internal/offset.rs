//! Offset-table header algorithms
//!
//! This module contains the shared machinery for the offset-table wire
//! layout used by dynamic vectors and tables: a 4-byte little-endian
//! total-length word, followed by one 4-byte start offset per item,
//! followed by the concatenated item bytes.
//!
//! The load-bearing function here is [`verify_and_extract_offsets`],
//! which reconstructs item boundaries from a buffer and rejects every
//! malformed input before any caller slices into item ranges. Both the
//! validation engine and the lazy view accessors are built on top of
//! the boundary lists it produces.

use cfg_if::cfg_if;

use crate::verify::error::{VerifyError, VerifyResult};

/// Width in bytes of every header word (the total-length field and each
/// per-item offset).
pub const WORD: usize = 4;

/// Minimal byte-length of a non-empty offset-table encoding: the
/// total-length word plus at least one offset word.
pub const MIN_NONEMPTY: usize = 2 * WORD;

cfg_if! {
    if #[cfg(feature = "smallvec_offsets")] {
        /// Scratch list of item boundaries extracted from an offset table.
        ///
        /// When the `smallvec_offsets` feature is set, this alias points to
        /// `smallvec::SmallVec<[u32; 8]>`, keeping boundary extraction
        /// allocation-free for composites of up to 7 items.
        ///
        /// Otherwise, it defaults to `Vec<u32>`.
        pub type Boundaries = smallvec::SmallVec<[u32; 8]>;
    } else {
        /// Scratch list of item boundaries extracted from an offset table.
        ///
        /// When the `smallvec_offsets` feature is set, this alias points to
        /// `smallvec::SmallVec<[u32; 8]>`, keeping boundary extraction
        /// allocation-free for composites of up to 7 items.
        ///
        /// Otherwise, it defaults to `Vec<u32>`.
        pub type Boundaries = Vec<u32>;
    }
}

/// Reads the little-endian `u32` header word starting at byte `pos`.
///
/// Callers must have already established that `pos + 4 <= data.len()`.
#[inline]
#[must_use]
pub fn read_word(data: &[u8], pos: usize) -> u32 {
    let mut raw = [0u8; WORD];
    raw.copy_from_slice(&data[pos..pos + WORD]);
    u32::from_le_bytes(raw)
}

/// Returns the header size in bytes of an offset-table encoding with
/// `item_count` items: the total-length word plus one offset word per item.
#[inline]
#[must_use]
pub const fn header_size(item_count: usize) -> usize {
    WORD * (item_count + 1)
}

/// Reconstructs the item boundaries of an offset-table encoding,
/// rejecting every malformed header.
///
/// On success the returned list holds the stored start offset of each
/// item followed by the total length as a sentinel final boundary, so a
/// composite with `n` items yields `n + 1` monotonically non-decreasing
/// entries and item `i` occupies `data[boundaries[i]..boundaries[i+1]]`.
/// The degenerate empty encoding (exactly 4 bytes holding the value 4)
/// yields the single sentinel boundary `[4]`.
///
/// The item count is derived solely from the first offset word: an
/// offset array occupying `first_offset - 4` bytes holds
/// `first_offset / 4 - 1` entries. `expected_field_count` is the arity
/// the caller's schema declares (always 0 for vectors); `compatible`
/// suppresses only the excess-arity rejection, admitting forward-
/// compatible trailing fields.
///
/// # Errors
///
/// Fails with the [`VerifyError`] variant matching the first violated
/// check, in this order: [`TooShort`] (no room for the length word, or
/// a non-empty total below 8), [`LengthMismatch`] (stored total differs
/// from the actual buffer length), [`TooFewFields`] / [`TooManyFields`]
/// (arity vs. `expected_field_count`), [`InvalidOffset`] (first offset
/// unaligned or below the minimal header), [`OffsetExceedsLength`]
/// (first offset past the total), and [`NonMonotonicOffset`] (any
/// decreasing adjacent boundary pair).
///
/// [`TooShort`]: VerifyError::TooShort
/// [`LengthMismatch`]: VerifyError::LengthMismatch
/// [`TooFewFields`]: VerifyError::TooFewFields
/// [`TooManyFields`]: VerifyError::TooManyFields
/// [`InvalidOffset`]: VerifyError::InvalidOffset
/// [`OffsetExceedsLength`]: VerifyError::OffsetExceedsLength
/// [`NonMonotonicOffset`]: VerifyError::NonMonotonicOffset
pub fn verify_and_extract_offsets(
    data: &[u8],
    expected_field_count: usize,
    compatible: bool,
) -> VerifyResult<Boundaries> {
    if data.len() < WORD {
        return Err(VerifyError::TooShort {
            minimum: WORD,
            actual: data.len(),
        });
    }
    let total_length = read_word(data, 0);
    if total_length as usize != data.len() {
        return Err(VerifyError::LengthMismatch {
            required: total_length as usize,
            actual: data.len(),
        });
    }
    if total_length as usize == WORD {
        if expected_field_count > 0 {
            return Err(VerifyError::TooFewFields {
                required: expected_field_count,
                actual: 0,
            });
        }
        let mut boundaries = Boundaries::new();
        boundaries.push(total_length);
        return Ok(boundaries);
    }
    if (total_length as usize) < MIN_NONEMPTY {
        return Err(VerifyError::TooShort {
            minimum: MIN_NONEMPTY,
            actual: total_length as usize,
        });
    }
    let first_offset = read_word(data, WORD);
    if first_offset as usize % WORD != 0 || (first_offset as usize) < MIN_NONEMPTY {
        return Err(VerifyError::InvalidOffset {
            offset: first_offset,
        });
    }
    let item_count = first_offset as usize / WORD - 1;
    if item_count < expected_field_count {
        return Err(VerifyError::TooFewFields {
            required: expected_field_count,
            actual: item_count,
        });
    }
    if !compatible && item_count > expected_field_count {
        return Err(VerifyError::TooManyFields {
            required: expected_field_count,
            actual: item_count,
        });
    }
    if total_length < first_offset {
        return Err(VerifyError::OffsetExceedsLength {
            offset: first_offset,
            total: total_length,
        });
    }
    // first_offset <= total_length == data.len(), so every offset word
    // in bytes 4..first_offset is readable.
    let mut boundaries = Boundaries::with_capacity(item_count + 1);
    for i in 0..item_count {
        boundaries.push(read_word(data, WORD + i * WORD));
    }
    boundaries.push(total_length);
    for i in 0..boundaries.len() - 1 {
        if boundaries[i] > boundaries[i + 1] {
            return Err(VerifyError::NonMonotonicOffset {
                index: i,
                offset: boundaries[i],
                next: boundaries[i + 1],
            });
        }
    }
    Ok(boundaries)
}
