//! Model for representing and transcoding schema-driven packed binary composites
//!
//! # Overview
//!
//! This library is a generic engine for a compact, schema-driven binary
//! serialization format: composite values (tables, vectors, fixed-width
//! structs, optionals) are packed into self-describing byte buffers
//! using length headers and offset tables, with zero-copy decoding and
//! strict structural validation.
//!
//! The engine is deliberately schema-agnostic. A concrete record type
//! is described to it as configuration — a [`Layout`] descriptor tree
//! of named fields, element layouts, and fixed widths, optionally held
//! in a [`Registry`] — and the recursive algorithms for laying out and
//! re-validating buffers are written exactly once, here, rather than in
//! per-type generated code. Applications that would otherwise carry
//! hundreds of near-identical encode/decode classes instead carry a
//! table of descriptors.
//!
//! Five structural kinds cover the format:
//!
//! - fixed-width leaves and structs, concatenated with no header;
//! - fixed vectors, prefixed by a 4-byte item count;
//! - dynamic vectors and tables, prefixed by a 4-byte total length and
//!   a table of 4-byte item-start offsets;
//! - optionals, which encode presence by buffer length alone.
//!
//! All multi-byte header words are little-endian and unsigned.
//!
//! # Background
//!
//! In formats of this family, the first offset word of a table is
//! doubly load-bearing: it fixes both where item 0 starts and — via
//! `first_offset / 4 - 1` — how many items exist, so arity is derived
//! from the data rather than trusted from any external count. The
//! validation engine in [`verify`] treats that derivation, and every
//! other header invariant, as a hard precondition: a single misplaced
//! offset check or off-by-one in header size silently corrupts every
//! type derived from the engine, which is why validation lives here
//! once and is shared by every descriptor.
//!
//! Reading is two-phase by design: [`View::decode_unchecked`] wraps a
//! buffer with no checks for callers that trust their input or prefer
//! pay-as-you-go verification at each accessor, while
//! [`View::decode_checked`] validates the whole tree up front.
//! Forward compatibility is opt-in per call: `compatible` validation
//! tolerates extra trailing table fields that a newer schema revision
//! may have appended, and nothing else.

pub mod buffer;
pub mod encode;
pub mod error;
pub mod prelude;
pub mod prettier;
pub mod registry;
pub mod schema;
pub mod target;
pub mod value;
pub mod verify;
pub mod view;

#[cfg(feature = "expose_internal")]
pub mod internal;
#[cfg(not(feature = "expose_internal"))]
pub(crate) mod internal;

pub use crate::buffer::{AsBytes, Buffer};
pub use crate::encode::{encode, encode_default, encoded_len, write_value};
pub use crate::error::{EncodeError, EncodeResult, KindError, LengthError, WidthError};
pub use crate::prettier::{hex_string, Prettier};
pub use crate::registry::Registry;
pub use crate::schema::{Field, Layout};
pub use crate::target::{ByteCounter, Target};
pub use crate::value::Value;
pub use crate::verify::error::{VerifyError, VerifyResult};
pub use crate::verify::validate;
pub use crate::view::View;

pub use ::lazy_static::lazy_static;
