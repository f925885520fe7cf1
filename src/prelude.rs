//! Assorted imports for downstream schema code
//!
//! Schema-assembly modules tend to need the same handful of items:
//! the descriptor constructors, the value tree, the codec entry points,
//! and both error families. This module gathers them for glob-import.

pub use crate::buffer::{AsBytes, Buffer};
pub use crate::encode::{encode, encode_default, encoded_len};
pub use crate::error::{EncodeError, EncodeResult};
pub use crate::prettier::Prettier;
pub use crate::registry::Registry;
pub use crate::schema::{Field, Layout};
pub use crate::value::Value;
pub use crate::verify::error::{VerifyError, VerifyResult};
pub use crate::verify::validate;
pub use crate::view::View;
