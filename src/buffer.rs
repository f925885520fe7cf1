//! Owned byte buffers and the explicit byte-conversion boundary
//!
//! [`Buffer`] is the owned, immutable-by-convention byte sequence
//! produced by the encoder and accepted back by the decoder: the sole
//! carrier of a serialized value, with no out-of-band metadata. Decoded
//! views borrow from a `Buffer` (or any byte slice) and hold no storage
//! of their own.
//!
//! [`AsBytes`] is the single, explicit conversion seam for handing byte
//! data to the codec. It is implemented only for the core byte-carrying
//! types; callers convert at the boundary rather than relying on any
//! runtime shape-sniffing of "buffer-like" inputs.

#[cfg(feature = "serde_impls")]
use serde::Serialize;
use std::borrow::Borrow;
use std::ops::Deref;

/// Owned contiguous byte sequence holding one serialized value.
///
/// Aside from construction and destruction, `Buffer` behaves as a
/// byte-slice via `Deref`; the codec never mutates one in place, and
/// "editing" a composite means re-serializing a new `Buffer` from a
/// modified structured value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Buffer(Vec<u8>);

#[cfg(feature = "serde_impls")]
impl Serialize for Buffer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}

impl Buffer {
    /// Constructs a new, empty buffer.
    ///
    /// As with `Vec::new()`, no allocation is performed until bytes are
    /// added.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Constructs a `Buffer` from a `Vec<u8>` without copying.
    #[inline]
    #[must_use]
    pub const fn from_vec(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Destructs a `Buffer` and returns the `Vec<u8>` it contained.
    ///
    /// The method name is chosen so as to avoid ambiguity with
    /// [`slice::to_vec`] arising from deref-coercion.
    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl Borrow<[u8]> for Buffer {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl IntoIterator for Buffer {
    type Item = u8;

    type IntoIter = std::vec::IntoIter<u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Buffer {
    type Item = &'a u8;

    type IntoIter = core::slice::Iter<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::iter::FromIterator<u8> for Buffer {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        Self(Vec::<u8>::from_iter(iter))
    }
}

impl From<Buffer> for Vec<u8> {
    #[inline]
    fn from(val: Buffer) -> Self {
        val.0
    }
}

impl From<Vec<u8>> for Buffer {
    #[inline]
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&'_ [u8]> for Buffer {
    #[inline]
    fn from(bytes: &'_ [u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Buffer {
    #[inline]
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes.to_vec())
    }
}

impl<const N: usize> From<&'_ [u8; N]> for Buffer {
    #[inline]
    fn from(bytes: &'_ [u8; N]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Box<[u8]>> for Buffer {
    #[inline]
    fn from(val: Box<[u8]>) -> Self {
        Self(val.into_vec())
    }
}

/// Explicit conversion to a borrowed byte-slice at the codec boundary.
///
/// This trait is deliberately implemented only for the core
/// byte-carrying types; anything else must be converted by the caller
/// before it reaches the codec.
pub trait AsBytes {
    /// Returns the bytes of `self` as a borrowed slice.
    fn as_bytes(&self) -> &[u8];
}

impl AsBytes for [u8] {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl AsBytes for Vec<u8> {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self.as_slice()
    }
}

impl<const N: usize> AsBytes for [u8; N] {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl AsBytes for Buffer {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsBytes for Box<[u8]> {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_ladder_round_trips() {
        let buf = Buffer::from([1u8, 2, 3]);
        assert_eq!(buf.as_bytes(), &[1, 2, 3]);
        assert_eq!(buf.len(), 3);
        let vec: Vec<u8> = buf.clone().into_vec();
        assert_eq!(Buffer::from(vec), buf);
        let collected: Buffer = [1u8, 2, 3].into_iter().collect();
        assert_eq!(collected, buf);
    }
}
