//! Named layout registry
//!
//! Schemas reach this engine as configuration: a set of named
//! [`Layout`] descriptors registered once at load time and shared
//! behind `Arc` for the lifetime of the process. The [`Registry`] is
//! that name-to-descriptor map, with duplicate registration treated as
//! an error rather than a silent overwrite.
//!
//! The primitive layouts every schema builds on are provided as
//! `lazy_static!` statics, and [`Registry::with_primitives`] seeds a
//! registry with them under their conventional names.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::schema::Layout;

lazy_static! {
    /// Single opaque byte.
    pub static ref BYTE: Arc<Layout> = Arc::new(Layout::Fixed(1));
    /// Little-endian unsigned 8-bit integer.
    pub static ref UINT8: Arc<Layout> = Arc::new(Layout::Fixed(1));
    /// Little-endian unsigned 16-bit integer.
    pub static ref UINT16: Arc<Layout> = Arc::new(Layout::Fixed(2));
    /// Little-endian unsigned 32-bit integer.
    pub static ref UINT32: Arc<Layout> = Arc::new(Layout::Fixed(4));
    /// Little-endian unsigned 64-bit integer.
    pub static ref UINT64: Arc<Layout> = Arc::new(Layout::Fixed(8));
    /// Variable-length opaque byte-sequence (count-prefixed).
    pub static ref BYTES: Arc<Layout> = Arc::new(Layout::fix_vec(Layout::Fixed(1)));
}

/// Error reported when a name is registered twice.
///
/// Re-registering a name is almost always a schema-assembly bug, and
/// silently replacing a descriptor other code may already hold an
/// `Arc` to would desynchronize every later decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateLayout {
    name: String,
}

impl DuplicateLayout {
    /// Returns the name whose registration was rejected.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for DuplicateLayout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "layout `{}` is already registered", self.name)
    }
}

impl Error for DuplicateLayout {}

/// Name-to-descriptor map for a loaded schema set.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    layouts: HashMap<String, Arc<Layout>>,
}

impl Registry {
    /// Constructs an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a registry pre-seeded with the primitive layouts
    /// under their conventional names: `byte`, `uint8`, `uint16`,
    /// `uint32`, `uint64`, and `bytes`.
    #[must_use]
    pub fn with_primitives() -> Self {
        let mut registry = Self::new();
        for (name, layout) in [
            ("byte", &*BYTE),
            ("uint8", &*UINT8),
            ("uint16", &*UINT16),
            ("uint32", &*UINT32),
            ("uint64", &*UINT64),
            ("bytes", &*BYTES),
        ] {
            // fresh map, distinct names: registration cannot collide
            let _ = registry.register_shared(name, Arc::clone(layout));
        }
        registry
    }

    /// Registers a layout under `name`, taking ownership and wrapping
    /// it for sharing.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateLayout`] if `name` is already registered; the
    /// existing descriptor is left untouched.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        layout: Layout,
    ) -> Result<(), DuplicateLayout> {
        self.register_shared(name, Arc::new(layout))
    }

    /// Registers an already-shared layout under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateLayout`] if `name` is already registered.
    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        layout: Arc<Layout>,
    ) -> Result<(), DuplicateLayout> {
        let name = name.into();
        if self.layouts.contains_key(&name) {
            return Err(DuplicateLayout { name });
        }
        self.layouts.insert(name, layout);
        Ok(())
    }

    /// Looks up the layout registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Layout>> {
        self.layouts.get(name)
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    /// Returns the number of registered layouts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Returns `true` if no layouts are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Iterates over the registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;

    #[test]
    fn primitives_are_preseeded() {
        let registry = Registry::with_primitives();
        assert_eq!(registry.len(), 6);
        assert_eq!(
            registry.get("uint32").map(|l| l.fixed_width()),
            Some(Some(4))
        );
        assert_eq!(registry.get("bytes").map(|l| l.fixed_width()), Some(None));
        assert!(!registry.contains("uint128"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = Registry::new();
        registry.register("record", Layout::table(vec![])).unwrap();
        let err = registry
            .register(
                "record",
                Layout::table(vec![Field::new("id", Layout::Fixed(4))]),
            )
            .unwrap_err();
        assert_eq!(err.name(), "record");
        // the original descriptor survives
        assert_eq!(
            registry.get("record").map(|l| l.fields().map(<[_]>::len)),
            Some(Some(0))
        );
    }

    #[test]
    fn registered_layouts_are_shared() {
        let mut registry = Registry::new();
        let layout = Arc::new(Layout::dyn_vec(Layout::fix_vec(Layout::Fixed(1))));
        registry
            .register_shared("chunks", Arc::clone(&layout))
            .unwrap();
        assert!(Arc::ptr_eq(registry.get("chunks").unwrap(), &layout));
    }
}
