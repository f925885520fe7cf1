//! Layout descriptors
//!
//! This module defines [`Layout`], the declarative descriptor tree that
//! parameterizes every codec in this crate, and [`Field`], the named
//! position of a member inside a struct or table.
//!
//! A descriptor is plain configuration: it records which of the wire
//! layouts applies to a type and the parameters of that layout, and is
//! fully determined before any encode or decode call. The codecs never
//! infer structure from data beyond the item counts and offsets their
//! headers carry.
//!
//! # Kinds
//!
//! - [`Layout::Fixed`] — a leaf of constant byte-width, written with no
//!   header.
//! - [`Layout::FixedStruct`] — a composite of fixed-width members,
//!   concatenated in declared order with no padding and no header; its
//!   own width is derived from its members at construction time.
//! - [`Layout::FixVec`] — a vector of constant-width elements, written
//!   as a 4-byte count followed by the packed elements.
//! - [`Layout::DynVec`] — a vector of variable-width elements, written
//!   with an offset table.
//! - [`Layout::Table`] — an ordered, named, heterogeneous composite,
//!   written with an offset table.
//! - [`Layout::Option`] — a nullable wrapper encoding presence by
//!   buffer length alone: absent is zero bytes, present is exactly the
//!   inner encoding.
//!
//! # A note on zero-width optionals
//!
//! Because an absent optional is encoded as zero bytes, an inner type
//! whose valid encoding can itself be empty (such as `Fixed(0)`) is
//! indistinguishable on the wire from absence. This is a property of
//! the format, not of this implementation; schemas should not wrap a
//! possibly-zero-width layout in an option.

use crate::error::KindError;
use crate::value::Value;

/// Named member position inside a [`Layout::FixedStruct`] or
/// [`Layout::Table`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    name: String,
    layout: Layout,
}

impl Field {
    /// Constructs a field descriptor from a name and the layout of the
    /// value stored at that position.
    pub fn new(name: impl Into<String>, layout: Layout) -> Self {
        Self {
            name: name.into(),
            layout,
        }
    }

    /// Returns the declared name of this field.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the layout of the value stored at this position.
    #[inline]
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}

/// Declarative descriptor of a wire layout.
///
/// See the [module documentation](self) for the catalogue of kinds.
/// Descriptor trees are acyclic by construction (ownership admits no
/// cycles) and are intended to be built once, at schema-definition
/// time, then shared behind an `Arc` via the
/// [`Registry`](crate::registry::Registry).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Fixed-width leaf: exactly this many bytes, no header.
    Fixed(usize),
    /// Fixed composite: members concatenated in declared order, with
    /// the total width cached at construction.
    FixedStruct { fields: Vec<Field>, width: usize },
    /// Count-prefixed vector of constant-width elements.
    FixVec(Box<Layout>),
    /// Offset-table vector of variable-width elements.
    DynVec(Box<Layout>),
    /// Offset-table composite of named heterogeneous fields.
    Table(Vec<Field>),
    /// Nullable wrapper: zero bytes when absent, the bare inner
    /// encoding when present.
    Option(Box<Layout>),
}

impl Layout {
    /// Constructs a fixed-width leaf descriptor of `width` bytes.
    #[inline]
    #[must_use]
    pub const fn fixed(width: usize) -> Self {
        Layout::Fixed(width)
    }

    /// Attempts to construct a fixed-struct descriptor from its member
    /// fields, deriving the total width as the sum of member widths.
    ///
    /// # Errors
    ///
    /// Returns [`KindError`] if any member is not itself fixed-width
    /// (only [`Fixed`](Layout::Fixed) and nested
    /// [`FixedStruct`](Layout::FixedStruct) members are admissible).
    pub fn try_fixed_struct(fields: Vec<Field>) -> Result<Self, KindError> {
        let mut width = 0usize;
        for field in &fields {
            match field.layout().fixed_width() {
                Some(w) => width += w,
                None => {
                    return Err(KindError {
                        required: "fixed-width member",
                        actual: field.layout().kind_name(),
                    })
                }
            }
        }
        Ok(Layout::FixedStruct { fields, width })
    }

    /// Constructs a fixed-struct descriptor from its member fields.
    ///
    /// # Panics
    ///
    /// Panics if any member is not fixed-width. For a checked variant,
    /// see [`try_fixed_struct`](Self::try_fixed_struct).
    #[must_use]
    pub fn fixed_struct(fields: Vec<Field>) -> Self {
        match Self::try_fixed_struct(fields) {
            Ok(layout) => layout,
            Err(err) => panic!("cannot construct fixed struct: {err}"),
        }
    }

    /// Attempts to construct a fixed-vector descriptor from its element
    /// layout.
    ///
    /// # Errors
    ///
    /// Returns [`KindError`] if the element layout is not fixed-width.
    pub fn try_fix_vec(element: Layout) -> Result<Self, KindError> {
        if element.fixed_width().is_none() {
            return Err(KindError {
                required: "fixed-width element",
                actual: element.kind_name(),
            });
        }
        Ok(Layout::FixVec(Box::new(element)))
    }

    /// Constructs a fixed-vector descriptor from its element layout.
    ///
    /// # Panics
    ///
    /// Panics if the element layout is not fixed-width. For a checked
    /// variant, see [`try_fix_vec`](Self::try_fix_vec).
    #[must_use]
    pub fn fix_vec(element: Layout) -> Self {
        match Self::try_fix_vec(element) {
            Ok(layout) => layout,
            Err(err) => panic!("cannot construct fixed vector: {err}"),
        }
    }

    /// Constructs a dynamic-vector descriptor from its element layout.
    #[must_use]
    pub fn dyn_vec(element: Layout) -> Self {
        Layout::DynVec(Box::new(element))
    }

    /// Constructs a table descriptor from its ordered field list.
    #[must_use]
    pub fn table(fields: Vec<Field>) -> Self {
        Layout::Table(fields)
    }

    /// Constructs an option descriptor around an inner layout.
    #[must_use]
    pub fn option(inner: Layout) -> Self {
        Layout::Option(Box::new(inner))
    }

    /// Returns a static name for the kind of this layout, for use in
    /// diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Layout::Fixed(_) => "fixed",
            Layout::FixedStruct { .. } => "fixed-struct",
            Layout::FixVec(_) => "fixvec",
            Layout::DynVec(_) => "dynvec",
            Layout::Table(_) => "table",
            Layout::Option(_) => "option",
        }
    }

    /// Returns the constant encoded width of this layout in bytes, or
    /// `None` if its encodings vary in size.
    ///
    /// For [`FixedStruct`](Layout::FixedStruct) the width was derived
    /// once at construction and is returned without recomputation.
    #[must_use]
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            Layout::Fixed(width) => Some(*width),
            Layout::FixedStruct { width, .. } => Some(*width),
            _ => None,
        }
    }

    /// Returns the declared fields of a struct or table layout, or
    /// `None` for every other kind.
    #[must_use]
    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Layout::FixedStruct { fields, .. } | Layout::Table(fields) => Some(fields),
            _ => None,
        }
    }

    /// Returns the position of the named field within a struct or table
    /// layout, or `None` if the name is not declared (or the layout has
    /// no fields at all).
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields()?.iter().position(|f| f.name() == name)
    }

    /// Returns the canonical default value for this layout: zeroed
    /// bytes for fixed-width leaves, empty vectors, absent options, and
    /// member-wise defaults for structs and tables.
    ///
    /// Every default is well-shaped for its own layout, so encoding it
    /// always succeeds and the resulting buffer validates strictly.
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self {
            Layout::Fixed(width) => Value::Bytes(vec![0u8; *width]),
            Layout::FixedStruct { fields, .. } => {
                Value::Seq(fields.iter().map(|f| f.layout().default_value()).collect())
            }
            Layout::FixVec(_) | Layout::DynVec(_) => Value::Seq(Vec::new()),
            Layout::Table(fields) => {
                Value::Seq(fields.iter().map(|f| f.layout().default_value()).collect())
            }
            Layout::Option(_) => Value::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> Layout {
        Layout::fixed_struct(vec![
            Field::new("x", Layout::Fixed(4)),
            Field::new("y", Layout::Fixed(4)),
        ])
    }

    #[test]
    fn struct_width_is_sum_of_members() {
        assert_eq!(point().fixed_width(), Some(8));
        let nested = Layout::fixed_struct(vec![
            Field::new("origin", point()),
            Field::new("tag", Layout::Fixed(1)),
        ]);
        assert_eq!(nested.fixed_width(), Some(9));
    }

    #[test]
    fn variable_members_are_rejected() {
        let err = Layout::try_fixed_struct(vec![Field::new(
            "payload",
            Layout::fix_vec(Layout::Fixed(1)),
        )])
        .unwrap_err();
        assert_eq!(err.required, "fixed-width member");
        assert_eq!(err.actual, "fixvec");

        assert!(Layout::try_fix_vec(Layout::dyn_vec(Layout::Fixed(1))).is_err());
    }

    #[test]
    #[should_panic(expected = "cannot construct fixed vector")]
    fn unchecked_constructor_panics_on_variable_element() {
        let _ = Layout::fix_vec(Layout::table(vec![]));
    }

    #[test]
    fn field_lookup_is_positional() {
        let layout = Layout::table(vec![
            Field::new("id", Layout::Fixed(20)),
            Field::new("body", Layout::fix_vec(Layout::Fixed(1))),
        ]);
        assert_eq!(layout.field_index("id"), Some(0));
        assert_eq!(layout.field_index("body"), Some(1));
        assert_eq!(layout.field_index("missing"), None);
        assert_eq!(Layout::Fixed(1).field_index("id"), None);
    }

    #[test]
    fn default_values_match_kind() {
        assert_eq!(Layout::Fixed(3).default_value(), Value::Bytes(vec![0, 0, 0]));
        assert_eq!(
            point().default_value(),
            Value::Seq(vec![
                Value::Bytes(vec![0; 4]),
                Value::Bytes(vec![0; 4])
            ])
        );
        assert_eq!(
            Layout::dyn_vec(Layout::Fixed(1)).default_value(),
            Value::Seq(vec![])
        );
        assert_eq!(
            Layout::option(Layout::Fixed(4)).default_value(),
            Value::Absent
        );
    }
}
