//! Human-readable rendering of encoded values
//!
//! Raw offset-table buffers are opaque in logs and test failures; this
//! module renders a [`View`] through its descriptor into a compact
//! `Struct { field: ... }` notation, with byte payloads shown as hex.
//!
//! Rendering is total: a structurally malformed range renders as an
//! inline `<invalid: ...>` marker instead of failing, so a partially
//! corrupt buffer can still be inspected.

use std::fmt::Write;

use crate::buffer::Buffer;
use crate::schema::Layout;
use crate::view::View;

/// Renders a byte-slice as lowercase hex with no separator.
#[must_use]
pub fn hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Types with a compact human-readable rendering.
pub trait Prettier {
    /// Returns the rendering of `self`.
    fn as_prettier(&self) -> String;
}

impl Prettier for Buffer {
    fn as_prettier(&self) -> String {
        format!("0x{}", hex_string(self))
    }
}

impl Prettier for View<'_> {
    fn as_prettier(&self) -> String {
        match self.layout() {
            Layout::Fixed(_) => format!("0x{}", hex_string(self.raw())),
            Layout::FixedStruct { fields, .. } => {
                let mut out = String::from("Struct {");
                for (index, field) in fields.iter().enumerate() {
                    if index > 0 {
                        out.push(',');
                    }
                    let _ = write!(out, " {}: {}", field.name(), self.member(index));
                }
                out.push_str(" }");
                out
            }
            Layout::FixVec(element) => {
                if element.fixed_width() == Some(1) {
                    let payload = if self.raw().len() >= 4 {
                        &self.raw()[4..]
                    } else {
                        self.raw()
                    };
                    format!("Bytes(0x{})", hex_string(payload))
                } else {
                    self.items("FixVec")
                }
            }
            Layout::DynVec(_) => self.items("DynVec"),
            Layout::Table(fields) => {
                let mut out = String::from("Table {");
                for (index, field) in fields.iter().enumerate() {
                    if index > 0 {
                        out.push(',');
                    }
                    let _ = write!(out, " {}: {}", field.name(), self.member(index));
                }
                match self.extra_field_count() {
                    Ok(0) | Err(_) => {}
                    Ok(extra) => {
                        let _ = write!(out, ", .. ({extra} extra fields)");
                    }
                }
                out.push_str(" }");
                out
            }
            Layout::Option(_) => match self.value() {
                Some(inner) => format!("Some({})", inner.as_prettier()),
                None => String::from("None"),
            },
        }
    }
}

impl View<'_> {
    /// Renders the member at `index`, folding structural errors into an
    /// inline marker.
    fn member(&self, index: usize) -> String {
        match self.at(index) {
            Ok(Some(member)) => member.as_prettier(),
            Ok(None) => String::from("<missing>"),
            Err(err) => format!("<invalid: {err}>"),
        }
    }

    /// Renders an item sequence under the given constructor name.
    fn items(&self, name: &str) -> String {
        let count = match self.len() {
            Ok(count) => count,
            Err(err) => return format!("{name} <invalid: {err}>"),
        };
        let mut out = format!("{name} [");
        for index in 0..count {
            if index > 0 {
                out.push(',');
            }
            let _ = write!(out, " {}", self.member(index));
        }
        out.push_str(" ]");
        out
    }
}

impl std::fmt::Display for View<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_prettier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;
    use crate::schema::Field;
    use crate::value::Value;

    #[test]
    fn hex_rendering_is_lowercase_and_padded() {
        assert_eq!(hex_string(&[0x00, 0x0f, 0xde, 0xad]), "000fdead");
        assert_eq!(hex_string(&[]), "");
    }

    #[test]
    fn table_renders_fields_by_name() {
        let layout = Layout::table(vec![
            Field::new("id", Layout::Fixed(4)),
            Field::new("body", Layout::fix_vec(Layout::Fixed(1))),
            Field::new("note", Layout::option(Layout::fix_vec(Layout::Fixed(1)))),
        ]);
        let buf = encode(
            &layout,
            &Value::Seq(vec![
                Value::from(7u32),
                Value::from(b"ab".as_slice()),
                Value::Absent,
            ]),
        )
        .unwrap();
        let view = View::decode_checked(&layout, &buf, false).unwrap();
        assert_eq!(
            view.as_prettier(),
            "Table { id: 0x07000000, body: Bytes(0x6162), note: None }"
        );
    }

    #[test]
    fn extra_fields_are_marked() {
        let declared = Layout::table(vec![Field::new("a", Layout::Fixed(1))]);
        let wider = Layout::table(vec![
            Field::new("a", Layout::Fixed(1)),
            Field::new("b", Layout::Fixed(1)),
        ]);
        let buf = encode(
            &wider,
            &Value::Seq(vec![Value::from(1u8), Value::from(2u8)]),
        )
        .unwrap();
        let view = View::decode_checked(&declared, &buf, true).unwrap();
        assert_eq!(
            view.as_prettier(),
            "Table { a: 0x01, .. (1 extra fields) }"
        );
    }

    #[test]
    fn corrupt_ranges_render_inline_markers() {
        let layout = Layout::dyn_vec(Layout::fix_vec(Layout::Fixed(1)));
        let buf = encode(
            &layout,
            &Value::Seq(vec![Value::from(b"a".as_slice())]),
        )
        .unwrap();
        let mut raw = buf.into_vec();
        // break the first offset word's alignment
        raw[4] = 9;
        let view = View::decode_unchecked(&layout, &raw);
        assert!(view.as_prettier().contains("<invalid:"));
    }
}
