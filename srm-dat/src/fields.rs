//! Table-driven extraction of record fields from DAT XML elements.
//!
//! Every record type declares a static, ordered [`FieldSpec`] table naming
//! the fields it reads, whether each is required, its default, and where in
//! the XML it may live. [`extract`] is the single routine that applies such a
//! table to an [`Element`].

use crate::error::{DatError, RecordKind};

/// Where a field's value may be found on its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Only the text of a direct child element (`<header><name>...</name></header>`).
    Child,
    /// An attribute on the element itself (`<rom name="..."/>`) or a child
    /// tag. A non-empty attribute wins when both are present.
    Either,
}

/// One field a record reads from its XML element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub default: &'static str,
    pub source: FieldSource,
}

impl FieldSpec {
    pub const fn required(name: &'static str, source: FieldSource) -> Self {
        Self {
            name,
            required: true,
            default: "",
            source,
        }
    }

    pub const fn optional(name: &'static str, default: &'static str, source: FieldSource) -> Self {
        Self {
            name,
            required: false,
            default,
            source,
        }
    }
}

/// A DAT element read in full: its attributes, its own text, and its child elements.
///
/// Elements are only materialized one game (or one header) at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// An element with no content, as produced by `<tag .../>`.
    pub fn leaf(tag: String, attrs: Vec<(String, String)>) -> Self {
        Self {
            tag,
            attrs,
            ..Self::default()
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Text of the first direct child element with the given tag.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.children
            .iter()
            .find(|child| child.tag == name)
            .map(|child| child.text.as_str())
    }

    /// Every element with the given tag below this one, at any depth, in
    /// document order.
    pub fn descendants_named<'a>(&'a self, tag: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        let mut stack: Vec<&Element> = self.children.iter().rev().collect();
        while let Some(element) = stack.pop() {
            if element.tag == tag {
                found.push(element);
            }
            stack.extend(element.children.iter().rev());
        }
        found
    }

    fn lookup(&self, spec: &FieldSpec) -> Option<&str> {
        match spec.source {
            FieldSource::Child => self.child_text(spec.name),
            FieldSource::Either => self
                .attr(spec.name)
                .filter(|v| !v.is_empty())
                .or_else(|| self.child_text(spec.name)),
        }
    }

    /// Best-effort record name for error messages.
    pub fn display_name(&self) -> &str {
        self.attr("name")
            .or_else(|| self.child_text("name"))
            .unwrap_or("")
    }
}

/// Field values extracted from one element, in table order.
#[derive(Debug)]
pub(crate) struct Fields {
    values: Vec<(&'static str, String)>,
}

impl Fields {
    /// Move a field's value out. Fields not in the table (or already taken) yield "".
    pub fn take(&mut self, name: &str) -> String {
        self.values
            .iter_mut()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| std::mem::take(value))
            .unwrap_or_default()
    }
}

/// Extract the fields named in `table` from `element`.
///
/// A required field that is absent or empty fails the record with
/// [`DatError::IncompleteRecord`]; optional fields fall back to their default.
/// Attributes and child tags not named in the table are ignored.
pub(crate) fn extract(
    element: &Element,
    table: &'static [FieldSpec],
    kind: RecordKind,
) -> Result<Fields, DatError> {
    let mut values = Vec::with_capacity(table.len());
    for spec in table {
        let value = element.lookup(spec).filter(|v| !v.is_empty());
        let value = match value {
            Some(v) => v.to_string(),
            None if spec.required => {
                return Err(DatError::incomplete(kind, element.display_name(), spec.name));
            }
            None => spec.default.to_string(),
        };
        values.push((spec.name, value));
    }
    Ok(Fields { values })
}
