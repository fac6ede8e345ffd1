//! Attributes for the SCIM data model.
//!
//! An [`Attribute`] is a named container of one or more [`AttributeValue`]s.
//! The four shapes an attribute can take (singular/multi-valued crossed with
//! simple/complex) are one [`AttributeKind`] enum rather than an inheritance
//! tree; the kind decides how the value list renders to JSON.

use crate::error::{ValidationError, ValidationResult};
use crate::model::value::AttributeValue;
use serde_json::Value;
use std::fmt;

/// The shape of an attribute: multiplicity crossed with complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// One simple value
    SingularSimple,
    /// An array of simple values
    MultiValuedSimple,
    /// One complex value
    SingularComplex,
    /// An array of complex values
    MultiValuedComplex,
}

impl AttributeKind {
    /// Derive the kind from the two independent flags.
    pub fn of(multi_valued: bool, complex: bool) -> Self {
        match (multi_valued, complex) {
            (false, false) => Self::SingularSimple,
            (true, false) => Self::MultiValuedSimple,
            (false, true) => Self::SingularComplex,
            (true, true) => Self::MultiValuedComplex,
        }
    }

    /// Whether values of this kind carry sub-attributes.
    pub fn is_complex(&self) -> bool {
        matches!(self, Self::SingularComplex | Self::MultiValuedComplex)
    }

    /// Whether this kind renders as a JSON array.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Self::MultiValuedSimple | Self::MultiValuedComplex)
    }
}

/// A named SCIM attribute holding one or more values.
///
/// Construction enforces a non-empty name and a non-empty value list. The
/// kind is fixed at construction and advisory thereafter: [`Attribute::add_value`]
/// always appends, even on a singular attribute, matching how permissive
/// SCIM producers behave in practice.
///
/// ## Examples
///
/// ```rust
/// use scim_extension::model::{Attribute, AttributeValue};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let attribute = Attribute::multi_valued(
///         "emails",
///         vec![AttributeValue::from("a@example.com")],
///     )?;
///     assert!(attribute.is_multi_valued());
///     assert_eq!(attribute.to_string(), r#""emails":["a@example.com"]"#);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    name: String,
    kind: AttributeKind,
    values: Vec<AttributeValue>,
}

impl Attribute {
    /// Create an attribute with an explicit kind.
    ///
    /// Rejects empty names and empty value lists; the kind is taken as given
    /// and not checked against the value shapes.
    pub fn new(
        name: impl Into<String>,
        kind: AttributeKind,
        values: Vec<AttributeValue>,
    ) -> ValidationResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyAttributeName);
        }
        if values.is_empty() {
            return Err(ValidationError::EmptyValues { attribute: name });
        }
        Ok(Self { name, kind, values })
    }

    /// Create a singular attribute; complexity is derived from the value.
    pub fn singular(name: impl Into<String>, value: AttributeValue) -> ValidationResult<Self> {
        let kind = AttributeKind::of(false, value.is_complex());
        Self::new(name, kind, vec![value])
    }

    /// Create a multi-valued attribute.
    ///
    /// The attribute is complex when any element is complex, mirroring how a
    /// mixed JSON array is classified during unmarshalling.
    pub fn multi_valued(
        name: impl Into<String>,
        values: Vec<AttributeValue>,
    ) -> ValidationResult<Self> {
        let complex = values.iter().any(AttributeValue::is_complex);
        Self::new(name, AttributeKind::of(true, complex), values)
    }

    /// The attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute kind.
    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Whether the attribute's values carry sub-attributes.
    pub fn is_complex(&self) -> bool {
        self.kind.is_complex()
    }

    /// Whether the attribute renders as a JSON array.
    pub fn is_multi_valued(&self) -> bool {
        self.kind.is_multi_valued()
    }

    /// All values, in order.
    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    /// The first value.
    ///
    /// Always present for a constructed attribute; `Option` guards the
    /// window between a future `remove`-style mutation and a read.
    pub fn value(&self) -> Option<&AttributeValue> {
        self.values.first()
    }

    /// Replace the first value in place.
    pub fn set_value(&mut self, value: AttributeValue) {
        if self.values.is_empty() {
            self.values.push(value);
        } else {
            self.values[0] = value;
        }
    }

    /// Append a value.
    ///
    /// Always legal, even on singular kinds; the kind is advisory and the
    /// caller is responsible for matching the declared schema multiplicity.
    pub fn add_value(&mut self, value: AttributeValue) {
        self.values.push(value);
    }

    /// Find a sub-attribute of the first value by name.
    pub fn sub_attribute(&self, name: &str) -> Option<&Attribute> {
        self.value()?.sub_attribute(name)
    }

    /// Render the value side of this attribute as JSON.
    ///
    /// Multi-valued kinds render as an array of every value; singular kinds
    /// render the first value alone.
    pub fn value_json(&self) -> Value {
        if self.is_multi_valued() {
            Value::Array(self.values.iter().map(AttributeValue::to_json).collect())
        } else {
            self.value().map(AttributeValue::to_json).unwrap_or(Value::Null)
        }
    }
}

/// Renders the `"name":value` JSON fragment for this attribute.
impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            Value::String(self.name.clone()),
            self.value_json()
        )
    }
}
