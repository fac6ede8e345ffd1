//! Schema attribute definitions.
//!
//! [`SchemaAttribute`] is the declarative description of one attribute:
//! name, data type, multiplicity, mutability and the rest of the RFC 7643
//! characteristics, with sub-attribute definitions nesting recursively for
//! complex types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// SCIM attribute data types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    /// String value
    String,
    /// Boolean value
    Boolean,
    /// Decimal number
    Decimal,
    /// Integer number
    Integer,
    /// DateTime in RFC 3339 format
    DateTime,
    /// Binary data (base64 encoded)
    Binary,
    /// URI reference
    Reference,
    /// Complex attribute with sub-attributes
    Complex,
}

impl AttributeType {
    /// The wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Decimal => "decimal",
            Self::Integer => "integer",
            Self::DateTime => "dateTime",
            Self::Binary => "binary",
            Self::Reference => "reference",
            Self::Complex => "complex",
        }
    }
}

impl Default for AttributeType {
    fn default() -> Self {
        Self::String
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute mutability characteristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    /// Read-only attribute (managed by the service)
    ReadOnly,
    /// Read-write attribute (can be modified by clients)
    ReadWrite,
    /// Immutable attribute (set once, never modified)
    Immutable,
    /// Write-only attribute (passwords and the like)
    WriteOnly,
}

impl Default for Mutability {
    fn default() -> Self {
        Self::ReadWrite
    }
}

/// When an attribute is returned in responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Returned {
    /// Always returned, attribute filters notwithstanding
    Always,
    /// Never returned
    Never,
    /// Returned unless filtered out
    Default,
    /// Returned only when explicitly requested
    Request,
}

impl Default for Returned {
    fn default() -> Self {
        Self::Default
    }
}

/// Attribute uniqueness constraints.
///
/// Defaults to `Global`, matching the schema data this model was built for
/// rather than the RFC 7643 default of `none`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Uniqueness {
    /// No uniqueness constraint
    None,
    /// Unique within the service
    Server,
    /// Globally unique
    Global,
}

impl Default for Uniqueness {
    fn default() -> Self {
        Self::Global
    }
}

/// Declarative description of one SCIM attribute.
///
/// Deserializes from the standard schema representation; absent members
/// take the defaults above. `multi_valued` stays optional because published
/// OIM schemas omit it on complex attributes that are in fact multi-valued —
/// [`SchemaAttribute::is_multi_valued`] resolves the effective value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaAttribute {
    /// Attribute name
    pub name: String,
    /// Data type of the attribute
    #[serde(rename = "type")]
    pub data_type: AttributeType,
    /// Whether this attribute can have multiple values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_valued: Option<bool>,
    /// Human-readable description
    pub description: String,
    /// Whether this attribute must be present
    pub required: bool,
    /// Whether string comparison is case-sensitive
    pub case_exact: bool,
    /// Mutability characteristics
    pub mutability: Mutability,
    /// How the attribute is returned in responses
    pub returned: Returned,
    /// Uniqueness constraint
    pub uniqueness: Uniqueness,
    /// Allowed values for string attributes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub canonical_values: Vec<String>,
    /// Sub-attribute definitions for complex types
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_attributes: Vec<SchemaAttribute>,
}

impl SchemaAttribute {
    /// Create a named attribute definition of the given type, everything
    /// else defaulted.
    pub fn new(name: impl Into<String>, data_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            data_type,
            ..Self::default()
        }
    }

    /// Whether this attribute is complex.
    pub fn is_complex(&self) -> bool {
        self.data_type == AttributeType::Complex
    }

    /// The effective multiplicity.
    ///
    /// When `multiValued` was absent from the schema document, complex
    /// attributes count as multi-valued and everything else as singular.
    pub fn is_multi_valued(&self) -> bool {
        self.multi_valued.unwrap_or_else(|| self.is_complex())
    }

    /// Find a sub-attribute definition by name.
    pub fn sub_schema_attribute(&self, name: &str) -> Option<&SchemaAttribute> {
        self.sub_attributes.iter().find(|a| a.name == name)
    }

    /// The first sub-attribute definition carrying canonical values.
    pub fn canonical_sub_attribute(&self) -> Option<&SchemaAttribute> {
        self.sub_attributes
            .iter()
            .find(|a| !a.canonical_values.is_empty())
    }
}

impl fmt::Display for SchemaAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}
