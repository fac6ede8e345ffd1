//! Attribute values for the SCIM data model.
//!
//! An [`AttributeValue`] is either a scalar of one of the seven SCIM data
//! types or a complex value carrying nested attributes. The two cases are
//! mutually exclusive by construction; there is no way to build a value that
//! is both, or neither.

use crate::error::{ValidationError, ValidationResult};
use crate::model::attribute::Attribute;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::fmt;

/// One value held by an attribute.
///
/// Scalar variants correspond to the SCIM data types of RFC 7643 §2.3; the
/// `Complex` variant holds the sub-attributes of a complex attribute. Typed
/// accessors return [`ValidationError::ValueTypeMismatch`] instead of
/// panicking when the stored kind disagrees with the requested one, so a
/// caller that does not know the declared SCIM type can still probe safely.
///
/// ## Examples
///
/// ```rust
/// use scim_extension::model::AttributeValue;
///
/// let value = AttributeValue::from("jdoe");
/// assert_eq!(value.string_value().unwrap(), "jdoe");
/// assert!(value.boolean_value().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// UTF-8 string value
    String(String),
    /// Boolean value
    Boolean(bool),
    /// Integer number
    Integer(i64),
    /// Decimal number
    Decimal(f64),
    /// Timestamp, rendered as RFC 3339 with millisecond precision
    DateTime(DateTime<Utc>),
    /// URI reference
    Reference(String),
    /// Binary content, rendered base64-encoded
    Binary(Vec<u8>),
    /// Nested sub-attributes of a complex attribute
    Complex(Vec<Attribute>),
}

impl AttributeValue {
    /// Create a reference value from a URI string.
    pub fn reference(uri: impl Into<String>) -> Self {
        Self::Reference(uri.into())
    }

    /// Create a binary value from raw bytes.
    pub fn binary(data: Vec<u8>) -> Self {
        Self::Binary(data)
    }

    /// Create a binary value from its base64 encoding.
    pub fn binary_from_base64(encoded: &str) -> ValidationResult<Self> {
        let data = BASE64
            .decode(encoded)
            .map_err(|e| ValidationError::custom(format!("invalid base64 data: {e}")))?;
        Ok(Self::Binary(data))
    }

    /// Create a complex value from nested attributes.
    pub fn complex(sub_attributes: Vec<Attribute>) -> Self {
        Self::Complex(sub_attributes)
    }

    /// The SCIM type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Decimal(_) => "decimal",
            Self::DateTime(_) => "dateTime",
            Self::Reference(_) => "reference",
            Self::Binary(_) => "binary",
            Self::Complex(_) => "complex",
        }
    }

    /// Whether this value holds nested sub-attributes.
    pub fn is_complex(&self) -> bool {
        matches!(self, Self::Complex(_))
    }

    fn mismatch<T>(&self, expected: &'static str) -> ValidationResult<T> {
        Err(ValidationError::ValueTypeMismatch {
            expected,
            actual: self.type_name(),
        })
    }

    /// The string value, or a type mismatch error.
    pub fn string_value(&self) -> ValidationResult<&str> {
        match self {
            Self::String(s) => Ok(s),
            _ => self.mismatch("string"),
        }
    }

    /// The boolean value, or a type mismatch error.
    pub fn boolean_value(&self) -> ValidationResult<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            _ => self.mismatch("boolean"),
        }
    }

    /// The integer value, or a type mismatch error.
    pub fn integer_value(&self) -> ValidationResult<i64> {
        match self {
            Self::Integer(i) => Ok(*i),
            _ => self.mismatch("integer"),
        }
    }

    /// The decimal value, or a type mismatch error.
    pub fn decimal_value(&self) -> ValidationResult<f64> {
        match self {
            Self::Decimal(d) => Ok(*d),
            _ => self.mismatch("decimal"),
        }
    }

    /// The timestamp value, or a type mismatch error.
    pub fn date_time_value(&self) -> ValidationResult<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Ok(*dt),
            _ => self.mismatch("dateTime"),
        }
    }

    /// The reference URI, or a type mismatch error.
    pub fn reference_value(&self) -> ValidationResult<&str> {
        match self {
            Self::Reference(uri) => Ok(uri),
            _ => self.mismatch("reference"),
        }
    }

    /// The binary content, or a type mismatch error.
    pub fn binary_value(&self) -> ValidationResult<&[u8]> {
        match self {
            Self::Binary(data) => Ok(data),
            _ => self.mismatch("binary"),
        }
    }

    /// The nested sub-attributes of a complex value, `None` for scalars.
    pub fn sub_attributes(&self) -> Option<&[Attribute]> {
        match self {
            Self::Complex(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Find a sub-attribute by name.
    ///
    /// Case-sensitive exact match over the nested attributes; `None` when the
    /// name is absent or when called on a scalar value.
    pub fn sub_attribute(&self, name: &str) -> Option<&Attribute> {
        self.sub_attributes()?.iter().find(|a| a.name() == name)
    }

    /// The string value of a named sub-attribute, if present.
    pub fn sub_attribute_string(&self, name: &str) -> Option<&str> {
        self.sub_attribute(name)?.value()?.string_value().ok()
    }

    /// The string value of a named sub-attribute, or `default` when absent.
    pub fn sub_attribute_string_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.sub_attribute_string(name).unwrap_or(default)
    }

    /// Render this value as a JSON tree.
    ///
    /// Complex values become objects of their sub-attribute fragments;
    /// binary content is base64-encoded and timestamps are rendered RFC 3339
    /// with millisecond precision.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Integer(i) => Value::Number((*i).into()),
            Self::Decimal(d) => serde_json::Number::from_f64(*d)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::DateTime(dt) => {
                Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Self::Reference(uri) => Value::String(uri.clone()),
            Self::Binary(data) => Value::String(BASE64.encode(data)),
            Self::Complex(attrs) => {
                let mut map = Map::new();
                for attribute in attrs {
                    map.insert(attribute.name().to_string(), attribute.value_json());
                }
                Value::Object(map)
            }
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<Vec<Attribute>> for AttributeValue {
    fn from(value: Vec<Attribute>) -> Self {
        Self::Complex(value)
    }
}
