//! Error types for the SCIM object model.
//!
//! Lookup APIs return `Option` for plain "not found"; everything that can
//! actually go wrong is reported through these enums so callers can tell a
//! malformed input from a type mismatch.

/// Top-level error type for schema handling and JSON marshalling.
#[derive(Debug, thiserror::Error)]
pub enum ScimError {
    /// Attribute or value data violates the model's invariants
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No registered schema matches the given URI
    #[error("schema not found: {uri}")]
    SchemaNotFound { uri: String },

    /// An attribute filter path does not resolve against the descriptor
    #[error("attribute not found: {path}")]
    AttributeNotFound { path: String },

    /// A schema URI failed URI syntax validation
    #[error("malformed schema URI '{uri}': {detail}")]
    MalformedSchemaUri { uri: String, detail: String },

    /// `attributes` and `excludedAttributes` filters given at the same time
    #[error("attributes and excludedAttributes are mutually exclusive")]
    ConflictingAttributeFilters,

    /// A JSON document does not have the structure the message requires
    #[error("invalid JSON structure: '{field}' must be {expected}")]
    InvalidJsonStructure { field: String, expected: String },

    /// A message carries a schema URN other than the one it must declare
    #[error("incorrect schema URN '{actual}', expected '{expected}'")]
    IncorrectSchema { expected: String, actual: String },

    /// The `op` member of a patch operation is not add/remove/replace
    #[error("invalid patch operation type: {value}")]
    InvalidOperationType { value: String },

    /// A patch add/replace operation without a value
    #[error("missing 'value' for {op} operation")]
    MissingOperationValue { op: String },

    /// A patch remove operation carrying a value
    #[error("the 'remove' operation must not contain a value")]
    UnexpectedOperationValue,
}

/// Validation errors raised while building or parsing the attribute tree.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Attribute name has no definition in the resource's schemas
    #[error("attribute '{attribute}' is not defined by any declared schema")]
    UnknownAttribute { attribute: String },

    /// Complex attribute carries a sub-attribute its schema does not define
    #[error("attribute '{attribute}' has no sub-attribute '{sub_attribute}'")]
    UnknownSubAttribute {
        attribute: String,
        sub_attribute: String,
    },

    /// Complex data supplied for a schema attribute without sub-attributes
    #[error("attribute '{attribute}' does not define sub-attributes")]
    MissingSubAttributes { attribute: String },

    /// Attribute value does not match the type its schema declares
    #[error("attribute '{attribute}' has invalid type, expected {expected}, got {actual}")]
    InvalidAttributeType {
        attribute: String,
        expected: String,
        actual: String,
    },

    /// Typed accessor called on a value of a different kind
    #[error("value type mismatch, expected {expected}, got {actual}")]
    ValueTypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Single value supplied for a multi-valued attribute
    #[error("attribute '{attribute}' must be multi-valued (array)")]
    ExpectedMultiValue { attribute: String },

    /// Array supplied for a single-valued attribute
    #[error("attribute '{attribute}' must be single-valued (not array)")]
    ExpectedSingleValue { attribute: String },

    /// Value outside the canonical value set
    #[error("attribute '{attribute}' has invalid value '{value}', allowed values: {allowed:?}")]
    InvalidCanonicalValue {
        attribute: String,
        value: String,
        allowed: Vec<String>,
    },

    /// The same canonical value used twice within one multi-valued attribute
    #[error("duplicate canonical value '{value}' in attribute '{attribute}'")]
    DuplicateCanonicalValue { attribute: String, value: String },

    /// Attribute constructed with an empty value array
    #[error("attribute '{attribute}' must carry at least one value")]
    EmptyValues { attribute: String },

    /// Attribute constructed with an empty name
    #[error("attribute name must not be empty")]
    EmptyAttributeName,

    /// Second attribute with the same name added to a resource
    #[error("duplicate attribute '{attribute}' in resource")]
    DuplicateAttribute { attribute: String },

    /// Required member missing from a message
    #[error("required attribute '{attribute}' is missing")]
    MissingRequiredAttribute { attribute: String },

    /// Meta value object violates its construction rules
    #[error("invalid meta: {detail}")]
    InvalidMeta { detail: String },

    /// General validation error with custom message
    #[error("validation failed: {message}")]
    Custom { message: String },
}

// Convenience constructors for the error sites scattered through the parser.
impl ScimError {
    /// Create a schema not found error.
    pub fn schema_not_found(uri: impl Into<String>) -> Self {
        Self::SchemaNotFound { uri: uri.into() }
    }

    /// Create an attribute not found error for a filter path.
    pub fn attribute_not_found(path: impl Into<String>) -> Self {
        Self::AttributeNotFound { path: path.into() }
    }

    /// Create a malformed schema URI error.
    pub fn malformed_uri(uri: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedSchemaUri {
            uri: uri.into(),
            detail: detail.into(),
        }
    }

    /// Create an invalid JSON structure error.
    pub fn invalid_structure(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidJsonStructure {
            field: field.into(),
            expected: expected.into(),
        }
    }
}

impl ValidationError {
    /// Create an unknown attribute error.
    pub fn unknown_attribute(attribute: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            attribute: attribute.into(),
        }
    }

    /// Create an invalid type error.
    pub fn invalid_type(
        attribute: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidAttributeType {
            attribute: attribute.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a missing required attribute error.
    pub fn missing_required(attribute: impl Into<String>) -> Self {
        Self::MissingRequiredAttribute {
            attribute: attribute.into(),
        }
    }

    /// Create a custom validation error.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }
}

// Result type aliases for convenience
pub type ScimResult<T> = Result<T, ScimError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
