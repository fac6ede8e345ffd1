//! Meta value object for SCIM resource metadata.
//!
//! A small validated carrier for the `meta` complex attribute: creation and
//! modification timestamps, resource location and resource type. Conversion
//! to and from the attribute tree keeps the sub-attribute layout in one
//! place.

use crate::error::{ValidationError, ValidationResult};
use crate::model::attribute::Attribute;
use crate::model::value::AttributeValue;
use chrono::{DateTime, Utc};

/// Sub-attribute names of the `meta` complex attribute, in rendering order.
pub const CREATED: &str = "created";
pub const LAST_MODIFIED: &str = "lastModified";
pub const LOCATION: &str = "location";
pub const RESOURCE_TYPE: &str = "resourceType";

/// Validated metadata for a SCIM resource.
///
/// ## Validation Rules
///
/// - Resource type must not be empty
/// - Last modified must not be before the created timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    resource_type: String,
    created: DateTime<Utc>,
    last_modified: DateTime<Utc>,
    location: Option<String>,
}

impl Meta {
    /// Create a new Meta with validation.
    pub fn new(
        resource_type: impl Into<String>,
        created: DateTime<Utc>,
        last_modified: DateTime<Utc>,
        location: Option<String>,
    ) -> ValidationResult<Self> {
        let resource_type = resource_type.into();
        if resource_type.is_empty() {
            return Err(ValidationError::InvalidMeta {
                detail: "resource type must not be empty".to_string(),
            });
        }
        if last_modified < created {
            return Err(ValidationError::InvalidMeta {
                detail: "lastModified precedes created".to_string(),
            });
        }
        Ok(Self {
            resource_type,
            created,
            last_modified,
            location,
        })
    }

    /// Create a Meta for a newly created resource.
    ///
    /// Both timestamps are set to the current time.
    pub fn now(resource_type: impl Into<String>) -> ValidationResult<Self> {
        let now = Utc::now();
        Self::new(resource_type, now, now, None)
    }

    /// Get the resource type.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Get the created timestamp.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Get the last modified timestamp.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Get the location URI.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Set the location, preserving all other fields.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// A copy with the last modified timestamp advanced to now.
    pub fn touched(&self) -> Self {
        Self {
            last_modified: Utc::now(),
            ..self.clone()
        }
    }

    /// Build the singular complex `meta` attribute for a resource.
    pub fn to_attribute(&self) -> ValidationResult<Attribute> {
        let mut subs = vec![
            Attribute::singular(CREATED, AttributeValue::DateTime(self.created))?,
            Attribute::singular(LAST_MODIFIED, AttributeValue::DateTime(self.last_modified))?,
        ];
        if let Some(location) = &self.location {
            subs.push(Attribute::singular(
                LOCATION,
                AttributeValue::reference(location.clone()),
            )?);
        }
        subs.push(Attribute::singular(
            RESOURCE_TYPE,
            AttributeValue::from(self.resource_type.clone()),
        )?);
        Attribute::singular(crate::model::resource::META, AttributeValue::complex(subs))
    }
}
