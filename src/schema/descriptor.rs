//! Schema descriptors.
//!
//! A [`SchemaDescriptor`] declares one SCIM schema: its URI, naming, meta
//! information and ordered attribute definitions. It also derives the
//! qualified key sets (required, readWrite) used when resources are checked
//! or provisioned attribute by attribute.

use crate::error::{ScimError, ScimResult};
use crate::schema::attribute::{Mutability, SchemaAttribute};
use serde_json::{Map, Value};
use std::fmt;
use url::Url;

/// One declared SCIM schema.
///
/// The URI is validated at construction; a malformed URI is an explicit
/// [`ScimError::MalformedSchemaUri`] instead of a silently empty scheme.
///
/// ## Examples
///
/// ```rust
/// use scim_extension::schema::{AttributeType, SchemaAttribute, SchemaDescriptor};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut schema = SchemaDescriptor::new(
///         "urn:ietf:params:scim:schemas:core:2.0:User",
///         "User",
///         "User Account",
///     )?;
///     schema.add(SchemaAttribute::new("userName", AttributeType::String));
///     assert!(schema.attribute("userName").is_some());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescriptor {
    uri: String,
    name: String,
    description: String,
    meta_location: Option<String>,
    meta_resource_type: Option<String>,
    attributes: Vec<SchemaAttribute>,
    core: bool,
}

impl SchemaDescriptor {
    /// Schema URN declared by rendered schema documents.
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:schemas:core:2.0:Schema";

    /// Create a schema descriptor with a validated URI.
    pub fn new(
        uri: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> ScimResult<Self> {
        let uri = uri.into();
        Self::validate_uri(&uri)?;
        Ok(Self {
            uri,
            name: name.into(),
            description: description.into(),
            meta_location: None,
            meta_resource_type: None,
            attributes: Vec::new(),
            core: false,
        })
    }

    fn validate_uri(uri: &str) -> ScimResult<()> {
        Url::parse(uri).map_err(|e| ScimError::malformed_uri(uri, e.to_string()))?;
        Ok(())
    }

    /// The schema URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Replace the schema URI, validating it.
    pub fn set_uri(&mut self, uri: impl Into<String>) -> ScimResult<()> {
        let uri = uri.into();
        Self::validate_uri(&uri)?;
        self.uri = uri;
        Ok(())
    }

    /// The human-readable schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The schema description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The meta location URI, if set.
    pub fn meta_location(&self) -> Option<&str> {
        self.meta_location.as_deref()
    }

    /// Set the meta location URI.
    pub fn set_meta_location(&mut self, location: impl Into<String>) {
        self.meta_location = Some(location.into());
    }

    /// The meta resource type, if set.
    pub fn meta_resource_type(&self) -> Option<&str> {
        self.meta_resource_type.as_deref()
    }

    /// Set the meta resource type.
    pub fn set_meta_resource_type(&mut self, resource_type: impl Into<String>) {
        self.meta_resource_type = Some(resource_type.into());
    }

    /// Whether this schema is the core schema of its resource type.
    pub fn is_core(&self) -> bool {
        self.core
    }

    /// Mark or unmark this schema as the core schema.
    pub fn set_core(&mut self, core: bool) {
        self.core = core;
    }

    /// Append an attribute definition.
    pub fn add(&mut self, attribute: SchemaAttribute) {
        self.attributes.push(attribute);
    }

    /// The attribute definitions, in declaration order.
    pub fn attributes(&self) -> &[SchemaAttribute] {
        &self.attributes
    }

    /// Find a top-level attribute definition by name.
    pub fn attribute(&self, name: &str) -> Option<&SchemaAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Qualified keys of every required leaf attribute.
    ///
    /// Keys are `uri:top.nested.leaf` — colon after the schema URI, dots
    /// between nested segments. Only leaves (definitions without
    /// sub-attributes) contribute.
    pub fn required_attribute_keys(&self) -> Vec<String> {
        self.collect_leaf_keys(&|attribute| attribute.required)
    }

    /// Qualified keys of every readWrite leaf attribute.
    pub fn read_write_attribute_keys(&self) -> Vec<String> {
        self.collect_leaf_keys(&|attribute| attribute.mutability == Mutability::ReadWrite)
    }

    fn collect_leaf_keys(&self, include: &dyn Fn(&SchemaAttribute) -> bool) -> Vec<String> {
        let mut keys = Vec::new();
        for attribute in &self.attributes {
            Self::collect_keys(attribute, &self.uri, true, include, &mut keys);
        }
        keys
    }

    fn collect_keys(
        attribute: &SchemaAttribute,
        prefix: &str,
        root: bool,
        include: &dyn Fn(&SchemaAttribute) -> bool,
        keys: &mut Vec<String>,
    ) {
        let separator = if root { ':' } else { '.' };
        let key = format!("{prefix}{separator}{}", attribute.name);
        if attribute.sub_attributes.is_empty() {
            if include(attribute) {
                keys.push(key);
            }
        } else {
            for sub in &attribute.sub_attributes {
                Self::collect_keys(sub, &key, false, include, keys);
            }
        }
    }

    /// Render this schema as its SCIM schema document.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            "schemas".to_string(),
            Value::Array(vec![Value::String(Self::SCHEMA.to_string())]),
        );
        map.insert("id".to_string(), Value::String(self.uri.clone()));
        map.insert(
            "attributes".to_string(),
            serde_json::to_value(&self.attributes).unwrap_or(Value::Array(Vec::new())),
        );
        map.insert("name".to_string(), Value::String(self.name.clone()));
        let mut meta = Map::new();
        if let Some(location) = &self.meta_location {
            meta.insert("location".to_string(), Value::String(location.clone()));
        }
        if let Some(resource_type) = &self.meta_resource_type {
            meta.insert(
                "resourceType".to_string(),
                Value::String(resource_type.clone()),
            );
        }
        map.insert("meta".to_string(), Value::Object(meta));
        map.insert(
            "description".to_string(),
            Value::String(self.description.clone()),
        );
        Value::Object(map)
    }
}

impl fmt::Display for SchemaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
