//! Resource descriptors: the schema set backing one resource instance.
//!
//! A [`ResourceDescriptor`] groups the core schema and any extension schemas
//! of a resource type and resolves dotted, colon-qualified attribute paths
//! against them. Schemas are held in insertion order so lookups are
//! deterministic; the first matching schema wins.

use crate::schema::attribute::{AttributeType, Mutability, Returned, SchemaAttribute, Uniqueness};
use crate::schema::descriptor::SchemaDescriptor;
use log::debug;

// The three reserved attribute names resolve to fixed definitions instead of
// anything a registered schema declares.

fn reserved_id() -> SchemaAttribute {
    SchemaAttribute {
        name: "id".to_string(),
        data_type: AttributeType::String,
        multi_valued: Some(false),
        description: "Unique identifier for a SCIM resource as defined by the service provider."
            .to_string(),
        required: false,
        case_exact: true,
        mutability: Mutability::ReadOnly,
        returned: Returned::Always,
        uniqueness: Uniqueness::Server,
        canonical_values: Vec::new(),
        sub_attributes: Vec::new(),
    }
}

fn reserved_meta() -> SchemaAttribute {
    let sub = |name: &str, data_type: AttributeType| SchemaAttribute {
        name: name.to_string(),
        data_type,
        multi_valued: Some(false),
        mutability: Mutability::ReadOnly,
        uniqueness: Uniqueness::None,
        ..SchemaAttribute::default()
    };
    SchemaAttribute {
        name: "meta".to_string(),
        data_type: AttributeType::Complex,
        multi_valued: Some(false),
        description: "A complex attribute containing resource metadata.".to_string(),
        required: false,
        case_exact: false,
        mutability: Mutability::ReadOnly,
        returned: Returned::Default,
        uniqueness: Uniqueness::None,
        canonical_values: Vec::new(),
        sub_attributes: vec![
            sub("created", AttributeType::DateTime),
            sub("lastModified", AttributeType::DateTime),
            sub("location", AttributeType::Reference),
            sub("resourceType", AttributeType::String),
        ],
    }
}

fn reserved_schemas() -> SchemaAttribute {
    SchemaAttribute {
        name: "schemas".to_string(),
        data_type: AttributeType::String,
        multi_valued: Some(true),
        description: "The URIs of the schemas used to define the attributes of this resource."
            .to_string(),
        required: true,
        case_exact: true,
        mutability: Mutability::ReadWrite,
        returned: Returned::Always,
        uniqueness: Uniqueness::None,
        canonical_values: Vec::new(),
        sub_attributes: Vec::new(),
    }
}

/// The ordered, URI-unique set of schemas describing one resource type.
///
/// ## Examples
///
/// ```rust
/// use scim_extension::schema::{
///     AttributeType, ResourceDescriptor, SchemaAttribute, SchemaDescriptor,
/// };
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut user = SchemaDescriptor::new("urn:x:User", "User", "User Account")?;
///     user.add(SchemaAttribute::new("userName", AttributeType::String));
///
///     let mut descriptor = ResourceDescriptor::new();
///     descriptor.add(user);
///     assert!(descriptor.get("userName").is_some());
///     assert!(descriptor.get("urn:x:User:userName").is_some());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceDescriptor {
    schemas: Vec<SchemaDescriptor>,
}

impl ResourceDescriptor {
    /// Create an empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a descriptor from a list of schemas, later duplicates
    /// replacing earlier ones by URI.
    pub fn with_schemas(schemas: Vec<SchemaDescriptor>) -> Self {
        let mut descriptor = Self::new();
        for schema in schemas {
            descriptor.add(schema);
        }
        descriptor
    }

    /// Add a schema, replacing any registered schema with the same URI.
    pub fn add(&mut self, schema: SchemaDescriptor) {
        match self.schemas.iter_mut().find(|s| s.uri() == schema.uri()) {
            Some(existing) => *existing = schema,
            None => self.schemas.push(schema),
        }
    }

    /// The registered schemas, in insertion order.
    pub fn schemas(&self) -> &[SchemaDescriptor] {
        &self.schemas
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether no schema is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Find a registered schema by its URI.
    pub fn schema_by_uri(&self, uri: &str) -> Option<&SchemaDescriptor> {
        self.schemas.iter().find(|s| s.uri() == uri)
    }

    /// The URIs of every registered schema, in order.
    pub fn schema_uris(&self) -> Vec<&str> {
        self.schemas.iter().map(SchemaDescriptor::uri).collect()
    }

    /// The core schema of this resource type.
    ///
    /// A lone registered schema counts as core whether or not it is flagged;
    /// otherwise the first schema flagged core wins.
    pub fn core_schema(&self) -> Option<&SchemaDescriptor> {
        if self.schemas.len() == 1 {
            return self.schemas.first();
        }
        self.schemas.iter().find(|s| s.is_core())
    }

    /// Resolve an attribute path to its schema definition.
    ///
    /// The reserved names `id`, `meta` and `schemas` short-circuit to fixed
    /// definitions. An unqualified path is prefixed with the core schema's
    /// URI. A path equal to a registered schema URI resolves to a synthetic
    /// complex definition wrapping that schema's whole attribute list.
    /// Otherwise the first registered schema whose URI prefixes the path
    /// owns it, and the dotted remainder descends that schema's attribute
    /// tree segment by segment; `None` when any segment fails to match,
    /// including paths deeper than the declared nesting. Prefix matching
    /// keeps the split unambiguous even though schema URNs themselves
    /// contain dots and colons.
    pub fn get(&self, path: &str) -> Option<SchemaAttribute> {
        match path {
            "id" => return Some(reserved_id()),
            "meta" => return Some(reserved_meta()),
            "schemas" => return Some(reserved_schemas()),
            _ => {}
        }

        let qualified = if path.contains(':') {
            path.to_string()
        } else {
            let core = match self.core_schema() {
                Some(core) => core,
                None => {
                    debug!("no core schema to qualify attribute path '{path}'");
                    return None;
                }
            };
            format!("{}:{path}", core.uri())
        };

        // A path naming a whole schema wraps its attribute list.
        if let Some(schema) = self.schema_by_uri(&qualified) {
            return Some(SchemaAttribute {
                name: schema.uri().to_string(),
                data_type: AttributeType::Complex,
                multi_valued: Some(false),
                description: schema.description().to_string(),
                sub_attributes: schema.attributes().to_vec(),
                ..SchemaAttribute::default()
            });
        }

        for schema in &self.schemas {
            let Some(rest) = qualified.strip_prefix(schema.uri()) else {
                continue;
            };
            let Some(rest) = rest.strip_prefix(':') else {
                continue;
            };
            let mut segments = rest.split('.');
            let mut current = schema.attribute(segments.next()?)?;
            for segment in segments {
                current = current.sub_schema_attribute(segment)?;
            }
            return Some(current.clone());
        }
        None
    }
}
