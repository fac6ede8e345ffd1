//! SCIM PATCH messages: operations and the PatchOp request envelope.

use crate::model::attribute::Attribute;
use crate::model::resource::{Resource, ScimResource};
use crate::schema::resource_descriptor::ResourceDescriptor;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The kind of a patch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    /// Add a new attribute or value
    Add,
    /// Remove an attribute or value
    Remove,
    /// Replace an attribute value
    Replace,
}

impl OperationType {
    /// Parse an operation name, case-insensitively.
    ///
    /// Returns `None` for anything but add/remove/replace; callers treat
    /// that as a validation failure.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            "replace" => Some(Self::Replace),
            _ => None,
        }
    }

    /// The wire name of this operation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Replace => "replace",
        }
    }
}

impl FromStr for OperationType {
    type Err = crate::error::ScimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| crate::error::ScimError::InvalidOperationType {
            value: s.to_string(),
        })
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One patch operation: an operation type, an optional attribute path and
/// an optional value.
///
/// The triple itself is dumb storage; whether a value is required or
/// forbidden for the operation type is enforced where patch requests are
/// parsed, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    op: OperationType,
    path: Option<String>,
    value: Option<Attribute>,
}

impl Operation {
    /// Create a patch operation.
    pub fn new(op: OperationType, path: Option<String>, value: Option<Attribute>) -> Self {
        Self { op, path, value }
    }

    /// The operation type.
    pub fn op(&self) -> OperationType {
        self.op
    }

    /// The attribute path this operation targets, if any.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The value carried by this operation, if any.
    pub fn value(&self) -> Option<&Attribute> {
        self.value.as_ref()
    }

    /// Render the operation as a JSON object.
    ///
    /// The value attribute contributes its own `"name":value` member, so a
    /// parsed operation round-trips with its `value` key intact.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("op".to_string(), Value::String(self.op.name().to_string()));
        if let Some(path) = &self.path {
            if !path.is_empty() {
                map.insert("path".to_string(), Value::String(path.clone()));
            }
        }
        if let Some(value) = &self.value {
            map.insert(value.name().to_string(), value.value_json());
        }
        Value::Object(map)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// A SCIM PatchOp request: an ordered list of operations.
///
/// ## Examples
///
/// ```rust
/// use scim_extension::model::{Attribute, Operation, OperationType, PatchRequest, ScimResource};
/// use scim_extension::schema::ResourceDescriptor;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut patch = PatchRequest::from_descriptor(ResourceDescriptor::new());
///     patch.add_operation(Operation::new(
///         OperationType::Add,
///         Some("emails".to_string()),
///         Some(Attribute::singular("value", "a@example.com".into())?),
///     ));
///     assert_eq!(patch.operations().len(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PatchRequest {
    descriptor: ResourceDescriptor,
    resource: Resource,
    operations: Vec<Operation>,
}

impl PatchRequest {
    /// Schema URN every patch request declares.
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

    /// Append an operation.
    pub fn add_operation(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// The operations, in request order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }
}

impl ScimResource for PatchRequest {
    fn from_descriptor(descriptor: ResourceDescriptor) -> Self {
        let mut resource = Resource::new();
        if let Ok(attribute) = Attribute::multi_valued(
            crate::model::resource::SCHEMAS,
            vec![Self::SCHEMA.into()],
        ) {
            let _ = resource.add(attribute);
        }
        Self {
            descriptor,
            resource,
            operations: Vec::new(),
        }
    }

    fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }

    /// Render the patch request as its PatchOp JSON envelope.
    fn to_json(&self) -> Value {
        let schemas = {
            let declared = self.schemas();
            if declared.is_empty() {
                vec![Value::String(Self::SCHEMA.to_string())]
            } else {
                declared
                    .into_iter()
                    .map(|s| Value::String(s.to_string()))
                    .collect()
            }
        };
        let mut map = Map::new();
        map.insert("schemas".to_string(), Value::Array(schemas));
        map.insert(
            "Operations".to_string(),
            Value::Array(self.operations.iter().map(Operation::to_json).collect()),
        );
        Value::Object(map)
    }
}

impl fmt::Display for PatchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ScimResource::to_json(self))
    }
}
