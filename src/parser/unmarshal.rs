//! JSON → model unmarshalling.
//!
//! Turns `serde_json::Value` trees into resources, attributes, schema
//! descriptors and the message envelopes, validating the input against the
//! schema metadata as it goes. The reverse direction lives in
//! [`crate::parser::marshal`].

use crate::error::{ScimError, ScimResult, ValidationError};
use crate::model::attribute::Attribute;
use crate::model::list_response::ListResponse;
use crate::model::patch::{Operation, OperationType, PatchRequest};
use crate::model::resource::{ID, META, ScimResource};
use crate::model::value::AttributeValue;
use crate::schema::attribute::{AttributeType, SchemaAttribute};
use crate::schema::descriptor::SchemaDescriptor;
use crate::schema::resource_descriptor::ResourceDescriptor;
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;

/// The JSON type name of a value, for error messages.
fn type_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() => "integer",
        Value::Number(_) => "decimal",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse a SCIM schema document into a [`SchemaDescriptor`].
pub fn schema_descriptor(node: &Value) -> ScimResult<SchemaDescriptor> {
    let obj = node
        .as_object()
        .ok_or_else(|| ScimError::invalid_structure("schema", "an object"))?;

    if let Some(declared) = obj
        .get("schemas")
        .and_then(Value::as_array)
        .and_then(|a| a.first())
        .and_then(Value::as_str)
    {
        if declared != SchemaDescriptor::SCHEMA {
            warn!("schema document declares unexpected URN '{declared}'");
        }
    }

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| ScimError::invalid_structure("id", "a string"))?;
    let name = obj.get("name").and_then(Value::as_str).unwrap_or_default();
    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let mut schema = SchemaDescriptor::new(id, name, description)?;

    if let Some(meta) = obj.get("meta").and_then(Value::as_object) {
        if let Some(location) = meta.get("location").and_then(Value::as_str) {
            schema.set_meta_location(location);
        }
        if let Some(resource_type) = meta.get("resourceType").and_then(Value::as_str) {
            schema.set_meta_resource_type(resource_type);
        }
    }

    if let Some(attributes) = obj.get("attributes").and_then(Value::as_array) {
        for attribute_node in attributes {
            let attribute: SchemaAttribute =
                serde_json::from_value(attribute_node.clone())?;
            schema.add(attribute);
        }
    }

    Ok(schema)
}

/// Parse a resource object into any [`ScimResource`] type.
///
/// Every top-level field other than the reserved `id` and `meta` must
/// resolve against the descriptor; multiplicity, scalar types and canonical
/// values are checked against the resolved definitions.
pub fn resource<T: ScimResource>(node: &Value, descriptor: &ResourceDescriptor) -> ScimResult<T> {
    let obj = node
        .as_object()
        .ok_or_else(|| ScimError::invalid_structure("resource", "an object"))?;

    debug!("unmarshalling resource with {} top-level attributes", obj.len());
    let mut parsed = T::from_descriptor(descriptor.clone());
    for (field, value) in obj {
        let schema_attribute = descriptor.get(field);
        if schema_attribute.is_none() && field != META && field != ID {
            return Err(ValidationError::unknown_attribute(field).into());
        }
        if let Some(canonical) = schema_attribute
            .as_ref()
            .and_then(SchemaAttribute::canonical_sub_attribute)
        {
            validate_canonical_values(field, value, canonical)?;
        }
        let parsed_attribute = attribute(schema_attribute.as_ref(), field, value)?;
        parsed.resource_mut().upsert(parsed_attribute);
    }
    Ok(parsed)
}

/// Parse one attribute value tree into an [`Attribute`].
///
/// With a schema definition at hand the JSON shape is validated against the
/// declared multiplicity and type; without one the shape alone decides.
pub fn attribute(
    schema: Option<&SchemaAttribute>,
    name: &str,
    node: &Value,
) -> ScimResult<Attribute> {
    if let Some(schema_attribute) = schema {
        if let Some(multi) = schema_attribute.multi_valued {
            if node.is_array() && !multi {
                return Err(ValidationError::ExpectedSingleValue {
                    attribute: name.to_string(),
                }
                .into());
            }
            if !node.is_array() && multi {
                return Err(ValidationError::ExpectedMultiValue {
                    attribute: name.to_string(),
                }
                .into());
            }
        }
    }

    match node {
        Value::Array(elements) => multi_valued(schema, name, elements),
        Value::Object(_) => Ok(Attribute::singular(name, complex_value(schema, name, node)?)?),
        Value::String(_) | Value::Bool(_) | Value::Number(_) => {
            Ok(Attribute::singular(name, simple_value(schema, name, node)?)?)
        }
        Value::Null => Err(ValidationError::invalid_type(
            name,
            schema.map(|s| s.data_type.as_str()).unwrap_or("value"),
            "null",
        )
        .into()),
    }
}

fn multi_valued(
    schema: Option<&SchemaAttribute>,
    name: &str,
    elements: &[Value],
) -> ScimResult<Attribute> {
    let mut values = Vec::with_capacity(elements.len());
    for element in elements {
        match element {
            Value::Object(_) => values.push(complex_value(schema, name, element)?),
            Value::String(_) | Value::Bool(_) | Value::Number(_) => {
                values.push(simple_value(schema, name, element)?)
            }
            other => {
                return Err(ValidationError::invalid_type(
                    name,
                    "string, number, boolean or object",
                    type_of(other),
                )
                .into());
            }
        }
    }
    Ok(Attribute::multi_valued(name, values)?)
}

fn simple_value(
    schema: Option<&SchemaAttribute>,
    name: &str,
    node: &Value,
) -> ScimResult<AttributeValue> {
    let declared = schema.map(|s| s.data_type);
    match node {
        Value::String(text) => match declared {
            None | Some(AttributeType::String) => Ok(AttributeValue::from(text.clone())),
            Some(AttributeType::Reference) => Ok(AttributeValue::reference(text.clone())),
            // DateTime stays textual on the wire; programmatic construction
            // uses the native DateTime variant.
            Some(AttributeType::DateTime) => Ok(AttributeValue::from(text.clone())),
            Some(AttributeType::Binary) => Ok(AttributeValue::binary_from_base64(text)?),
            Some(other) => {
                Err(ValidationError::invalid_type(name, other.as_str(), "string").into())
            }
        },
        Value::Bool(flag) => match declared {
            None | Some(AttributeType::Boolean) => Ok(AttributeValue::from(*flag)),
            Some(other) => {
                Err(ValidationError::invalid_type(name, other.as_str(), "boolean").into())
            }
        },
        Value::Number(number) => match declared {
            Some(AttributeType::Integer) => number
                .as_i64()
                .map(AttributeValue::from)
                .ok_or_else(|| {
                    ValidationError::invalid_type(name, "integer", "decimal").into()
                }),
            Some(AttributeType::Decimal) => number
                .as_f64()
                .map(AttributeValue::from)
                .ok_or_else(|| {
                    ValidationError::invalid_type(name, "decimal", "number").into()
                }),
            None => Ok(number
                .as_i64()
                .map(AttributeValue::from)
                .or_else(|| number.as_f64().map(AttributeValue::from))
                .unwrap_or(AttributeValue::Integer(0))),
            Some(other) => {
                Err(ValidationError::invalid_type(name, other.as_str(), type_of(node)).into())
            }
        },
        other => {
            Err(ValidationError::invalid_type(name, "a scalar", type_of(other)).into())
        }
    }
}

fn complex_value(
    schema: Option<&SchemaAttribute>,
    name: &str,
    node: &Value,
) -> ScimResult<AttributeValue> {
    if let Some(schema_attribute) = schema {
        if schema_attribute.sub_attributes.is_empty() {
            return Err(ValidationError::MissingSubAttributes {
                attribute: name.to_string(),
            }
            .into());
        }
    }

    let obj = node
        .as_object()
        .ok_or_else(|| ScimError::invalid_structure(name, "an object"))?;

    let mut attributes = Vec::with_capacity(obj.len());
    for (key, value) in obj {
        let sub_schema = schema.and_then(|s| s.sub_schema_attribute(key));
        if schema.is_some() && sub_schema.is_none() {
            return Err(ValidationError::UnknownSubAttribute {
                attribute: name.to_string(),
                sub_attribute: key.clone(),
            }
            .into());
        }
        attributes.push(attribute(sub_schema, key, value)?);
    }
    Ok(AttributeValue::complex(attributes))
}

/// Check a multi-valued attribute against the canonical values declared by
/// one of its sub-attributes.
///
/// The candidate is lower-cased before comparison against the canonical
/// list, and each canonical value may appear at most once across the array.
fn validate_canonical_values(
    name: &str,
    node: &Value,
    canonical: &SchemaAttribute,
) -> ScimResult<()> {
    let Some(elements) = node.as_array() else {
        return Ok(());
    };
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for element in elements {
        let Some(obj) = element.as_object() else {
            continue;
        };
        let Some(candidate) = obj.get(&canonical.name).and_then(Value::as_str) else {
            continue;
        };
        if !canonical
            .canonical_values
            .contains(&candidate.to_lowercase())
        {
            return Err(ValidationError::InvalidCanonicalValue {
                attribute: name.to_string(),
                value: candidate.to_string(),
                allowed: canonical.canonical_values.clone(),
            }
            .into());
        }
        let count = seen.entry(candidate).or_insert(0);
        *count += 1;
        if *count > 1 {
            return Err(ValidationError::DuplicateCanonicalValue {
                attribute: canonical.name.clone(),
                value: candidate.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

/// Parse a SCIM list response into a [`ListResponse`].
///
/// `totalResults` defaults to 1 and the paging counters to 0 when absent;
/// a missing or non-array `Resources` member is an error.
pub fn list_response<T: ScimResource>(
    node: &Value,
    descriptor: &ResourceDescriptor,
) -> ScimResult<ListResponse<T>> {
    let total_results = node.get("totalResults").and_then(Value::as_u64).unwrap_or(1);
    let start_index = node.get("startIndex").and_then(Value::as_u64).unwrap_or(0);
    let items_per_page = node.get("itemsPerPage").and_then(Value::as_u64).unwrap_or(0);

    let resource_nodes = node
        .get("Resources")
        .and_then(Value::as_array)
        .ok_or_else(|| ScimError::invalid_structure("Resources", "an array"))?;

    let mut resources = Vec::with_capacity(resource_nodes.len());
    for resource_node in resource_nodes {
        resources.push(resource::<T>(resource_node, descriptor)?);
    }

    Ok(ListResponse::new(
        resources,
        total_results,
        start_index,
        items_per_page,
    ))
}

/// Parse a SCIM PatchOp message into a [`PatchRequest`].
///
/// The envelope must declare the PatchOp URN and may only carry `schemas`
/// and `Operations`. Each operation needs a valid `op`; add/replace require
/// a value and remove forbids one.
pub fn patch_request(node: &Value, descriptor: &ResourceDescriptor) -> ScimResult<PatchRequest> {
    let obj = node
        .as_object()
        .ok_or_else(|| ScimError::invalid_structure("patch request", "an object"))?;

    let mut patch = PatchRequest::from_descriptor(descriptor.clone());
    for (key, value) in obj {
        match key.as_str() {
            "schemas" => {
                let schemas = value
                    .as_array()
                    .filter(|a| !a.is_empty())
                    .ok_or_else(|| {
                        ScimError::invalid_structure("schemas", "a non-empty array")
                    })?;
                let declared = schemas[0].as_str().unwrap_or_default();
                if declared != PatchRequest::SCHEMA {
                    return Err(ScimError::IncorrectSchema {
                        expected: PatchRequest::SCHEMA.to_string(),
                        actual: declared.to_string(),
                    });
                }
            }
            // The registered patch schema names this attribute in lower case
            // while the wire format capitalizes it.
            "Operations" => {
                let schema_attribute = descriptor
                    .get("operations")
                    .ok_or_else(|| ValidationError::unknown_attribute("operations"))?;
                if schema_attribute.is_multi_valued() && !value.is_array() {
                    return Err(ValidationError::ExpectedMultiValue {
                        attribute: key.clone(),
                    }
                    .into());
                }
                if let Some(operation_nodes) = value.as_array() {
                    for operation_node in operation_nodes {
                        patch.add_operation(operation(&schema_attribute, operation_node)?);
                    }
                }
            }
            other => return Err(ValidationError::unknown_attribute(other).into()),
        }
    }
    Ok(patch)
}

fn operation(schema: &SchemaAttribute, node: &Value) -> ScimResult<Operation> {
    let obj = node
        .as_object()
        .ok_or_else(|| ScimError::invalid_structure("Operations", "an array of objects"))?;

    for key in obj.keys() {
        if schema.sub_schema_attribute(key).is_none() {
            return Err(ValidationError::UnknownSubAttribute {
                attribute: "operations".to_string(),
                sub_attribute: key.clone(),
            }
            .into());
        }
    }

    let op_name = obj
        .get("op")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ValidationError::missing_required("op"))?;
    let op = OperationType::from_name(op_name).ok_or_else(|| {
        ScimError::InvalidOperationType {
            value: op_name.to_string(),
        }
    })?;
    let path = obj.get("path").and_then(Value::as_str).map(str::to_string);

    match (op, obj.get("value")) {
        (OperationType::Remove, Some(_)) => Err(ScimError::UnexpectedOperationValue),
        (OperationType::Remove, None) => Ok(Operation::new(op, path, None)),
        (_, None) => Err(ScimError::MissingOperationValue {
            op: op.name().to_string(),
        }),
        (_, Some(value_node)) => {
            let value = attribute(None, "value", value_node)?;
            Ok(Operation::new(op, path, Some(value)))
        }
    }
}
