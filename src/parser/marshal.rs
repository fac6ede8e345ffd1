//! Model → JSON marshalling with attribute filtering.
//!
//! [`resource_to_json`] is the filtered counterpart of the plain
//! `to_json`/`Display` rendering on the model types: it honors the
//! `attributes` (emit) and `excludedAttributes` (omit) request parameters
//! and the `returned` characteristic of each attribute definition.
//! [`list_response_to_json`] adds pagination windowing on top.

use crate::error::{ScimError, ScimResult};
use crate::model::attribute::Attribute;
use crate::model::list_response::ListResponse;
use crate::model::resource::ScimResource;
use crate::model::value::AttributeValue;
use crate::schema::attribute::{Returned, SchemaAttribute};
use crate::schema::resource_descriptor::ResourceDescriptor;
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Render a resource as JSON, honoring attribute filters.
///
/// `omit` maps to `excludedAttributes`, `emit` to `attributes`; supplying
/// both is an error, and every filter path must resolve against the
/// resource's descriptor. Attributes whose definition says
/// `returned: always` bypass the filters; `never` and `request` attributes
/// are not rendered at all.
pub fn resource_to_json<R: ScimResource>(
    resource: &R,
    omit: Option<&HashSet<String>>,
    emit: Option<&HashSet<String>>,
) -> ScimResult<Value> {
    let descriptor = resource.descriptor();

    let has_omit = omit.is_some_and(|set| !set.is_empty());
    let has_emit = emit.is_some_and(|set| !set.is_empty());
    if has_omit && has_emit {
        return Err(ScimError::ConflictingAttributeFilters);
    }

    let omit = normalize_filter(omit, descriptor)?;
    let emit = normalize_filter(emit, descriptor)?;
    let schema_uris: Vec<String> = descriptor
        .schema_uris()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut map = Map::new();
    for attribute in resource.resource() {
        let path = attribute.name().to_string();
        let schema_attribute = descriptor.get(attribute.name());
        match schema_attribute.as_ref().map(|s| s.returned) {
            Some(Returned::Always) => {
                append_attribute(
                    &mut map,
                    attribute,
                    schema_attribute.as_ref(),
                    &HashSet::new(),
                    &HashSet::new(),
                    &path,
                    &schema_uris,
                );
            }
            Some(Returned::Never) | Some(Returned::Request) => continue,
            Some(Returned::Default) | None => {
                if is_excluded(&path, &omit) {
                    continue;
                }
                if !emit.is_empty() && !is_emitted(&path, &emit) {
                    continue;
                }
                append_attribute(
                    &mut map,
                    attribute,
                    schema_attribute.as_ref(),
                    &omit,
                    &emit,
                    &path,
                    &schema_uris,
                );
            }
        }
    }
    Ok(Value::Object(map))
}

/// Resolve and core-qualify a filter set.
///
/// Every path must name a known attribute; paths qualified with the core
/// schema's URI are stripped down to their bare form so they compare
/// against the paths built during rendering.
fn normalize_filter(
    filter: Option<&HashSet<String>>,
    descriptor: &ResourceDescriptor,
) -> ScimResult<HashSet<String>> {
    let Some(filter) = filter else {
        return Ok(HashSet::new());
    };
    let core_uri = descriptor.core_schema().map(|s| s.uri().to_string());
    let mut normalized = HashSet::with_capacity(filter.len());
    for path in filter {
        if descriptor.get(path).is_none() {
            return Err(ScimError::attribute_not_found(path));
        }
        let stripped = match &core_uri {
            Some(uri) if path.starts_with(uri.as_str()) && path.len() > uri.len() => {
                path[uri.len() + 1..].to_string()
            }
            _ => path.clone(),
        };
        normalized.insert(stripped);
    }
    Ok(normalized)
}

fn is_excluded(path: &str, omit: &HashSet<String>) -> bool {
    omit.iter().any(|p| path == p || path.starts_with(p.as_str()))
}

/// Whether a path survives an emit filter.
///
/// A path is kept when it is requested, when it is an ancestor of a
/// requested path, or when a requested path occurs inside it.
fn is_emitted(path: &str, emit: &HashSet<String>) -> bool {
    emit.iter()
        .any(|p| path == p || p.starts_with(path) || path.contains(p.as_str()))
}

fn append_path(parent: &str, name: &str, schema_uris: &[String]) -> String {
    if parent.is_empty() {
        return name.to_string();
    }
    let separator = if schema_uris.iter().any(|uri| uri == parent) {
        ':'
    } else {
        '.'
    };
    format!("{parent}{separator}{name}")
}

fn append_attribute(
    node: &mut Map<String, Value>,
    attribute: &Attribute,
    schema_attribute: Option<&SchemaAttribute>,
    omit: &HashSet<String>,
    emit: &HashSet<String>,
    path: &str,
    schema_uris: &[String],
) {
    if attribute.is_multi_valued() && attribute.is_complex() {
        let mut elements = Vec::with_capacity(attribute.values().len());
        for value in attribute.values() {
            elements.push(Value::Object(complex_object(
                value,
                schema_attribute,
                omit,
                emit,
                path,
                schema_uris,
            )));
        }
        node.insert(attribute.name().to_string(), Value::Array(elements));
    } else if attribute.is_multi_valued() {
        node.insert(
            attribute.name().to_string(),
            Value::Array(attribute.values().iter().map(AttributeValue::to_json).collect()),
        );
    } else if attribute.is_complex() {
        let object = match attribute.value() {
            Some(value) => complex_object(value, schema_attribute, omit, emit, path, schema_uris),
            None => Map::new(),
        };
        node.insert(attribute.name().to_string(), Value::Object(object));
    } else if let Some(value) = attribute.value() {
        node.insert(attribute.name().to_string(), value.to_json());
    }
}

fn complex_object(
    value: &AttributeValue,
    schema_attribute: Option<&SchemaAttribute>,
    omit: &HashSet<String>,
    emit: &HashSet<String>,
    path: &str,
    schema_uris: &[String],
) -> Map<String, Value> {
    let mut object = Map::new();
    let Some(sub_attributes) = value.sub_attributes() else {
        return object;
    };
    for sub in sub_attributes {
        let sub_schema =
            schema_attribute.and_then(|s| s.sub_schema_attribute(sub.name()));
        let sub_path = append_path(path, sub.name(), schema_uris);
        let always = sub_schema.map(|s| s.returned == Returned::Always).unwrap_or(false);
        if !always && is_excluded(&sub_path, omit) {
            continue;
        }
        if !always && !emit.is_empty() && !is_emitted(&sub_path, emit) {
            continue;
        }
        append_attribute(&mut object, sub, sub_schema, omit, emit, &sub_path, schema_uris);
    }
    object
}

/// Render a list response, optionally windowed to a page.
///
/// `count` and `start_index` select a 1-based slice of the held resources;
/// without them the whole list renders. The `itemsPerPage` and `startIndex`
/// members follow the stored counters when set, and fall back to the
/// computed window when paging arguments were given.
pub fn list_response_to_json<T: ScimResource>(
    list: &ListResponse<T>,
    omit: Option<&HashSet<String>>,
    emit: Option<&HashSet<String>>,
    count: Option<usize>,
    start_index: Option<usize>,
) -> ScimResult<Value> {
    let mut map = Map::new();
    map.insert(
        "schemas".to_string(),
        Value::Array(vec![Value::String(ListResponse::<T>::SCHEMA.to_string())]),
    );
    map.insert("totalResults".to_string(), list.total_results().into());

    let start = start_index.unwrap_or(1);
    let per_page = count.unwrap_or(list.total_results() as usize);
    let end = start
        .saturating_add(per_page)
        .saturating_sub(1)
        .min(list.len());

    let mut resources = Vec::new();
    if start >= 1 && start <= list.len() {
        for resource in &list.resources()[start - 1..end] {
            resources.push(resource_to_json(resource, omit, emit)?);
        }
    }
    debug!(
        "marshalling list response window {start}..={end} of {} resources",
        list.len()
    );

    if list.items_per_page() != 0 && list.items_per_page() != list.total_results() {
        map.insert("itemsPerPage".to_string(), list.items_per_page().into());
    } else if count.is_some() || start_index.is_some() {
        map.insert("itemsPerPage".to_string(), resources.len().into());
    }
    if list.start_index() != 0 {
        map.insert("startIndex".to_string(), list.start_index().into());
    } else if count.is_some() || start_index.is_some() {
        map.insert("startIndex".to_string(), start.into());
    }

    map.insert("Resources".to_string(), Value::Array(resources));
    Ok(Value::Object(map))
}
