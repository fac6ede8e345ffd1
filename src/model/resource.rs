//! Resources: ordered attribute collections with a SCIM identity layer.
//!
//! [`Resource`] is the plain container — an ordered list of attributes,
//! unique by name, with dotted/colon-qualified path lookup. The
//! [`ScimResource`] trait layers the common SCIM identity on top (`id`,
//! `meta`, `schemas`, the backing [`ResourceDescriptor`]) and is implemented
//! by [`GenericResource`] as well as the patch and search message types.

use crate::error::{ScimResult, ValidationError, ValidationResult};
use crate::model::attribute::Attribute;
use crate::model::meta::Meta;
use crate::model::value::AttributeValue;
use crate::schema::resource_descriptor::ResourceDescriptor;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Reserved attribute name for the resource identifier.
pub const ID: &str = "id";
/// Reserved attribute name for resource metadata.
pub const META: &str = "meta";
/// Reserved attribute name for the declared schema URNs.
pub const SCHEMAS: &str = "schemas";

/// An ordered collection of attributes, unique by name.
///
/// Lookup is a linear scan; resources hold a handful of top-level attributes
/// and never enough to justify an index. [`Resource::add`] rejects duplicate
/// names so that name-based lookup stays unambiguous.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    attributes: Vec<Attribute>,
}

impl Resource {
    /// Create an empty resource.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resource from a list of attributes.
    ///
    /// Rejects duplicate attribute names.
    pub fn from_attributes(attributes: Vec<Attribute>) -> ValidationResult<Self> {
        let mut resource = Self::new();
        for attribute in attributes {
            resource.add(attribute)?;
        }
        Ok(resource)
    }

    /// All attributes, in insertion order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Iterate over the attributes.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attributes.iter()
    }

    /// Number of top-level attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the resource has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Find a top-level attribute by exact name.
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Find a top-level attribute by exact name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|a| a.name() == name)
    }

    /// Set a named attribute to a single value.
    ///
    /// Replaces the first value of an existing attribute in place, or
    /// appends a new singular attribute when the name is absent.
    pub fn set(&mut self, name: &str, value: AttributeValue) -> ValidationResult<()> {
        match self.get_mut(name) {
            Some(attribute) => {
                attribute.set_value(value);
                Ok(())
            }
            None => {
                self.attributes.push(Attribute::singular(name, value)?);
                Ok(())
            }
        }
    }

    /// Append an attribute.
    ///
    /// Rejects a name already present; use [`Resource::upsert`] to replace.
    pub fn add(&mut self, attribute: Attribute) -> ValidationResult<()> {
        if self.get(attribute.name()).is_some() {
            return Err(ValidationError::DuplicateAttribute {
                attribute: attribute.name().to_string(),
            });
        }
        self.attributes.push(attribute);
        Ok(())
    }

    /// Replace an attribute by name, preserving its position, or append it.
    pub fn upsert(&mut self, attribute: Attribute) {
        match self
            .attributes
            .iter_mut()
            .find(|a| a.name() == attribute.name())
        {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }

    /// Resolve a dotted, optionally colon-qualified attribute path.
    ///
    /// The path starts at the first attribute whose name prefixes it — a
    /// plain name for ordinary attributes, a schema URI for extension
    /// containers (URNs contain dots and colons themselves, so prefix
    /// matching is what keeps the split unambiguous). Each remaining dotted
    /// segment descends into the sub-attributes of the current attribute's
    /// values, first match wins. Returns `None` when any segment fails to
    /// match.
    pub fn get_attribute(&self, path: &str) -> Option<&Attribute> {
        for attribute in &self.attributes {
            let Some(rest) = path.strip_prefix(attribute.name()) else {
                continue;
            };
            if rest.is_empty() {
                return Some(attribute);
            }
            let Some(rest) = rest.strip_prefix(':').or_else(|| rest.strip_prefix('.')) else {
                continue;
            };
            let mut current = attribute;
            for segment in rest.split('.') {
                current = current
                    .values()
                    .iter()
                    .find_map(|value| value.sub_attribute(segment))?;
            }
            return Some(current);
        }
        None
    }

    /// Resolve a path to the first value of the matching attribute.
    pub fn get_attribute_value(&self, path: &str) -> Option<&AttributeValue> {
        self.get_attribute(path)?.value()
    }

    /// Render the resource as a JSON object of attribute fragments.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for attribute in &self.attributes {
            map.insert(attribute.name().to_string(), attribute.value_json());
        }
        Value::Object(map)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl<'a> IntoIterator for &'a Resource {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The SCIM identity layer shared by every resource type.
///
/// Implementors expose their attribute container and backing descriptor;
/// the provided methods manage the reserved `id`, `meta` and `schemas`
/// attributes on top of it.
pub trait ScimResource {
    /// Construct an empty instance backed by the given descriptor.
    fn from_descriptor(descriptor: ResourceDescriptor) -> Self
    where
        Self: Sized;

    /// The schema descriptor backing this resource instance.
    fn descriptor(&self) -> &ResourceDescriptor;

    /// The attribute container.
    fn resource(&self) -> &Resource;

    /// The attribute container, mutably.
    fn resource_mut(&mut self) -> &mut Resource;

    /// Append an attribute; rejects duplicate names.
    fn add(&mut self, attribute: Attribute) -> ValidationResult<()> {
        self.resource_mut().add(attribute)
    }

    /// Find a top-level attribute by name.
    fn get(&self, name: &str) -> Option<&Attribute> {
        self.resource().get(name)
    }

    /// The resource identifier, when set.
    fn id(&self) -> Option<&str> {
        self.resource().get(ID)?.value()?.string_value().ok()
    }

    /// Set the resource identifier.
    fn set_id(&mut self, id: impl Into<String>) -> ValidationResult<()> {
        let attribute = Attribute::singular(ID, AttributeValue::from(id.into()))?;
        self.resource_mut().upsert(attribute);
        Ok(())
    }

    /// Generate and store a random identifier, returning it.
    fn create_id(&mut self) -> ValidationResult<String> {
        let id = Uuid::new_v4().to_string();
        self.set_id(id.clone())?;
        Ok(id)
    }

    /// The raw `meta` attribute, when set.
    fn meta(&self) -> Option<&Attribute> {
        self.resource().get(META)
    }

    /// Store resource metadata as the `meta` complex attribute.
    fn create_meta(&mut self, meta: Meta) -> ValidationResult<()> {
        let attribute = meta.to_attribute()?;
        self.resource_mut().upsert(attribute);
        Ok(())
    }

    /// The declared schema URNs, in order.
    fn schemas(&self) -> Vec<&str> {
        match self.resource().get(SCHEMAS) {
            Some(attribute) => attribute
                .values()
                .iter()
                .filter_map(|v| v.string_value().ok())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Store the declared schema URN list.
    fn create_schemas(&mut self, urns: &[&str]) -> ValidationResult<()> {
        let values = urns.iter().map(|&urn| AttributeValue::from(urn)).collect();
        let attribute = Attribute::multi_valued(SCHEMAS, values)?;
        self.resource_mut().upsert(attribute);
        Ok(())
    }

    /// Render the resource as a JSON object.
    fn to_json(&self) -> Value {
        self.resource().to_json()
    }

    /// Build a copy of this resource restricted to the given attribute paths.
    ///
    /// Round-trips through the JSON marshaller with an emit filter, then
    /// unmarshals into the target resource type against this resource's
    /// descriptor. Paths must resolve against the descriptor.
    fn copy_with_attributes<T>(&self, attributes: &HashSet<String>) -> ScimResult<T>
    where
        T: ScimResource,
        Self: Sized,
    {
        let node = crate::parser::marshal::resource_to_json(self, None, Some(attributes))?;
        crate::parser::unmarshal::resource(&node, self.descriptor())
    }
}

/// A schema-described resource with no type-specific behavior.
///
/// Used for the resource types the model does not special-case (User, Group
/// and friends): the descriptor decides which attributes are legal, the
/// attribute tree carries the data.
#[derive(Debug, Clone)]
pub struct GenericResource {
    descriptor: ResourceDescriptor,
    resource: Resource,
}

impl GenericResource {
    /// Create a generic resource from a descriptor and attribute container.
    pub fn new(descriptor: ResourceDescriptor, resource: Resource) -> Self {
        Self {
            descriptor,
            resource,
        }
    }
}

impl ScimResource for GenericResource {
    fn from_descriptor(descriptor: ResourceDescriptor) -> Self {
        Self::new(descriptor, Resource::new())
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
}

impl fmt::Display for GenericResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complex(name: &str, subs: Vec<Attribute>) -> Attribute {
        Attribute::singular(name, AttributeValue::complex(subs)).unwrap()
    }

    #[test]
    fn test_add_rejects_duplicate_names() {
        let mut resource = Resource::new();
        resource
            .add(Attribute::singular("userName", "jdoe".into()).unwrap())
            .unwrap();
        let err = resource
            .add(Attribute::singular("userName", "other".into()).unwrap())
            .unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateAttribute { .. }));
        assert_eq!(resource.len(), 1);
    }

    #[test]
    fn test_set_replaces_in_place_or_appends() {
        let mut resource = Resource::new();
        resource.set("displayName", "Jo".into()).unwrap();
        resource.set("active", true.into()).unwrap();
        resource.set("displayName", "Joe".into()).unwrap();

        assert_eq!(resource.len(), 2);
        assert_eq!(resource.attributes()[0].name(), "displayName");
        assert_eq!(
            resource
                .get("displayName")
                .and_then(|a| a.value())
                .and_then(|v| v.string_value().ok()),
            Some("Joe")
        );
    }

    #[test]
    fn test_dotted_path_lookup() {
        let mut resource = Resource::new();
        resource
            .add(complex(
                "name",
                vec![
                    Attribute::singular("familyName", "Doe".into()).unwrap(),
                    Attribute::singular("givenName", "John".into()).unwrap(),
                ],
            ))
            .unwrap();

        let found = resource.get_attribute("name.familyName").unwrap();
        assert_eq!(found.value().unwrap().string_value().unwrap(), "Doe");
        assert!(resource.get_attribute("name.middleName").is_none());
        assert!(resource.get_attribute("name.familyName.extra").is_none());
    }

    #[test]
    fn test_colon_qualified_path_starts_at_extension_container() {
        let mut resource = Resource::new();
        resource
            .add(complex(
                "urn:example:ext:2.0:User",
                vec![Attribute::singular("costCenter", "4130".into()).unwrap()],
            ))
            .unwrap();

        let found = resource
            .get_attribute_value("urn:example:ext:2.0:User:costCenter")
            .unwrap();
        assert_eq!(found.string_value().unwrap(), "4130");
    }

    #[test]
    fn test_scim_resource_identity_helpers() {
        let mut resource = GenericResource::from_descriptor(ResourceDescriptor::new());
        assert!(resource.id().is_none());

        resource.set_id("2819c223").unwrap();
        assert_eq!(resource.id(), Some("2819c223"));

        let generated = resource.create_id().unwrap();
        assert_eq!(resource.id(), Some(generated.as_str()));
        assert_eq!(resource.resource().len(), 1);

        resource
            .create_schemas(&["urn:ietf:params:scim:schemas:core:2.0:User"])
            .unwrap();
        assert_eq!(
            resource.schemas(),
            vec!["urn:ietf:params:scim:schemas:core:2.0:User"]
        );

        resource.create_meta(Meta::now("User").unwrap()).unwrap();
        assert!(resource.meta().is_some());
    }

    #[test]
    fn test_to_json_preserves_attribute_order() {
        let mut resource = Resource::new();
        resource.set("userName", "jdoe".into()).unwrap();
        resource.set("active", true.into()).unwrap();
        assert_eq!(
            resource.to_string(),
            r#"{"userName":"jdoe","active":true}"#
        );
    }
}
