//! SCIM SearchRequest messages.
//!
//! A search request is an ordinary resource: filter, pagination and sort
//! parameters live in the attribute tree, and the typed accessors here are
//! views over it.

use crate::error::ValidationResult;
use crate::model::attribute::Attribute;
use crate::model::resource::{Resource, ScimResource};
use crate::model::value::AttributeValue;
use crate::schema::resource_descriptor::ResourceDescriptor;
use std::fmt;

const FILTER: &str = "filter";
const START_INDEX: &str = "startIndex";
const COUNT: &str = "count";
const SORT_BY: &str = "sortBy";
const SORT_ORDER: &str = "sortOrder";
const ATTRIBUTES: &str = "attributes";
const EXCLUDED_ATTRIBUTES: &str = "excludedAttributes";

/// A SCIM search request with typed parameter access.
///
/// ## Examples
///
/// ```rust
/// use scim_extension::model::{ScimResource, SearchRequest};
/// use scim_extension::schema::ResourceDescriptor;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut search = SearchRequest::from_descriptor(ResourceDescriptor::new());
///     search.set_filter("userName eq \"jdoe\"")?;
///     search.set_count(25)?;
///     assert_eq!(search.count(), Some(25));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SearchRequest {
    descriptor: ResourceDescriptor,
    resource: Resource,
}

impl SearchRequest {
    /// Schema URN every search request declares.
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:api:messages:2.0:SearchRequest";

    fn string_parameter(&self, name: &str) -> Option<&str> {
        self.resource.get(name)?.value()?.string_value().ok()
    }

    fn integer_parameter(&self, name: &str) -> Option<i64> {
        self.resource.get(name)?.value()?.integer_value().ok()
    }

    fn string_list_parameter(&self, name: &str) -> Vec<String> {
        match self.resource.get(name) {
            Some(attribute) => attribute
                .values()
                .iter()
                .filter_map(|v| v.string_value().ok().map(str::to_string))
                .collect(),
            None => Vec::new(),
        }
    }

    /// The SCIM filter expression, if set.
    pub fn filter(&self) -> Option<&str> {
        self.string_parameter(FILTER)
    }

    /// Set the SCIM filter expression.
    pub fn set_filter(&mut self, filter: impl Into<String>) -> ValidationResult<()> {
        self.resource.set(FILTER, AttributeValue::from(filter.into()))
    }

    /// 1-based index of the first result to return, if set.
    pub fn start_index(&self) -> Option<i64> {
        self.integer_parameter(START_INDEX)
    }

    /// Set the 1-based start index.
    pub fn set_start_index(&mut self, start_index: i64) -> ValidationResult<()> {
        self.resource.set(START_INDEX, AttributeValue::from(start_index))
    }

    /// Maximum number of results per page, if set.
    pub fn count(&self) -> Option<i64> {
        self.integer_parameter(COUNT)
    }

    /// Set the maximum number of results per page.
    pub fn set_count(&mut self, count: i64) -> ValidationResult<()> {
        self.resource.set(COUNT, AttributeValue::from(count))
    }

    /// The attribute path results are sorted by, if set.
    pub fn sort_by(&self) -> Option<&str> {
        self.string_parameter(SORT_BY)
    }

    /// Set the sort attribute path.
    pub fn set_sort_by(&mut self, sort_by: impl Into<String>) -> ValidationResult<()> {
        self.resource.set(SORT_BY, AttributeValue::from(sort_by.into()))
    }

    /// The sort order (`ascending`/`descending`), if set.
    pub fn sort_order(&self) -> Option<&str> {
        self.string_parameter(SORT_ORDER)
    }

    /// Set the sort order.
    pub fn set_sort_order(&mut self, sort_order: impl Into<String>) -> ValidationResult<()> {
        self.resource
            .set(SORT_ORDER, AttributeValue::from(sort_order.into()))
    }

    /// Attribute paths to return, possibly empty.
    pub fn attributes(&self) -> Vec<String> {
        self.string_list_parameter(ATTRIBUTES)
    }

    /// Set the attribute paths to return.
    pub fn set_attributes(&mut self, paths: &[&str]) -> ValidationResult<()> {
        let values = paths.iter().map(|&p| AttributeValue::from(p)).collect();
        self.resource
            .upsert(Attribute::multi_valued(ATTRIBUTES, values)?);
        Ok(())
    }

    /// Attribute paths to exclude, possibly empty.
    pub fn excluded_attributes(&self) -> Vec<String> {
        self.string_list_parameter(EXCLUDED_ATTRIBUTES)
    }

    /// Set the attribute paths to exclude.
    pub fn set_excluded_attributes(&mut self, paths: &[&str]) -> ValidationResult<()> {
        let values = paths.iter().map(|&p| AttributeValue::from(p)).collect();
        self.resource
            .upsert(Attribute::multi_valued(EXCLUDED_ATTRIBUTES, values)?);
        Ok(())
    }
}

impl ScimResource for SearchRequest {
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
}

impl fmt::Display for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
