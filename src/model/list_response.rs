//! Paginated SCIM list responses.

use crate::model::resource::ScimResource;
use serde_json::{Map, Value};
use std::fmt;

/// An ordered, id-deduplicated collection of resources with paging counters.
///
/// `total_results` is authoritative and caller-managed — it reports how many
/// resources matched overall, independent of how many this page holds.
/// `items_per_page` tracks the current page size: it grows when
/// [`ListResponse::add`] appends and stays put when an add merely replaces a
/// resource that carries an already-present id.
///
/// ## Examples
///
/// ```rust
/// use scim_extension::model::{GenericResource, ListResponse, ScimResource};
/// use scim_extension::schema::ResourceDescriptor;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut list = ListResponse::empty();
///     let mut user = GenericResource::from_descriptor(ResourceDescriptor::new());
///     user.set_id("42")?;
///     list.add(user);
///     list.set_total_results(1);
///     assert_eq!(list.len(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ListResponse<T: ScimResource> {
    resources: Vec<T>,
    total_results: u64,
    start_index: u64,
    items_per_page: u64,
}

impl<T: ScimResource> ListResponse<T> {
    /// Schema URN every list response declares.
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";

    /// Create a list response from parsed parts.
    pub fn new(
        resources: Vec<T>,
        total_results: u64,
        start_index: u64,
        items_per_page: u64,
    ) -> Self {
        Self {
            resources,
            total_results,
            start_index,
            items_per_page,
        }
    }

    /// Create an empty list response with zeroed counters.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, 0, 0)
    }

    /// Add a resource, replacing any member that carries the same id.
    ///
    /// A replaced resource moves to the end of the list; the page counter
    /// only grows for genuine appends. Resources without an id never match
    /// an existing member.
    pub fn add(&mut self, resource: T) {
        let existing = match resource.id() {
            Some(id) => self.resources.iter().position(|r| r.id() == Some(id)),
            None => None,
        };
        match existing {
            Some(index) => {
                self.resources.remove(index);
                self.resources.push(resource);
            }
            None => {
                self.resources.push(resource);
                self.items_per_page += 1;
            }
        }
    }

    /// The resources of this page, in order.
    pub fn resources(&self) -> &[T] {
        &self.resources
    }

    /// Iterate over the resources.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.resources.iter()
    }

    /// Number of resources held.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the page holds no resources.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// The authoritative overall match count.
    pub fn total_results(&self) -> u64 {
        self.total_results
    }

    /// Set the authoritative overall match count.
    pub fn set_total_results(&mut self, total_results: u64) {
        self.total_results = total_results;
    }

    /// 1-based index of the first resource of this page.
    pub fn start_index(&self) -> u64 {
        self.start_index
    }

    /// The current page size.
    pub fn items_per_page(&self) -> u64 {
        self.items_per_page
    }

    /// Render the list response as a JSON object.
    ///
    /// `itemsPerPage` and `startIndex` are omitted while unset (zero), and
    /// `itemsPerPage` is also omitted when it merely repeats `totalResults`.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            "schemas".to_string(),
            Value::Array(vec![Value::String(Self::SCHEMA.to_string())]),
        );
        map.insert("totalResults".to_string(), self.total_results.into());
        if self.items_per_page != 0 && self.items_per_page != self.total_results {
            map.insert("itemsPerPage".to_string(), self.items_per_page.into());
        }
        if self.start_index != 0 {
            map.insert("startIndex".to_string(), self.start_index.into());
        }
        map.insert(
            "Resources".to_string(),
            Value::Array(self.resources.iter().map(|r| r.to_json()).collect()),
        );
        Value::Object(map)
    }
}

impl<T: ScimResource> fmt::Display for ListResponse<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl<'a, T: ScimResource> IntoIterator for &'a ListResponse<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
