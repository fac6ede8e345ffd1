//! The SCIM object model: attributes, values, resources and the message
//! types built from them.

pub mod attribute;
pub mod list_response;
pub mod meta;
pub mod patch;
pub mod resource;
pub mod search;
pub mod value;

pub use attribute::{Attribute, AttributeKind};
pub use list_response::ListResponse;
pub use meta::Meta;
pub use patch::{Operation, OperationType, PatchRequest};
pub use resource::{GenericResource, Resource, ScimResource};
pub use search::SearchRequest;
pub use value::AttributeValue;
