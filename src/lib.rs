//! Typed object model for SCIM 2.0 resources.
//!
//! Provides the attribute/resource tree used to represent SCIM resources in
//! memory, the declarative schema metadata that describes them, and the JSON
//! marshalling between the two.
//!
//! # Core Components
//!
//! - [`Attribute`] / [`AttributeValue`] - the polymorphic attribute tree
//! - [`Resource`] / [`ScimResource`] - attribute collections with SCIM identity
//! - [`ResourceDescriptor`] / [`SchemaDescriptor`] - schema metadata and
//!   path-based attribute lookup
//! - [`PatchRequest`] / [`SearchRequest`] / [`ListResponse`] - the SCIM
//!   message envelopes
//!
//! # Quick Start
//!
//! ```rust
//! use scim_extension::model::{GenericResource, Meta, ScimResource};
//! use scim_extension::schema::ResourceDescriptor;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut user = GenericResource::from_descriptor(ResourceDescriptor::new());
//!     user.create_id()?;
//!     user.create_schemas(&["urn:ietf:params:scim:schemas:core:2.0:User"])?;
//!     user.create_meta(Meta::now("User")?)?;
//!     println!("{user}");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod model;
pub mod parser;
pub mod schema;

// Re-export commonly used types for convenience
pub use error::{ScimError, ScimResult, ValidationError, ValidationResult};
pub use model::{
    Attribute, AttributeKind, AttributeValue, GenericResource, ListResponse, Meta, Operation,
    OperationType, PatchRequest, Resource, ScimResource, SearchRequest,
};
pub use schema::{
    AttributeType, Mutability, ResourceDescriptor, Returned, SchemaAttribute, SchemaDescriptor,
    Uniqueness,
};
