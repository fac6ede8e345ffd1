//! Declarative schema metadata: what attributes a resource type supports
//! and how they are typed, grouped and looked up.

pub mod attribute;
pub mod descriptor;
pub mod resource_descriptor;

pub use attribute::{AttributeType, Mutability, Returned, SchemaAttribute, Uniqueness};
pub use descriptor::SchemaDescriptor;
pub use resource_descriptor::ResourceDescriptor;
