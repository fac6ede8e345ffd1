//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use scim_extension::model::{GenericResource, ScimResource};
use scim_extension::parser::unmarshal;
use scim_extension::schema::{
    AttributeType, Mutability, ResourceDescriptor, SchemaAttribute, SchemaDescriptor,
};
use serde_json::{Value, json};

pub const USER_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
pub const ENTERPRISE_URN: &str = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn singular(name: &str, data_type: AttributeType) -> SchemaAttribute {
    let mut attribute = SchemaAttribute::new(name, data_type);
    attribute.multi_valued = Some(false);
    attribute
}

/// A User descriptor with the core schema and the enterprise extension.
pub fn user_descriptor() -> ResourceDescriptor {
    let mut user = SchemaDescriptor::new(USER_URN, "User", "User Account").unwrap();
    user.set_core(true);
    user.set_meta_location(format!("https://example.com/v2/Schemas/{USER_URN}"));
    user.set_meta_resource_type("Schema");

    let mut user_name = singular("userName", AttributeType::String);
    user_name.required = true;
    user.add(user_name);

    user.add(singular("displayName", AttributeType::String));
    user.add(singular("active", AttributeType::Boolean));

    let mut name = singular("name", AttributeType::Complex);
    let mut family_name = singular("familyName", AttributeType::String);
    family_name.required = true;
    name.sub_attributes = vec![
        family_name,
        singular("givenName", AttributeType::String),
        {
            let mut formatted = singular("formatted", AttributeType::String);
            formatted.mutability = Mutability::ReadOnly;
            formatted
        },
    ];
    user.add(name);

    let mut emails = SchemaAttribute::new("emails", AttributeType::Complex);
    emails.multi_valued = Some(true);
    let mut email_type = singular("type", AttributeType::String);
    email_type.canonical_values = vec!["work".to_string(), "home".to_string()];
    emails.sub_attributes = vec![
        singular("value", AttributeType::String),
        email_type,
        singular("primary", AttributeType::Boolean),
    ];
    user.add(emails);

    let mut enterprise =
        SchemaDescriptor::new(ENTERPRISE_URN, "EnterpriseUser", "Enterprise User").unwrap();
    enterprise.add(singular("costCenter", AttributeType::String));
    let mut manager = singular("manager", AttributeType::Complex);
    manager.sub_attributes = vec![
        singular("value", AttributeType::String),
        singular("displayName", AttributeType::String),
    ];
    enterprise.add(manager);

    ResourceDescriptor::with_schemas(vec![user, enterprise])
}

pub fn user_json() -> Value {
    json!({
        "schemas": [USER_URN, ENTERPRISE_URN],
        "id": "2819c223-7f76-453a-919d-413861904646",
        "userName": "jdoe",
        "displayName": "John Doe",
        "active": true,
        "name": {
            "familyName": "Doe",
            "givenName": "John"
        },
        "emails": [
            {"value": "jdoe@example.com", "type": "work", "primary": true},
            {"value": "john@example.org", "type": "home"}
        ],
        (ENTERPRISE_URN): {
            "costCenter": "4130",
            "manager": {"value": "42", "displayName": "Jane Admin"}
        }
    })
}

pub fn sample_user() -> GenericResource {
    unmarshal::resource(&user_json(), &user_descriptor()).unwrap()
}
