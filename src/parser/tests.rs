use crate::error::{ScimError, ValidationError};
use crate::model::attribute::AttributeKind;
use crate::model::list_response::ListResponse;
use crate::model::patch::{OperationType, PatchRequest};
use crate::model::resource::{GenericResource, ScimResource};
use crate::parser::{marshal, unmarshal};
use crate::schema::attribute::{AttributeType, Returned, SchemaAttribute};
use crate::schema::descriptor::SchemaDescriptor;
use crate::schema::resource_descriptor::ResourceDescriptor;
use serde_json::{Value, json};
use std::collections::HashSet;

const USER_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
const ENTERPRISE_URN: &str = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

fn singular(name: &str, data_type: AttributeType) -> SchemaAttribute {
    let mut attribute = SchemaAttribute::new(name, data_type);
    attribute.multi_valued = Some(false);
    attribute
}

fn user_descriptor() -> ResourceDescriptor {
    let mut user = SchemaDescriptor::new(USER_URN, "User", "User Account").unwrap();
    user.set_core(true);

    let mut user_name = singular("userName", AttributeType::String);
    user_name.required = true;
    user.add(user_name);
    user.add(singular("active", AttributeType::Boolean));
    user.add(singular("loginAttempts", AttributeType::Integer));

    let mut name = singular("name", AttributeType::Complex);
    name.sub_attributes = vec![
        singular("familyName", AttributeType::String),
        singular("givenName", AttributeType::String),
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

    ResourceDescriptor::with_schemas(vec![user, enterprise])
}

fn patch_descriptor() -> ResourceDescriptor {
    let mut patch =
        SchemaDescriptor::new(PatchRequest::SCHEMA, "PatchOp", "Patch Operation").unwrap();
    let mut operations = SchemaAttribute::new("operations", AttributeType::Complex);
    operations.multi_valued = Some(true);
    operations.sub_attributes = vec![
        singular("op", AttributeType::String),
        singular("path", AttributeType::String),
        singular("value", AttributeType::String),
    ];
    patch.add(operations);
    ResourceDescriptor::with_schemas(vec![patch])
}

fn user_json() -> Value {
    json!({
        "schemas": [USER_URN],
        "id": "2819c223-7f76-453a-919d-413861904646",
        "userName": "jdoe",
        "active": true,
        "loginAttempts": 3,
        "name": {
            "familyName": "Doe",
            "givenName": "John"
        },
        "emails": [
            {"value": "jdoe@example.com", "type": "work", "primary": true},
            {"value": "john@example.org", "type": "home"}
        ],
        "meta": {
            "created": "2024-05-01T12:00:00.000Z",
            "lastModified": "2024-05-02T08:30:00.000Z",
            "location": "https://example.com/Users/2819c223",
            "resourceType": "User"
        }
    })
}

#[test]
fn unmarshals_a_schema_described_resource() {
    let descriptor = user_descriptor();
    let user: GenericResource = unmarshal::resource(&user_json(), &descriptor).unwrap();

    assert_eq!(user.id(), Some("2819c223-7f76-453a-919d-413861904646"));
    assert_eq!(user.schemas(), vec![USER_URN]);

    let user_name = user.get("userName").unwrap();
    assert_eq!(user_name.kind(), AttributeKind::SingularSimple);
    assert_eq!(user_name.value().unwrap().string_value().unwrap(), "jdoe");

    assert!(user.get("active").unwrap().value().unwrap().boolean_value().unwrap());
    assert_eq!(
        user.get("loginAttempts").unwrap().value().unwrap().integer_value().unwrap(),
        3
    );

    let emails = user.get("emails").unwrap();
    assert_eq!(emails.kind(), AttributeKind::MultiValuedComplex);
    assert_eq!(emails.values().len(), 2);

    // Nested path lookup reaches into the parsed tree.
    assert_eq!(
        user.resource()
            .get_attribute_value("name.familyName")
            .and_then(|v| v.string_value().ok()),
        Some("Doe")
    );
}

#[test]
fn rejects_attributes_unknown_to_every_schema() {
    let descriptor = user_descriptor();
    let node = json!({"userName": "jdoe", "nickName": "JD"});
    let err = unmarshal::resource::<GenericResource>(&node, &descriptor).unwrap_err();
    assert!(matches!(
        err,
        ScimError::Validation(ValidationError::UnknownAttribute { .. })
    ));
}

#[test]
fn rejects_multiplicity_mismatches() {
    let descriptor = user_descriptor();

    let err = unmarshal::resource::<GenericResource>(
        &json!({"userName": ["jdoe", "other"]}),
        &descriptor,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ScimError::Validation(ValidationError::ExpectedSingleValue { .. })
    ));

    let err = unmarshal::resource::<GenericResource>(
        &json!({"emails": {"value": "jdoe@example.com"}}),
        &descriptor,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ScimError::Validation(ValidationError::ExpectedMultiValue { .. })
    ));
}

#[test]
fn rejects_scalar_type_mismatches() {
    let descriptor = user_descriptor();
    let err = unmarshal::resource::<GenericResource>(
        &json!({"active": "yes"}),
        &descriptor,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ScimError::Validation(ValidationError::InvalidAttributeType { .. })
    ));
}

#[test]
fn rejects_unknown_sub_attributes() {
    let descriptor = user_descriptor();
    let err = unmarshal::resource::<GenericResource>(
        &json!({"name": {"familyName": "Doe", "middleName": "X"}}),
        &descriptor,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ScimError::Validation(ValidationError::UnknownSubAttribute { .. })
    ));
}

#[test]
fn enforces_canonical_values() {
    let descriptor = user_descriptor();

    let err = unmarshal::resource::<GenericResource>(
        &json!({"emails": [{"value": "a@b.com", "type": "office"}]}),
        &descriptor,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ScimError::Validation(ValidationError::InvalidCanonicalValue { .. })
    ));

    let err = unmarshal::resource::<GenericResource>(
        &json!({"emails": [
            {"value": "a@b.com", "type": "work"},
            {"value": "c@d.com", "type": "work"}
        ]}),
        &descriptor,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ScimError::Validation(ValidationError::DuplicateCanonicalValue { .. })
    ));
}

#[test]
fn schema_documents_round_trip() {
    let descriptor = user_descriptor();
    let core = descriptor.core_schema().unwrap();
    let parsed = unmarshal::schema_descriptor(&core.to_json()).unwrap();

    assert_eq!(parsed.uri(), core.uri());
    assert_eq!(parsed.name(), "User");
    assert_eq!(parsed.attributes().len(), core.attributes().len());
    assert_eq!(
        parsed.attribute("emails").map(|a| a.is_multi_valued()),
        Some(true)
    );
}

#[test]
fn schema_parse_defaults_complex_attributes_to_multi_valued() {
    // Published OIM schemas omit multiValued on complex attributes.
    let node = json!({
        "id": "urn:example:Custom",
        "name": "Custom",
        "description": "Custom schema",
        "attributes": [
            {"name": "entitlements", "type": "complex",
             "subAttributes": [{"name": "value", "type": "string"}]}
        ]
    });
    let schema = unmarshal::schema_descriptor(&node).unwrap();
    assert!(schema.attribute("entitlements").unwrap().is_multi_valued());
}

#[test]
fn schema_parse_rejects_malformed_uris() {
    let node = json!({"id": "not a uri", "name": "Bad", "description": ""});
    assert!(matches!(
        unmarshal::schema_descriptor(&node),
        Err(ScimError::MalformedSchemaUri { .. })
    ));
}

#[test]
fn list_responses_require_a_resources_array() {
    let descriptor = user_descriptor();
    let err =
        unmarshal::list_response::<GenericResource>(&json!({"totalResults": 2}), &descriptor)
            .unwrap_err();
    assert!(matches!(err, ScimError::InvalidJsonStructure { .. }));
}

#[test]
fn list_response_counters_default_when_absent() {
    let descriptor = user_descriptor();
    let list: ListResponse<GenericResource> = unmarshal::list_response(
        &json!({"Resources": [{"userName": "jdoe"}]}),
        &descriptor,
    )
    .unwrap();
    assert_eq!(list.total_results(), 1);
    assert_eq!(list.start_index(), 0);
    assert_eq!(list.items_per_page(), 0);
    assert_eq!(list.len(), 1);
}

#[test]
fn patch_requests_parse_and_validate() {
    let descriptor = patch_descriptor();
    let node = json!({
        "schemas": [PatchRequest::SCHEMA],
        "Operations": [
            {"op": "Add", "path": "emails", "value": "a@b.com"},
            {"op": "remove", "path": "nickName"}
        ]
    });
    let patch = unmarshal::patch_request(&node, &descriptor).unwrap();
    assert_eq!(patch.operations().len(), 2);
    assert_eq!(patch.operations()[0].op(), OperationType::Add);
    assert_eq!(patch.operations()[0].path(), Some("emails"));
    assert!(patch.operations()[0].value().is_some());
    assert_eq!(patch.operations()[1].op(), OperationType::Remove);
    assert!(patch.operations()[1].value().is_none());
}

#[test]
fn patch_requests_reject_foreign_schema_urns() {
    let descriptor = patch_descriptor();
    let node = json!({"schemas": ["urn:example:Wrong"], "Operations": []});
    assert!(matches!(
        unmarshal::patch_request(&node, &descriptor),
        Err(ScimError::IncorrectSchema { .. })
    ));
}

#[test]
fn patch_operations_validate_op_and_value() {
    let descriptor = patch_descriptor();

    let bogus = json!({
        "schemas": [PatchRequest::SCHEMA],
        "Operations": [{"op": "merge", "path": "x", "value": "y"}]
    });
    assert!(matches!(
        unmarshal::patch_request(&bogus, &descriptor),
        Err(ScimError::InvalidOperationType { .. })
    ));

    let missing_value = json!({
        "schemas": [PatchRequest::SCHEMA],
        "Operations": [{"op": "replace", "path": "x"}]
    });
    assert!(matches!(
        unmarshal::patch_request(&missing_value, &descriptor),
        Err(ScimError::MissingOperationValue { .. })
    ));

    let remove_with_value = json!({
        "schemas": [PatchRequest::SCHEMA],
        "Operations": [{"op": "remove", "path": "x", "value": "y"}]
    });
    assert!(matches!(
        unmarshal::patch_request(&remove_with_value, &descriptor),
        Err(ScimError::UnexpectedOperationValue)
    ));
}

#[test]
fn marshal_rejects_conflicting_filters() {
    let descriptor = user_descriptor();
    let user: GenericResource = unmarshal::resource(&user_json(), &descriptor).unwrap();

    let omit: HashSet<String> = ["emails".to_string()].into();
    let emit: HashSet<String> = ["userName".to_string()].into();
    assert!(matches!(
        marshal::resource_to_json(&user, Some(&omit), Some(&emit)),
        Err(ScimError::ConflictingAttributeFilters)
    ));
}

#[test]
fn marshal_rejects_unresolvable_filter_paths() {
    let descriptor = user_descriptor();
    let user: GenericResource = unmarshal::resource(&user_json(), &descriptor).unwrap();

    let omit: HashSet<String> = ["nickName".to_string()].into();
    assert!(matches!(
        marshal::resource_to_json(&user, Some(&omit), None),
        Err(ScimError::AttributeNotFound { .. })
    ));
}

#[test]
fn marshal_omit_drops_whole_subtrees() {
    let descriptor = user_descriptor();
    let user: GenericResource = unmarshal::resource(&user_json(), &descriptor).unwrap();

    let omit: HashSet<String> = ["emails".to_string(), "name.givenName".to_string()].into();
    let node = marshal::resource_to_json(&user, Some(&omit), None).unwrap();

    assert!(node.get("emails").is_none());
    assert_eq!(node["name"]["familyName"], "Doe");
    assert!(node["name"].get("givenName").is_none());
    assert_eq!(node["userName"], "jdoe");
}

#[test]
fn marshal_emit_keeps_requested_paths_and_always_attributes() {
    let descriptor = user_descriptor();
    let user: GenericResource = unmarshal::resource(&user_json(), &descriptor).unwrap();

    let emit: HashSet<String> = ["name.familyName".to_string()].into();
    let node = marshal::resource_to_json(&user, None, Some(&emit)).unwrap();

    assert_eq!(node["name"]["familyName"], "Doe");
    assert!(node["name"].get("givenName").is_none());
    assert!(node.get("emails").is_none());
    // `id` and `schemas` are returned=always and bypass the filter.
    assert_eq!(node["id"], "2819c223-7f76-453a-919d-413861904646");
    assert!(node.get("schemas").is_some());
}

#[test]
fn marshal_accepts_core_qualified_filter_paths() {
    let descriptor = user_descriptor();
    let user: GenericResource = unmarshal::resource(&user_json(), &descriptor).unwrap();

    let omit: HashSet<String> = [format!("{USER_URN}:emails")].into();
    let node = marshal::resource_to_json(&user, Some(&omit), None).unwrap();
    assert!(node.get("emails").is_none());
    assert_eq!(node["userName"], "jdoe");
}

#[test]
fn marshal_skips_never_returned_attributes() {
    let mut schema = SchemaDescriptor::new(USER_URN, "User", "User Account").unwrap();
    schema.set_core(true);
    let mut password = singular("password", AttributeType::String);
    password.returned = Returned::Never;
    schema.add(password);
    schema.add(singular("userName", AttributeType::String));
    let descriptor = ResourceDescriptor::with_schemas(vec![schema]);

    let user: GenericResource = unmarshal::resource(
        &json!({"userName": "jdoe", "password": "secret"}),
        &descriptor,
    )
    .unwrap();
    let node = marshal::resource_to_json(&user, None, None).unwrap();
    assert!(node.get("password").is_none());
    assert_eq!(node["userName"], "jdoe");
}

#[test]
fn marshalled_resources_round_trip() {
    let descriptor = user_descriptor();
    let user: GenericResource = unmarshal::resource(&user_json(), &descriptor).unwrap();
    let node = marshal::resource_to_json(&user, None, None).unwrap();
    let reparsed: GenericResource = unmarshal::resource(&node, &descriptor).unwrap();
    assert_eq!(
        marshal::resource_to_json(&reparsed, None, None).unwrap(),
        node
    );
}

#[test]
fn list_response_marshalling_windows_the_page() {
    let descriptor = user_descriptor();
    let mut list: ListResponse<GenericResource> = ListResponse::empty();
    for index in 0..5 {
        let node = json!({"id": index.to_string(), "userName": format!("user-{index}")});
        list.add(unmarshal::resource(&node, &descriptor).unwrap());
    }
    list.set_total_results(5);

    let node =
        marshal::list_response_to_json(&list, None, None, Some(2), Some(2)).unwrap();
    assert_eq!(node["totalResults"], 5);
    assert_eq!(node["startIndex"], 2);
    assert_eq!(node["itemsPerPage"], 2);
    let resources = node["Resources"].as_array().unwrap();
    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0]["userName"], "user-1");
    assert_eq!(resources[1]["userName"], "user-2");
}

#[test]
fn list_response_marshalling_without_paging_renders_everything() {
    let descriptor = user_descriptor();
    let mut list: ListResponse<GenericResource> = ListResponse::empty();
    list.add(
        unmarshal::resource(&json!({"id": "1", "userName": "ann"}), &descriptor).unwrap(),
    );
    list.set_total_results(1);

    let node = marshal::list_response_to_json(&list, None, None, None, None).unwrap();
    assert_eq!(node["schemas"][0], ListResponse::<GenericResource>::SCHEMA);
    assert_eq!(node["Resources"].as_array().unwrap().len(), 1);
    // Counters that only repeat totalResults stay off the wire.
    assert!(node.get("itemsPerPage").is_none());
    assert!(node.get("startIndex").is_none());
}
