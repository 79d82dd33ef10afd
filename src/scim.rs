//! SCIM 1.x resources as exchanged with the OSIAM server.
use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Core schema URN attached to every resource sent to the server.
pub const CORE_SCHEMA: &str = "urn:scim:schemas:core:1.0";

/// Resource metadata.
///
/// On PATCH bodies, `attributes` lists the top-level attributes to be removed server-side.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub attributes: BTreeSet<String>,
}

/// Operation marker on a multi-valued attribute entry.
///
/// The server treats an entry without a marker as an addition, so [`Operation::Add`] is never
/// written to the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Delete,
}

/// One entry of a multi-valued attribute (emails, phone numbers, group members, ...).
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiValuedAttribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "is_add_or_none")]
    pub operation: Option<Operation>,
}

fn is_add_or_none(operation: &Option<Operation>) -> bool {
    !matches!(operation, Some(Operation::Delete))
}

impl MultiValuedAttribute {
    /// An entry holding just `value`.
    pub fn from_value(value: impl Into<String>) -> Self {
        MultiValuedAttribute {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Set the `type` of the entry (e.g. `"work"`, `"home"`).
    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Mark the entry as the primary one.
    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = Some(primary);
        self
    }

    /// Attach an operation marker.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honorific_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honorific_suffix: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
}

/// A SCIM user.
///
/// Absent attributes are `None` (or empty collections) and are omitted when the user is sent to
/// the server.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<MultiValuedAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phone_numbers: Vec<MultiValuedAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ims: Vec<MultiValuedAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<MultiValuedAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<Address>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<MultiValuedAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl User {
    /// A new user with the given user name and the core schema, ready to be created.
    pub fn new(user_name: impl Into<String>) -> Self {
        User {
            schemas: vec![CORE_SCHEMA.to_owned()],
            user_name: Some(user_name.into()),
            ..Default::default()
        }
    }
}

/// A SCIM group.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MultiValuedAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Group {
    /// A new group with the given display name and the core schema, ready to be created.
    pub fn new(display_name: impl Into<String>) -> Self {
        Group {
            schemas: vec![CORE_SCHEMA.to_owned()],
            display_name: Some(display_name.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs::File, io::BufReader};

    use chrono::NaiveDate;

    use super::{Group, MultiValuedAttribute, Operation, User};

    #[test]
    fn parse_standard_user() {
        let f = File::open("tests/data/scim/user.json")
            .expect("Failed to open tests/data/scim/user.json");
        let user: User = serde_json::from_reader(BufReader::new(f)).unwrap();

        assert_eq!(
            user.id.as_deref(),
            Some("94bbe688-4b1e-4e4e-80e7-e5ba5c4d6db4")
        );
        assert_eq!(user.user_name.as_deref(), Some("MaxExample"));
        assert_eq!(user.external_id.as_deref(), Some("MExample"));
        assert_eq!(user.password, None);
        assert_eq!(user.active, None);

        let meta = user.meta.unwrap();
        assert_eq!(meta.resource_type.as_deref(), Some("User"));
        let day = NaiveDate::from_ymd_opt(2011, 8, 1).unwrap();
        assert_eq!(meta.created, day.and_hms_milli_opt(18, 29, 49, 793));
        assert_eq!(meta.last_modified, day.and_hms_opt(18, 29, 49));

        let name = user.name.unwrap();
        assert_eq!(name.family_name.as_deref(), Some("Example"));
        assert_eq!(name.given_name.as_deref(), Some("Max"));
        assert_eq!(name.middle_name.as_deref(), Some("Jason"));

        assert_eq!(user.addresses.len(), 1);
        assert_eq!(
            user.addresses[0].street_address.as_deref(),
            Some("example street 42")
        );
        assert_eq!(user.addresses[0].country.as_deref(), Some("germany"));
        assert_eq!(user.emails.len(), 2);
        assert!(user
            .emails
            .iter()
            .any(|email| email.value.as_deref() == Some("MaxExample@work.com")));
        assert_eq!(user.photos[0].kind.as_deref(), Some("photo"));
        assert_eq!(user.ims[0].value.as_deref(), Some("someaimhandle"));
    }

    #[test]
    fn parse_group_ignoring_unknown_fields() {
        let group: Group = serde_json::from_str(
            r#"
              {
                "id": "69e1a5dc-89be-4343-976c-b5541af249f4",
                "displayName": "test_group01",
                "somethingNew": 42,
                "members": [{ "value": "94bbe688-4b1e-4e4e-80e7-e5ba5c4d6db4", "display": "MaxExample" }],
                "meta": { "resourceType": "Group" }
              }
            "#,
        )
        .unwrap();

        assert_eq!(group.display_name.as_deref(), Some("test_group01"));
        assert_eq!(group.members.len(), 1);
        assert_eq!(group.external_id, None);
    }

    #[test]
    fn untouched_attributes_are_not_serialized() {
        let json = serde_json::to_value(User::new("bjensen")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "schemas": ["urn:scim:schemas:core:1.0"],
                "userName": "bjensen",
            })
        );
    }

    #[test]
    fn only_delete_marker_is_serialized() {
        let added = MultiValuedAttribute::from_value("u1").with_operation(Operation::Add);
        let deleted = MultiValuedAttribute::from_value("u1").with_operation(Operation::Delete);

        assert_eq!(
            serde_json::to_value(added).unwrap(),
            serde_json::json!({ "value": "u1" })
        );
        assert_eq!(
            serde_json::to_value(deleted).unwrap(),
            serde_json::json!({ "value": "u1", "operation": "delete" })
        );
    }
}
