//! Sparse update documents for existing resources.
//!
//! An update document only carries what the caller touched: new values for attributes that were
//! set, the names of attributes to remove, and per-value add/delete operations on multi-valued
//! attributes. Untouched attributes are absent, never defaulted, so the server leaves them as they
//! are.
//!
//! Builders accept every combination of calls. Setting and deleting the same attribute, or adding
//! and removing the same member, yields a document carrying both intents, and the server decides
//! which one wins. Use `build_strict` to reject such documents on the client instead.
use std::collections::{BTreeSet, HashSet};

use crate::{
    scim::{Meta, Operation},
    Error, Result,
};

mod group;
mod user;

pub use group::{MemberOperation, UpdateGroup, UpdateGroupBuilder};
pub use user::{UpdateUser, UpdateUserBuilder};

/// Canonical SCIM attribute names used in `meta.attributes`.
pub(crate) mod attribute {
    pub const DISPLAY_NAME: &str = "displayName";
    pub const EMAILS: &str = "emails";
    pub const EXTERNAL_ID: &str = "externalId";
    pub const LOCALE: &str = "locale";
    pub const MEMBERS: &str = "members";
    pub const NAME: &str = "name";
    pub const NICK_NAME: &str = "nickName";
    pub const PHONE_NUMBERS: &str = "phoneNumbers";
    pub const PREFERRED_LANGUAGE: &str = "preferredLanguage";
    pub const PROFILE_URL: &str = "profileUrl";
    pub const TIMEZONE: &str = "timezone";
    pub const TITLE: &str = "title";
    pub const USER_TYPE: &str = "userType";
}

/// `meta` block listing the attributes to delete, or `None` if nothing is deleted.
fn deletion_meta(deleted_attributes: &BTreeSet<String>) -> Option<Meta> {
    if deleted_attributes.is_empty() {
        return None;
    }
    Some(Meta {
        attributes: deleted_attributes.clone(),
        ..Default::default()
    })
}

/// Fails if `attribute` is given a new value and is deleted in the same document.
fn ensure_not_deleted(
    attribute: &str,
    is_set: bool,
    deleted_attributes: &BTreeSet<String>,
) -> Result<()> {
    if is_set && deleted_attributes.contains(attribute) {
        return Err(Error::ConflictingUpdate(format!(
            "attribute {attribute:?} is both set and deleted"
        )));
    }
    Ok(())
}

/// Fails if any value of the `attribute` collection is both added and removed.
fn ensure_unambiguous<'a>(
    attribute: &str,
    operations: impl IntoIterator<Item = (&'a str, Operation)>,
) -> Result<()> {
    let mut added = HashSet::new();
    let mut removed = HashSet::new();
    for (value, operation) in operations {
        match operation {
            Operation::Add => added.insert(value),
            Operation::Delete => removed.insert(value),
        };
    }

    match added.intersection(&removed).min() {
        Some(value) => Err(Error::ConflictingUpdate(format!(
            "{attribute} value {value:?} is both added and removed"
        ))),
        None => Ok(()),
    }
}
