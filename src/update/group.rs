use std::collections::BTreeSet;

use serde::{Serialize, Serializer};

use crate::{
    scim::{Group, MultiValuedAttribute, Operation, CORE_SCHEMA},
    Result,
};

use super::{attribute, deletion_meta, ensure_not_deleted, ensure_unambiguous};

/// Adding or removing a single member (user or group) of a group.
///
/// Equality covers both the member id and the operation, so adding and removing the same member
/// are two distinct operations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberOperation {
    member_id: String,
    operation: Operation,
}

impl MemberOperation {
    pub fn add(member_id: impl Into<String>) -> Self {
        MemberOperation {
            member_id: member_id.into(),
            operation: Operation::Add,
        }
    }

    pub fn delete(member_id: impl Into<String>) -> Self {
        MemberOperation {
            member_id: member_id.into(),
            operation: Operation::Delete,
        }
    }

    pub fn member_id(&self) -> &str {
        &self.member_id
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    fn to_scim_member(&self) -> MultiValuedAttribute {
        MultiValuedAttribute::from_value(self.member_id.clone()).with_operation(self.operation)
    }
}

/// Partial update of an existing group.
///
/// Built with [`UpdateGroupBuilder`] and sent with
/// [`GroupService::update_group`](crate::GroupService::update_group). Serializes to the SCIM
/// PATCH body expected by the server.
///
/// # Examples
/// ```
/// # use osiam::UpdateGroup;
/// let update = UpdateGroup::builder()
///     .display_name("administrators")
///     .add_member("94bbe688-4b1e-4e4e-80e7-e5ba5c4d6db4")
///     .build();
/// assert_eq!(update.display_name(), Some("administrators"));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateGroup {
    display_name: Option<String>,
    external_id: Option<String>,
    deleted_attributes: BTreeSet<String>,
    member_operations: BTreeSet<MemberOperation>,
}

impl UpdateGroup {
    pub fn builder() -> UpdateGroupBuilder {
        UpdateGroupBuilder::default()
    }

    /// New display name, if one was set.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// New external id, if one was set.
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    /// Attributes to remove server-side.
    pub fn deleted_attributes(&self) -> &BTreeSet<String> {
        &self.deleted_attributes
    }

    pub fn member_operations(&self) -> &BTreeSet<MemberOperation> {
        &self.member_operations
    }

    /// `true` if the update does not touch anything.
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.external_id.is_none()
            && self.deleted_attributes.is_empty()
            && self.member_operations.is_empty()
    }

    /// The group as sent to the server.
    pub fn to_scim_group(&self) -> Group {
        Group {
            schemas: vec![CORE_SCHEMA.to_owned()],
            display_name: self.display_name.clone(),
            external_id: self.external_id.clone(),
            members: self
                .member_operations
                .iter()
                .map(MemberOperation::to_scim_member)
                .collect(),
            meta: deletion_meta(&self.deleted_attributes),
            ..Default::default()
        }
    }
}

impl Serialize for UpdateGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_scim_group().serialize(serializer)
    }
}

/// Accumulates changes for an [`UpdateGroup`].
#[derive(Debug, Default, Clone)]
pub struct UpdateGroupBuilder {
    display_name: Option<String>,
    external_id: Option<String>,
    deleted_attributes: BTreeSet<String>,
    member_operations: BTreeSet<MemberOperation>,
}

impl UpdateGroupBuilder {
    /// Set a new display name. A later call replaces an earlier one.
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Set a new external id.
    ///
    /// This does not undo a previous [`delete_external_id`](Self::delete_external_id): the
    /// document then carries both the new value and the deletion.
    pub fn external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Remove the external id of the group.
    pub fn delete_external_id(mut self) -> Self {
        self.deleted_attributes
            .insert(attribute::EXTERNAL_ID.to_owned());
        self
    }

    /// Remove all members of the group.
    pub fn delete_all_members(mut self) -> Self {
        self.deleted_attributes.insert(attribute::MEMBERS.to_owned());
        self
    }

    /// Add a user or group as member.
    pub fn add_member(mut self, member_id: impl Into<String>) -> Self {
        self.member_operations.insert(MemberOperation::add(member_id));
        self
    }

    /// Remove the membership of a user or group.
    pub fn remove_member(mut self, member_id: impl Into<String>) -> Self {
        self.member_operations
            .insert(MemberOperation::delete(member_id));
        self
    }

    /// Snapshot the changes recorded so far.
    ///
    /// The builder is left untouched, so calling `build` again yields an equal document.
    pub fn build(&self) -> UpdateGroup {
        UpdateGroup {
            display_name: self.display_name.clone(),
            external_id: self.external_id.clone(),
            deleted_attributes: self.deleted_attributes.clone(),
            member_operations: self.member_operations.clone(),
        }
    }

    /// Like [`build`](Self::build), but fails with [`Error::ConflictingUpdate`] if the external
    /// id is both set and deleted, or a member is both added and removed.
    ///
    /// [`Error::ConflictingUpdate`]: crate::Error::ConflictingUpdate
    pub fn build_strict(&self) -> Result<UpdateGroup> {
        let update = self.build();
        ensure_not_deleted(
            attribute::EXTERNAL_ID,
            update.external_id.is_some(),
            &update.deleted_attributes,
        )?;
        ensure_unambiguous(
            attribute::MEMBERS,
            update
                .member_operations
                .iter()
                .map(|op| (op.member_id(), op.operation())),
        )?;
        Ok(update)
    }
}
