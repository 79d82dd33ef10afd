use std::collections::BTreeSet;

use serde::{Serialize, Serializer};

use crate::{
    scim::{MultiValuedAttribute, Name, Operation, User, CORE_SCHEMA},
    Result,
};

use super::{attribute, deletion_meta, ensure_not_deleted, ensure_unambiguous};

/// Partial update of an existing user.
///
/// Built with [`UpdateUserBuilder`] and sent with
/// [`UserService::update_user`](crate::UserService::update_user).
///
/// # Examples
/// ```
/// # use osiam::{MultiValuedAttribute, UpdateUser};
/// let update = UpdateUser::builder()
///     .nick_name("Max")
///     .delete_title()
///     .add_email(MultiValuedAttribute::from_value("max@example.com").with_type("work"))
///     .build();
/// assert!(!update.is_empty());
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpdateUser {
    values: UserValues,
    deleted_attributes: BTreeSet<String>,
    emails: BTreeSet<MultiValuedAttribute>,
    phone_numbers: BTreeSet<MultiValuedAttribute>,
}

/// New values of single-valued attributes. `None` means untouched.
#[derive(Debug, Default, Clone, PartialEq)]
struct UserValues {
    user_name: Option<String>,
    display_name: Option<String>,
    nick_name: Option<String>,
    external_id: Option<String>,
    title: Option<String>,
    locale: Option<String>,
    preferred_language: Option<String>,
    profile_url: Option<String>,
    timezone: Option<String>,
    user_type: Option<String>,
    password: Option<String>,
    active: Option<bool>,
    name: Option<Name>,
}

impl UserValues {
    fn is_empty(&self) -> bool {
        *self == UserValues::default()
    }

    /// Attributes given a new value, by their SCIM name. Only attributes that can also be deleted
    /// are listed.
    fn deletable_set(&self) -> [(&'static str, bool); 10] {
        [
            (attribute::DISPLAY_NAME, self.display_name.is_some()),
            (attribute::NICK_NAME, self.nick_name.is_some()),
            (attribute::EXTERNAL_ID, self.external_id.is_some()),
            (attribute::TITLE, self.title.is_some()),
            (attribute::LOCALE, self.locale.is_some()),
            (attribute::PREFERRED_LANGUAGE, self.preferred_language.is_some()),
            (attribute::PROFILE_URL, self.profile_url.is_some()),
            (attribute::TIMEZONE, self.timezone.is_some()),
            (attribute::USER_TYPE, self.user_type.is_some()),
            (attribute::NAME, self.name.is_some()),
        ]
    }
}

impl UpdateUser {
    pub fn builder() -> UpdateUserBuilder {
        UpdateUserBuilder::default()
    }

    /// Attributes to remove server-side.
    pub fn deleted_attributes(&self) -> &BTreeSet<String> {
        &self.deleted_attributes
    }

    /// `true` if the update does not touch anything.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
            && self.deleted_attributes.is_empty()
            && self.emails.is_empty()
            && self.phone_numbers.is_empty()
    }

    /// The user as sent to the server.
    pub fn to_scim_user(&self) -> User {
        let values = self.values.clone();
        User {
            schemas: vec![CORE_SCHEMA.to_owned()],
            user_name: values.user_name,
            display_name: values.display_name,
            nick_name: values.nick_name,
            external_id: values.external_id,
            title: values.title,
            locale: values.locale,
            preferred_language: values.preferred_language,
            profile_url: values.profile_url,
            timezone: values.timezone,
            user_type: values.user_type,
            password: values.password,
            active: values.active,
            name: values.name,
            emails: self.emails.iter().cloned().collect(),
            phone_numbers: self.phone_numbers.iter().cloned().collect(),
            meta: deletion_meta(&self.deleted_attributes),
            ..Default::default()
        }
    }
}

impl Serialize for UpdateUser {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_scim_user().serialize(serializer)
    }
}

/// Accumulates changes for an [`UpdateUser`].
///
/// Setters overwrite earlier calls for the same attribute. Setting an attribute does not undo an
/// earlier `delete_*` call for it.
#[derive(Debug, Default, Clone)]
pub struct UpdateUserBuilder {
    update: UpdateUser,
}

impl UpdateUserBuilder {
    pub fn user_name(mut self, user_name: impl Into<String>) -> Self {
        self.update.values.user_name = Some(user_name.into());
        self
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.update.values.display_name = Some(display_name.into());
        self
    }

    pub fn delete_display_name(self) -> Self {
        self.delete(attribute::DISPLAY_NAME)
    }

    pub fn nick_name(mut self, nick_name: impl Into<String>) -> Self {
        self.update.values.nick_name = Some(nick_name.into());
        self
    }

    pub fn delete_nick_name(self) -> Self {
        self.delete(attribute::NICK_NAME)
    }

    pub fn external_id(mut self, external_id: impl Into<String>) -> Self {
        self.update.values.external_id = Some(external_id.into());
        self
    }

    pub fn delete_external_id(self) -> Self {
        self.delete(attribute::EXTERNAL_ID)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.update.values.title = Some(title.into());
        self
    }

    pub fn delete_title(self) -> Self {
        self.delete(attribute::TITLE)
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.update.values.locale = Some(locale.into());
        self
    }

    pub fn delete_locale(self) -> Self {
        self.delete(attribute::LOCALE)
    }

    pub fn preferred_language(mut self, preferred_language: impl Into<String>) -> Self {
        self.update.values.preferred_language = Some(preferred_language.into());
        self
    }

    pub fn delete_preferred_language(self) -> Self {
        self.delete(attribute::PREFERRED_LANGUAGE)
    }

    pub fn profile_url(mut self, profile_url: impl Into<String>) -> Self {
        self.update.values.profile_url = Some(profile_url.into());
        self
    }

    pub fn delete_profile_url(self) -> Self {
        self.delete(attribute::PROFILE_URL)
    }

    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.update.values.timezone = Some(timezone.into());
        self
    }

    pub fn delete_timezone(self) -> Self {
        self.delete(attribute::TIMEZONE)
    }

    pub fn user_type(mut self, user_type: impl Into<String>) -> Self {
        self.update.values.user_type = Some(user_type.into());
        self
    }

    pub fn delete_user_type(self) -> Self {
        self.delete(attribute::USER_TYPE)
    }

    pub fn name(mut self, name: Name) -> Self {
        self.update.values.name = Some(name);
        self
    }

    pub fn delete_name(self) -> Self {
        self.delete(attribute::NAME)
    }

    /// Set a new password. The server never returns it.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.update.values.password = Some(password.into());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.update.values.active = Some(active);
        self
    }

    /// Add an email address. Any operation marker on `email` is dropped.
    pub fn add_email(mut self, mut email: MultiValuedAttribute) -> Self {
        email.operation = None;
        self.update.emails.insert(email);
        self
    }

    /// Remove the email address with the given value.
    pub fn remove_email(mut self, value: impl Into<String>) -> Self {
        self.update
            .emails
            .insert(MultiValuedAttribute::from_value(value).with_operation(Operation::Delete));
        self
    }

    pub fn delete_all_emails(self) -> Self {
        self.delete(attribute::EMAILS)
    }

    /// Add a phone number. Any operation marker on `phone_number` is dropped.
    pub fn add_phone_number(mut self, mut phone_number: MultiValuedAttribute) -> Self {
        phone_number.operation = None;
        self.update.phone_numbers.insert(phone_number);
        self
    }

    /// Remove the phone number with the given value.
    pub fn remove_phone_number(mut self, value: impl Into<String>) -> Self {
        self.update
            .phone_numbers
            .insert(MultiValuedAttribute::from_value(value).with_operation(Operation::Delete));
        self
    }

    pub fn delete_all_phone_numbers(self) -> Self {
        self.delete(attribute::PHONE_NUMBERS)
    }

    fn delete(mut self, attribute: &str) -> Self {
        self.update.deleted_attributes.insert(attribute.to_owned());
        self
    }

    /// Snapshot the changes recorded so far, leaving the builder untouched.
    pub fn build(&self) -> UpdateUser {
        self.update.clone()
    }

    /// Like [`build`](Self::build), but fails with
    /// [`Error::ConflictingUpdate`](crate::Error::ConflictingUpdate) if an attribute is both set
    /// and deleted, or an email or phone number is both added and removed.
    pub fn build_strict(&self) -> Result<UpdateUser> {
        let update = self.build();
        for (attribute, is_set) in update.values.deletable_set() {
            ensure_not_deleted(attribute, is_set, &update.deleted_attributes)?;
        }
        ensure_unambiguous(attribute::EMAILS, value_operations(&update.emails))?;
        ensure_unambiguous(
            attribute::PHONE_NUMBERS,
            value_operations(&update.phone_numbers),
        )?;
        Ok(update)
    }
}

fn value_operations(
    attributes: &BTreeSet<MultiValuedAttribute>,
) -> impl Iterator<Item = (&str, Operation)> + '_ {
    attributes.iter().filter_map(|attribute| {
        let value = attribute.value.as_deref()?;
        Some((value, attribute.operation.unwrap_or(Operation::Add)))
    })
}
