//! A Rust client for OSIAM, an identity management server speaking SCIM and OAuth2.
//!
//! # Overview
//!
//! An [`AuthService`] retrieves an [`AccessToken`] from the OAuth2 token endpoint. A [`Client`],
//! created from a [`ClientConfig`], hands out a [`UserService`] and a [`GroupService`] that read,
//! search, create, replace, update and delete [`User`]s and [`Group`]s with that token.
//!
//! Existing resources are changed with sparse update documents. [`UpdateUser`] and
//! [`UpdateGroup`] are assembled with builders and only carry what the caller touched: new values,
//! attributes to delete, and values to add to or remove from multi-valued attributes.
//!
//! ```no_run
//! use osiam::{AuthConfig, ClientConfig, GrantType, UpdateGroup};
//!
//! let token = AuthConfig::from_token_endpoint("http://localhost:8080/osiam-server/oauth/token")
//!     .client_id("example-client")
//!     .client_secret("secret")
//!     .grant_type(GrantType::password("marissa", "koala"))
//!     .to_auth_service()?
//!     .retrieve_access_token()?;
//!
//! let client = ClientConfig::from_endpoint("http://localhost:8080/osiam-server").to_client()?;
//! let update = UpdateGroup::builder()
//!     .display_name("administrators")
//!     .add_member("94bbe688-4b1e-4e4e-80e7-e5ba5c4d6db4")
//!     .build();
//! client
//!     .groups()
//!     .update_group("69e1a5dc-89be-4343-976c-b5541af249f4", &update, &token)?;
//! # Ok::<(), osiam::Error>(())
//! ```
//!
//! # Error Handling
//!
//! Errors are represented by the [`Error`] enum. HTTP statuses returned by the server map to
//! dedicated variants ([`Error::NoResult`] for 404, [`Error::Unauthorized`] for 401, ...).
//!
//! Update builders never fail: contradictory calls (setting and deleting the same attribute,
//! adding and removing the same member) are all forwarded to the server. Use `build_strict` to
//! reject them on the client.
//!
//! # Logging
//!
//! The package uses the [`log`](https://docs.rs/log/latest/log/) crate for logging
//! messages. Consider integrating a `log`-compatible logger implementation for better visibility
//! into client operations.

#![warn(rustdoc::missing_crate_level_docs)]

mod auth;
mod client;
mod config;
mod error;
mod group_service;
mod query;
mod scim;
mod update;
mod user_service;

pub use auth::{AccessToken, AuthConfig, AuthService, GrantType};
pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use group_service::GroupService;
pub use query::{Query, QueryBuilder, QueryResult, SortOrder};
pub use scim::{Address, Group, Meta, MultiValuedAttribute, Name, Operation, User, CORE_SCHEMA};
pub use update::{MemberOperation, UpdateGroup, UpdateGroupBuilder, UpdateUser, UpdateUserBuilder};
pub use user_service::UserService;
