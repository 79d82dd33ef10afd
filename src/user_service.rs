use crate::{
    client::Resources,
    query::{Query, QueryResult},
    scim::User,
    AccessToken, Client, Result, UpdateUser,
};

const USERS: &str = "Users";

/// Operations on `/Users`.
///
/// Obtained from [`Client::users`].
///
/// # Examples
/// ```no_run
/// # use osiam::{AccessToken, ClientConfig};
/// let client = ClientConfig::from_endpoint("http://localhost:8080/osiam-server").to_client()?;
/// let token = AccessToken::new("token");
/// let user = client
///     .users()
///     .get_user("94bbe688-4b1e-4e4e-80e7-e5ba5c4d6db4", &token)?;
/// # Ok::<(), osiam::Error>(())
/// ```
pub struct UserService<'a> {
    resources: Resources<'a>,
}

impl<'a> UserService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        UserService {
            resources: Resources::new(client, USERS),
        }
    }

    /// Fetch the user with the given id. Fails with [`Error::NoResult`](crate::Error::NoResult)
    /// if there is none.
    pub fn get_user(&self, id: &str, token: &AccessToken) -> Result<User> {
        self.resources.get(id, token)
    }

    /// Fetch the first page of all users, in the server's default page size.
    pub fn get_all_users(&self, token: &AccessToken) -> Result<QueryResult<User>> {
        self.search_users(&Query::default(), token)
    }

    pub fn search_users(&self, query: &Query, token: &AccessToken) -> Result<QueryResult<User>> {
        self.resources.search(query, token)
    }

    /// Create a user, returning it as stored by the server (with `id` and `meta`).
    pub fn create_user(&self, user: &User, token: &AccessToken) -> Result<User> {
        self.resources.create(user, token)
    }

    /// Replace all attributes of an existing user.
    pub fn replace_user(&self, id: &str, user: &User, token: &AccessToken) -> Result<User> {
        self.resources.replace(id, user, token)
    }

    /// Apply a partial update to an existing user, returning the updated user.
    pub fn update_user(&self, id: &str, update: &UpdateUser, token: &AccessToken) -> Result<User> {
        log::debug!(target: "osiam",
                    user_id = id,
                    deleted_attributes:debug = update.deleted_attributes();
                    "updating user");
        self.resources.update(id, update, token)
    }

    pub fn delete_user(&self, id: &str, token: &AccessToken) -> Result<()> {
        self.resources.delete(id, token)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use httpmock::prelude::*;
    use serde_json::json;

    use crate::{
        scim::{MultiValuedAttribute, User},
        AccessToken, Client, ClientConfig, Error, Query, UpdateUser,
    };

    const USER_ID: &str = "94bbe688-4b1e-4e4e-80e7-e5ba5c4d6db4";

    fn client(server: &MockServer) -> Client {
        ClientConfig::from_endpoint(server.url("/osiam-server"))
            .to_client()
            .unwrap()
    }

    fn user_fixture() -> String {
        fs::read_to_string("tests/data/scim/user.json")
            .expect("Failed to open tests/data/scim/user.json")
    }

    #[test]
    fn get_user() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(format!("/osiam-server/Users/{USER_ID}"))
                .header("authorization", "Bearer tok");
            then.status(200)
                .header("content-type", "application/json")
                .body(user_fixture());
        });

        let client = client(&server);
        let user = client
            .users()
            .get_user(USER_ID, &AccessToken::new("tok"))
            .unwrap();

        assert_eq!(user.id.as_deref(), Some(USER_ID));
        assert_eq!(user.display_name.as_deref(), Some("MaxExample"));
        mock.assert();
    }

    #[test]
    fn get_missing_user() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/osiam-server/Users/missing");
            then.status(404).body(
                r#"{"error_code":"NOT_FOUND","description":"Resource missing not found."}"#,
            );
        });

        let client = client(&server);
        let err = client
            .users()
            .get_user("missing", &AccessToken::new("tok"))
            .unwrap_err();

        assert!(matches!(err, Error::NoResult), "got: {err}");
    }

    #[test]
    fn get_user_with_empty_id_is_rejected() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/osiam-server/Users/");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"totalResults":0,"Resources":[]}"#);
        });

        let client = client(&server);
        let err = client
            .users()
            .get_user("", &AccessToken::new("tok"))
            .unwrap_err();

        assert!(matches!(err, Error::InvalidId), "got: {err}");
        mock.assert_calls(0);
    }

    #[test]
    fn expired_token_is_still_sent() {
        let token: AccessToken = serde_json::from_value(json!({
            "token": "expired-tok",
            "token_type": "bearer",
            "expires_at": "2011-08-01T18:29:49Z",
        }))
        .unwrap();
        assert!(token.is_expired());

        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(format!("/osiam-server/Users/{USER_ID}"))
                .header("authorization", "Bearer expired-tok");
            then.status(401);
        });

        let client = client(&server);
        let err = client.users().get_user(USER_ID, &token).unwrap_err();

        assert!(matches!(err, Error::Unauthorized), "got: {err}");
        mock.assert();
    }

    #[test]
    fn search_users() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/osiam-server/Users")
                .query_param("filter", r#"userName eq "marissa""#)
                .query_param("count", "1");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    json!({
                        "totalResults": 1,
                        "itemsPerPage": 1,
                        "startIndex": 1,
                        "Resources": [{ "id": "u2", "userName": "marissa" }],
                    })
                    .to_string(),
                );
        });

        let client = client(&server);
        let query = Query::builder()
            .filter(r#"userName eq "marissa""#)
            .count(1)
            .build();
        let result = client
            .users()
            .search_users(&query, &AccessToken::new("tok"))
            .unwrap();

        assert_eq!(result.total_results, 1);
        assert_eq!(result.resources[0].user_name.as_deref(), Some("marissa"));
        mock.assert();
    }

    #[test]
    fn create_user() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/osiam-server/Users")
                .header("content-type", "application/json")
                .json_body(json!({
                    "schemas": ["urn:scim:schemas:core:1.0"],
                    "userName": "bjensen",
                    "emails": [{ "value": "bjensen@example.com", "type": "work" }],
                }));
            then.status(201)
                .header("content-type", "application/json")
                .body(r#"{"id":"new-id","userName":"bjensen"}"#);
        });

        let mut user = User::new("bjensen");
        user.emails
            .push(MultiValuedAttribute::from_value("bjensen@example.com").with_type("work"));

        let client = client(&server);
        let created = client
            .users()
            .create_user(&user, &AccessToken::new("tok"))
            .unwrap();

        assert_eq!(created.id.as_deref(), Some("new-id"));
        mock.assert();
    }

    #[test]
    fn create_conflicting_user() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/osiam-server/Users");
            then.status(409).body(
                r#"{"error_code":"CONFLICT","description":"Can't create a user. The username \"bjensen\" is already taken."}"#,
            );
        });

        let client = client(&server);
        let err = client
            .users()
            .create_user(&User::new("bjensen"), &AccessToken::new("tok"))
            .unwrap_err();

        assert!(
            matches!(err, Error::Conflict(ref message) if message.contains("already taken")),
            "got: {err}"
        );
    }

    #[test]
    fn update_user_sends_only_touched_attributes() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PATCH)
                .path(format!("/osiam-server/Users/{USER_ID}"))
                .json_body(json!({
                    "schemas": ["urn:scim:schemas:core:1.0"],
                    "nickName": "Maxi",
                    "emails": [{ "value": "MaxExample@home.de", "operation": "delete" }],
                    "meta": { "attributes": ["title"] },
                }));
            then.status(200)
                .header("content-type", "application/json")
                .body(user_fixture());
        });

        let update = UpdateUser::builder()
            .nick_name("Maxi")
            .delete_title()
            .remove_email("MaxExample@home.de")
            .build();

        let client = client(&server);
        client
            .users()
            .update_user(USER_ID, &update, &AccessToken::new("tok"))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn replace_and_delete_user() {
        let server = MockServer::start();
        let replace = server.mock(|when, then| {
            when.method(PUT).path("/osiam-server/Users/u1");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id":"u1","userName":"bjensen","title":"Dr"}"#);
        });
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/osiam-server/Users/u1");
            then.status(200);
        });

        let client = client(&server);
        let token = AccessToken::new("tok");
        let mut user = User::new("bjensen");
        user.title = Some("Dr".to_owned());

        let replaced = client.users().replace_user("u1", &user, &token).unwrap();
        assert_eq!(replaced.title.as_deref(), Some("Dr"));
        client.users().delete_user("u1", &token).unwrap();

        replace.assert();
        delete.assert();
    }
}
