use crate::{
    client::Resources,
    query::{Query, QueryResult},
    scim::Group,
    AccessToken, Client, Result, UpdateGroup,
};

const GROUPS: &str = "Groups";

/// Operations on `/Groups`.
///
/// Obtained from [`Client::groups`].
pub struct GroupService<'a> {
    resources: Resources<'a>,
}

impl<'a> GroupService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        GroupService {
            resources: Resources::new(client, GROUPS),
        }
    }

    /// Fetch the group with the given id. Fails with [`Error::NoResult`](crate::Error::NoResult)
    /// if there is none.
    pub fn get_group(&self, id: &str, token: &AccessToken) -> Result<Group> {
        self.resources.get(id, token)
    }

    pub fn get_all_groups(&self, token: &AccessToken) -> Result<QueryResult<Group>> {
        self.search_groups(&Query::default(), token)
    }

    pub fn search_groups(&self, query: &Query, token: &AccessToken) -> Result<QueryResult<Group>> {
        self.resources.search(query, token)
    }

    pub fn create_group(&self, group: &Group, token: &AccessToken) -> Result<Group> {
        self.resources.create(group, token)
    }

    pub fn replace_group(&self, id: &str, group: &Group, token: &AccessToken) -> Result<Group> {
        self.resources.replace(id, group, token)
    }

    /// Apply a partial update to an existing group, returning the updated group.
    ///
    /// ```no_run
    /// # use osiam::{AccessToken, ClientConfig, UpdateGroup};
    /// # let client = ClientConfig::from_endpoint("http://localhost:8080/osiam-server").to_client()?;
    /// # let token = AccessToken::new("token");
    /// let update = UpdateGroup::builder()
    ///     .delete_external_id()
    ///     .remove_member("94bbe688-4b1e-4e4e-80e7-e5ba5c4d6db4")
    ///     .build();
    /// client
    ///     .groups()
    ///     .update_group("69e1a5dc-89be-4343-976c-b5541af249f4", &update, &token)?;
    /// # Ok::<(), osiam::Error>(())
    /// ```
    pub fn update_group(
        &self,
        id: &str,
        update: &UpdateGroup,
        token: &AccessToken,
    ) -> Result<Group> {
        log::debug!(target: "osiam",
                    group_id = id,
                    deleted_attributes:debug = update.deleted_attributes(),
                    member_operations = update.member_operations().len();
                    "updating group");
        self.resources.update(id, update, token)
    }

    pub fn delete_group(&self, id: &str, token: &AccessToken) -> Result<()> {
        self.resources.delete(id, token)
    }
}
