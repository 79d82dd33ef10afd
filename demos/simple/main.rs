use osiam::{AuthConfig, ClientConfig, GrantType, Query, UpdateGroup};

pub fn main() -> osiam::Result<()> {
    env_logger::init();

    let endpoint = std::env::var("OSIAM_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:8080/osiam-server".to_owned());

    // Retrieve an access token for the example user.
    let token = AuthConfig::from_token_endpoint(format!("{endpoint}/oauth/token"))
        .client_id("example-client")
        .client_secret("secret")
        .grant_type(GrantType::password("marissa", "koala"))
        .to_auth_service()?
        .retrieve_access_token()?;

    let client = ClientConfig::from_endpoint(endpoint).to_client()?;

    let query = Query::builder()
        .filter(r#"userName eq "marissa""#)
        .build();
    let users = client.users().search_users(&query, &token)?;
    let Some(marissa) = users.resources.first() else {
        println!("marissa not found");
        return Ok(());
    };
    let Some(marissa_id) = marissa.id.as_deref() else {
        return Ok(());
    };

    // Only the touched attributes are sent to the server.
    let update = UpdateGroup::builder()
        .display_name("administrators")
        .add_member(marissa_id)
        .build();

    let groups = client.groups().get_all_groups(&token)?;
    if let Some(group_id) = groups
        .resources
        .first()
        .and_then(|group| group.id.as_deref())
    {
        let group = client.groups().update_group(group_id, &update, &token)?;
        println!("Updated group: {:?}", group);
    }

    Ok(())
}
