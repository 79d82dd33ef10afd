use serde::{Deserialize, Serialize};

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T> {
    #[serde(default)]
    pub schemas: Vec<String>,
    pub total_results: u64,
    #[serde(default)]
    pub items_per_page: u64,
    #[serde(default = "default_start_index")]
    pub start_index: u64,
    #[serde(rename = "Resources", default = "Vec::new")]
    pub resources: Vec<T>,
}

fn default_start_index() -> u64 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

/// Search parameters for `/Users` and `/Groups`.
///
/// # Examples
/// ```
/// # use osiam::{Query, SortOrder};
/// let query = Query::builder()
///     .filter(r#"userName eq "marissa""#)
///     .sort_by("userName")
///     .sort_order(SortOrder::Descending)
///     .count(10)
///     .build();
/// assert_eq!(query.params().len(), 4);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Query {
    params: Vec<(&'static str, String)>,
}

impl Query {
    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }

    /// URL query parameters, unset ones omitted.
    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }
}

#[derive(Debug, Default, Clone)]
pub struct QueryBuilder {
    filter: Option<String>,
    attributes: Vec<String>,
    sort_by: Option<String>,
    sort_order: Option<SortOrder>,
    count: Option<u64>,
    start_index: Option<u64>,
}

impl QueryBuilder {
    /// SCIM filter expression, e.g. `userName eq "marissa"`.
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Restrict the returned attributes. May be called repeatedly.
    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn sort_by(mut self, attribute: impl Into<String>) -> Self {
        self.sort_by = Some(attribute.into());
        self
    }

    pub fn sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    /// Maximum number of resources per page.
    pub fn count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// 1-based index of the first resource of the page.
    pub fn start_index(mut self, start_index: u64) -> Self {
        self.start_index = Some(start_index);
        self
    }

    pub fn build(&self) -> Query {
        let mut params = Vec::new();
        if let Some(filter) = &self.filter {
            params.push(("filter", filter.clone()));
        }
        if !self.attributes.is_empty() {
            params.push(("attributes", self.attributes.join(",")));
        }
        if let Some(sort_by) = &self.sort_by {
            params.push(("sortBy", sort_by.clone()));
        }
        if let Some(sort_order) = self.sort_order {
            params.push(("sortOrder", sort_order.as_str().to_owned()));
        }
        if let Some(count) = self.count {
            params.push(("count", count.to_string()));
        }
        if let Some(start_index) = self.start_index {
            params.push(("startIndex", start_index.to_string()));
        }
        Query { params }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs::File, io::BufReader};

    use crate::scim::User;

    use super::{Query, QueryResult, SortOrder};

    #[test]
    fn empty_query_has_no_params() {
        assert!(Query::builder().build().params().is_empty());
    }

    #[test]
    fn all_params() {
        let query = Query::builder()
            .filter(r#"userName eq "marissa""#)
            .attribute("userName")
            .attribute("emails")
            .sort_by("userName")
            .sort_order(SortOrder::Ascending)
            .count(5)
            .start_index(11)
            .build();

        assert_eq!(
            query.params(),
            &[
                ("filter", r#"userName eq "marissa""#.to_owned()),
                ("attributes", "userName,emails".to_owned()),
                ("sortBy", "userName".to_owned()),
                ("sortOrder", "ascending".to_owned()),
                ("count", "5".to_owned()),
                ("startIndex", "11".to_owned()),
            ]
        );
    }

    #[test]
    fn parse_users_query_result() {
        let f = File::open("tests/data/scim/users_query_result.json")
            .expect("Failed to open tests/data/scim/users_query_result.json");
        let result: QueryResult<User> = serde_json::from_reader(BufReader::new(f)).unwrap();

        assert_eq!(result.total_results, 2);
        assert_eq!(result.items_per_page, 100);
        assert_eq!(result.start_index, 1);
        assert_eq!(result.resources.len(), 2);
        assert_eq!(result.resources[1].user_name.as_deref(), Some("marissa"));
    }

    #[test]
    fn parse_empty_query_result() {
        let result: QueryResult<User> = serde_json::from_str(r#"{ "totalResults": 0 }"#).unwrap();

        assert_eq!(result.total_results, 0);
        assert_eq!(result.start_index, 1);
        assert!(result.resources.is_empty());
    }
}
