//! Search API endpoints (partial/projected search).

use crate::ChefClient;
use larder_core::{Result, SearchResult, SearchRow};
use std::collections::BTreeMap;

/// Rows requested per page
const PAGE_SIZE: u64 = 1000;

/// Search API endpoints
pub struct SearchApi<'a> {
    client: &'a ChefClient,
}

impl<'a> SearchApi<'a> {
    pub(crate) fn new(client: &'a ChefClient) -> Self {
        Self { client }
    }

    /// Build a partial search against the node index.
    ///
    /// The projection maps each result attribute name to the attribute path
    /// it is read from on the server.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let rows = client.search()
    ///     .nodes("*:*")
    ///     .attribute("name", ["name"])
    ///     .attribute("os", ["platform"])
    ///     .send()
    ///     .await?;
    /// ```
    #[must_use]
    pub fn nodes(&self, query: impl Into<String>) -> PartialSearchBuilder<'a> {
        PartialSearchBuilder::new(self.client, "node", query.into())
    }
}

/// Builder for partial search requests
pub struct PartialSearchBuilder<'a> {
    client: &'a ChefClient,
    index: &'static str,
    query: String,
    projection: BTreeMap<String, Vec<String>>,
}

impl<'a> PartialSearchBuilder<'a> {
    fn new(client: &'a ChefClient, index: &'static str, query: String) -> Self {
        Self {
            client,
            index,
            query,
            projection: BTreeMap::new(),
        }
    }

    /// Project an attribute into the result rows
    #[must_use]
    pub fn attribute<I, S>(mut self, name: impl Into<String>, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection
            .insert(name.into(), path.into_iter().map(Into::into).collect());
        self
    }

    /// Execute the search, following pagination until all rows are fetched
    pub async fn send(self) -> Result<Vec<SearchRow>> {
        let path = format!("/search/{}", self.index);
        let mut rows = Vec::new();
        let mut start: u64 = 0;

        loop {
            let start_str = start.to_string();
            let rows_str = PAGE_SIZE.to_string();
            let page: SearchResult = self
                .client
                .post_with_query(
                    &path,
                    &[
                        ("q", self.query.as_str()),
                        ("start", &start_str),
                        ("rows", &rows_str),
                    ],
                    &self.projection,
                )
                .await?;

            let fetched = page.rows.len() as u64;
            rows.extend(page.rows);

            start += fetched;
            if start >= page.total || fetched == 0 {
                break;
            }
        }

        Ok(rows)
    }
}
