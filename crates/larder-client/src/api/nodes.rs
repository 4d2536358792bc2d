//! Node API endpoints.

use crate::ChefClient;
use larder_core::{Node, Result};

/// Node API endpoints
pub struct NodesApi<'a> {
    client: &'a ChefClient,
}

impl<'a> NodesApi<'a> {
    pub(crate) fn new(client: &'a ChefClient) -> Self {
        Self { client }
    }

    /// Fetch a node by name
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let node = client.nodes().get("web1").await?;
    /// println!("Environment: {}", node.chef_environment);
    /// ```
    pub async fn get(&self, name: &str) -> Result<Node> {
        self.client.get(&format!("/nodes/{name}")).await
    }
}
