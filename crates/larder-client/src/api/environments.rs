//! Environment API endpoints.

use crate::ChefClient;
use larder_core::{Environment, Result};

/// Environment API endpoints
pub struct EnvironmentsApi<'a> {
    client: &'a ChefClient,
}

impl<'a> EnvironmentsApi<'a> {
    pub(crate) fn new(client: &'a ChefClient) -> Self {
        Self { client }
    }

    /// Fetch an environment by name
    pub async fn get(&self, name: &str) -> Result<Environment> {
        self.client.get(&format!("/environments/{name}")).await
    }
}
