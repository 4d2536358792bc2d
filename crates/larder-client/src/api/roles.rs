//! Role API endpoints.

use crate::ChefClient;
use larder_core::{Result, Role};

/// Role API endpoints
pub struct RolesApi<'a> {
    client: &'a ChefClient,
}

impl<'a> RolesApi<'a> {
    pub(crate) fn new(client: &'a ChefClient) -> Self {
        Self { client }
    }

    /// Fetch a role by name
    pub async fn get(&self, name: &str) -> Result<Role> {
        self.client.get(&format!("/roles/{name}")).await
    }
}
