//! Narrow capability traits consumed by the capture and report pipelines.
//!
//! Each trait covers one server capability so that callers (and their
//! tests) never depend on the transport directly; [`ChefClient`] implements
//! all of them, and test suites substitute deterministic fakes.
//!
//! Every error crossing a capability boundary is wrapped with a
//! stage-identifying message ("unable to retrieve node: X") so user-visible
//! output carries both the context and the underlying cause.

use crate::ChefClient;
use async_trait::async_trait;
use larder_core::{
    CookbookListing, Environment, LarderError, Node, Result, Role, SearchRow,
};
use std::collections::BTreeMap;
use std::path::Path;

/// Fetch node objects by name
#[async_trait]
pub trait NodeFetcher: Send + Sync {
    /// Fetch a node by name
    async fn fetch_node(&self, name: &str) -> Result<Node>;
}

/// Fetch role objects by name
#[async_trait]
pub trait RoleFetcher: Send + Sync {
    /// Fetch a role by name
    async fn fetch_role(&self, name: &str) -> Result<Role>;
}

/// Fetch environment objects by name
#[async_trait]
pub trait EnvironmentFetcher: Send + Sync {
    /// Fetch an environment by name
    async fn fetch_environment(&self, name: &str) -> Result<Environment>;
}

/// List and download cookbooks
#[async_trait]
pub trait CookbookStore: Send + Sync {
    /// List available (name, version) pairs; `num_versions` of 0 means
    /// unlimited
    async fn list_cookbooks(&self, num_versions: u32) -> Result<CookbookListing>;

    /// Download a named version's full content tree into `dir`
    async fn download_cookbook(&self, name: &str, version: &str, dir: &Path) -> Result<()>;
}

/// Execute partial/projected searches against indexed node attributes
#[async_trait]
pub trait NodeSearcher: Send + Sync {
    /// Run a partial search, returning rows of the declared attribute subset
    async fn partial_search(
        &self,
        query: &str,
        projection: BTreeMap<String, Vec<String>>,
    ) -> Result<Vec<SearchRow>>;
}

#[async_trait]
impl NodeFetcher for ChefClient {
    async fn fetch_node(&self, name: &str) -> Result<Node> {
        self.nodes()
            .get(name)
            .await
            .map_err(|e| LarderError::retrieve("node", name, e))
    }
}

#[async_trait]
impl RoleFetcher for ChefClient {
    async fn fetch_role(&self, name: &str) -> Result<Role> {
        self.roles()
            .get(name)
            .await
            .map_err(|e| LarderError::retrieve("role", name, e))
    }
}

#[async_trait]
impl EnvironmentFetcher for ChefClient {
    async fn fetch_environment(&self, name: &str) -> Result<Environment> {
        self.environments()
            .get(name)
            .await
            .map_err(|e| LarderError::retrieve("environment", name, e))
    }
}

#[async_trait]
impl CookbookStore for ChefClient {
    async fn list_cookbooks(&self, num_versions: u32) -> Result<CookbookListing> {
        self.cookbooks()
            .list(num_versions)
            .await
            .map_err(|e| LarderError::retrieve("cookbook list", "*", e))
    }

    async fn download_cookbook(&self, name: &str, version: &str, dir: &Path) -> Result<()> {
        self.cookbooks()
            .download(name, version, dir)
            .await
            .map_err(|e| LarderError::retrieve("cookbook", format!("{name} {version}"), e))
    }
}

#[async_trait]
impl NodeSearcher for ChefClient {
    async fn partial_search(
        &self,
        query: &str,
        projection: BTreeMap<String, Vec<String>>,
    ) -> Result<Vec<SearchRow>> {
        let mut builder = self.search().nodes(query);
        for (name, path) in projection {
            builder = builder.attribute(name, path);
        }
        builder
            .send()
            .await
            .map_err(|e| LarderError::retrieve("node search", query, e))
    }
}
