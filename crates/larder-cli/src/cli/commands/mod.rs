//! Subcommand implementations

pub mod capture;
pub mod config;
pub mod report;

use crate::cli::args::Cli;
use crate::credentials::{Credentials, ProfileOverride};
use anyhow::Result;
use larder::ChefClient;
use std::path::PathBuf;

/// Connection settings shared by every subcommand, resolved from the
/// global flags.
#[derive(Debug)]
pub struct Context {
    pub credentials_path: Option<PathBuf>,
    pub profile: String,
    pub client_name: Option<String>,
    pub client_key: Option<String>,
    pub chef_server_url: Option<String>,
    pub ssl_no_verify: bool,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            credentials_path: cli.credentials.clone(),
            profile: cli.profile.clone(),
            client_name: cli.client_name.clone(),
            client_key: cli.client_key.clone(),
            chef_server_url: cli.chef_server_url.clone(),
            ssl_no_verify: cli.ssl_no_verify,
        }
    }

    /// Load credentials (explicit path or discovery) and apply the
    /// command-line overrides on top of the active profile.
    pub fn credentials(&self) -> Result<Credentials> {
        let mut credentials = match &self.credentials_path {
            Some(path) => Credentials::load(path, &self.profile)?,
            None => Credentials::discover(&self.profile)?,
        };

        let mut overrides: Vec<ProfileOverride> = Vec::new();
        if let Some(name) = self.client_name.clone() {
            overrides.push(Box::new(move |p| p.client_name = name));
        }
        if let Some(key) = self.client_key.clone() {
            overrides.push(Box::new(move |p| p.client_key = key));
        }
        if let Some(url) = self.chef_server_url.clone() {
            overrides.push(Box::new(move |p| p.chef_server_url = url));
        }
        credentials.apply_overrides(overrides);

        Ok(credentials)
    }

    /// Build an API client from the resolved profile.
    pub fn client(&self) -> Result<ChefClient> {
        let credentials = self.credentials()?;
        let profile = credentials.profile();

        let client = ChefClient::builder(&profile.chef_server_url, &profile.client_name)
            .danger_accept_invalid_certs(self.ssl_no_verify)
            .build()?;
        Ok(client)
    }
}
