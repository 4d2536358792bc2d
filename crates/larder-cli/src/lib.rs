//! # larder-cli
//!
//! Command-line inventory and reporting for Chef Infra Server.
//!
//! ## Features
//!
//! - **Cookbook report**: versions, the nodes applying them, style violations
//! - **Node report**: platform, policy, and applied cookbooks per node
//! - **Node capture**: snapshot a node's objects into a local repository
//! - **Profiles**: connection settings from a `.chef/credentials` file

pub mod cache;
pub mod cli;
pub mod credentials;

pub use cli::run;
