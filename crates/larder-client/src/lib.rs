//! HTTP client for the Chef Infra Server API.
//!
//! This crate provides the main [`ChefClient`] for talking to a Chef Infra
//! Server, plus the narrow capability traits ([`NodeFetcher`], [`RoleFetcher`],
//! [`EnvironmentFetcher`], [`CookbookStore`], [`NodeSearcher`]) that the
//! capture and report pipelines consume so they never depend on the
//! transport directly.

mod client;
mod facade;
pub mod api;

pub use client::{ChefClient, ChefClientBuilder};
pub use facade::{CookbookStore, EnvironmentFetcher, NodeFetcher, NodeSearcher, RoleFetcher};
pub use larder_core::{LarderError, Result};
