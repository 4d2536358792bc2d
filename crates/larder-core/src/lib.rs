//! Core types and errors for the larder inventory tools.
//!
//! This crate provides the foundational types used across the larder library:
//!
//! - **Types**: Strongly-typed representations of Chef Infra Server objects
//!   (nodes, roles, environments, cookbooks) and of the report records the
//!   higher-level crates assemble
//! - **Errors**: Comprehensive error handling with [`LarderError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use larder_core::{Node, LarderError, Result};
//!
//! fn check_node(node: &Node) -> Result<()> {
//!     if node.is_policy_managed() {
//!         return Err(LarderError::PolicyfileNode {
//!             node: node.name.clone(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

mod error;
pub mod types;

pub use error::{LarderError, Result};
pub use types::*;
