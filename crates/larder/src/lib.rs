//! Inventory and reporting toolkit for Chef Infra Server estates.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use larder::{ChefClient, CookbooksReport};
//!
//! #[tokio::main]
//! async fn main() -> larder::Result<()> {
//!     let client = ChefClient::new(
//!         "https://chef.example/organizations/acme",
//!         "reporting-client",
//!     )?;
//!
//!     // Which cookbook versions exist, and who uses them?
//!     let report = CookbooksReport::builder()
//!         .run_cookstyle(false)
//!         .generate(&client, std::path::Path::new("/tmp/larder-cache"))
//!         .await?;
//!
//!     for record in &report.records {
//!         println!("{} {} -> {:?}", record.name, record.version, record.nodes);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

// Re-export core types
pub use larder_core::*;

// Re-export client
pub use larder_client::{
    ChefClient, ChefClientBuilder, CookbookStore, EnvironmentFetcher, NodeFetcher, NodeSearcher,
    RoleFetcher,
};

// Re-export report pipelines
pub use larder_report::{
    format, nodes_report, CaptureProgress, CaptureSource, CookbooksReport,
    CookbooksReportBuilder, CookstyleRunner, NodeCapturer, ReportSource,
};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;
