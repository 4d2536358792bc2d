//! Node capture and report pipelines for the larder tools.
//!
//! Three workflows live here, all strictly sequential:
//!
//! - [`NodeCapturer`]: snapshot one node's configuration (node object,
//!   environment, roles, cookbooks-at-version) to local disk, reporting
//!   coarse-grained progress over a channel
//! - [`CookbooksReport`]: correlate every server-side cookbook version with
//!   the nodes using it, download the sources and optionally run the
//!   external style analyzer over them
//! - [`nodes_report`]: one projected search over all nodes, tabulated
//!
//! Formatting of the assembled records into text/CSV lives in [`format`].

mod capture;
mod cookbooks;
mod cookstyle;
pub mod format;
mod nodes;

pub use capture::{CaptureProgress, CaptureSource, NodeCapturer};
pub use cookbooks::{CookbooksReport, CookbooksReportBuilder, ReportSource};
pub use cookstyle::CookstyleRunner;
pub use nodes::nodes_report;
