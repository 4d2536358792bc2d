//! Strongly-typed representations of Chef Infra Server objects and
//! of the records assembled by the report generators.

mod cookbook;
mod node;
mod object;
mod report;
mod search;

pub use cookbook::*;
pub use node::*;
pub use object::*;
pub use report::*;
pub use search::*;
