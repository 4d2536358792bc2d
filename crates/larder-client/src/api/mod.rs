//! Chef Infra Server API endpoint groups.

mod cookbooks;
mod environments;
mod nodes;
mod roles;
mod search;

pub use cookbooks::CookbooksApi;
pub use environments::EnvironmentsApi;
pub use nodes::NodesApi;
pub use roles::RolesApi;
pub use search::SearchApi;
