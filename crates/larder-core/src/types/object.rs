use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A role object as returned by `GET /roles/{name}`.
///
/// Roles are persisted verbatim during capture, so only the name is typed
/// and the rest of the object is carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Role {
    /// Role name
    pub name: String,

    /// Remaining fields of the server object, preserved for persistence
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// An environment object as returned by `GET /environments/{name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Environment {
    /// Environment name
    pub name: String,

    /// Remaining fields of the server object, preserved for persistence
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
