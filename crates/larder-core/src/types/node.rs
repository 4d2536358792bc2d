use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A node object as returned by `GET /nodes/{name}`.
///
/// Only the fields the capture and report pipelines care about are typed;
/// everything else is preserved verbatim in `extra` so that persisting a
/// node round-trips the full server object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    /// Node name
    pub name: String,

    /// The environment the node is pinned to
    #[serde(default = "default_environment")]
    pub chef_environment: String,

    /// Ordered run-list (role and recipe references)
    #[serde(default)]
    pub run_list: Vec<String>,

    /// Policyfile policy name, if the node is policy-managed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_name: Option<String>,

    /// Policyfile policy group, if the node is policy-managed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_group: Option<String>,

    /// Automatic (ohai-collected) attributes
    #[serde(default)]
    pub automatic: serde_json::Map<String, Value>,

    /// Remaining fields of the server object, preserved for persistence
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

fn default_environment() -> String {
    "_default".to_string()
}

impl Node {
    /// Returns true if the node carries a non-empty policy name or policy
    /// group, i.e. it is managed by Policyfile rather than a run-list.
    #[must_use]
    pub fn is_policy_managed(&self) -> bool {
        let non_empty = |s: &Option<String>| s.as_deref().is_some_and(|v| !v.is_empty());
        non_empty(&self.policy_name) || non_empty(&self.policy_group)
    }

    /// The cookbooks actually applied to this node, read from the
    /// `automatic.cookbooks` attribute map (cookbook name -> version).
    #[must_use]
    pub fn applied_cookbooks(&self) -> BTreeMap<String, String> {
        let mut applied = BTreeMap::new();
        if let Some(Value::Object(cookbooks)) = self.automatic.get("cookbooks") {
            for (name, entry) in cookbooks {
                if let Some(version) = entry.get("version").and_then(Value::as_str) {
                    applied.insert(name.clone(), version.to_string());
                }
            }
        }
        applied
    }

    /// Role names referenced by the run-list, in run-list order.
    ///
    /// Only entries of the form `role[NAME]` are roles; recipe references
    /// (`cookbook::recipe`, `recipe[...]`) are ignored.
    #[must_use]
    pub fn run_list_roles(&self) -> Vec<String> {
        self.run_list
            .iter()
            .filter_map(|item| role_name(item))
            .collect()
    }
}

/// Extract the role name from a run-list entry, if the entry is a role
/// reference (`role[NAME]`).
#[must_use]
pub fn role_name(run_list_item: &str) -> Option<String> {
    run_list_item
        .strip_prefix("role[")
        .and_then(|rest| rest.strip_suffix(']'))
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node_from(value: Value) -> Node {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn policy_detection() {
        let plain = node_from(json!({"name": "node1"}));
        assert!(!plain.is_policy_managed());

        let named = node_from(json!({"name": "node1", "policy_name": "webserver"}));
        assert!(named.is_policy_managed());

        let grouped = node_from(json!({"name": "node1", "policy_group": "prod"}));
        assert!(grouped.is_policy_managed());

        // Empty strings mean "not policy managed"
        let empty = node_from(json!({"name": "node1", "policy_name": "", "policy_group": ""}));
        assert!(!empty.is_policy_managed());
    }

    #[test]
    fn applied_cookbooks_from_automatic() {
        let node = node_from(json!({
            "name": "node1",
            "automatic": {
                "cookbooks": {
                    "foo": {"version": "0.1.0"},
                    "bar": {"version": "2.0.0"}
                }
            }
        }));
        let applied = node.applied_cookbooks();
        assert_eq!(applied.get("foo").map(String::as_str), Some("0.1.0"));
        assert_eq!(applied.get("bar").map(String::as_str), Some("2.0.0"));
        assert_eq!(applied.len(), 2);
    }

    #[test]
    fn run_list_role_extraction() {
        let node = node_from(json!({
            "name": "node1",
            "run_list": [
                "cookbook1::recipe1",
                "recipe[cookbook2]",
                "role[mockrole]",
                "role[base]"
            ]
        }));
        assert_eq!(node.run_list_roles(), vec!["mockrole", "base"]);
    }

    #[test]
    fn role_name_shapes() {
        assert_eq!(role_name("role[web]"), Some("web".to_string()));
        assert_eq!(role_name("recipe[web]"), None);
        assert_eq!(role_name("web::default"), None);
        assert_eq!(role_name("role[]"), None);
    }

    #[test]
    fn unknown_fields_round_trip() {
        let raw = json!({
            "name": "node1",
            "chef_environment": "production",
            "normal": {"tags": []},
            "json_class": "Chef::Node"
        });
        let node = node_from(raw);
        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["normal"]["tags"], json!([]));
        assert_eq!(back["json_class"], "Chef::Node");
        assert_eq!(back["chef_environment"], "production");
    }
}
