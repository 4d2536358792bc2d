//! Node report generation: one projected search over all nodes.

use larder_client::NodeSearcher;
use larder_core::{CookbookVersion, NodeReportItem, Result, SearchRow};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Generate the node report.
///
/// Issues a single partial search for all nodes (`*:*`), projecting the
/// name, the running tool version, the OS name/version and the policy
/// fields, and builds one report item per result row. Missing optional
/// attributes stay `None` here; the formatters render the explicit
/// placeholders.
pub async fn nodes_report<S: NodeSearcher + ?Sized>(client: &S) -> Result<Vec<NodeReportItem>> {
    let mut projection = BTreeMap::new();
    for (attr, path) in [
        ("name", vec!["name"]),
        ("chef_version", vec!["chef_packages", "chef", "version"]),
        ("os", vec!["platform"]),
        ("os_version", vec!["platform_version"]),
        ("policy_name", vec!["policy_name"]),
        ("policy_group", vec!["policy_group"]),
        ("policy_revision", vec!["policy_revision"]),
        ("cookbooks", vec!["cookbooks"]),
    ] {
        projection.insert(
            attr.to_string(),
            path.into_iter().map(ToString::to_string).collect(),
        );
    }

    let rows = client.partial_search("*:*", projection).await?;
    debug!(nodes = rows.len(), "generating node report");

    let mut items: Vec<NodeReportItem> = rows.iter().map(report_item).collect();
    items.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(items)
}

fn report_item(row: &SearchRow) -> NodeReportItem {
    let field = |attr: &str| {
        row.get_str(attr)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
    };

    NodeReportItem {
        name: field("name").unwrap_or_default(),
        chef_version: field("chef_version"),
        os: field("os"),
        os_version: field("os_version"),
        policy: field("policy_name"),
        policy_group: field("policy_group"),
        policy_revision: field("policy_revision"),
        cookbooks: applied_cookbooks(row),
    }
}

fn applied_cookbooks(row: &SearchRow) -> Vec<CookbookVersion> {
    let mut cookbooks: Vec<CookbookVersion> = match row.data.get("cookbooks") {
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(name, entry)| {
                entry
                    .get("version")
                    .and_then(Value::as_str)
                    .map(|version| CookbookVersion {
                        name: name.clone(),
                        version: version.to_string(),
                    })
            })
            .collect(),
        _ => Vec::new(),
    };
    cookbooks.sort();
    cookbooks
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use larder_core::LarderError;
    use serde_json::json;

    struct FakeSearcher {
        rows: Vec<SearchRow>,
    }

    #[async_trait]
    impl NodeSearcher for FakeSearcher {
        async fn partial_search(
            &self,
            query: &str,
            projection: BTreeMap<String, Vec<String>>,
        ) -> Result<Vec<SearchRow>> {
            if query != "*:*" {
                return Err(LarderError::Internal(format!("unexpected query {query}")));
            }
            assert!(projection.contains_key("name"));
            assert!(projection.contains_key("chef_version"));
            Ok(self.rows.clone())
        }
    }

    fn row(value: serde_json::Value) -> SearchRow {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn builds_items_sorted_case_sensitively() {
        let searcher = FakeSearcher {
            rows: vec![
                row(json!({"data": {"name": "node-b"}})),
                row(json!({"data": {"name": "Node-c"}})),
                row(json!({"data": {"name": "node-a"}})),
            ],
        };

        let items = nodes_report(&searcher).await.unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        // byte-wise ordering: uppercase sorts before lowercase
        assert_eq!(names, vec!["Node-c", "node-a", "node-b"]);
    }

    #[tokio::test]
    async fn missing_attributes_stay_none() {
        let searcher = FakeSearcher {
            rows: vec![row(json!({"data": {
                "name": "node3",
                "chef_version": "15.00",
                "os": "ubuntu",
                "os_version": "16.04",
                "policy_name": null,
                "policy_group": ""
            }}))],
        };

        let items = nodes_report(&searcher).await.unwrap();
        let item = &items[0];
        assert_eq!(item.chef_version.as_deref(), Some("15.00"));
        assert_eq!(item.os.as_deref(), Some("ubuntu"));
        assert_eq!(item.policy, None);
        // empty strings normalize to None so format-time placeholders apply
        assert_eq!(item.policy_group, None);
        assert!(item.cookbooks.is_empty());
    }

    #[tokio::test]
    async fn cookbook_versions_sorted_by_name_then_version() {
        let searcher = FakeSearcher {
            rows: vec![row(json!({"data": {
                "name": "node1",
                "cookbooks": {
                    "zebra": {"version": "1.0.0"},
                    "apache2": {"version": "5.0.1"}
                }
            }}))],
        };

        let items = nodes_report(&searcher).await.unwrap();
        let rendered: Vec<String> = items[0].cookbooks.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["apache2(5.0.1)", "zebra(1.0.0)"]);
    }
}
