use serde::{Deserialize, Serialize};

/// One style/deprecation violation reported by the external analyzer
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Offense {
    /// Rule identifier (e.g. "Chef/Deprecations/ResourceWithoutUnifiedTrue")
    pub cop_name: String,

    /// Human-readable description of the violation
    pub message: String,

    /// Whether the analyzer can fix this violation automatically
    #[serde(default)]
    pub correctable: bool,
}

/// One analyzed file within a cookbook, with its violations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CookbookFile {
    /// Path relative to the cookbook root
    pub path: String,

    /// Violations found in this file
    #[serde(default)]
    pub offenses: Vec<Offense>,
}

/// One (cookbook, version) record of the cookbook report.
///
/// The nodes list, the analyzed file list and the three error slots are
/// independent failure domains: a failure populating one never blocks the
/// others.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CookbookRecord {
    /// Cookbook name
    pub name: String,

    /// Cookbook version
    pub version: String,

    /// Names of the nodes referencing this exact version
    #[serde(default)]
    pub nodes: Vec<String>,

    /// Analyzed files with their violations
    #[serde(default)]
    pub files: Vec<CookbookFile>,

    /// Policy group, when the version is pinned through a policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_group: Option<String>,

    /// Policy name, when the version is pinned through a policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,

    /// Policy revision, when the version is pinned through a policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_revision: Option<String>,

    /// Error from the source download, if it failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_error: Option<String>,

    /// Error from the node-usage lookup, if it failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_error: Option<String>,

    /// Error from the static analysis run, if it failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookstyle_error: Option<String>,
}

impl CookbookRecord {
    /// Create an empty record for a (name, version) pair.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Total number of violations across all analyzed files.
    #[must_use]
    pub fn num_offenses(&self) -> usize {
        self.files.iter().map(|f| f.offenses.len()).sum()
    }

    /// Number of violations the analyzer can fix automatically.
    #[must_use]
    pub fn num_correctable(&self) -> usize {
        self.files
            .iter()
            .flat_map(|f| &f.offenses)
            .filter(|o| o.correctable)
            .count()
    }

    /// Returns true if no node references this cookbook version.
    #[must_use]
    pub fn is_unused(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if any of the error slots is populated.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.download_error.is_some()
            || self.usage_error.is_some()
            || self.cookstyle_error.is_some()
    }
}

/// A (cookbook name, version) pair applied to a node
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct CookbookVersion {
    /// Cookbook name
    pub name: String,

    /// Applied version
    pub version: String,
}

impl std::fmt::Display for CookbookVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.version)
    }
}

/// One row of the node report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeReportItem {
    /// Node name
    pub name: String,

    /// Chef Infra Client version running on the node, if indexed
    #[serde(default)]
    pub chef_version: Option<String>,

    /// Operating system name, if indexed
    #[serde(default)]
    pub os: Option<String>,

    /// Operating system version, if indexed
    #[serde(default)]
    pub os_version: Option<String>,

    /// Policy group, for policy-managed nodes
    #[serde(default)]
    pub policy_group: Option<String>,

    /// Policy name, for policy-managed nodes
    #[serde(default)]
    pub policy: Option<String>,

    /// Policy revision, for policy-managed nodes
    #[serde(default)]
    pub policy_revision: Option<String>,

    /// Cookbooks applied to the node, with versions
    #[serde(default)]
    pub cookbooks: Vec<CookbookVersion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offense(correctable: bool) -> Offense {
        Offense {
            cop_name: "Chef/Style/Example".into(),
            message: "example".into(),
            correctable,
        }
    }

    #[test]
    fn offense_counts_empty() {
        let record = CookbookRecord::new("foo", "0.1.0");
        assert_eq!(record.num_offenses(), 0);
        assert_eq!(record.num_correctable(), 0);
    }

    #[test]
    fn offense_counts_zero_offense_files() {
        let mut record = CookbookRecord::new("foo", "0.1.0");
        record.files = vec![
            CookbookFile {
                path: "recipes/default.rb".into(),
                offenses: vec![],
            },
            CookbookFile {
                path: "metadata.rb".into(),
                offenses: vec![],
            },
        ];
        assert_eq!(record.num_offenses(), 0);
        assert_eq!(record.num_correctable(), 0);
    }

    #[test]
    fn offense_counts_mixed() {
        let mut record = CookbookRecord::new("foo", "0.1.0");
        record.files = vec![
            CookbookFile {
                path: "recipes/default.rb".into(),
                offenses: vec![offense(true), offense(false), offense(true)],
            },
            CookbookFile {
                path: "recipes/server.rb".into(),
                offenses: vec![offense(false)],
            },
            CookbookFile {
                path: "attributes/default.rb".into(),
                offenses: vec![],
            },
        ];
        assert_eq!(record.num_offenses(), 4);
        assert_eq!(record.num_correctable(), 2);
    }

    #[test]
    fn error_slots_independent() {
        let mut record = CookbookRecord::new("foo", "0.1.0");
        record.nodes = vec!["node1".into()];
        record.download_error = Some("connection refused".into());
        record.usage_error = Some("search failed".into());

        // Both slots set on the same record; the nodes list is untouched
        assert!(record.has_errors());
        assert_eq!(record.nodes, vec!["node1"]);
        assert!(!record.is_unused());
    }

    #[test]
    fn cookbook_version_display() {
        let cv = CookbookVersion {
            name: "apache2".into(),
            version: "5.0.1".into(),
        };
        assert_eq!(cv.to_string(), "apache2(5.0.1)");
    }
}
