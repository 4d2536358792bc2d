use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The server-side cookbook listing returned by
/// `GET /cookbooks?num_versions=...`, keyed by cookbook name.
pub type CookbookListing = BTreeMap<String, CookbookVersions>;

/// Available versions of one cookbook
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CookbookVersions {
    /// URL of the cookbook resource
    #[serde(default)]
    pub url: Option<String>,

    /// Version entries, newest first as the server returns them
    #[serde(default)]
    pub versions: Vec<VersionRef>,
}

/// One (version, url) entry in a cookbook listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionRef {
    /// Cookbook version string (e.g. "1.2.3")
    pub version: String,

    /// URL of this specific cookbook version
    #[serde(default)]
    pub url: Option<String>,
}

/// Flatten a listing into ordered (name, version) pairs.
#[must_use]
pub fn listing_pairs(listing: &CookbookListing) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = listing
        .iter()
        .flat_map(|(name, entry)| {
            entry
                .versions
                .iter()
                .map(|v| (name.clone(), v.version.clone()))
        })
        .collect();
    pairs.sort();
    pairs
}

/// The file manifest of a single cookbook version, as returned by
/// `GET /cookbooks/{name}/{version}`.
///
/// Files are grouped into the classic cookbook segments; each entry names
/// the relative path and a download URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CookbookManifest {
    /// Cookbook name
    #[serde(default)]
    pub cookbook_name: String,

    /// Cookbook version
    #[serde(default)]
    pub version: String,

    /// Files at the cookbook root (metadata.rb, README, ...)
    #[serde(default)]
    pub root_files: Vec<ManifestFile>,

    /// `files/` segment
    #[serde(default)]
    pub files: Vec<ManifestFile>,

    /// `templates/` segment
    #[serde(default)]
    pub templates: Vec<ManifestFile>,

    /// `attributes/` segment
    #[serde(default)]
    pub attributes: Vec<ManifestFile>,

    /// `recipes/` segment
    #[serde(default)]
    pub recipes: Vec<ManifestFile>,

    /// `definitions/` segment
    #[serde(default)]
    pub definitions: Vec<ManifestFile>,

    /// `libraries/` segment
    #[serde(default)]
    pub libraries: Vec<ManifestFile>,

    /// `providers/` segment
    #[serde(default)]
    pub providers: Vec<ManifestFile>,

    /// `resources/` segment
    #[serde(default)]
    pub resources: Vec<ManifestFile>,
}

/// One downloadable file in a cookbook manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestFile {
    /// File name (e.g. "default.rb")
    pub name: String,

    /// Path relative to the cookbook root (e.g. "recipes/default.rb")
    pub path: String,

    /// Download URL for the file content
    #[serde(default)]
    pub url: Option<String>,

    /// Content checksum as reported by the server
    #[serde(default)]
    pub checksum: Option<String>,

    /// Platform specificity ("default" unless platform-scoped)
    #[serde(default)]
    pub specificity: Option<String>,
}

impl CookbookManifest {
    /// All files across every segment, in segment order.
    pub fn all_files(&self) -> impl Iterator<Item = &ManifestFile> {
        self.root_files
            .iter()
            .chain(&self.files)
            .chain(&self.templates)
            .chain(&self.attributes)
            .chain(&self.recipes)
            .chain(&self.definitions)
            .chain(&self.libraries)
            .chain(&self.providers)
            .chain(&self.resources)
    }
}
