//! Cookbook API endpoints.

use crate::ChefClient;
use larder_core::{CookbookListing, CookbookManifest, LarderError, Result};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Cookbook API endpoints
pub struct CookbooksApi<'a> {
    client: &'a ChefClient,
}

impl<'a> CookbooksApi<'a> {
    pub(crate) fn new(client: &'a ChefClient) -> Self {
        Self { client }
    }

    /// List available (name, version) pairs.
    ///
    /// `num_versions` limits how many versions per cookbook are returned;
    /// 0 means unlimited.
    pub async fn list(&self, num_versions: u32) -> Result<CookbookListing> {
        let limit = if num_versions == 0 {
            "all".to_string()
        } else {
            num_versions.to_string()
        };

        self.client
            .get_with_query("/cookbooks", &[("num_versions", &limit)])
            .await
    }

    /// Fetch the file manifest of one cookbook version
    pub async fn manifest(&self, name: &str, version: &str) -> Result<CookbookManifest> {
        self.client.get(&format!("/cookbooks/{name}/{version}")).await
    }

    /// Download the full source tree of one cookbook version into `dir`.
    ///
    /// Every file in the manifest is fetched via its URL and written to
    /// `dir/<path>` where `<path>` is the segment-relative path from the
    /// manifest (root files, `files/`, `templates/`, `attributes/`,
    /// `recipes/`, `definitions/`, `libraries/`, `providers/`,
    /// `resources/`).
    pub async fn download(&self, name: &str, version: &str, dir: &Path) -> Result<()> {
        let manifest = self.manifest(name, version).await?;
        debug!(cookbook = name, version, dir = %dir.display(), "downloading cookbook");

        for file in manifest.all_files() {
            let url = file.url.as_deref().ok_or_else(|| {
                LarderError::Internal(format!(
                    "manifest entry '{}' of cookbook {name} {version} has no download URL",
                    file.path
                ))
            })?;

            let dest = dir.join(sanitized_path(&file.path)?);
            if let Some(parent) = dest.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }

            let content = self.client.get_bytes(url).await?;
            tokio::fs::write(&dest, content).await?;
        }

        Ok(())
    }
}

/// Validate a manifest-relative path so a malicious manifest cannot write
/// outside the destination directory.
fn sanitized_path(path: &str) -> Result<PathBuf> {
    let relative = Path::new(path);
    let safe = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)));

    if safe && !path.is_empty() {
        Ok(relative.to_path_buf())
    } else {
        Err(LarderError::Internal(format!(
            "refusing to write manifest entry with unsafe path '{path}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_path_accepts_relative() {
        assert_eq!(
            sanitized_path("recipes/default.rb").unwrap(),
            PathBuf::from("recipes/default.rb")
        );
        assert_eq!(sanitized_path("metadata.rb").unwrap(), PathBuf::from("metadata.rb"));
    }

    #[test]
    fn sanitized_path_rejects_traversal() {
        assert!(sanitized_path("../outside.rb").is_err());
        assert!(sanitized_path("recipes/../../outside.rb").is_err());
        assert!(sanitized_path("/etc/passwd").is_err());
        assert!(sanitized_path("").is_err());
    }
}
