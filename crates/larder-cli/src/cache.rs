//! On-disk cache for downloaded cookbooks and saved reports.
//!
//! Layout under the platform cache directory:
//!
//! ```text
//! <cache>/cookbooks/<name>/   downloaded cookbook sources
//! <cache>/reports/<kind>-<timestamp>.{txt,csv}
//! <cache>/errors/<kind>-<timestamp>.err
//! ```

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

/// Timestamp format used in report and error file names
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Root of the tool's cache directory tree
#[derive(Debug, Clone)]
pub struct ReportCache {
    base: PathBuf,
}

impl ReportCache {
    /// Open (creating if needed) the platform cache directory.
    pub fn open() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("io", "larder", "larder")
            .context("unable to determine a cache directory for this platform")?;
        Ok(Self::at(dirs.cache_dir()))
    }

    /// Use an explicit base directory.
    #[must_use]
    pub fn at(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
        }
    }

    /// Base directory; report pipelines download cookbook sources
    /// under `<base>/cookbooks/`.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Directory holding downloaded cookbook sources
    #[must_use]
    pub fn cookbooks_dir(&self) -> PathBuf {
        self.base.join("cookbooks")
    }

    /// Persist a rendered report as `reports/<kind>-<timestamp>.<ext>`
    /// and return its path.
    pub fn save_report(&self, kind: &str, ext: &str, content: &str) -> Result<PathBuf> {
        self.save(
            "reports",
            &format!("{kind}-{}.{ext}", Self::timestamp()),
            content,
        )
    }

    /// Persist collected error lines as `errors/<kind>-<timestamp>.err`.
    /// Nothing is written when `errors` is empty.
    pub fn save_errors(&self, kind: &str, errors: &str) -> Result<Option<PathBuf>> {
        if errors.trim().is_empty() {
            return Ok(None);
        }
        self.save("errors", &format!("{kind}-{}.err", Self::timestamp()), errors)
            .map(Some)
    }

    fn save(&self, subdir: &str, file_name: &str, content: &str) -> Result<PathBuf> {
        let dir = self.base.join(subdir);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("unable to create '{}'", dir.display()))?;
        let path = dir.join(file_name);
        std::fs::write(&path, content)
            .with_context(|| format!("unable to write '{}'", path.display()))?;
        Ok(path)
    }

    fn timestamp() -> String {
        chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lands_under_reports_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ReportCache::at(dir.path());

        let path = cache.save_report("cookbooks", "csv", "a,b\n").unwrap();
        assert_eq!(path.parent().unwrap(), dir.path().join("reports"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("cookbooks-"));
        assert!(name.ends_with(".csv"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n");
    }

    #[test]
    fn empty_error_list_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ReportCache::at(dir.path());

        assert!(cache.save_errors("cookbooks", "").unwrap().is_none());
        assert!(!dir.path().join("errors").exists());
    }

    #[test]
    fn errors_are_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ReportCache::at(dir.path());

        let path = cache
            .save_errors("nodes", "one failed\ntwo failed\n")
            .unwrap()
            .unwrap();
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with(".err"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "one failed\ntwo failed\n"
        );
    }

    #[test]
    fn cookbooks_dir_is_under_the_base() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ReportCache::at(dir.path());
        assert_eq!(cache.cookbooks_dir(), dir.path().join("cookbooks"));
    }
}
