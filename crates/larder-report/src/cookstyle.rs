//! Invocation of the external Cookstyle static analyzer.

use larder_core::{CookbookFile, LarderError, Offense, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Default time budget for one analyzer run. The analyzer has no
/// cancellation of its own; a wedged subprocess would otherwise hang the
/// whole report.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Runs the Cookstyle binary against a downloaded cookbook tree and parses
/// its JSON output.
#[derive(Debug, Clone)]
pub struct CookstyleRunner {
    binary: PathBuf,
    timeout: Duration,
}

impl Default for CookstyleRunner {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("cookstyle"),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CookstyleRunner {
    /// Create a runner using the `cookstyle` binary from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific analyzer binary
    #[must_use]
    pub fn binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = path.into();
        self
    }

    /// Set the per-run time budget
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Analyze one cookbook tree.
    ///
    /// Exit status 1 means "violations found" and is not an error; any
    /// other non-zero status, unparsable output, or an exceeded time budget
    /// is.
    pub async fn run(&self, cookbook_dir: &Path) -> Result<Vec<CookbookFile>> {
        debug!(dir = %cookbook_dir.display(), "running cookstyle");

        let child = Command::new(&self.binary)
            .args(["--format", "json", "--no-color"])
            .current_dir(cookbook_dir)
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| LarderError::AnalyzerTimeout(self.timeout.as_secs()))?
            .map_err(|e| LarderError::Analyzer(format!("unable to run cookstyle: {e}")))?;

        let code = output.status.code();
        if !matches!(code, Some(0 | 1)) {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LarderError::Analyzer(format!(
                "cookstyle exited with status {code:?}: {}",
                stderr.trim()
            )));
        }

        parse_output(&output.stdout)
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzerOutput {
    #[serde(default)]
    files: Vec<AnalyzerFile>,
}

#[derive(Debug, Deserialize)]
struct AnalyzerFile {
    path: String,
    #[serde(default)]
    offenses: Vec<AnalyzerOffense>,
}

#[derive(Debug, Deserialize)]
struct AnalyzerOffense {
    cop_name: String,
    message: String,
    #[serde(default)]
    correctable: bool,
}

fn parse_output(stdout: &[u8]) -> Result<Vec<CookbookFile>> {
    let parsed: AnalyzerOutput = serde_json::from_slice(stdout)
        .map_err(|e| LarderError::Analyzer(format!("unable to parse cookstyle output: {e}")))?;

    Ok(parsed
        .files
        .into_iter()
        .map(|file| CookbookFile {
            path: file.path,
            offenses: file
                .offenses
                .into_iter()
                .map(|o| Offense {
                    cop_name: o.cop_name,
                    message: o.message,
                    correctable: o.correctable,
                })
                .collect(),
        })
        .collect())
}
