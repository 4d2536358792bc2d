//! Node capture: snapshot one node's configuration to local disk.

use larder_client::{CookbookStore, EnvironmentFetcher, NodeFetcher, RoleFetcher};
use larder_core::{LarderError, Node, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Everything the capturer needs from the server, as one bound.
pub trait CaptureSource:
    NodeFetcher + RoleFetcher + EnvironmentFetcher + CookbookStore
{
}

impl<T> CaptureSource for T where
    T: NodeFetcher + RoleFetcher + EnvironmentFetcher + CookbookStore
{
}

/// Progress markers emitted by a capture run, in order.
///
/// Each marker is sent *before* its step's work executes. `Complete` is
/// always the final marker, emitted even when an earlier step failed, so
/// consumers draining the channel always observe completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureProgress {
    /// Fetching the node object and validating it
    FetchingNode,
    /// Downloading the cookbooks the node applies
    FetchingCookbooks,
    /// Fetching and persisting the node's environment
    FetchingEnvironment,
    /// Fetching and persisting roles referenced by the run-list
    FetchingRoles,
    /// Terminal marker; the channel closes after this
    Complete,
}

impl std::fmt::Display for CaptureProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FetchingNode => write!(f, "fetching node"),
            Self::FetchingCookbooks => write!(f, "fetching cookbooks"),
            Self::FetchingEnvironment => write!(f, "fetching environment"),
            Self::FetchingRoles => write!(f, "fetching roles"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Captures one node's configuration into a local repository directory.
///
/// The capture runs on its own spawned task and communicates with the
/// caller only through the progress channel returned by [`Self::start`].
/// The channel is closed by the capture task, never by the caller; callers
/// must drain it until closure or the worker blocks on its next send.
pub struct NodeCapturer<C> {
    client: Arc<C>,
    node_name: String,
    repo_dir: PathBuf,
}

impl<C: CaptureSource + 'static> NodeCapturer<C> {
    /// Create a capturer for one node, writing under `repo_dir`.
    pub fn new(client: Arc<C>, node_name: impl Into<String>, repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            node_name: node_name.into(),
            repo_dir: repo_dir.into(),
        }
    }

    /// Start the capture.
    ///
    /// Returns the progress receiver and the join handle carrying the final
    /// result. The receiver yields every marker in order and closes after
    /// `Complete`; the handle resolves to the captured node or the first
    /// stage error.
    pub fn start(self) -> (mpsc::Receiver<CaptureProgress>, JoinHandle<Result<Node>>) {
        let (tx, rx) = mpsc::channel(1);

        let handle = tokio::spawn(async move {
            let result = self.run(&tx).await;
            // Terminal marker goes out even on failure; a dropped receiver
            // just means nobody is listening anymore.
            let _ = tx.send(CaptureProgress::Complete).await;
            result
        });

        (rx, handle)
    }

    async fn run(&self, tx: &mpsc::Sender<CaptureProgress>) -> Result<Node> {
        let _ = tx.send(CaptureProgress::FetchingNode).await;
        let node = self.client.fetch_node(&self.node_name).await?;
        if node.is_policy_managed() {
            return Err(LarderError::PolicyfileNode {
                node: node.name.clone(),
            });
        }
        debug!(node = %node.name, dir = %self.repo_dir.display(), "capturing node");
        save_json(&self.repo_dir, "nodes", "node", &node.name, &node)?;

        let _ = tx.send(CaptureProgress::FetchingCookbooks).await;
        for (name, version) in node.applied_cookbooks() {
            let dest = self.repo_dir.join("cookbooks").join(&name);
            ensure_private_dir(&dest)
                .map_err(|e| save_error("cookbook", &name, "unable to create directory", &e))?;
            self.client.download_cookbook(&name, &version, &dest).await?;
        }

        let _ = tx.send(CaptureProgress::FetchingEnvironment).await;
        let environment = self
            .client
            .fetch_environment(&node.chef_environment)
            .await?;
        save_json(
            &self.repo_dir,
            "environments",
            "environment",
            &environment.name,
            &environment,
        )?;

        let _ = tx.send(CaptureProgress::FetchingRoles).await;
        for role_name in node.run_list_roles() {
            let role = self.client.fetch_role(&role_name).await?;
            save_json(&self.repo_dir, "roles", "role", &role.name, &role)?;
        }

        Ok(node)
    }
}

/// Persist a server object as pretty-printed JSON at
/// `<root>/<subdir>/<name>.json`.
///
/// The subdirectory is created owner-only (0o700) if absent; the file is
/// written owner-only (0o600) through a temp file renamed into place, so a
/// failed write never leaves a truncated artifact behind.
fn save_json<T: Serialize>(
    root: &Path,
    subdir: &str,
    kind: &'static str,
    name: &str,
    value: &T,
) -> Result<()> {
    let dir = root.join(subdir);
    ensure_private_dir(&dir)
        .map_err(|e| save_error(kind, name, "unable to create directory", &e))?;

    let body = serde_json::to_vec_pretty(value)
        .map_err(|e| save_error(kind, name, "unable to serialize object", &e))?;

    let tmp = dir.join(format!(".{name}.json.tmp"));
    write_private_file(&tmp, &body)
        .map_err(|e| save_error(kind, name, "unable to write file", &e))?;

    std::fs::rename(&tmp, dir.join(format!("{name}.json")))
        .map_err(|e| save_error(kind, name, "unable to write file", &e))?;

    Ok(())
}

fn save_error(
    kind: &'static str,
    name: &str,
    stage: &str,
    err: &dyn std::fmt::Display,
) -> LarderError {
    LarderError::Save {
        kind,
        name: name.to_string(),
        message: format!("{stage}: {err}"),
    }
}

fn ensure_private_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

fn write_private_file(path: &Path, body: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, body)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}
