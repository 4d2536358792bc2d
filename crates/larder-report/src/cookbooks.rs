//! Cookbook report generation: list, correlate usage, download, analyze.

use crate::cookstyle::CookstyleRunner;
use indicatif::{ProgressBar, ProgressStyle};
use larder_client::{CookbookStore, NodeSearcher};
use larder_core::{listing_pairs, CookbookRecord, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Everything the cookbook report needs from the server, as one bound.
pub trait ReportSource: CookbookStore + NodeSearcher {}

impl<T> ReportSource for T where T: CookbookStore + NodeSearcher {}

/// The assembled cookbook report
#[derive(Debug, Default)]
pub struct CookbooksReport {
    /// One record per (cookbook, version) pair, sorted by name then version
    pub records: Vec<CookbookRecord>,
}

impl CookbooksReport {
    /// Start configuring a report run
    #[must_use]
    pub fn builder() -> CookbooksReportBuilder {
        CookbooksReportBuilder::default()
    }
}

/// Builder for a cookbook report run
#[derive(Debug)]
pub struct CookbooksReportBuilder {
    run_cookstyle: bool,
    only_unused: bool,
    show_progress: bool,
    analyzer: CookstyleRunner,
}

impl Default for CookbooksReportBuilder {
    fn default() -> Self {
        Self {
            run_cookstyle: true,
            only_unused: false,
            show_progress: false,
            analyzer: CookstyleRunner::new(),
        }
    }
}

impl CookbooksReportBuilder {
    /// Whether to run the external style analyzer over downloaded sources
    #[must_use]
    pub const fn run_cookstyle(mut self, run: bool) -> Self {
        self.run_cookstyle = run;
        self
    }

    /// Keep only records no node references
    #[must_use]
    pub const fn only_unused(mut self, only: bool) -> Self {
        self.only_unused = only;
        self
    }

    /// Show a progress bar on the terminal while generating
    #[must_use]
    pub const fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Use a custom analyzer invocation (binary path, timeout)
    #[must_use]
    pub fn analyzer(mut self, analyzer: CookstyleRunner) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Generate the report, downloading cookbook sources under
    /// `cache_dir/cookbooks/<name>/`.
    ///
    /// The listing itself is fatal if it fails; everything after it is
    /// isolated per record. For each (name, version) pair the usage lookup
    /// and the download are attempted independently: a failure in one sets
    /// that record's error slot and never blocks the other, and processing
    /// always continues to the next pair.
    pub async fn generate<S: ReportSource>(
        self,
        client: &S,
        cache_dir: &Path,
    ) -> Result<CookbooksReport> {
        let listing = client.list_cookbooks(0).await?;
        let pairs = listing_pairs(&listing);
        debug!(cookbooks = pairs.len(), "generating cookbook report");

        let bar = self.progress_bar(pairs.len() as u64, "downloading");
        let mut records = Vec::with_capacity(pairs.len());

        for (name, version) in pairs {
            let mut record = CookbookRecord::new(&name, &version);

            match usage_lookup(client, &name, &version).await {
                Ok(nodes) => record.nodes = nodes,
                Err(e) => record.usage_error = Some(e.to_string()),
            }

            let dest = cache_dir.join("cookbooks").join(&name);
            if let Err(e) = fresh_download(client, &name, &version, &dest).await {
                record.download_error = Some(e.to_string());
            }

            records.push(record);
            bar.inc(1);
        }
        bar.finish_and_clear();

        if self.run_cookstyle {
            let analyzed = records.iter().filter(|r| r.download_error.is_none()).count();
            let bar = self.progress_bar(analyzed as u64, "analyzing");

            for record in records
                .iter_mut()
                .filter(|r| r.download_error.is_none())
            {
                let dir = cache_dir.join("cookbooks").join(&record.name);
                match self.analyzer.run(&dir).await {
                    Ok(files) => record.files = files,
                    Err(e) => record.cookstyle_error = Some(e.to_string()),
                }
                bar.inc(1);
            }
            bar.finish_and_clear();
        }

        if self.only_unused {
            records.retain(CookbookRecord::is_unused);
        }

        records.sort_by(|a, b| (&a.name, &a.version).cmp(&(&b.name, &b.version)));

        Ok(CookbooksReport { records })
    }

    fn progress_bar(&self, len: u64, phase: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len);
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(phase.to_string());
        bar
    }
}

/// Download one version into `dest`, clearing whatever a previously
/// processed version of the same cookbook left there so the analyzer
/// only ever sees the files of the version on this record.
async fn fresh_download<S: CookbookStore + ?Sized>(
    client: &S,
    name: &str,
    version: &str,
    dest: &Path,
) -> Result<()> {
    if dest.exists() {
        tokio::fs::remove_dir_all(dest).await?;
    }
    client.download_cookbook(name, version, dest).await
}

/// Which nodes apply this exact cookbook version, by indexed attribute.
async fn usage_lookup<S: NodeSearcher + ?Sized>(
    client: &S,
    name: &str,
    version: &str,
) -> Result<Vec<String>> {
    let query = format!("cookbooks_{name}_version:{version}");
    let mut projection = BTreeMap::new();
    projection.insert("name".to_string(), vec!["name".to_string()]);

    let rows = client.partial_search(&query, projection).await?;

    let mut nodes: Vec<String> = rows
        .iter()
        .filter_map(|row| row.get_str("name").map(ToString::to_string))
        .collect();
    nodes.sort();
    Ok(nodes)
}
