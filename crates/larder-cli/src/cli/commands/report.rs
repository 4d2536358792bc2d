//! `larder report` subcommands

use super::Context;
use crate::cache::ReportCache;
use crate::cli::args::{OutputFormat, ReportArgs, ReportCommands};
use anyhow::Result;
use colored::Colorize;
use larder::format::{self, ReportOutput};
use larder::{nodes_report, CookbookRecord, CookbooksReport, CookstyleRunner, NodeReportItem};
use std::path::PathBuf;
use std::time::Duration;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub async fn execute(ctx: &Context, args: ReportArgs) -> Result<()> {
    match args.command {
        ReportCommands::Cookbooks {
            format,
            node,
            only_unused,
            no_cookstyle,
            cookstyle_bin,
            cookstyle_timeout,
        } => {
            cookbooks(
                ctx,
                format,
                node.as_deref(),
                only_unused,
                no_cookstyle,
                cookstyle_bin,
                cookstyle_timeout,
            )
            .await
        }
        ReportCommands::Nodes { format } => nodes(ctx, format).await,
    }
}

async fn cookbooks(
    ctx: &Context,
    output: OutputFormat,
    node_filter: Option<&str>,
    only_unused: bool,
    no_cookstyle: bool,
    cookstyle_bin: PathBuf,
    cookstyle_timeout: u64,
) -> Result<()> {
    let client = ctx.client()?;
    let cache = ReportCache::open()?;
    let run_cookstyle = !no_cookstyle;

    let analyzer = CookstyleRunner::new()
        .binary(cookstyle_bin)
        .timeout(Duration::from_secs(cookstyle_timeout));

    let mut report = CookbooksReport::builder()
        .run_cookstyle(run_cookstyle)
        .only_unused(only_unused)
        .show_progress(output != OutputFormat::Csv)
        .analyzer(analyzer)
        .generate(&client, cache.base())
        .await?;

    if let Some(node) = node_filter {
        report
            .records
            .retain(|r| r.nodes.iter().any(|n| n == node));
    }

    match output {
        OutputFormat::Text => {
            let out = format::cookbooks_text(&report.records, run_cookstyle, node_filter);
            println!("{}", out.report);
            persist(&cache, "cookbooks", "txt", &out)?;
        }
        OutputFormat::Csv => {
            let out = format::cookbooks_csv(&report.records, run_cookstyle)?;
            println!("{}", out.report);
            persist(&cache, "cookbooks", "csv", &out)?;
        }
        OutputFormat::Table => print_cookbook_table(&report.records, run_cookstyle),
    }

    Ok(())
}

async fn nodes(ctx: &Context, output: OutputFormat) -> Result<()> {
    let client = ctx.client()?;
    let items = nodes_report(&client).await?;

    match output {
        OutputFormat::Text => {
            let out = format::nodes_text(&items);
            println!("{}", out.report);
            let cache = ReportCache::open()?;
            persist(&cache, "nodes", "txt", &out)?;
        }
        OutputFormat::Csv => {
            let out = format::nodes_csv(&items)?;
            println!("{}", out.report);
            let cache = ReportCache::open()?;
            persist(&cache, "nodes", "csv", &out)?;
        }
        OutputFormat::Table => print_node_table(&items),
    }

    Ok(())
}

/// Save the rendered report and any collected errors, telling the user
/// where each landed.
fn persist(cache: &ReportCache, kind: &str, ext: &str, out: &ReportOutput) -> Result<()> {
    let path = cache.save_report(kind, ext, &out.report)?;
    println!("{} {}", "Report saved to".dimmed(), path.display());

    if let Some(err_path) = cache.save_errors(kind, &out.errors)? {
        eprintln!(
            "{} some records could not be fully assembled, details in {}",
            "Warning:".yellow().bold(),
            err_path.display()
        );
    }
    Ok(())
}

fn print_cookbook_table(records: &[CookbookRecord], run_cookstyle: bool) {
    let mut builder = Builder::default();
    if run_cookstyle {
        builder.push_record([
            "Cookbook Name",
            "Version",
            "Violations",
            "Auto-correctable",
            "Nodes",
        ]);
    } else {
        builder.push_record(["Cookbook Name", "Version", "Nodes"]);
    }

    for r in records {
        if run_cookstyle {
            builder.push_record([
                r.name.clone(),
                r.version.clone(),
                r.num_offenses().to_string(),
                r.num_correctable().to_string(),
                r.nodes.len().to_string(),
            ]);
        } else {
            builder.push_record([r.name.clone(), r.version.clone(), r.nodes.len().to_string()]);
        }
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");
}

#[derive(Tabled)]
struct NodeTableRow {
    #[tabled(rename = "Node Name")]
    name: String,
    #[tabled(rename = "Chef Version")]
    chef_version: String,
    #[tabled(rename = "Operating System")]
    os: String,
    #[tabled(rename = "Cookbooks")]
    cookbooks: usize,
}

fn print_node_table(items: &[NodeReportItem]) {
    let rows: Vec<NodeTableRow> = items
        .iter()
        .map(|i| NodeTableRow {
            name: i.name.clone(),
            chef_version: i.chef_version.clone().unwrap_or_else(|| "unknown".to_string()),
            os: match (&i.os, &i.os_version) {
                (Some(os), Some(v)) => format!("{os} {v}"),
                (Some(os), None) => os.clone(),
                _ => "unknown".to_string(),
            },
            cookbooks: i.cookbooks.len(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
