//! `larder capture` subcommand

use super::Context;
use crate::cli::args::CaptureArgs;
use anyhow::{Context as _, Result};
use colored::Colorize;
use larder::{CaptureProgress, NodeCapturer};
use std::path::PathBuf;
use std::sync::Arc;

pub async fn execute(ctx: &Context, args: CaptureArgs) -> Result<()> {
    let client = Arc::new(ctx.client()?);
    let dir = args
        .dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("node-{}", args.node)));

    println!(
        "Capturing node '{}' into {}",
        args.node.bold(),
        dir.display()
    );

    let capturer = NodeCapturer::new(client, &args.node, &dir);
    let (mut progress, handle) = capturer.start();

    while let Some(stage) = progress.recv().await {
        match stage {
            CaptureProgress::Complete => {}
            stage => println!(" - {stage}"),
        }
    }

    let node = handle.await.context("capture task stopped unexpectedly")??;

    println!(
        "{} node '{}' captured to {}",
        "Success:".green().bold(),
        node.name,
        dir.display()
    );
    println!(
        "\nReview the repository, then converge locally with:\n    \
         chef-client --local-mode --chef-zero-port 8889 -j {}",
        dir.join("nodes").join(format!("{}.json", node.name)).display()
    );
    Ok(())
}
