//! Command-line argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Inventory and reporting for Chef Infra Server estates
#[derive(Debug, Parser)]
#[command(name = "larder", version, about, long_about = None)]
pub struct Cli {
    /// Credentials file to use instead of the discovered .chef/credentials
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub credentials: Option<PathBuf>,

    /// Credentials profile to select
    #[arg(short = 'p', long, global = true, default_value = "default")]
    pub profile: String,

    /// Override the API client name from the credentials file
    #[arg(long, global = true, value_name = "NAME")]
    pub client_name: Option<String>,

    /// Override the client key (a path or an inline PEM block)
    #[arg(long, global = true, value_name = "KEY")]
    pub client_key: Option<String>,

    /// Override the server URL, including the organization path
    #[arg(short = 's', long, global = true, value_name = "URL")]
    pub chef_server_url: Option<String>,

    /// Do not verify the server's TLS certificate
    #[arg(short = 'k', long, global = true)]
    pub ssl_no_verify: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate reports about the server's objects
    Report(ReportArgs),

    /// Capture a node's state into a local repository directory
    Capture(CaptureArgs),

    /// Manage the local credentials configuration
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(subcommand)]
    pub command: ReportCommands,
}

#[derive(Debug, Subcommand)]
pub enum ReportCommands {
    /// Cookbook versions, the nodes using them, and style violations
    Cookbooks {
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Only include cookbooks applied by this node
        #[arg(short = 'n', long, value_name = "NODE")]
        node: Option<String>,

        /// Only include cookbook versions no node applies
        #[arg(short = 'u', long)]
        only_unused: bool,

        /// Skip downloading sources and running the style analyzer
        #[arg(long)]
        no_cookstyle: bool,

        /// Style analyzer binary to invoke
        #[arg(long, value_name = "PATH", default_value = "cookstyle")]
        cookstyle_bin: PathBuf,

        /// Seconds to allow each analyzer run before giving up
        #[arg(long, value_name = "SECS", default_value_t = 300)]
        cookstyle_timeout: u64,
    },

    /// Per-node platform, policy, and applied-cookbook summary
    Nodes {
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Args)]
pub struct CaptureArgs {
    /// Name of the node to capture
    pub node: String,

    /// Directory to write the repository into (default: node-<name>)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write a starter credentials file
    Init,

    /// Check that the credentials load and the client key is readable
    Verify,

    /// Print the active profile's settings
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one block or line per record
    Text,
    /// Comma-separated values with a header row
    Csv,
    /// Aligned terminal table
    Table,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from([
            "larder",
            "report",
            "nodes",
            "--profile",
            "staging",
            "--ssl-no-verify",
        ]);
        assert_eq!(cli.profile, "staging");
        assert!(cli.ssl_no_verify);
    }

    #[test]
    fn cookbook_flags_default_sensibly() {
        let cli = Cli::parse_from(["larder", "report", "cookbooks"]);
        let Commands::Report(report) = cli.command else {
            panic!("expected report subcommand");
        };
        let ReportCommands::Cookbooks {
            format,
            node,
            only_unused,
            no_cookstyle,
            cookstyle_timeout,
            ..
        } = report.command
        else {
            panic!("expected cookbooks subcommand");
        };
        assert_eq!(format, OutputFormat::Text);
        assert!(node.is_none());
        assert!(!only_unused);
        assert!(!no_cookstyle);
        assert_eq!(cookstyle_timeout, 300);
    }

    #[test]
    fn capture_takes_a_node_and_optional_dir() {
        let cli = Cli::parse_from(["larder", "capture", "web1", "-d", "/tmp/repo"]);
        let Commands::Capture(args) = cli.command else {
            panic!("expected capture subcommand");
        };
        assert_eq!(args.node, "web1");
        assert_eq!(args.dir, Some(PathBuf::from("/tmp/repo")));
    }
}
