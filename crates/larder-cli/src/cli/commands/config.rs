//! `larder config` subcommands

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::credentials::{CredentialsError, CREDENTIALS_DIR, CREDENTIALS_FILE};
use anyhow::{bail, Context as _, Result};
use colored::Colorize;
use std::path::PathBuf;

const TEMPLATE: &str = r#"# Connection profiles for larder. One table per profile; select one
# with --profile (the default profile is used otherwise).

[default]
client_name = "my-client"
client_key = "~/.chef/my-client.pem"
chef_server_url = "https://chef.example/organizations/my-org"
"#;

pub fn execute(ctx: &Context, args: &ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init => init(ctx),
        ConfigCommands::Verify => verify(ctx),
        ConfigCommands::Show => show(ctx),
    }
}

/// Write a starter credentials file, refusing to touch an existing one.
fn init(ctx: &Context) -> Result<()> {
    let path = match &ctx.credentials_path {
        Some(path) => path.clone(),
        None => default_credentials_path()?,
    };

    if path.exists() {
        bail!(
            "credentials file '{}' already exists, edit it instead",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("unable to create '{}'", parent.display()))?;
    }
    std::fs::write(&path, TEMPLATE)
        .with_context(|| format!("unable to write '{}'", path.display()))?;

    println!(
        "{} wrote {}\nEdit it with your client name, key path, and server URL.",
        "Success:".green().bold(),
        path.display()
    );
    Ok(())
}

/// Load the credentials and check the key is usable, reporting what
/// specifically is wrong when they are not.
fn verify(ctx: &Context) -> Result<()> {
    let credentials = match ctx.credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            let advice = match e.downcast_ref::<CredentialsError>() {
                Some(CredentialsError::NotFound { .. }) => {
                    "run 'larder config init' to create one"
                }
                Some(CredentialsError::Parse { .. }) => {
                    "the file is not valid TOML, check for a missing quote or bracket"
                }
                Some(CredentialsError::ProfileNotFound { .. }) => {
                    "pick one of the defined profiles with --profile"
                }
                _ => "check the file's permissions and contents",
            };
            bail!("{e}\n\n{advice}");
        }
    };

    let profile = credentials.profile();
    if profile.chef_server_url.is_empty() {
        bail!(
            "profile '{}' has no chef_server_url set",
            credentials.active()
        );
    }
    credentials
        .key_material()
        .with_context(|| format!("profile '{}' has an unusable client key", credentials.active()))?;

    println!(
        "{} profile '{}' in {} is usable",
        "Success:".green().bold(),
        credentials.active(),
        credentials.path().display()
    );
    Ok(())
}

/// Print the active profile. The key itself is never printed.
fn show(ctx: &Context) -> Result<()> {
    let credentials = ctx.credentials()?;
    let profile = credentials.profile();

    println!("credentials file: {}", credentials.path().display());
    println!("profiles:         {}", credentials.profile_names().join(", "));
    println!("active profile:   {}", credentials.active().bold());
    println!("client_name:      {}", profile.client_name);
    println!("client_key:       {}", profile.client_key);
    println!("chef_server_url:  {}", profile.chef_server_url);
    Ok(())
}

fn default_credentials_path() -> Result<PathBuf> {
    let home = directories::UserDirs::new()
        .context("unable to determine the home directory")?;
    Ok(home
        .home_dir()
        .join(CREDENTIALS_DIR)
        .join(CREDENTIALS_FILE))
}
