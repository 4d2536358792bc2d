//! larder - inventory and reporting for Chef Infra Server

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    larder_cli::run().await
}
