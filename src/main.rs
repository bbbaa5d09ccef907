use anyhow::Context;
use clap::Parser;

use forum_client::api::ForumClient;
use forum_client::cli::{execute, Cli};
use forum_client::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config().context("Failed to load configuration")?;
    init_tracing(&config.logging.filter);

    let client = ForumClient::new(&config.api).context("Failed to build API client")?;
    let credentials = cli.credentials();

    match execute(&client, credentials.as_ref(), cli.command).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, error_type = err.error_type(), "Command failed");
            Err(err.into())
        }
    }
}
