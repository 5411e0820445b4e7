//! Config command handler

use anyhow::Result;
use helix_client::WorkflowClient;

/// Print the resolved configuration
pub async fn show_config(client: &WorkflowClient) -> Result<()> {
    println!("{}", client.describe_config().await);
    Ok(())
}
