pub mod server;

pub use server::NeedleServer;

use crate::gateway::ToolGateway;
use anyhow::{Context, Result};
use rmcp::ServiceExt;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Serve the Needle tools over stdin/stdout until the host disconnects or `ct` fires
pub async fn serve_stdio(gateway: ToolGateway, ct: CancellationToken) -> Result<()> {
    let service = NeedleServer::new(gateway)
        .serve_with_ct(rmcp::transport::stdio(), ct)
        .await
        .context("MCP handshake with host failed")?;

    info!("MCP session established on stdio");

    let reason = service
        .waiting()
        .await
        .context("MCP service task terminated abnormally")?;

    info!("MCP session ended: {:?}", reason);
    Ok(())
}
