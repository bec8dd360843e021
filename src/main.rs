use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use needle_mcp::host_config::HostConfig;
use needle_mcp::{config, mcp, ToolGateway};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "needle-mcp")]
#[command(about = "MCP server for Needle document collections and search", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, env = "NEEDLE_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Needle API key
    #[arg(long, env = "NEEDLE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Override the Needle API base URL
    #[arg(long, env = "NEEDLE_BASE_URL")]
    base_url: Option<String>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Override log format (pretty, json)
    #[arg(long)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve MCP over stdin/stdout (default)
    Serve,

    /// Print the mcpServers entry for the desktop host configuration file
    HostConfig {
        /// Server name under mcpServers
        #[arg(long, default_value = "needle")]
        name: String,

        /// Write the configured API key instead of a placeholder
        #[arg(long)]
        include_key: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from: {}", path.display()),
        None => "Failed to load configuration".to_string(),
    })?;

    // Apply CLI and host-injected overrides
    if let Some(api_key) = cli.api_key {
        config.needle.api_key = Some(api_key);
    }
    if let Some(base_url) = cli.base_url {
        config.needle.base_url = base_url;
    }
    if let Some(log_level) = cli.log_level {
        config.logging.level = log_level;
    }
    if let Some(log_format) = cli.log_format {
        config.logging.format = log_format;
    }
    config::validate_config(&config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::HostConfig { name, include_key } => {
            let command = std::env::current_exe().context("Failed to resolve executable path")?;
            let api_key = if include_key {
                config.needle.api_key()
            } else {
                None
            };
            let snippet = HostConfig::for_server(&name, command, cli.config, api_key);
            println!("{}", snippet.to_json()?);
            Ok(())
        }
        Command::Serve => serve(config).await,
    }
}

async fn serve(config: config::AppConfig) -> Result<()> {
    init_logging(&config.logging)?;
    print_banner(&config);

    if config.needle.api_key().is_none() {
        warn!("NEEDLE_API_KEY is not set; every tool call will be rejected until it is configured");
    }

    let gateway = ToolGateway::new(Arc::new(config.needle))?;

    let ct = CancellationToken::new();
    tokio::spawn(shutdown_signal(ct.clone()));

    info!("Starting needle-mcp on stdio...");
    mcp::serve_stdio(gateway, ct).await
}

fn init_logging(config: &config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    // stdout belongs to the MCP transport
    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

fn print_banner(config: &config::AppConfig) {
    let version = env!("CARGO_PKG_VERSION");
    let width = 59usize;
    let border = "═".repeat(width + 2);
    let line = |content: &str| {
        info!("║ {:width$} ║", content, width = width);
    };

    info!("╔{}╗", border);
    line("NEEDLE-MCP");
    line(&format!("Needle MCP Server v{}", version));
    info!("╚{}╝", border);
    info!("Server Configuration:");
    info!("  → Needle API: {}", config.needle.base_url);
    info!("  → Request Timeout: {}s", config.needle.timeout_secs);
    info!(
        "  → API Key: {}",
        if config.needle.api_key().is_some() {
            "configured"
        } else {
            "missing"
        }
    );
    info!("  → Log Level: {}", config.logging.level);
    info!("  → Log Format: {}", config.logging.format);
}

async fn shutdown_signal(ct: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down...");
        },
        _ = ct.cancelled() => return,
    }

    ct.cancel();
}
