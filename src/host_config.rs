//! Snippet for the desktop host's `mcpServers` configuration.
//!
//! The host launches this binary itself and injects `NEEDLE_API_KEY`, so the
//! entry only needs the command, its arguments and the environment.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const API_KEY_ENV: &str = "NEEDLE_API_KEY";
pub const API_KEY_PLACEHOLDER: &str = "<your-needle-api-key>";

#[derive(Debug, Clone, Serialize)]
pub struct HostServerEntry {
    pub command: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfig {
    pub mcp_servers: BTreeMap<String, HostServerEntry>,
}

impl HostConfig {
    /// Build the entry for one server named `name`.
    ///
    /// Without an API key the placeholder is written so the snippet can be
    /// shared without leaking credentials.
    pub fn for_server(
        name: &str,
        command: PathBuf,
        config_path: Option<PathBuf>,
        api_key: Option<&str>,
    ) -> Self {
        let mut args = Vec::new();
        if let Some(path) = config_path {
            args.push("--config".to_string());
            args.push(path.display().to_string());
        }

        let mut env = BTreeMap::new();
        env.insert(
            API_KEY_ENV.to_string(),
            api_key.unwrap_or(API_KEY_PLACEHOLDER).to_string(),
        );

        let mut mcp_servers = BTreeMap::new();
        mcp_servers.insert(
            name.to_string(),
            HostServerEntry {
                command: command.display().to_string(),
                args,
                env,
            },
        );

        Self { mcp_servers }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
