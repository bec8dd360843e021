#![allow(dead_code)]

use httpmock::MockServer;
use needle_mcp::{config::NeedleSettings, tools::ToolArguments, ToolGateway};
use serde_json::Value;
use std::sync::Arc;

pub const TEST_API_KEY: &str = "nd-test-key";

pub fn settings_for(server: &MockServer, api_key: Option<&str>) -> Arc<NeedleSettings> {
    Arc::new(NeedleSettings {
        api_key: api_key.map(str::to_string),
        base_url: server.base_url(),
        timeout_secs: 5,
        ..Default::default()
    })
}

/// Gateway pointed at the mock Needle API with a valid key
pub fn gateway_for(server: &MockServer) -> ToolGateway {
    ToolGateway::new(settings_for(server, Some(TEST_API_KEY))).unwrap()
}

/// Gateway pointed at the mock Needle API without any key
pub fn keyless_gateway_for(server: &MockServer) -> ToolGateway {
    ToolGateway::new(settings_for(server, None)).unwrap()
}

/// Gateway with its own Needle rate limit budget
pub fn rate_limited_gateway_for(server: &MockServer, calls: u32, period_ms: u64) -> ToolGateway {
    ToolGateway::new(Arc::new(NeedleSettings {
        api_key: Some(TEST_API_KEY.to_string()),
        base_url: server.base_url(),
        timeout_secs: 5,
        rate_limit_calls: calls,
        rate_limit_period_ms: period_ms,
    }))
    .unwrap()
}

pub fn args(value: Value) -> ToolArguments {
    ToolArguments::new(value.as_object().cloned().unwrap_or_default())
}

pub fn bearer() -> String {
    format!("Bearer {}", TEST_API_KEY)
}
