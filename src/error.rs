use rmcp::model::{CallToolResult, Content};
use rmcp::ErrorData as McpError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{}", upstream_display(.status, .message))]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

fn upstream_display(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Needle API error (status {}): {}", code, message),
        None => format!("Needle API error: {}", message),
    }
}

impl GatewayError {
    pub fn missing_argument(field: &str) -> Self {
        GatewayError::InvalidRequest(format!("missing required argument: {}", field))
    }

    pub fn unsupported_tool(name: &str) -> Self {
        GatewayError::InvalidRequest(format!("unsupported tool: {}", name))
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        GatewayError::Upstream {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Upstream HTTP status, when the provider answered at all
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            GatewayError::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    /// Turn a failed invocation into what the MCP client sees.
    ///
    /// Argument problems are protocol errors; provider failures are tool
    /// results flagged `is_error` so the host model can read the message.
    pub fn into_tool_outcome(self) -> std::result::Result<CallToolResult, McpError> {
        match self {
            GatewayError::InvalidRequest(msg) => Err(McpError::invalid_params(msg, None)),
            err @ GatewayError::Upstream { .. } => {
                Ok(CallToolResult::error(vec![Content::text(err.to_string())]))
            }
            other => Err(McpError::internal_error(other.to_string(), None)),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Upstream {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for GatewayError {
    fn from(err: anyhow::Error) -> Self {
        GatewayError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GatewayError::unsupported_tool("delete_everything");
        assert_eq!(err.to_string(), "Invalid request: unsupported tool: delete_everything");

        let err = GatewayError::missing_argument("collection_id");
        assert_eq!(
            err.to_string(),
            "Invalid request: missing required argument: collection_id"
        );
    }

    #[test]
    fn test_upstream_display() {
        let err = GatewayError::upstream(404, "collection not found");
        assert_eq!(
            err.to_string(),
            "Needle API error (status 404): collection not found"
        );
        assert_eq!(err.upstream_status(), Some(404));

        let err = GatewayError::Upstream {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Needle API error: connection refused");
        assert_eq!(err.upstream_status(), None);
    }

    #[test]
    fn test_invalid_request_becomes_protocol_error() {
        let outcome = GatewayError::missing_argument("query").into_tool_outcome();
        let err = outcome.unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("query"));
    }

    #[test]
    fn test_upstream_becomes_error_result() {
        let outcome = GatewayError::upstream(500, "boom").into_tool_outcome();
        let result = outcome.unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.content.len(), 1);
    }

    #[test]
    fn test_internal_becomes_internal_error() {
        let outcome = GatewayError::Internal("oops".to_string()).into_tool_outcome();
        let err = outcome.unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: GatewayError = json_err.into();
        assert!(matches!(err, GatewayError::Json(_)));
    }

    #[test]
    fn test_error_from_anyhow() {
        let err: GatewayError = anyhow::anyhow!("something went wrong").into();
        assert!(matches!(err, GatewayError::Internal(_)));
        assert!(err.to_string().contains("something went wrong"));
    }
}
