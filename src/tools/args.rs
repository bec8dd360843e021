use crate::error::{GatewayError, Result};
use reqwest::Url;
use serde_json::{Map, Value};

/// Named arguments of one tool invocation
#[derive(Debug, Clone, Default)]
pub struct ToolArguments {
    inner: Map<String, Value>,
}

impl ToolArguments {
    pub fn new(inner: Map<String, Value>) -> Self {
        Self { inner }
    }

    /// A required, non-blank string argument
    pub fn required_str(&self, field: &str) -> Result<&str> {
        match self.inner.get(field) {
            None | Some(Value::Null) => Err(GatewayError::missing_argument(field)),
            Some(Value::String(value)) if value.trim().is_empty() => {
                Err(GatewayError::missing_argument(field))
            }
            Some(Value::String(value)) => Ok(value.as_str()),
            Some(_) => Err(GatewayError::InvalidRequest(format!(
                "argument '{}' must be a string",
                field
            ))),
        }
    }

    /// A required absolute http(s) URL
    pub fn required_url(&self, field: &str) -> Result<&str> {
        let raw = self.required_str(field)?;
        let url = Url::parse(raw).map_err(|e| {
            GatewayError::InvalidRequest(format!("argument '{}' is not a valid URL: {}", field, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GatewayError::InvalidRequest(format!(
                "argument '{}' must be an http or https URL",
                field
            )));
        }
        Ok(raw)
    }
}

impl From<Option<Map<String, Value>>> for ToolArguments {
    fn from(arguments: Option<Map<String, Value>>) -> Self {
        Self::new(arguments.unwrap_or_default())
    }
}
