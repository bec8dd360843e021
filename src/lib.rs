pub mod config;
pub mod error;
pub mod gateway;
pub mod host_config;
pub mod mcp;
pub mod needle;
pub mod tools;

pub use error::{GatewayError, Result};
pub use gateway::ToolGateway;
