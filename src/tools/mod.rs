pub mod args;
pub mod catalog;

pub use args::ToolArguments;
pub use catalog::{NeedleTool, ToolDefinition};
