//! MCP (Model Context Protocol) server for vidbridge.
//!
//! Exposes the video API as tools to AI assistants.
//! Implements JSON-RPC 2.0 over stdio.

mod args;
mod dispatch;
pub mod protocol;
mod results;
mod schema;
mod server;
mod tools;

pub use dispatch::Dispatcher;
pub use protocol::{ToolCallResult, ToolContent, ToolDescriptor};
pub use server::McpServer;
pub use tools::{get_tools, TASK_STATUSES};
