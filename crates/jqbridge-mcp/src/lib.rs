//! jqbridge-mcp: MCP server exposing jq-backed JSON tools.

pub mod server;

pub use server::{JqServerHandler, ServerConfig};
