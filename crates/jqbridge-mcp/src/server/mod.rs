//! MCP server functionality for jqbridge.
//!
//! This module exposes jq as an MCP server: every tool translates typed
//! parameters into a jq invocation and returns the captured output.
//!
//! # Features
//!
//! - **query/extract/transform/select**: free-form and path-based filtering
//! - **array_op/object_op/string_op/math_op**: closed per-type operation sets
//! - **format/validate**: document re-serialization and syntax checking
//! - **Reference resources**: static jq syntax and operation catalogs under
//!   the `jq://reference/` URI scheme
//!
//! # Example
//!
//! ```ignore
//! use jqbridge_mcp::server::{JqServerHandler, ServerConfig};
//! use rmcp::transport::io::stdio;
//! use rmcp::service::ServiceExt;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     let handler = JqServerHandler::new(config);
//!     handler.executor().probe().await?;
//!
//!     let transport = stdio();
//!     handler.serve(transport).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod handler;
pub mod resources;

pub use config::ServerConfig;
pub use handler::JqServerHandler;
