//! vidbridge - video understanding tools for AI assistants
//!
//! An MCP server that exposes a hosted video-intelligence API as tools an LLM
//! host can list and call over stdio.
//!
//! # Overview
//!
//! vidbridge lets an assistant:
//! - Create, list, rename and delete video indexes
//! - Upload videos by URL and track their ingestion tasks
//! - Search indexed videos with natural language
//! - Generate text, gists, summaries, chapters and highlights from a video
//! - Import videos from cloud storage integrations
//!
//! # Architecture
//!
//! - `config` - Settings file and credential lookup
//! - `api` - Typed HTTP client for the upstream API
//! - `mcp` - Tool registry, dispatcher and JSON-RPC server
//! - `cli` - Command-line front-end
//!
//! # Example
//!
//! ```rust,no_run
//! use vidbridge::api::{ApiClient, ApiConfig};
//! use vidbridge::config::Settings;
//! use vidbridge::mcp::Dispatcher;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let client = ApiClient::new(ApiConfig::from_settings(&settings)?)?;
//!     let dispatcher = Dispatcher::new(client, settings.models);
//!
//!     let result = dispatcher
//!         .call("list_indexes", Some(serde_json::json!({ "page_limit": 5 })))
//!         .await;
//!     println!("{}", result.joined_text());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;

pub use error::{BridgeError, Result};
