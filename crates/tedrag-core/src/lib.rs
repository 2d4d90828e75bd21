//! TED RAG core — data model, error taxonomy, client configuration.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ApiBase, ClientConfig, InputMode, RenderMode};
pub use error::{Error, Result};
pub use types::*;
