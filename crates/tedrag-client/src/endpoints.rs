//! Resolved endpoint URLs for one API base.

use tedrag_core::{ApiBase, ClientConfig, Result};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub stats: Url,
    pub prompt: Url,
    pub health: Url,
}

impl Endpoints {
    pub fn new(base: &ApiBase, origin: &Url) -> Result<Self> {
        Ok(Self {
            stats: base.endpoint(origin, "stats")?,
            prompt: base.endpoint(origin, "prompt")?,
            health: base.endpoint(origin, "health")?,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.api_base, &config.origin)
    }
}
