//! Client configuration: API base path, origin, input and render modes.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::error::{Error, Result};

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8000";
pub const DEFAULT_CONFIG_FILE: &str = "tedrag.json";

/// Where the RAG API lives: a deployed absolute URL, or a path on the origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ApiBase {
    Absolute(Url),
    Relative(String),
}

impl ApiBase {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.starts_with('/') {
            // `//host` and `/\host` name another host, not a path on the origin.
            if raw.starts_with("//") || raw.contains(&['\\', '?', '#'][..]) {
                return Err(Error::Config(format!(
                    "API base {:?} is not a same-origin path",
                    raw
                )));
            }
            return Ok(ApiBase::Relative(raw.trim_end_matches('/').to_string()));
        }

        let url = Url::parse(raw)
            .map_err(|e| Error::Config(format!("API base {:?} is not a URL or /path: {}", raw, e)))?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::Config(format!(
                    "API base {:?} uses unsupported scheme {:?}",
                    raw, other
                )))
            }
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(Error::Config(format!(
                "API base {:?} must not carry a query or fragment",
                raw
            )));
        }
        Ok(ApiBase::Absolute(url))
    }

    /// Full URL of `{base}/{name}`. Relative bases resolve against `origin`
    /// and must stay on it.
    pub fn endpoint(&self, origin: &Url, name: &str) -> Result<Url> {
        match self {
            ApiBase::Absolute(base) => {
                let mut url = base.clone();
                url.path_segments_mut()
                    .map_err(|_| Error::Config(format!("API base {} cannot take a path", base)))?
                    .pop_if_empty()
                    .push(name);
                Ok(url)
            }
            ApiBase::Relative(path) => {
                let url = origin.join(&format!("{}/{}", path, name))?;
                if url.origin() != origin.origin() {
                    return Err(Error::Config(format!(
                        "API base {} leaves origin {}",
                        path, origin
                    )));
                }
                Ok(url)
            }
        }
    }
}

impl fmt::Display for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiBase::Absolute(url) => write!(f, "{}", url.as_str().trim_end_matches('/')),
            ApiBase::Relative(path) => write!(f, "{}", path),
        }
    }
}

impl TryFrom<String> for ApiBase {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        ApiBase::parse(&value)
    }
}

impl From<ApiBase> for String {
    fn from(base: ApiBase) -> Self {
        base.to_string()
    }
}

/// How the question input is interpreted. One mode per deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// The input is the question text.
    #[default]
    Plain,
    /// The input is a JSON object with at least a `question` field.
    Json,
}

impl FromStr for InputMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(InputMode::Plain),
            "json" => Ok(InputMode::Json),
            other => Err(Error::Config(format!("Unknown input mode: {}", other))),
        }
    }
}

/// How responses are written to the output regions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Field-by-field presentation.
    #[default]
    Formatted,
    /// Pretty-printed response JSON.
    Raw,
}

impl FromStr for RenderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "formatted" => Ok(RenderMode::Formatted),
            "raw" | "json" => Ok(RenderMode::Raw),
            other => Err(Error::Config(format!("Unknown render mode: {}", other))),
        }
    }
}

/// Stored client configuration (persisted to `tedrag.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_base")]
    pub api_base: ApiBase,
    /// Origin that relative API bases are resolved against.
    #[serde(default = "default_origin")]
    pub origin: Url,
    #[serde(default)]
    pub input_mode: InputMode,
    #[serde(default)]
    pub render_mode: RenderMode,
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_api_base() -> ApiBase {
    ApiBase::Relative(DEFAULT_API_BASE.into())
}

fn default_origin() -> Url {
    Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid URL")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            origin: default_origin(),
            input_mode: InputMode::default(),
            render_mode: RenderMode::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }
}

impl ClientConfig {
    /// Load config from file, then apply `TEDRAG_*` environment overrides.
    ///
    /// A missing file yields defaults. An unreadable or malformed file is
    /// logged and ignored; a malformed environment value is an error.
    pub fn load(config_path: &Path) -> Result<Self> {
        let mut config = Self::read_file(config_path);
        config.config_path = config_path.to_path_buf();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn read_file(config_path: &Path) -> Self {
        let text = match std::fs::read_to_string(config_path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("Cannot read {}: {}. Using defaults.", config_path.display(), e);
                return Self::default();
            }
        };

        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("Ignoring malformed {}: {}", config_path.display(), e);
            Self::default()
        })
    }

    /// Override fields from environment-style lookups.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup("TEDRAG_API_BASE") {
            self.api_base = ApiBase::parse(&base)?;
        }
        if let Some(origin) = lookup("TEDRAG_ORIGIN") {
            self.origin = Url::parse(origin.trim())
                .map_err(|e| Error::Config(format!("TEDRAG_ORIGIN: {}", e)))?;
        }
        if let Some(mode) = lookup("TEDRAG_INPUT_MODE") {
            self.input_mode = mode.parse()?;
        }
        if let Some(mode) = lookup("TEDRAG_RENDER_MODE") {
            self.render_mode = mode.parse()?;
        }
        Ok(())
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.config_path, json)?;
        info!("Saved client config to {}", self.config_path.display());
        Ok(())
    }

    /// URL of a named endpoint under the configured base.
    pub fn endpoint(&self, name: &str) -> Result<Url> {
        self.api_base.endpoint(&self.origin, name)
    }
}
