//! Request and response types matching the RAG backend's JSON surface.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Alert text for an empty plain-text question.
pub const EMPTY_QUESTION_MESSAGE: &str = "Please enter a question.";
/// Alert text for structured input lacking a usable `question` field.
pub const MISSING_QUESTION_MESSAGE: &str = "Input JSON must contain a \"question\" field";

/// Retrieval settings reported by `GET {base}/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub chunk_size: u64,
    pub overlap_ratio: f64,
    pub top_k: u64,
}

/// Body of `POST {base}/prompt`.
///
/// Plain-text input produces `{ "question": ... }`. Structured input keeps
/// every other field of the parsed object in `extra` and sends it along.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptRequest {
    pub question: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PromptRequest {
    /// Build a request from a plain-text question field.
    pub fn from_question(text: &str) -> Result<Self> {
        let question = text.trim();
        if question.is_empty() {
            return Err(Error::InputValidation(EMPTY_QUESTION_MESSAGE.into()));
        }
        Ok(Self {
            question: question.to_string(),
            extra: Map::new(),
        })
    }

    /// Build a request from raw JSON text.
    ///
    /// Syntax errors map to [`Error::InputParse`]; a non-object value or a
    /// missing, non-string or blank `question` maps to
    /// [`Error::InputValidation`].
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| Error::InputParse(e.to_string()))?;

        let Value::Object(mut fields) = value else {
            return Err(Error::InputValidation(MISSING_QUESTION_MESSAGE.into()));
        };

        match fields.remove("question") {
            Some(Value::String(question)) if !question.trim().is_empty() => Ok(Self {
                question,
                extra: fields,
            }),
            _ => Err(Error::InputValidation(MISSING_QUESTION_MESSAGE.into())),
        }
    }
}

/// Successful answer from `POST {base}/prompt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptResponse {
    pub response: String,
    #[serde(default)]
    pub context: Vec<ContextItem>,
    #[serde(rename = "Augmented_prompt")]
    pub augmented_prompt: AugmentedPrompt,
}

/// A retrieved transcript excerpt and its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextItem {
    #[serde(deserialize_with = "string_or_number")]
    pub talk_id: String,
    pub title: String,
    pub score: f64,
    pub chunk: String,
}

/// The system/user prompt pair the backend sent to the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentedPrompt {
    #[serde(rename = "System")]
    pub system: String,
    #[serde(rename = "User")]
    pub user: String,
}

/// Deployment check from `GET {base}/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub imports: BTreeMap<String, String>,
}

impl HealthReport {
    /// Names of the backend modules that failed to import.
    pub fn failed_imports(&self) -> Vec<&str> {
        self.imports
            .iter()
            .filter(|(_, status)| status.as_str() != "OK")
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Error envelope the backend uses, on failure statuses and sometimes on 200.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

impl ApiErrorBody {
    /// Extract the envelope from a response body, if it is one.
    pub fn detect(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}

// Talk ids are strings on the wire, but older indexes stored them as integers.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
