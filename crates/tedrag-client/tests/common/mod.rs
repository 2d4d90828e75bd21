//! Shared test doubles: a scripted transport and a recording surface that
//! write to one ordered event log.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tedrag_client::{
    Endpoints, HttpResponse, HttpTransport, RagController, RenderedResults, UiSurface,
};
use tedrag_core::{ClientConfig, Error, InputMode, Result};
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Alert(String),
    Stats(String),
    Prompt(String),
    Busy(bool),
    Results(RenderedResults),
    Scroll,
    Get(String),
    Post(String, Value),
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

pub enum Reply {
    Status(u16, String),
    NetworkDown,
}

pub struct MockTransport {
    log: EventLog,
    replies: Mutex<VecDeque<Reply>>,
}

impl MockTransport {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            replies: Mutex::new(VecDeque::new()),
        }
    }

    pub fn reply(self, status: u16, body: impl Into<String>) -> Self {
        self.replies
            .lock()
            .push_back(Reply::Status(status, body.into()));
        self
    }

    pub fn network_down(self) -> Self {
        self.replies.lock().push_back(Reply::NetworkDown);
        self
    }

    fn next(&self) -> Result<HttpResponse> {
        match self.replies.lock().pop_front() {
            Some(Reply::Status(status, body)) => Ok(HttpResponse::new(status, body)),
            Some(Reply::NetworkDown) | None => {
                Err(Error::Network("connection refused".into()))
            }
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        self.log.lock().push(Event::Get(url.to_string()));
        self.next()
    }

    async fn post_json(&self, url: &Url, body: &Value) -> Result<HttpResponse> {
        self.log
            .lock()
            .push(Event::Post(url.to_string(), body.clone()));
        self.next()
    }
}

pub struct RecordingSurface {
    log: EventLog,
}

impl RecordingSurface {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl UiSurface for RecordingSurface {
    fn alert(&mut self, message: &str) {
        self.log.lock().push(Event::Alert(message.to_string()));
    }

    fn set_stats_output(&mut self, text: &str) {
        self.log.lock().push(Event::Stats(text.to_string()));
    }

    fn set_prompt_output(&mut self, text: &str) {
        self.log.lock().push(Event::Prompt(text.to_string()));
    }

    fn set_submit_busy(&mut self, busy: bool) {
        self.log.lock().push(Event::Busy(busy));
    }

    fn show_results(&mut self, results: &RenderedResults) {
        self.log.lock().push(Event::Results(results.clone()));
    }

    fn scroll_results_into_view(&mut self) {
        self.log.lock().push(Event::Scroll);
    }
}

pub fn new_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn controller(
    log: &EventLog,
    transport: MockTransport,
    mode: InputMode,
) -> RagController<MockTransport, RecordingSurface> {
    let endpoints = Endpoints::from_config(&ClientConfig::default()).unwrap();
    RagController::new(transport, RecordingSurface::new(log.clone()), endpoints)
        .with_input_mode(mode)
}

pub fn count(log: &EventLog, pred: impl Fn(&Event) -> bool) -> usize {
    log.lock().iter().filter(|e| pred(e)).count()
}

pub fn network_calls(log: &EventLog) -> usize {
    count(log, |e| matches!(e, Event::Get(_) | Event::Post(..)))
}

pub fn position(log: &EventLog, pred: impl Fn(&Event) -> bool) -> Option<usize> {
    log.lock().iter().position(|e| pred(e))
}

pub fn stats_body() -> String {
    json!({"chunk_size": 1024, "overlap_ratio": 0.2, "top_k": 15}).to_string()
}

/// A prompt answer with three context items, not sorted by score.
pub fn prompt_body() -> String {
    json!({
        "response": "Try \"The power of vulnerability\".",
        "context": [
            {"talk_id": "1", "title": "The power of vulnerability", "score": 0.8731, "chunk": "So I'll start with this..."},
            {"talk_id": "66", "title": "Do schools kill creativity?", "score": 0.75, "chunk": "Good morning. How are you?"},
            {"talk_id": "848", "title": "Your body language may shape who you are", "score": 0.81234, "chunk": "So I want to start by offering you..."}
        ],
        "Augmented_prompt": {
            "System": "You are a TED Talk assistant that answers questions strictly and only based on the TED dataset context provided to you.",
            "User": "Context:\nTitle: The power of vulnerability..."
        }
    })
    .to_string()
}
