//! The RAG client controller and its submit state machine.
//!
//! Each submission runs `Idle -> Busy -> {Succeeded, Failed} -> Idle`. `Busy`
//! is entered only after the input validates, and the way back to `Idle`
//! (re-enabling the submit control) is tied to a guard's `Drop`, so every
//! exit path restores the control.
//!
//! No operation returns an error: failures are reported through the
//! [`UiSurface`] and logged, and the outcome is returned for callers that
//! want to inspect it.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tedrag_core::{
    ClientConfig, Error, HealthReport, InputMode, PromptRequest, PromptResponse, RenderMode,
    Result, StatsResponse,
};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::endpoints::Endpoints;
use crate::render::{render_health, render_raw, render_results, render_stats};
use crate::surface::UiSurface;
use crate::transport::HttpTransport;

pub const INVALID_JSON_ALERT: &str = "Invalid JSON input. Please check your JSON syntax.";
pub const INVALID_JSON_INLINE: &str = "Error: Invalid JSON input";
pub const LOADING_TEXT: &str = "Loading...";
pub const SENDING_TEXT: &str = "Sending request...";

/// Where a submission currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Busy,
    Succeeded,
    Failed,
}

/// Result of one `submit_question` call.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Input failed validation; nothing was sent.
    Rejected(Error),
    Succeeded(PromptResponse),
    /// The request was sent and failed.
    Failed(Error),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded(_))
    }
}

fn transition(phase: &mut SubmitPhase, next: SubmitPhase) {
    debug!("submit: {:?} -> {:?}", phase, next);
    *phase = next;
}

/// Holds the submit control in its busy state until dropped.
struct BusyGuard<'a, U: UiSurface> {
    surface: &'a mut U,
    phase: &'a mut SubmitPhase,
}

impl<'a, U: UiSurface> BusyGuard<'a, U> {
    fn engage(surface: &'a mut U, phase: &'a mut SubmitPhase) -> Self {
        transition(phase, SubmitPhase::Busy);
        surface.set_submit_busy(true);
        Self { surface, phase }
    }

    fn settle(mut self, ok: bool) {
        let next = if ok {
            SubmitPhase::Succeeded
        } else {
            SubmitPhase::Failed
        };
        transition(&mut *self.phase, next);
    }
}

impl<U: UiSurface> Drop for BusyGuard<'_, U> {
    fn drop(&mut self) {
        self.surface.set_submit_busy(false);
        transition(&mut *self.phase, SubmitPhase::Idle);
    }
}

async fn fetch_json<T, H>(transport: &H, url: &Url) -> Result<(T, Value)>
where
    T: DeserializeOwned,
    H: HttpTransport + ?Sized,
{
    transport.get(url).await?.decode()
}

async fn post_prompt<H>(
    transport: &H,
    url: &Url,
    request: &PromptRequest,
) -> Result<(PromptResponse, Value)>
where
    H: HttpTransport + ?Sized,
{
    let body = serde_json::to_value(request)?;
    transport.post_json(url, &body).await?.decode()
}

fn log_failure(operation: &str, err: &Error) {
    match err {
        Error::HttpStatus { status, detail } => error!(
            "{} failed: HTTP {}{}",
            operation,
            status,
            detail.as_deref().map(|d| format!(": {}", d)).unwrap_or_default()
        ),
        other => error!("{} failed: {}", operation, other),
    }
}

/// Mediates between a [`UiSurface`] and the RAG backend.
pub struct RagController<T, U> {
    transport: T,
    surface: U,
    endpoints: Endpoints,
    input_mode: InputMode,
    render_mode: RenderMode,
    phase: SubmitPhase,
}

impl<T: HttpTransport, U: UiSurface> RagController<T, U> {
    pub fn new(transport: T, surface: U, endpoints: Endpoints) -> Self {
        Self {
            transport,
            surface,
            endpoints,
            input_mode: InputMode::default(),
            render_mode: RenderMode::default(),
            phase: SubmitPhase::Idle,
        }
    }

    /// Build a controller with the endpoints and modes from `config`.
    pub fn from_config(transport: T, surface: U, config: &ClientConfig) -> Result<Self> {
        let endpoints = Endpoints::from_config(config)?;
        Ok(Self::new(transport, surface, endpoints)
            .with_input_mode(config.input_mode)
            .with_render_mode(config.render_mode))
    }

    pub fn with_input_mode(mut self, mode: InputMode) -> Self {
        self.input_mode = mode;
        self
    }

    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    /// GET `{base}/stats` and render it into the stats region.
    pub async fn fetch_stats(&mut self) -> Option<StatsResponse> {
        self.surface.set_stats_output(LOADING_TEXT);

        match fetch_json::<StatsResponse, _>(&self.transport, &self.endpoints.stats).await {
            Ok((stats, raw)) => {
                let text = match self.render_mode {
                    RenderMode::Formatted => render_stats(&stats),
                    RenderMode::Raw => render_raw(&raw),
                };
                self.surface.set_stats_output(&text);
                info!(
                    "Stats: chunk_size={} overlap_ratio={} top_k={}",
                    stats.chunk_size, stats.overlap_ratio, stats.top_k
                );
                Some(stats)
            }
            Err(err) => {
                log_failure("Stats request", &err);
                self.surface
                    .set_stats_output(&format!("Error: {}", err.user_message()));
                None
            }
        }
    }

    /// GET `{base}/health` and render it into the stats region.
    pub async fn fetch_health(&mut self) -> Option<HealthReport> {
        self.surface.set_stats_output(LOADING_TEXT);

        match fetch_json::<HealthReport, _>(&self.transport, &self.endpoints.health).await {
            Ok((report, raw)) => {
                let text = match self.render_mode {
                    RenderMode::Formatted => render_health(&report),
                    RenderMode::Raw => render_raw(&raw),
                };
                self.surface.set_stats_output(&text);
                let failed = report.failed_imports();
                if !failed.is_empty() {
                    warn!("Backend reports failed imports: {}", failed.join(", "));
                }
                Some(report)
            }
            Err(err) => {
                log_failure("Health request", &err);
                self.surface
                    .set_stats_output(&format!("Error: {}", err.user_message()));
                None
            }
        }
    }

    /// Validate `input` per the configured mode, POST it to `{base}/prompt`
    /// and render the answer.
    pub async fn submit_question(&mut self, input: &str) -> SubmitOutcome {
        let request = match self.parse_input(input) {
            Ok(request) => request,
            Err(err) => {
                self.report_input_error(&err);
                return SubmitOutcome::Rejected(err);
            }
        };

        let result = {
            let mut busy = BusyGuard::engage(&mut self.surface, &mut self.phase);
            busy.surface.set_prompt_output(SENDING_TEXT);
            let result = post_prompt(&self.transport, &self.endpoints.prompt, &request).await;
            busy.settle(result.is_ok());
            result
        };

        match result {
            Ok((response, raw)) => {
                info!("Answer received with {} context items", response.context.len());
                match self.render_mode {
                    RenderMode::Formatted => {
                        let view = render_results(&response);
                        self.surface.set_prompt_output("");
                        self.surface.show_results(&view);
                        self.surface.scroll_results_into_view();
                    }
                    RenderMode::Raw => self.surface.set_prompt_output(&render_raw(&raw)),
                }
                SubmitOutcome::Succeeded(response)
            }
            Err(err) => {
                log_failure("Prompt request", &err);
                let message = format!("Error: {}", err.user_message());
                self.surface.alert(&message);
                self.surface.set_prompt_output(&message);
                SubmitOutcome::Failed(err)
            }
        }
    }

    fn parse_input(&self, input: &str) -> Result<PromptRequest> {
        match self.input_mode {
            InputMode::Plain => PromptRequest::from_question(input),
            InputMode::Json => PromptRequest::from_json(input),
        }
    }

    fn report_input_error(&mut self, err: &Error) {
        match err {
            Error::InputParse(detail) => {
                warn!("Rejected question input: invalid JSON: {}", detail);
                self.surface.alert(INVALID_JSON_ALERT);
                self.surface.set_prompt_output(INVALID_JSON_INLINE);
            }
            other => {
                debug!("Rejected question input: {}", other);
                self.surface.alert(&other.user_message());
            }
        }
    }
}
