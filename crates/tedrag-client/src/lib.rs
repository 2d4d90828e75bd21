//! TED RAG client controller.
//!
//! Mediates between UI surfaces and the RAG backend's HTTP API: validates
//! question input, issues `GET {base}/stats` and `POST {base}/prompt`, tracks
//! the submit control's busy state and renders responses. The HTTP capability
//! ([`HttpTransport`]) and the output targets ([`UiSurface`]) are injected, so
//! the controller runs the same against a terminal, a recorder, or a mock.

pub mod controller;
pub mod endpoints;
pub mod render;
pub mod surface;
pub mod transport;

pub use controller::{RagController, SubmitOutcome, SubmitPhase};
pub use endpoints::Endpoints;
pub use render::{RenderedContext, RenderedResults};
pub use surface::UiSurface;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
