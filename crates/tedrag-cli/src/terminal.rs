//! Terminal rendition of the page's regions and controls.

use std::io::Write;

use tedrag_client::controller::{LOADING_TEXT, SENDING_TEXT};
use tedrag_client::{RenderedResults, UiSurface};

/// Writes results to stdout and alerts/progress to stderr.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    last_alert: Option<String>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn progress(text: &str) {
        eprintln!("{}", text);
    }
}

impl UiSurface for TerminalSurface {
    fn alert(&mut self, message: &str) {
        eprintln!("! {}", message);
        self.last_alert = Some(message.to_string());
    }

    fn set_stats_output(&mut self, text: &str) {
        if text == LOADING_TEXT {
            Self::progress(text);
        } else {
            println!("{}", text);
        }
    }

    fn set_prompt_output(&mut self, text: &str) {
        // The alert already carried this message.
        if self.last_alert.take().as_deref() == Some(text) {
            return;
        }
        match text {
            "" => {}
            SENDING_TEXT => Self::progress(text),
            _ => println!("{}", text),
        }
    }

    fn set_submit_busy(&mut self, busy: bool) {
        if busy {
            eprint!("… waiting for answer");
        } else {
            eprintln!();
        }
        let _ = std::io::stderr().flush();
    }

    fn show_results(&mut self, results: &RenderedResults) {
        println!("{}", results);
    }
}
