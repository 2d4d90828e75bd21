//! Output and input targets the controller writes to.

use crate::render::RenderedResults;

/// The page regions and controls the controller drives.
///
/// Implementations decide how each region is shown: the `tedrag` binary maps
/// them to terminal streams, tests record them.
pub trait UiSurface {
    /// Blocking, user-facing notice (the page's `alert`).
    fn alert(&mut self, message: &str);

    /// Stats/status region. Also used for health reports.
    fn set_stats_output(&mut self, text: &str);

    /// Inline message region under the question input.
    fn set_prompt_output(&mut self, text: &str);

    /// Busy: control disabled, label hidden, indicator shown. Not busy: the
    /// reverse.
    fn set_submit_busy(&mut self, busy: bool);

    /// Populate the results region and reveal it if hidden.
    fn show_results(&mut self, results: &RenderedResults);

    /// Bring the results region into view.
    fn scroll_results_into_view(&mut self) {}
}
