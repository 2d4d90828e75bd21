//! Pure presentation transforms for backend responses.

use std::fmt;

use serde::Serialize;
use tedrag_core::{HealthReport, PromptResponse, StatsResponse};

/// One context block, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedContext {
    /// 1-based position in the backend's ordering.
    pub index: usize,
    /// Similarity score with exactly four decimals.
    pub score: String,
    pub talk_id: String,
    pub title: String,
    pub chunk: String,
}

/// Display view of a [`PromptResponse`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedResults {
    pub answer: String,
    pub context: Vec<RenderedContext>,
    pub system_prompt: String,
    pub user_prompt: String,
}

pub fn format_score(score: f64) -> String {
    format!("{:.4}", score)
}

/// Build the results view. Context order is kept as received.
pub fn render_results(data: &PromptResponse) -> RenderedResults {
    RenderedResults {
        answer: data.response.clone(),
        context: data
            .context
            .iter()
            .enumerate()
            .map(|(i, item)| RenderedContext {
                index: i + 1,
                score: format_score(item.score),
                talk_id: item.talk_id.clone(),
                title: item.title.clone(),
                chunk: item.chunk.clone(),
            })
            .collect(),
        system_prompt: data.augmented_prompt.system.clone(),
        user_prompt: data.augmented_prompt.user.clone(),
    }
}

pub fn render_stats(stats: &StatsResponse) -> String {
    format!(
        "Chunk size:    {}\nOverlap ratio: {}\nTop K:         {}",
        stats.chunk_size, stats.overlap_ratio, stats.top_k
    )
}

pub fn render_health(report: &HealthReport) -> String {
    let mut out = format!("Status: {}", report.status);
    for (module, status) in &report.imports {
        out.push_str(&format!("\n  {}: {}", module, status));
    }
    out
}

/// Pretty-printed JSON with two-space indentation.
pub fn render_raw<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unprintable: {}>", e))
}

impl fmt::Display for RenderedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[{}] score {} | talk {} | {}",
            self.index, self.score, self.talk_id, self.title
        )?;
        for line in self.chunk.lines() {
            writeln!(f, "    {}", line)?;
        }
        Ok(())
    }
}

impl fmt::Display for RenderedResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Answer:")?;
        writeln!(f, "{}", self.answer)?;
        writeln!(f)?;
        writeln!(f, "Context ({}):", self.context.len())?;
        for block in &self.context {
            write!(f, "{}", block)?;
        }
        writeln!(f)?;
        writeln!(f, "Augmented prompt")?;
        writeln!(f, "System: {}", self.system_prompt)?;
        write!(f, "User: {}", self.user_prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tedrag_core::{AugmentedPrompt, ContextItem};

    fn item(talk_id: &str, score: f64) -> ContextItem {
        ContextItem {
            talk_id: talk_id.into(),
            title: format!("Talk {}", talk_id),
            score,
            chunk: "line one\nline two".into(),
        }
    }

    fn response(context: Vec<ContextItem>) -> PromptResponse {
        PromptResponse {
            response: "Watch talk 1.".into(),
            context,
            augmented_prompt: AugmentedPrompt {
                system: "sys".into(),
                user: "usr".into(),
            },
        }
    }

    #[test]
    fn test_score_has_four_decimals() {
        assert_eq!(format_score(0.8731), "0.8731");
        assert_eq!(format_score(0.873), "0.8730");
        assert_eq!(format_score(1.0), "1.0000");
        assert_eq!(format_score(0.123456), "0.1235");
    }

    #[test]
    fn test_render_keeps_order_and_input() {
        // Deliberately not sorted by score.
        let data = response(vec![item("3", 0.5), item("1", 0.9), item("2", 0.7)]);
        let before = data.clone();

        let view = render_results(&data);
        assert_eq!(data, before);
        let ids: Vec<&str> = view.context.iter().map(|c| c.talk_id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
        let indexes: Vec<usize> = view.context.iter().map(|c| c.index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
        assert_eq!(view.context[0].score, "0.5000");
        assert_eq!(view.system_prompt, "sys");
        assert_eq!(view.user_prompt, "usr");
    }

    #[test]
    fn test_text_layout() {
        let view = render_results(&response(vec![item("42", 0.8731)]));
        let text = view.to_string();
        assert!(text.starts_with("Answer:\nWatch talk 1.\n"));
        assert!(text.contains("Context (1):\n[1] score 0.8731 | talk 42 | Talk 42\n    line one\n    line two\n"));
        assert!(text.ends_with("System: sys\nUser: usr"));
    }

    #[test]
    fn test_empty_context() {
        let view = render_results(&response(Vec::new()));
        assert!(view.context.is_empty());
        assert!(view.to_string().contains("Context (0):"));
    }

    #[test]
    fn test_stats_and_raw() {
        let stats = StatsResponse {
            chunk_size: 1024,
            overlap_ratio: 0.2,
            top_k: 15,
        };
        let text = render_stats(&stats);
        assert!(text.contains("1024"));
        assert!(text.contains("0.2"));
        assert!(text.contains("15"));

        let raw = render_raw(&stats);
        assert_eq!(
            raw,
            "{\n  \"chunk_size\": 1024,\n  \"overlap_ratio\": 0.2,\n  \"top_k\": 15\n}"
        );
    }
}
