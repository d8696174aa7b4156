//! Note summarization.
//!
//! # Responsibility
//! - Expose one async `Summarizer` contract used by every caller.
//! - Provide the extractive implementation with an artificial latency that
//!   stands in for a remote inference call.
//!
//! # Invariants
//! - `ExtractiveSummarizer` output is byte-identical to `extractive_summary`.
//! - The extractive implementation never fails.

mod extractive;

pub use extractive::{extractive_summary, split_sentences};

use async_trait::async_trait;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Latency injected by the default summarizer.
pub const DEFAULT_SUMMARY_DELAY: Duration = Duration::from_millis(1500);

pub type SummarizeResult<T> = Result<T, SummarizeError>;

/// Failure reported by a summarization backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarizeError {
    Backend(String),
}

impl Display for SummarizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(message) => write!(f, "summarization backend failed: {message}"),
        }
    }
}

impl Error for SummarizeError {}

/// Produces a short summary for note content.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> SummarizeResult<String>;
}

/// Extractive summarizer with a fixed artificial delay.
#[derive(Debug, Clone)]
pub struct ExtractiveSummarizer {
    delay: Duration,
}

impl ExtractiveSummarizer {
    /// Creates a summarizer using `DEFAULT_SUMMARY_DELAY`.
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_SUMMARY_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    async fn summarize(&self, text: &str) -> SummarizeResult<String> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let summary = extractive_summary(text);
        debug!(
            "event=summarize module=summarize status=ok input_chars={} output_chars={}",
            text.chars().count(),
            summary.chars().count()
        );
        Ok(summary)
    }
}
