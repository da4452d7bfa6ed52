//! CLI plumbing around the evaluation engine

mod context;
mod run;
mod style;
mod summary;

pub use run::{RunOptions, run_report};

use crate::cli::style::progress_style;
use indicatif::ProgressBar;
use merge_list::report::EvaluationProgress;

/// Progress bar over the PRs being evaluated
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Create a progress bar; its length is set when evaluation starts
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(progress_style());
        Self { bar }
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationProgress for CliProgress {
    fn on_start(&self, total: usize) {
        self.bar.set_length(u64::try_from(total).unwrap_or(u64::MAX));
        self.bar.set_message("Evaluating PRs");
    }

    fn on_pr(&self, number: u64) {
        self.bar.set_message(format!("PR #{number}"));
        self.bar.inc(1);
    }

    fn on_finish(&self) {
        self.bar.finish_and_clear();
    }
}
