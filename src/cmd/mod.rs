pub mod crossword;
pub mod denoise;
pub mod generate;
pub mod kenken;
pub mod magic;
pub mod portfolio;
pub mod solve;
pub mod tour;

use metropolis::config::SearchParams;
use metropolis::optimizer::{AnnealerOptions, Progress, ProgressCallback};
use std::time::Duration;
use tracing::info;

/// Logs every progress checkpoint.
pub struct CliLogger;

impl ProgressCallback for CliLogger {
    fn on_progress(&self, p: &Progress) -> bool {
        info!(
            "Step {:>12} | Cost: {:.4} | Best: {:.4} | {:.2}M/s",
            p.step,
            p.cost,
            p.best_cost,
            p.steps_per_sec() / 1_000_000.0
        );
        true
    }
}

/// Options for puzzles with a known zero-cost goal: stop at zero unless told otherwise.
pub fn puzzle_options(search: &SearchParams, temperature: f64) -> AnnealerOptions {
    let mut options = AnnealerOptions::from(search);
    options.temperature = search.temperature_or(temperature);
    if options.stop.target.is_none() {
        options.stop.target = Some(0.0);
    }
    options
}

/// Seconds of search when an open-ended problem gets no budget.
const DEFAULT_BUDGET_SECS: u64 = 10;

/// Options for problems without a natural target: always bounded.
pub fn budget_options(search: &SearchParams, temperature: f64) -> AnnealerOptions {
    let mut options = AnnealerOptions::from(search);
    options.temperature = search.temperature_or(temperature);
    if options.stop.max_steps.is_none() && options.stop.time_limit.is_none() {
        info!("⏱️  No budget given; searching for {}s.", DEFAULT_BUDGET_SECS);
        options.stop.time_limit = Some(Duration::from_secs(DEFAULT_BUDGET_SECS));
    }
    options
}
