use super::acceptance::{AcceptanceRule, DEFAULT_TABLE_SIZE, MAX_TABLE_SIZE};
use super::context::{SearchContext, StepOutcome};
use super::mutation::MoveGenerator;
use crate::config::{SearchParams, DEFAULT_TEMPERATURE};
use crate::error::{MetroResult, MetropolisError};
use crate::random::RandomSource;
use crate::scorer::{CostModel, Energy};
use std::time::{Duration, Instant};
use strum_macros::Display;
use tracing::{debug, warn};

/// Steps between wall-clock samples.
const TIME_CHECK_INTERVAL: u64 = 1024;

/// When to stop. Criteria combine: the first one met ends the run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopPolicy {
    /// Stop once the running cost is at or below this value.
    pub target: Option<f64>,
    pub max_steps: Option<u64>,
    pub time_limit: Option<Duration>,
}

impl StopPolicy {
    pub fn target(target: f64) -> Self {
        Self {
            target: Some(target),
            ..Default::default()
        }
    }

    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.target.is_none() && self.max_steps.is_none() && self.time_limit.is_none()
    }
}

/// Progress checkpoints at `first`, `first * factor`, `first * factor^2`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSchedule {
    pub first: u64,
    pub factor: u64,
}

impl Default for ReportSchedule {
    fn default() -> Self {
        Self {
            first: 1000,
            factor: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnealerOptions {
    pub temperature: f64,
    pub stop: StopPolicy,
    /// Explicit acceptance-table size. Falls back to the model's bound.
    pub max_delta: Option<usize>,
    pub report: ReportSchedule,
}

impl Default for AnnealerOptions {
    fn default() -> Self {
        Self::from(&SearchParams::default())
    }
}

impl From<&SearchParams> for AnnealerOptions {
    fn from(p: &SearchParams) -> Self {
        Self {
            temperature: p.temperature_or(DEFAULT_TEMPERATURE),
            stop: StopPolicy {
                target: p.target_cost,
                max_steps: p.max_steps,
                time_limit: p.time_limit.map(Duration::from_secs),
            },
            max_delta: p.max_delta,
            report: ReportSchedule {
                first: p.report_first,
                factor: p.report_factor,
            },
        }
    }
}

/// Snapshot shown to a `ProgressCallback` at each checkpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub step: u64,
    pub cost: f64,
    pub best_cost: f64,
    pub accepted: u64,
    pub elapsed: Duration,
}

impl Progress {
    pub fn steps_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.step as f64 / secs
        } else {
            0.0
        }
    }
}

/// A trait for receiving updates during annealing.
/// Boolean return value indicates if the search should continue (true) or abort (false).
pub trait ProgressCallback {
    fn on_progress(&self, progress: &Progress) -> bool;
}

impl ProgressCallback for () {
    fn on_progress(&self, _progress: &Progress) -> bool {
        true
    }
}

/// Best configuration seen so far and the step that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Incumbent<S, E> {
    pub config: S,
    pub cost: E,
    pub step: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Termination {
    #[strum(serialize = "converged")]
    Converged,
    #[strum(serialize = "budget expired")]
    BudgetExpired,
    #[strum(serialize = "cancelled")]
    Cancelled,
    #[strum(serialize = "no legal moves")]
    NoMoves,
}

#[derive(Debug, Clone)]
pub struct AnnealOutcome<S, E> {
    pub best: Incumbent<S, E>,
    /// Configuration the chain was in when it stopped.
    pub current: S,
    pub current_cost: E,
    pub steps: u64,
    pub accepted: u64,
    pub elapsed: Duration,
    pub termination: Termination,
}

impl<S, E: Energy> AnnealOutcome<S, E> {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// Fixed-temperature Metropolis search over any state, move generator and cost model.
#[derive(Debug, Clone)]
pub struct Annealer {
    options: AnnealerOptions,
}

impl Annealer {
    pub fn new(options: AnnealerOptions) -> MetroResult<Self> {
        if !options.temperature.is_finite() || options.temperature < 0.0 {
            return Err(MetropolisError::Config(format!(
                "temperature must be finite and non-negative, got {}",
                options.temperature
            )));
        }
        if options.report.first == 0 || options.report.factor < 2 {
            return Err(MetropolisError::Config(format!(
                "report schedule needs first > 0 and factor >= 2, got {:?}",
                options.report
            )));
        }
        if let Some(size) = options.max_delta {
            if size > MAX_TABLE_SIZE {
                return Err(MetropolisError::Config(format!(
                    "max delta {} exceeds the acceptance table limit {}",
                    size, MAX_TABLE_SIZE
                )));
            }
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &AnnealerOptions {
        &self.options
    }

    pub fn run<S, G, C, CB>(
        &self,
        initial: S,
        model: &C,
        moves: &mut G,
        rng: &mut RandomSource,
        callback: &CB,
    ) -> MetroResult<AnnealOutcome<S, C::Energy>>
    where
        S: Clone + PartialEq,
        G: MoveGenerator<S>,
        C: CostModel<S, G::Move>,
        CB: ProgressCallback + ?Sized,
    {
        let opts = &self.options;
        let table_size = opts
            .max_delta
            .or_else(|| model.max_delta())
            .unwrap_or(DEFAULT_TABLE_SIZE)
            .min(MAX_TABLE_SIZE);
        let rule = AcceptanceRule::new(opts.temperature, table_size);

        let initial_cost = model.cost(&initial);
        let mut best = Incumbent {
            config: initial.clone(),
            cost: initial_cost,
            step: 0,
        };
        let mut ctx = SearchContext::new(initial, initial_cost, rule, rng);

        if opts.stop.is_unbounded() {
            warn!("No stop criterion configured; the search runs until cancelled.");
        }
        debug!(
            "Annealing at T={} from cost {} (table size {})",
            opts.temperature, initial_cost, table_size
        );

        let start = Instant::now();
        let mut next_report = opts.report.first;
        let mut warned_table = false;

        let termination = loop {
            if let Some(target) = opts.stop.target {
                if ctx.cost().as_f64() <= target {
                    break Termination::Converged;
                }
            }
            if let Some(max) = opts.stop.max_steps {
                if ctx.steps() >= max {
                    break Termination::BudgetExpired;
                }
            }
            if let Some(limit) = opts.stop.time_limit {
                if ctx.steps() % TIME_CHECK_INTERVAL == 0 && start.elapsed() >= limit {
                    break Termination::BudgetExpired;
                }
            }

            match ctx.step(model, moves)? {
                StepOutcome::NoMove => break Termination::NoMoves,
                StepOutcome::Accepted(_) => {
                    if ctx.cost() < best.cost {
                        best = Incumbent {
                            config: ctx.config().clone(),
                            cost: ctx.cost(),
                            step: ctx.steps(),
                        };
                    }
                }
                StepOutcome::Rejected(_) => {}
            }

            if !warned_table && ctx.outside_table() > 0 {
                warn!(
                    "Uphill delta exceeded the acceptance table (size {}); using exp() directly.",
                    table_size
                );
                warned_table = true;
            }

            if ctx.steps() == next_report {
                let progress = Progress {
                    step: ctx.steps(),
                    cost: ctx.cost().as_f64(),
                    best_cost: best.cost.as_f64(),
                    accepted: ctx.accepted(),
                    elapsed: start.elapsed(),
                };
                next_report = next_report.saturating_mul(opts.report.factor);
                if !callback.on_progress(&progress) {
                    break Termination::Cancelled;
                }
            }
        };

        let elapsed = start.elapsed();
        let (steps, accepted, current_cost) = (ctx.steps(), ctx.accepted(), ctx.cost());
        debug!(
            "Annealing {} after {} steps ({} accepted), best {} at step {}",
            termination, steps, accepted, best.cost, best.step
        );

        Ok(AnnealOutcome {
            best,
            current: ctx.into_config(),
            current_cost,
            steps,
            accepted,
            elapsed,
            termination,
        })
    }
}
