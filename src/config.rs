use crate::error::{MetroResult, MetropolisError};
use crate::generator::ReducerOptions;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Temperature used when neither the command line nor a config file sets one.
pub const DEFAULT_TEMPERATURE: f64 = 0.39;

/// File-backed configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchParams,
    pub reduce: ReduceParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Fixed annealing temperature. Each puzzle has its own default.
    #[arg(short = 't', long)]
    pub temperature: Option<f64>,

    /// Stop once the cost reaches this value.
    #[arg(long)]
    pub target_cost: Option<f64>,

    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Wall-clock budget in seconds.
    #[arg(short = 'T', long)]
    pub time_limit: Option<u64>,

    /// Size of the precomputed acceptance table.
    #[arg(long)]
    pub max_delta: Option<usize>,

    #[arg(long, default_value_t = 1000)]
    pub report_first: u64,

    #[arg(long, default_value_t = 10)]
    pub report_factor: u64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            temperature: None,
            target_cost: None,
            max_steps: None,
            time_limit: None,
            max_delta: None,
            report_first: 1000,
            report_factor: 10,
        }
    }
}

impl SearchParams {
    pub fn temperature_or(&self, default: f64) -> f64 {
        self.temperature.unwrap_or(default)
    }

    /// Copies every argument the user actually typed over the values loaded from file.
    pub fn merge_from_cli(&mut self, cli: &SearchParams, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(temperature);
        update_if_present!(target_cost);
        update_if_present!(max_steps);
        update_if_present!(time_limit);
        update_if_present!(max_delta);
        update_if_present!(report_first);
        update_if_present!(report_factor);
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReduceParams {
    /// 0 (easiest) to 10 (hardest); a 9x9 grid keeps 35 - difficulty clues.
    #[arg(short = 'd', long, default_value_t = 5)]
    pub difficulty: u8,

    /// Exact clue count to reduce to. Overrides difficulty.
    #[arg(long)]
    pub target_clues: Option<usize>,

    /// Chance of accepting a proposal that restores one clue.
    #[arg(long, default_value_t = 0.1581)]
    pub restore_probability_single: f64,

    /// Chance of accepting a proposal that restores a symmetric pair.
    #[arg(long, default_value_t = 0.0250)]
    pub restore_probability_pair: f64,

    #[arg(long)]
    pub max_proposals: Option<u64>,
}

impl Default for ReduceParams {
    fn default() -> Self {
        Self {
            difficulty: 5,
            target_clues: None,
            restore_probability_single: 0.1581,
            restore_probability_pair: 0.0250,
            max_proposals: None,
        }
    }
}

/// Clue count a 9x9 grid keeps at difficulty zero.
const EASIEST_CLUES_9X9: usize = 35;
const MAX_DIFFICULTY: u8 = 10;

impl ReduceParams {
    /// Target clue count for a grid of `sites` cells.
    ///
    /// Difficulty scales the 9x9 mapping to other sizes by cell count.
    pub fn target_for(&self, sites: usize) -> MetroResult<usize> {
        if let Some(t) = self.target_clues {
            return Ok(t);
        }
        if self.difficulty > MAX_DIFFICULTY {
            return Err(MetropolisError::Config(format!(
                "difficulty must be in 0..={}, got {}",
                MAX_DIFFICULTY, self.difficulty
            )));
        }
        let clues_9x9 = EASIEST_CLUES_9X9 - self.difficulty as usize;
        Ok(((clues_9x9 * sites) as f64 / 81.0).round() as usize)
    }

    pub fn reducer_options(&self, sites: usize) -> MetroResult<ReducerOptions> {
        let options = ReducerOptions {
            target: self.target_for(sites)?,
            restore_single: self.restore_probability_single,
            restore_pair: self.restore_probability_pair,
            max_proposals: self.max_proposals,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn merge_from_cli(&mut self, cli: &ReduceParams, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(difficulty);
        update_if_present!(target_clues);
        update_if_present!(restore_probability_single);
        update_if_present!(restore_probability_pair);
        update_if_present!(max_proposals);
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> MetroResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
