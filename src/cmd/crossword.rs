use super::{puzzle_options, CliLogger};
use crate::reports;
use clap::Args;
use metropolis::config::SearchParams;
use metropolis::geometry::GridSize;
use metropolis::optimizer::{Annealer, PointMutation};
use metropolis::scorer::crossword::{CrosswordCost, DEFAULT_TEMPERATURE};
use metropolis::scorer::loader;
use metropolis::{MetroResult, RandomSource};
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct CrosswordArgs {
    /// Word list, one word per line.
    #[arg(short = 'w', long)]
    pub dictionary: String,

    /// Side of the word square.
    #[arg(long, default_value_t = 5)]
    pub size: usize,

    #[command(flatten)]
    pub search: SearchParams,
}

pub fn run(args: &CrosswordArgs, search: &SearchParams, rng: &mut RandomSource) -> MetroResult<()> {
    info!("📂 Loading Dictionary: {}", args.dictionary);
    let words = loader::load_dictionary(&args.dictionary, args.size)?;
    let model = CrosswordCost::new(args.size, words)?;
    info!(
        "   {} words of length {}, {} letters",
        model.words().len(),
        args.size,
        model.alphabet().len()
    );

    let mut moves = PointMutation::new(model.alphabet())?;
    let annealer = Annealer::new(puzzle_options(search, DEFAULT_TEMPERATURE))?;
    let outcome = annealer.run(model.random_start(rng), &model, &mut moves, rng, &CliLogger)?;

    reports::print_run_summary(&outcome);
    reports::print_letters(
        "WORD SQUARE",
        GridSize::square(args.size),
        outcome.best.config.sites(),
    );
    if outcome.best.cost == 0 {
        info!("✅ Every row and column is a word.");
    } else {
        warn!("❌ {} letter(s) away from a word square.", outcome.best.cost);
    }
    Ok(())
}
