use super::{puzzle_options, CliLogger};
use crate::reports;
use clap::Args;
use metropolis::config::SearchParams;
use metropolis::geometry::GridSize;
use metropolis::optimizer::{Annealer, PairSwap};
use metropolis::scorer::magic::{MagicSquareCost, DEFAULT_TEMPERATURE};
use metropolis::{MetroResult, RandomSource};
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct MagicArgs {
    #[arg(short = 'n', long, default_value_t = 4)]
    pub order: usize,

    #[command(flatten)]
    pub search: SearchParams,
}

pub fn run(args: &MagicArgs, search: &SearchParams, rng: &mut RandomSource) -> MetroResult<()> {
    let model = MagicSquareCost::new(args.order)?;
    info!(
        "✨ Order {} magic square, line sum {}",
        args.order,
        model.magic_constant()
    );

    let annealer = Annealer::new(puzzle_options(search, DEFAULT_TEMPERATURE))?;
    let outcome = annealer.run(
        model.random_start(rng),
        &model,
        &mut PairSwap::default(),
        rng,
        &CliLogger,
    )?;

    reports::print_run_summary(&outcome);
    reports::print_digits(
        "MAGIC SQUARE",
        GridSize::square(args.order),
        outcome.best.config.sites(),
    );
    if outcome.best.cost == 0 {
        info!("✅ Every line sums to {}.", model.magic_constant());
    } else {
        warn!("❌ Lines miss the target by {} in total.", outcome.best.cost);
    }
    Ok(())
}
