use super::{puzzle_options, CliLogger};
use crate::reports;
use clap::Args;
use metropolis::config::SearchParams;
use metropolis::optimizer::{Annealer, PairSwap};
use metropolis::scorer::kenken::{KenKenCost, DEFAULT_TEMPERATURE};
use metropolis::scorer::loader;
use metropolis::{MetroResult, RandomSource};
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct KenKenArgs {
    /// Region map followed by one `<region> <op><target>` rule per region.
    #[arg(short, long)]
    pub puzzle: String,

    #[command(flatten)]
    pub search: SearchParams,
}

pub fn run(args: &KenKenArgs, search: &SearchParams, rng: &mut RandomSource) -> MetroResult<()> {
    info!("📂 Loading KenKen: {}", args.puzzle);
    let puzzle = loader::load_kenken(&args.puzzle)?;
    info!("   {}x{} grid, {} cages", puzzle.n(), puzzle.n(), puzzle.cages().len());

    let model = KenKenCost::new(&puzzle);
    let annealer = Annealer::new(puzzle_options(search, DEFAULT_TEMPERATURE))?;
    let outcome = annealer.run(
        puzzle.random_start(rng),
        &model,
        &mut PairSwap::default(),
        rng,
        &CliLogger,
    )?;

    reports::print_run_summary(&outcome);
    reports::print_digits("BEST GRID", puzzle.size(), outcome.best.config.sites());
    if outcome.best.cost == 0 {
        info!("✅ Solved.");
    } else {
        warn!("❌ Best grid still violates {} constraint(s).", outcome.best.cost);
    }
    Ok(())
}
