use super::{puzzle_options, CliLogger};
use crate::reports;
use clap::Args;
use metropolis::config::{ReduceParams, SearchParams};
use metropolis::generator;
use metropolis::geometry::ConstraintGroups;
use metropolis::scorer::sudoku::FILL_TEMPERATURE;
use metropolis::{MetroResult, RandomSource};
use tracing::info;

/// Reducer proposals spent before giving up when no cap is given.
const DEFAULT_MAX_PROPOSALS: u64 = 100_000;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Grid side; boxes are chosen as square as possible.
    #[arg(long, default_value_t = 9)]
    pub side: usize,

    #[command(flatten)]
    pub search: SearchParams,

    #[command(flatten)]
    pub reduce: ReduceParams,
}

pub fn run(
    args: &GenerateArgs,
    search: &SearchParams,
    reduce: &ReduceParams,
    rng: &mut RandomSource,
) -> MetroResult<()> {
    let groups = ConstraintGroups::sudoku_of_side(args.side)?;
    let options = puzzle_options(search, FILL_TEMPERATURE);
    let mut reducer_options = reduce.reducer_options(groups.size().len())?;
    if reducer_options.max_proposals.is_none() {
        info!(
            "⏱️  No proposal cap given; giving up after {} proposals.",
            DEFAULT_MAX_PROPOSALS
        );
        reducer_options.max_proposals = Some(DEFAULT_MAX_PROPOSALS);
    }

    info!(
        "🎲 Generating a {}x{} puzzle with {} clues",
        args.side, args.side, reducer_options.target
    );
    let puzzle = generator::generate_puzzle(&groups, options, reducer_options, rng, &CliLogger)?;

    reports::print_digits("SOLUTION", groups.size(), &puzzle.solution);
    reports::print_digits("PUZZLE", groups.size(), &puzzle.givens());
    info!("🏆 {} clues, uniquely solvable.", puzzle.clues.count());
    Ok(())
}
