use super::{puzzle_options, CliLogger};
use crate::reports;
use clap::Args;
use metropolis::config::SearchParams;
use metropolis::geometry::ConstraintGroups;
use metropolis::optimizer::{Annealer, PointMutation};
use metropolis::oracle::UniquenessOracle;
use metropolis::scorer::loader;
use metropolis::scorer::sudoku::{self, SudokuCost, DEFAULT_CLUE_WEIGHT, SOLVE_TEMPERATURE};
use metropolis::{MetroResult, RandomSource};
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    /// Grid file, `0` or `.` for blanks.
    #[arg(short, long)]
    pub puzzle: String,

    #[arg(long, default_value_t = DEFAULT_CLUE_WEIGHT)]
    pub clue_weight: i64,

    #[command(flatten)]
    pub search: SearchParams,
}

pub fn run(args: &SolveArgs, search: &SearchParams, rng: &mut RandomSource) -> MetroResult<()> {
    info!("📂 Loading Sudoku: {}", args.puzzle);
    let (n, givens) = loader::load_sudoku(&args.puzzle)?;
    let groups = ConstraintGroups::sudoku_of_side(n)?;
    reports::print_digits("PUZZLE", groups.size(), &givens);

    let start = sudoku::random_start(&groups, &givens, rng)?;
    let model = SudokuCost::new(&groups, start.fixed_mask(), args.clue_weight)?;
    let mut moves = PointMutation::new(&groups.domain())?;
    let annealer = Annealer::new(puzzle_options(search, SOLVE_TEMPERATURE))?;

    info!(
        "🔥 Annealing {} open cells at T={}",
        start.mutable_sites().len(),
        annealer.options().temperature
    );
    let outcome = annealer.run(start, &model, &mut moves, rng, &CliLogger)?;
    reports::print_run_summary(&outcome);

    let best = outcome.best.config.sites();
    reports::print_digits("BEST GRID", groups.size(), best);

    if groups.is_solution(best) {
        let clues: Vec<bool> = givens.iter().map(|&v| v != 0).collect();
        if UniquenessOracle::new(&groups).is_unique_mask(&clues, best)? {
            info!("✅ Solved. The clues admit exactly one solution.");
        } else {
            warn!("✅ Solved, but the clues admit more than one solution.");
        }
    } else {
        warn!("❌ No solution within budget (best cost {}).", outcome.best.cost);
    }
    Ok(())
}
