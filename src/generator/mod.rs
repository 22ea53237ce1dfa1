pub mod clues;
pub mod reducer;

pub use self::clues::{ClueFlip, ClueSet};
pub use self::reducer::{ClueReducer, ReducerOptions, ReductionStep};

use crate::error::{MetroResult, MetropolisError};
use crate::geometry::ConstraintGroups;
use crate::optimizer::{Annealer, AnnealerOptions, PointMutation, ProgressCallback, StopPolicy};
use crate::oracle::UniquenessOracle;
use crate::random::RandomSource;
use crate::scorer::sudoku::{self, SudokuCost};
use tracing::info;

/// A generated puzzle: the full solution and the clues that pin it down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPuzzle {
    pub solution: Vec<u8>,
    pub clues: ClueSet,
}

impl GeneratedPuzzle {
    /// Solution digits at clue sites, `0` elsewhere.
    pub fn givens(&self) -> Vec<u8> {
        self.solution
            .iter()
            .zip(self.clues.mask())
            .map(|(&v, &clue)| if clue { v } else { 0 })
            .collect()
    }
}

/// Anneals a clue-less grid down to zero conflicts.
///
/// `options.stop.target` is forced to zero. Without a step or time budget
/// the search runs until it finds a solution.
pub fn generate_solution<CB: ProgressCallback + ?Sized>(
    groups: &ConstraintGroups,
    mut options: AnnealerOptions,
    rng: &mut RandomSource,
    callback: &CB,
) -> MetroResult<Vec<u8>> {
    options.stop = StopPolicy {
        target: Some(0.0),
        ..options.stop
    };
    let annealer = Annealer::new(options)?;

    let start = sudoku::random_start(groups, &vec![0; groups.size().len()], rng)?;
    let model = SudokuCost::for_config(groups, &start)?;
    let mut moves = PointMutation::new(&groups.domain())?;

    let outcome = annealer.run(start, &model, &mut moves, rng, callback)?;
    if !outcome.converged() {
        return Err(MetropolisError::Config(format!(
            "no solution found ({} after {} steps, best cost {})",
            outcome.termination, outcome.steps, outcome.best.cost
        )));
    }
    info!(
        "Solution found after {} steps in {:.2?}",
        outcome.steps, outcome.elapsed
    );

    let solution = outcome.current.into_sites();
    if !groups.is_solution(&solution) {
        return Err(MetropolisError::Invariant(
            "annealer converged on a grid that is not a solution".into(),
        ));
    }
    Ok(solution)
}

/// Full pipeline: anneal a solution, then reduce its clues.
pub fn generate_puzzle<CB: ProgressCallback + ?Sized>(
    groups: &ConstraintGroups,
    options: AnnealerOptions,
    reduce: ReducerOptions,
    rng: &mut RandomSource,
    callback: &CB,
) -> MetroResult<GeneratedPuzzle> {
    let solution = generate_solution(groups, options, rng, callback)?;
    let reducer = ClueReducer::new(UniquenessOracle::new(groups), reduce)?;
    let clues = reducer.reduce(&solution, rng)?;
    Ok(GeneratedPuzzle { solution, clues })
}
