pub mod crossword;
pub mod image;
pub mod kenken;
pub mod loader;
pub mod magic;
pub mod portfolio;
pub mod sudoku;
pub mod tour;

use crate::error::{MetroResult, MetropolisError};
use crate::optimizer::mutation::Move;
use std::fmt::{Debug, Display};
use std::ops::{Add, Sub};

/// Scalar cost type. Integers for discrete puzzles, floats for continuous ones.
pub trait Energy:
    Copy + PartialOrd + Debug + Display + Add<Output = Self> + Sub<Output = Self> + Send + Sync + 'static
{
    const ZERO: Self;

    fn as_f64(self) -> f64;

    /// Index into a precomputed acceptance table, for integer energies only.
    fn table_index(self) -> Option<usize>;

    /// Equality up to accumulated rounding error.
    fn approx_eq(self, other: Self) -> bool;
}

impl Energy for i64 {
    const ZERO: Self = 0;

    #[inline(always)]
    fn as_f64(self) -> f64 {
        self as f64
    }

    #[inline(always)]
    fn table_index(self) -> Option<usize> {
        usize::try_from(self).ok()
    }

    fn approx_eq(self, other: Self) -> bool {
        self == other
    }
}

impl Energy for f64 {
    const ZERO: Self = 0.0;

    #[inline(always)]
    fn as_f64(self) -> f64 {
        self
    }

    #[inline(always)]
    fn table_index(self) -> Option<usize> {
        None
    }

    fn approx_eq(self, other: Self) -> bool {
        let scale = 1.0f64.max(self.abs()).max(other.abs());
        (self - other).abs() <= 1e-9 * scale
    }
}

/// Scores configurations of type `S` under moves of type `M`.
///
/// `delta` is evaluated against the state *before* the move and must equal
/// `cost(after) - cost(before)` while only reading the sites and groups the
/// move touches.
pub trait CostModel<S, M> {
    type Energy: Energy;

    fn cost(&self, state: &S) -> Self::Energy;

    fn delta(&self, state: &S, mv: &M) -> Self::Energy;

    /// Largest positive integer delta one move can produce, if bounded.
    fn max_delta(&self) -> Option<usize> {
        None
    }
}

/// Applies `mv`, checks the delta against a full recomputation, undoes it and
/// checks the state came back bit-for-bit.
pub fn verify_move<S, M, C>(model: &C, state: &mut S, mv: &M) -> MetroResult<()>
where
    S: Clone + PartialEq,
    M: Move<S> + Debug,
    C: CostModel<S, M>,
{
    let before = state.clone();
    let cost_before = model.cost(state);
    let predicted = model.delta(state, mv);

    mv.apply(state);
    let actual = model.cost(state) - cost_before;
    mv.undo(state);

    if !predicted.approx_eq(actual) {
        return Err(MetropolisError::Invariant(format!(
            "delta {} for {:?} disagrees with recomputed {}",
            predicted, mv, actual
        )));
    }
    if *state != before {
        return Err(MetropolisError::Invariant(format!(
            "undo of {:?} did not restore the configuration",
            mv
        )));
    }
    Ok(())
}
