pub mod trail;

use self::trail::{Pass, Phase, Trail};
use crate::error::{MetroResult, MetropolisError};
use crate::generator::ClueSet;
use crate::geometry::ConstraintGroups;
use tracing::trace;

/// Decides whether a clue subset of a known solution admits exactly one completion.
///
/// The search is exhaustive backtracking with a most-constrained-site
/// heuristic. It first completes the grid once (which must succeed, since
/// the clues come from a valid solution), then keeps backtracking from that
/// completion: a second completion means the clues are ambiguous.
#[derive(Debug, Clone, Copy)]
pub struct UniquenessOracle<'g> {
    groups: &'g ConstraintGroups,
}

impl<'g> UniquenessOracle<'g> {
    pub fn new(groups: &'g ConstraintGroups) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &'g ConstraintGroups {
        self.groups
    }

    pub fn is_unique(&self, clues: &ClueSet, solution: &[u8]) -> MetroResult<bool> {
        self.is_unique_mask(clues.mask(), solution)
    }

    pub fn is_unique_mask(&self, mask: &[bool], solution: &[u8]) -> MetroResult<bool> {
        Ok(self.count_completions(mask, solution, 2)? == 1)
    }

    /// Counts completions of the clues, stopping early at `limit`.
    ///
    /// Errors if the clues have no completion at all, which cannot happen
    /// when `solution` is valid.
    pub fn count_completions(
        &self,
        mask: &[bool],
        solution: &[u8],
        limit: usize,
    ) -> MetroResult<usize> {
        let givens = self.givens(mask, solution)?;
        let mut trail = Trail::new(self.groups, &givens).ok_or_else(|| {
            MetropolisError::Invariant("clues taken from the solution clash with each other".into())
        })?;

        if trail.run(Phase::Advance) == Pass::Exhausted {
            return Err(MetropolisError::Invariant(
                "clues taken from a solution have no completion".into(),
            ));
        }

        let mut found = 1;
        while found < limit && trail.run(Phase::Retreat) == Pass::Complete {
            found += 1;
        }
        trace!("{} clues -> {} completion(s)", givens.iter().filter(|&&v| v != 0).count(), found);
        Ok(found)
    }

    /// First completion of a partially filled grid, `0` marking open sites.
    ///
    /// Works on arbitrary givens, not just subsets of a known solution.
    pub fn solve(&self, givens: &[u8]) -> MetroResult<Option<Vec<u8>>> {
        self.check_len(givens.len())?;
        let Some(mut trail) = Trail::new(self.groups, givens) else {
            return Ok(None);
        };
        Ok(match trail.run(Phase::Advance) {
            Pass::Complete => Some(trail.values().to_vec()),
            Pass::Exhausted => None,
        })
    }

    fn givens(&self, mask: &[bool], solution: &[u8]) -> MetroResult<Vec<u8>> {
        self.check_len(mask.len())?;
        self.check_len(solution.len())?;
        Ok(mask
            .iter()
            .zip(solution)
            .map(|(&clue, &v)| if clue { v } else { 0 })
            .collect())
    }

    fn check_len(&self, len: usize) -> MetroResult<()> {
        let expected = self.groups.size().len();
        if len != expected {
            return Err(MetropolisError::Input(format!(
                "expected {} sites, got {}",
                expected, len
            )));
        }
        Ok(())
    }
}
