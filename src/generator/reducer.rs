use super::clues::{ClueFlip, ClueSet};
use crate::error::{MetroResult, MetropolisError};
use crate::optimizer::Move;
use crate::oracle::UniquenessOracle;
use crate::random::RandomSource;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct ReducerOptions {
    /// Stop once the clue count is at or below this.
    pub target: usize,
    /// Acceptance probability for restoring a single (center) clue.
    pub restore_single: f64,
    /// Acceptance probability for restoring a symmetric pair.
    pub restore_pair: f64,
    /// Give up after this many proposals.
    pub max_proposals: Option<u64>,
}

impl Default for ReducerOptions {
    fn default() -> Self {
        Self {
            target: 30,
            restore_single: 0.1581,
            restore_pair: 0.0250,
            max_proposals: None,
        }
    }
}

impl ReducerOptions {
    pub fn validate(&self) -> MetroResult<()> {
        for (name, p) in [
            ("restore_single", self.restore_single),
            ("restore_pair", self.restore_pair),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(MetropolisError::Config(format!(
                    "{} must be a probability, got {}",
                    name, p
                )));
            }
        }
        Ok(())
    }
}

/// What one proposal did to the clue set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReductionStep {
    /// Clues removed and the puzzle is still unique.
    Reduced { site: usize, removed: usize },
    /// Removal rejected: the puzzle would become ambiguous.
    Ambiguous { site: usize },
    /// Clues put back by the random uphill rule.
    Restored { site: usize, added: usize },
    /// Restoration rejected by the random uphill rule.
    Kept { site: usize },
}

/// Metropolis-style walk over symmetric clue sets that only ever accepts
/// removals the uniqueness oracle approves.
pub struct ClueReducer<'g> {
    oracle: UniquenessOracle<'g>,
    options: ReducerOptions,
}

impl<'g> ClueReducer<'g> {
    pub fn new(oracle: UniquenessOracle<'g>, options: ReducerOptions) -> MetroResult<Self> {
        options.validate()?;
        Ok(Self { oracle, options })
    }

    pub fn options(&self) -> &ReducerOptions {
        &self.options
    }

    /// One proposal: flip a random symmetric pair, then gate the result.
    ///
    /// The clue set is uniquely solvable before and after the call.
    pub fn step(
        &self,
        clues: &mut ClueSet,
        solution: &[u8],
        rng: &mut RandomSource,
    ) -> MetroResult<ReductionStep> {
        let sites = clues.canonical_sites();
        let site = rng.random_int(*sites.start(), *sites.end());
        let delta = clues.flip_delta(site);
        let flip = ClueFlip { site };

        if delta < 0 {
            flip.apply(clues);
            if self.oracle.is_unique(clues, solution)? {
                Ok(ReductionStep::Reduced {
                    site,
                    removed: delta.unsigned_abs() as usize,
                })
            } else {
                flip.undo(clues);
                Ok(ReductionStep::Ambiguous { site })
            }
        } else {
            let p = if delta == 1 {
                self.options.restore_single
            } else {
                self.options.restore_pair
            };
            if rng.uniform() <= p {
                flip.apply(clues);
                Ok(ReductionStep::Restored {
                    site,
                    added: delta as usize,
                })
            } else {
                Ok(ReductionStep::Kept { site })
            }
        }
    }

    /// Starts from every site as a clue and walks down to the target count.
    pub fn reduce(&self, solution: &[u8], rng: &mut RandomSource) -> MetroResult<ClueSet> {
        let size = self.oracle.groups().size();
        if !self.oracle.groups().is_solution(solution) {
            return Err(MetropolisError::Input(
                "clue reduction needs a complete, valid solution".into(),
            ));
        }

        let mut clues = ClueSet::full(size);
        let mut proposals = 0u64;
        let mut rejected = 0u64;
        while clues.count() > self.options.target {
            if let Some(max) = self.options.max_proposals {
                if proposals >= max {
                    return Err(MetropolisError::Config(format!(
                        "no {}-clue puzzle after {} proposals (stuck at {})",
                        self.options.target,
                        proposals,
                        clues.count()
                    )));
                }
            }
            proposals += 1;
            match self.step(&mut clues, solution, rng)? {
                ReductionStep::Reduced { .. } => {
                    debug!("Clues: {:3} (proposal {})", clues.count(), proposals)
                }
                ReductionStep::Ambiguous { .. } => rejected += 1,
                ReductionStep::Restored { .. } | ReductionStep::Kept { .. } => {}
            }
        }

        info!(
            "Reduced to {} clues in {} proposals ({} ambiguous removals rejected)",
            clues.count(),
            proposals,
            rejected
        );
        Ok(clues)
    }
}
