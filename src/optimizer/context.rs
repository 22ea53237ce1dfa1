use super::acceptance::AcceptanceRule;
use super::mutation::{Move, MoveGenerator};
use crate::error::MetroResult;
use crate::random::RandomSource;
use crate::scorer::{CostModel, Energy};

#[cfg(debug_assertions)]
const AUDIT_INTERVAL: u64 = 4096;

/// Result of a single Metropolis step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome<E> {
    Accepted(E),
    Rejected(E),
    /// The generator had no legal move to offer.
    NoMove,
}

/// Everything one chain needs between steps: the configuration, its running
/// cost, the random stream and the acceptance rule.
pub struct SearchContext<'r, S, E> {
    config: S,
    cost: E,
    rule: AcceptanceRule,
    rng: &'r mut RandomSource,
    steps: u64,
    accepted: u64,
    outside_table: u64,
}

impl<'r, S, E: Energy> SearchContext<'r, S, E> {
    /// `cost` must be the full cost of `config`.
    pub fn new(config: S, cost: E, rule: AcceptanceRule, rng: &'r mut RandomSource) -> Self {
        Self {
            config,
            cost,
            rule,
            rng,
            steps: 0,
            accepted: 0,
            outside_table: 0,
        }
    }

    pub fn config(&self) -> &S {
        &self.config
    }

    pub fn into_config(self) -> S {
        self.config
    }

    pub fn cost(&self) -> E {
        self.cost
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Uphill deltas that had to bypass the acceptance table.
    pub fn outside_table(&self) -> u64 {
        self.outside_table
    }

    pub fn rule(&self) -> &AcceptanceRule {
        &self.rule
    }

    /// Propose, evaluate against the current state, then accept or discard.
    ///
    /// The delta is computed before the move is applied, so a rejection
    /// leaves the configuration untouched.
    pub fn step<G, C>(&mut self, model: &C, moves: &mut G) -> MetroResult<StepOutcome<E>>
    where
        S: Clone + PartialEq,
        G: MoveGenerator<S>,
        C: CostModel<S, G::Move, Energy = E>,
    {
        let Some(mv) = moves.propose(&self.config, self.rng) else {
            return Ok(StepOutcome::NoMove);
        };
        self.steps += 1;

        #[cfg(debug_assertions)]
        if self.steps % AUDIT_INTERVAL == 0 {
            crate::scorer::verify_move(model, &mut self.config, &mv)?;
        }

        let delta = model.delta(&self.config, &mv);
        let verdict = self.rule.judge(delta, self.rng);
        if verdict.outside_table() {
            self.outside_table += 1;
        }

        if verdict.accepted() {
            mv.apply(&mut self.config);
            self.cost = self.cost + delta;
            self.accepted += 1;
            Ok(StepOutcome::Accepted(delta))
        } else {
            Ok(StepOutcome::Rejected(delta))
        }
    }
}
