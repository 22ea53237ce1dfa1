use super::configuration::Configuration;
use crate::error::{MetroResult, MetropolisError};
use crate::random::RandomSource;
use std::fmt::Debug;

/// A reversible local change to a state of type `S`.
///
/// `undo` must restore exactly the state `apply` started from.
pub trait Move<S> {
    fn apply(&self, state: &mut S);
    fn undo(&self, state: &mut S);
}

/// Proposes random moves. `None` means no legal move exists for this state.
pub trait MoveGenerator<S> {
    type Move: Move<S> + Debug;

    fn propose(&mut self, state: &S, rng: &mut RandomSource) -> Option<Self::Move>;
}

// --- Point mutation ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointMove<V> {
    pub site: usize,
    pub from: V,
    pub to: V,
}

impl<V: Copy> Move<Configuration<V>> for PointMove<V> {
    #[inline(always)]
    fn apply(&self, state: &mut Configuration<V>) {
        state.set(self.site, self.to);
    }

    #[inline(always)]
    fn undo(&self, state: &mut Configuration<V>) {
        state.set(self.site, self.from);
    }
}

/// Picks one mutable site and a different value for it from the domain.
#[derive(Debug, Clone)]
pub struct PointMutation<V> {
    domain: Vec<V>,
}

impl<V: Copy + PartialEq> PointMutation<V> {
    pub fn new(domain: &[V]) -> MetroResult<Self> {
        let mut unique: Vec<V> = Vec::with_capacity(domain.len());
        for &v in domain {
            if !unique.contains(&v) {
                unique.push(v);
            }
        }
        if unique.len() < 2 {
            return Err(MetropolisError::Config(
                "point mutation needs at least two distinct values".into(),
            ));
        }
        Ok(Self { domain: unique })
    }

    pub fn domain(&self) -> &[V] {
        &self.domain
    }
}

impl<V: Copy + PartialEq + Debug> MoveGenerator<Configuration<V>> for PointMutation<V> {
    type Move = PointMove<V>;

    fn propose(&mut self, state: &Configuration<V>, rng: &mut RandomSource) -> Option<PointMove<V>> {
        let sites = state.mutable_sites();
        if sites.is_empty() {
            return None;
        }
        let site = sites[rng.index(sites.len())];
        let from = state.get(site);
        // Terminates: the domain holds at least two distinct values.
        loop {
            let to = self.domain[rng.index(self.domain.len())];
            if to != from {
                return Some(PointMove { site, from, to });
            }
        }
    }
}

// --- Pair swap ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapMove {
    pub a: usize,
    pub b: usize,
}

impl<V: Copy> Move<Configuration<V>> for SwapMove {
    #[inline(always)]
    fn apply(&self, state: &mut Configuration<V>) {
        state.swap(self.a, self.b);
    }

    #[inline(always)]
    fn undo(&self, state: &mut Configuration<V>) {
        state.swap(self.a, self.b);
    }
}

/// Exchanges the values of two mutable sites holding different values.
/// Preserves the multiset of values.
#[derive(Debug, Clone)]
pub struct PairSwap {
    max_draws: usize,
}

const DEFAULT_SWAP_DRAWS: usize = 1024;

impl Default for PairSwap {
    fn default() -> Self {
        Self {
            max_draws: DEFAULT_SWAP_DRAWS,
        }
    }
}

impl PairSwap {
    /// Gives up after `max_draws` partner draws that all hit an equal value.
    pub fn with_max_draws(max_draws: usize) -> Self {
        Self {
            max_draws: max_draws.max(1),
        }
    }
}

impl<V: Copy + PartialEq> MoveGenerator<Configuration<V>> for PairSwap {
    type Move = SwapMove;

    fn propose(&mut self, state: &Configuration<V>, rng: &mut RandomSource) -> Option<SwapMove> {
        let sites = state.mutable_sites();
        if sites.len() < 2 {
            return None;
        }
        let a = sites[rng.index(sites.len())];
        let va = state.get(a);
        for _ in 0..self.max_draws {
            let b = sites[rng.index(sites.len())];
            if state.get(b) != va {
                return Some(SwapMove { a, b });
            }
        }
        None
    }
}

// --- Segment reversal ---

/// Reverses the tour positions `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReversalMove {
    pub start: usize,
    pub end: usize,
}

impl<V: Copy> Move<Configuration<V>> for ReversalMove {
    #[inline(always)]
    fn apply(&self, state: &mut Configuration<V>) {
        state.reverse(self.start, self.end);
    }

    #[inline(always)]
    fn undo(&self, state: &mut Configuration<V>) {
        state.reverse(self.start, self.end);
    }
}

/// 2-opt style reversal over a cyclic tour.
///
/// Positions before `first` are the anchor and never move. Over the
/// remaining span of `m` positions a segment of length `k + 1` is reversed
/// with `0 < k < m - 1`: length one is a no-op and the whole span only flips
/// the direction of travel.
#[derive(Debug, Clone)]
pub struct SegmentReversal {
    first: usize,
}

impl SegmentReversal {
    pub fn new(first: usize) -> Self {
        Self { first }
    }

    /// Position 0 anchored, as for a tour starting at a fixed city.
    pub fn anchored() -> Self {
        Self::new(1)
    }
}

impl<V: Copy> MoveGenerator<Configuration<V>> for SegmentReversal {
    type Move = ReversalMove;

    fn propose(&mut self, state: &Configuration<V>, rng: &mut RandomSource) -> Option<ReversalMove> {
        let n = state.len();
        let span = n.saturating_sub(self.first);
        if span < 3 {
            return None;
        }
        let k = rng.random_int(1, span - 2);
        let start = rng.random_int(self.first, n - 1 - k);
        Some(ReversalMove { start, end: start + k })
    }
}

// --- Lot transfer ---

/// Moves `amount` lots from one holding to another. The total is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferMove {
    pub from: usize,
    pub to: usize,
    pub amount: i64,
}

impl Move<Configuration<i64>> for TransferMove {
    #[inline(always)]
    fn apply(&self, state: &mut Configuration<i64>) {
        state.set(self.from, state.get(self.from) - self.amount);
        state.set(self.to, state.get(self.to) + self.amount);
    }

    #[inline(always)]
    fn undo(&self, state: &mut Configuration<i64>) {
        state.set(self.to, state.get(self.to) - self.amount);
        state.set(self.from, state.get(self.from) + self.amount);
    }
}

/// Shifts a fixed number of lots between two distinct mutable holdings.
///
/// When long-only, a donor must hold at least `amount` lots, so no holding
/// ever goes negative.
#[derive(Debug, Clone)]
pub struct LotTransfer {
    amount: i64,
    long_only: bool,
    max_draws: usize,
}

const DEFAULT_DONOR_DRAWS: usize = 1024;

impl LotTransfer {
    pub fn new(amount: i64) -> MetroResult<Self> {
        if amount < 1 {
            return Err(MetropolisError::Config(format!(
                "a transfer moves at least one lot, got {}",
                amount
            )));
        }
        Ok(Self {
            amount,
            long_only: false,
            max_draws: DEFAULT_DONOR_DRAWS,
        })
    }

    pub fn long_only(mut self) -> Self {
        self.long_only = true;
        self
    }

    pub fn is_long_only(&self) -> bool {
        self.long_only
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }
}

impl MoveGenerator<Configuration<i64>> for LotTransfer {
    type Move = TransferMove;

    fn propose(&mut self, state: &Configuration<i64>, rng: &mut RandomSource) -> Option<TransferMove> {
        let sites = state.mutable_sites();
        if sites.len() < 2 {
            return None;
        }
        let draws = if self.long_only { self.max_draws } else { 1 };
        let donor = (0..draws)
            .map(|_| rng.index(sites.len()))
            .find(|&k| !self.long_only || state.get(sites[k]) >= self.amount)?;

        // Uniform over the other sites.
        let mut k = rng.index(sites.len() - 1);
        if k >= donor {
            k += 1;
        }
        Some(TransferMove {
            from: sites[donor],
            to: sites[k],
            amount: self.amount,
        })
    }
}
