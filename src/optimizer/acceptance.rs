use crate::random::RandomSource;
use crate::scorer::Energy;

/// Default table length when neither the caller nor the model bounds the delta.
pub const DEFAULT_TABLE_SIZE: usize = 20;

/// Largest delta the table will precompute. Bigger bounds fall back to `exp()`.
pub const MAX_TABLE_SIZE: usize = 1 << 20;

/// Precomputed `exp(-d / T)` for integer deltas `0..=max_delta`.
#[derive(Debug, Clone)]
pub struct AcceptanceTable {
    temperature: f64,
    probs: Vec<f64>,
}

impl AcceptanceTable {
    /// `max_delta` is clamped to [`MAX_TABLE_SIZE`].
    pub fn new(temperature: f64, max_delta: usize) -> Self {
        let probs = if temperature > 0.0 {
            (0..=max_delta.min(MAX_TABLE_SIZE))
                .map(|d| (-(d as f64) / temperature).exp())
                .collect()
        } else {
            Vec::new()
        };
        Self { temperature, probs }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Largest delta with a precomputed entry.
    pub fn max_delta(&self) -> Option<usize> {
        self.probs.len().checked_sub(1)
    }

    #[inline(always)]
    pub fn lookup(&self, delta: usize) -> Option<f64> {
        self.probs.get(delta).copied()
    }

    /// Acceptance probability of an uphill move of size `delta`.
    ///
    /// Deltas past the end of the table are computed directly, never rounded to zero.
    #[inline(always)]
    pub fn probability(&self, delta: f64) -> f64 {
        if delta <= 0.0 {
            return 1.0;
        }
        if self.temperature <= 0.0 {
            return 0.0;
        }
        (-delta / self.temperature).exp()
    }
}

/// Outcome of one acceptance decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject,
    /// Accepted through the direct formula because the delta overflowed the table.
    AcceptOutsideTable,
    RejectOutsideTable,
}

impl Verdict {
    pub fn accepted(self) -> bool {
        matches!(self, Verdict::Accept | Verdict::AcceptOutsideTable)
    }

    pub fn outside_table(self) -> bool {
        matches!(self, Verdict::AcceptOutsideTable | Verdict::RejectOutsideTable)
    }
}

/// The Metropolis criterion at a fixed temperature.
///
/// Non-positive deltas are always accepted. At `T == 0` every uphill move is
/// rejected and the search becomes greedy, which may stall in a local minimum.
#[derive(Debug, Clone)]
pub struct AcceptanceRule {
    table: AcceptanceTable,
}

impl AcceptanceRule {
    pub fn new(temperature: f64, max_delta: usize) -> Self {
        Self {
            table: AcceptanceTable::new(temperature, max_delta),
        }
    }

    pub fn table(&self) -> &AcceptanceTable {
        &self.table
    }

    pub fn temperature(&self) -> f64 {
        self.table.temperature
    }

    /// Draws one uniform variate only for uphill moves at positive temperature.
    #[inline(always)]
    pub fn judge<E: Energy>(&self, delta: E, rng: &mut RandomSource) -> Verdict {
        if delta <= E::ZERO {
            return Verdict::Accept;
        }
        if self.table.temperature <= 0.0 {
            return Verdict::Reject;
        }

        let u = rng.uniform();
        match delta.table_index().and_then(|d| self.table.lookup(d)) {
            Some(p) => {
                if u <= p {
                    Verdict::Accept
                } else {
                    Verdict::Reject
                }
            }
            None => {
                let p = self.table.probability(delta.as_f64());
                let continuous = delta.table_index().is_none();
                match (u <= p, continuous) {
                    (true, true) => Verdict::Accept,
                    (false, true) => Verdict::Reject,
                    (true, false) => Verdict::AcceptOutsideTable,
                    (false, false) => Verdict::RejectOutsideTable,
                }
            }
        }
    }
}
