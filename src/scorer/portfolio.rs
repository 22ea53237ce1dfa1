use super::CostModel;
use crate::error::{MetroResult, MetropolisError};
use crate::optimizer::{Configuration, TransferMove};

/// Zero temperature: plain descent on a convex surface.
pub const DEFAULT_TEMPERATURE: f64 = 0.0;

/// Lots the portfolio is split into. One lot is the smallest weight change.
pub const DEFAULT_LOTS: i64 = 10_000;

/// Relative tolerance for `V[i][j] == V[j][i]`.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Variance `w' V w` of a fully invested portfolio.
///
/// Holdings are integer lots out of a fixed total, so a transfer keeps the
/// weights summing to one exactly and undoes without rounding drift. A
/// holding below zero is a short position.
#[derive(Debug, Clone)]
pub struct PortfolioCost {
    n: usize,
    cov: Vec<f64>,
    lots: i64,
}

impl PortfolioCost {
    /// `cov` is the row-major `n x n` covariance matrix.
    pub fn new(n: usize, cov: Vec<f64>, lots: i64) -> MetroResult<Self> {
        if n < 2 {
            return Err(MetropolisError::Input(format!(
                "a portfolio needs at least 2 assets, got {}",
                n
            )));
        }
        if cov.len() != n * n {
            return Err(MetropolisError::Input(format!(
                "covariance has {} entries, expected {}x{}",
                cov.len(),
                n,
                n
            )));
        }
        if lots < 1 {
            return Err(MetropolisError::Config(format!(
                "lot count must be positive, got {}",
                lots
            )));
        }
        if let Some(k) = cov.iter().position(|v| !v.is_finite()) {
            return Err(MetropolisError::Input(format!(
                "covariance entry ({}, {}) is not finite",
                k / n,
                k % n
            )));
        }
        for i in 0..n {
            if cov[i * n + i] < 0.0 {
                return Err(MetropolisError::Input(format!(
                    "asset {} has negative variance {}",
                    i,
                    cov[i * n + i]
                )));
            }
            for j in (i + 1)..n {
                let (a, b) = (cov[i * n + j], cov[j * n + i]);
                let scale = 1.0f64.max(a.abs()).max(b.abs());
                if (a - b).abs() > SYMMETRY_TOLERANCE * scale {
                    return Err(MetropolisError::Input(format!(
                        "covariance is not symmetric at ({}, {}): {} vs {}",
                        i, j, a, b
                    )));
                }
            }
        }
        Ok(Self { n, cov, lots })
    }

    pub fn assets(&self) -> usize {
        self.n
    }

    pub fn lots(&self) -> i64 {
        self.lots
    }

    #[inline(always)]
    pub fn covariance(&self, i: usize, j: usize) -> f64 {
        self.cov[i * self.n + j]
    }

    /// Lots spread as evenly as they go; the first `lots % n` assets get one extra.
    pub fn equal_start(&self) -> Configuration<i64> {
        let n = self.n as i64;
        let (base, extra) = (self.lots / n, self.lots % n);
        let holdings = (0..n).map(|i| base + i64::from(i < extra)).collect();
        Configuration::free(holdings)
    }

    pub fn weights(&self, holdings: &Configuration<i64>) -> Vec<f64> {
        let total = self.lots as f64;
        holdings.sites().iter().map(|&h| h as f64 / total).collect()
    }

    /// `(V w)_i`: how much asset `i` moves with the current portfolio.
    #[inline(always)]
    fn exposure(&self, holdings: &[i64], i: usize) -> f64 {
        let row = &self.cov[i * self.n..(i + 1) * self.n];
        let sum: f64 = row.iter().zip(holdings).map(|(v, &h)| v * h as f64).sum();
        sum / self.lots as f64
    }

    #[inline(always)]
    fn transfer_delta(&self, exposure_from: f64, exposure_to: f64, mv: &TransferMove) -> f64 {
        let d = mv.amount as f64 / self.lots as f64;
        let curvature = self.covariance(mv.from, mv.from) + self.covariance(mv.to, mv.to)
            - 2.0 * self.covariance(mv.from, mv.to);
        2.0 * d * (exposure_to - exposure_from) + d * d * curvature
    }

    /// True when no transfer of `amount` lots between mutable holdings lowers
    /// the variance. Long-only skips donors holding fewer than `amount`.
    pub fn is_stable(&self, holdings: &Configuration<i64>, amount: i64, long_only: bool) -> bool {
        let h = holdings.sites();
        let exposures: Vec<f64> = (0..self.n).map(|i| self.exposure(h, i)).collect();
        let sites = holdings.mutable_sites();
        for &from in sites {
            if long_only && h[from] < amount {
                continue;
            }
            for &to in sites {
                if to == from {
                    continue;
                }
                let mv = TransferMove { from, to, amount };
                if self.transfer_delta(exposures[from], exposures[to], &mv) < 0.0 {
                    return false;
                }
            }
        }
        true
    }

    /// Closed-form minimum-variance weights with shorting allowed:
    /// `V^-1 e / (e' V^-1 e)`.
    pub fn min_variance_weights(&self) -> MetroResult<Vec<f64>> {
        let x = solve_linear(self.n, self.cov.clone(), vec![1.0; self.n])?;
        let total: f64 = x.iter().sum();
        if total.abs() < f64::EPSILON {
            return Err(MetropolisError::Input(
                "covariance admits no minimum-variance portfolio".into(),
            ));
        }
        Ok(x.into_iter().map(|v| v / total).collect())
    }

    /// Variance of arbitrary real weights.
    pub fn variance_of(&self, weights: &[f64]) -> f64 {
        (0..self.n)
            .map(|i| {
                let row: f64 = (0..self.n).map(|j| self.covariance(i, j) * weights[j]).sum();
                weights[i] * row
            })
            .sum()
    }
}

/// Gaussian elimination with partial pivoting on a row-major `n x n` system.
fn solve_linear(n: usize, mut a: Vec<f64>, mut b: Vec<f64>) -> MetroResult<Vec<f64>> {
    let scale = a.iter().fold(0.0f64, |m, v| m.max(v.abs())).max(f64::MIN_POSITIVE);
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&r, &s| a[r * n + col].abs().total_cmp(&a[s * n + col].abs()))
            .unwrap_or(col);
        if a[pivot * n + col].abs() <= 1e-12 * scale {
            return Err(MetropolisError::Input("covariance matrix is singular".into()));
        }
        if pivot != col {
            for k in 0..n {
                a.swap(pivot * n + k, col * n + k);
            }
            b.swap(pivot, col);
        }
        for r in (col + 1)..n {
            let f = a[r * n + col] / a[col * n + col];
            if f == 0.0 {
                continue;
            }
            for k in col..n {
                a[r * n + k] -= f * a[col * n + k];
            }
            b[r] -= f * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for r in (0..n).rev() {
        let tail: f64 = ((r + 1)..n).map(|k| a[r * n + k] * x[k]).sum();
        x[r] = (b[r] - tail) / a[r * n + r];
    }
    Ok(x)
}

impl CostModel<Configuration<i64>, TransferMove> for PortfolioCost {
    type Energy = f64;

    fn cost(&self, holdings: &Configuration<i64>) -> f64 {
        let h = holdings.sites();
        let total = self.lots as f64;
        (0..self.n)
            .map(|i| h[i] as f64 / total * self.exposure(h, i))
            .sum()
    }

    /// Two rows of `V` against the holdings: O(n).
    #[inline(always)]
    fn delta(&self, holdings: &Configuration<i64>, mv: &TransferMove) -> f64 {
        let h = holdings.sites();
        self.transfer_delta(self.exposure(h, mv.from), self.exposure(h, mv.to), mv)
    }
}
