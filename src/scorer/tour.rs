use super::CostModel;
use crate::error::{MetroResult, MetropolisError};
use crate::optimizer::{Configuration, ReversalMove};
use crate::random::RandomSource;

/// Suits coordinates scaled to the unit square.
pub const DEFAULT_TEMPERATURE: f64 = 0.01;

/// Closed-tour length over a symmetric distance matrix.
///
/// The configuration lists city ids in visiting order; position 0 holds
/// the fixed starting city.
#[derive(Debug, Clone)]
pub struct TourCost {
    n: usize,
    dist: Vec<f64>,
}

impl TourCost {
    pub fn from_points(points: &[(f64, f64)]) -> MetroResult<Self> {
        if points.len() < 2 {
            return Err(MetropolisError::Input(format!(
                "a tour needs at least 2 cities, got {}",
                points.len()
            )));
        }
        let n = points.len();
        let mut dist = vec![0.0; n * n];
        for (i, &(xi, yi)) in points.iter().enumerate() {
            for (j, &(xj, yj)) in points.iter().enumerate() {
                dist[i * n + j] = (xi - xj).hypot(yi - yj);
            }
        }
        Ok(Self { n, dist })
    }

    pub fn cities(&self) -> usize {
        self.n
    }

    #[inline(always)]
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.dist[a * self.n + b]
    }

    /// City 0 anchored at position 0, the rest in random order.
    pub fn random_start(&self, rng: &mut RandomSource) -> MetroResult<Configuration<usize>> {
        let mut order: Vec<usize> = (0..self.n).collect();
        rng.shuffle(&mut order[1..]);
        let mut fixed = vec![false; self.n];
        fixed[0] = true;
        Configuration::new(order, fixed)
    }
}

impl CostModel<Configuration<usize>, ReversalMove> for TourCost {
    type Energy = f64;

    fn cost(&self, tour: &Configuration<usize>) -> f64 {
        let c = tour.sites();
        let n = c.len();
        (0..n).map(|k| self.distance(c[k], c[(k + 1) % n])).sum()
    }

    /// Only the two edges at the ends of the reversed segment change.
    #[inline(always)]
    fn delta(&self, tour: &Configuration<usize>, mv: &ReversalMove) -> f64 {
        let c = tour.sites();
        let n = c.len();
        let (i, j) = (mv.start, mv.end);
        let prev = c[(i + n - 1) % n];
        let next = c[(j + 1) % n];
        self.distance(prev, c[j]) + self.distance(c[i], next)
            - self.distance(prev, c[i])
            - self.distance(c[j], next)
    }
}
