use super::CostModel;
use crate::error::{MetroResult, MetropolisError};
use crate::geometry::ConstraintGroups;
use crate::optimizer::{Configuration, PointMove};
use crate::random::RandomSource;

/// Weight of a conflict that involves a clue, relative to one between free sites.
pub const DEFAULT_CLUE_WEIGHT: i64 = 5;

/// Recommended fixed temperatures: solving around clues, and filling an empty grid.
pub const SOLVE_TEMPERATURE: f64 = 0.39;
pub const FILL_TEMPERATURE: f64 = 0.2;

/// Weighted count of peer pairs holding the same digit.
///
/// A pair in which either site is a clue costs `clue_weight`, any other
/// pair costs 1. Zero exactly when the grid is a valid solution.
#[derive(Debug, Clone)]
pub struct SudokuCost<'g> {
    groups: &'g ConstraintGroups,
    fixed: Vec<bool>,
    clue_weight: i64,
    max_delta: usize,
}

impl<'g> SudokuCost<'g> {
    pub fn new(groups: &'g ConstraintGroups, fixed: &[bool], clue_weight: i64) -> MetroResult<Self> {
        if fixed.len() != groups.size().len() {
            return Err(MetropolisError::Input(format!(
                "clue mask has {} sites, grid has {}",
                fixed.len(),
                groups.size().len()
            )));
        }
        if clue_weight < 1 {
            return Err(MetropolisError::Config(format!(
                "clue weight must be at least 1, got {}",
                clue_weight
            )));
        }

        // A move can at most create conflicts with every peer of a free site.
        let max_delta = (0..fixed.len())
            .filter(|&s| !fixed[s])
            .map(|s| {
                groups
                    .peers(s)
                    .iter()
                    .map(|&p| if fixed[p] { clue_weight } else { 1 })
                    .sum::<i64>()
            })
            .max()
            .unwrap_or(0);

        Ok(Self {
            groups,
            fixed: fixed.to_vec(),
            clue_weight,
            max_delta: max_delta as usize,
        })
    }

    pub fn for_config(groups: &'g ConstraintGroups, config: &Configuration<u8>) -> MetroResult<Self> {
        Self::new(groups, config.fixed_mask(), DEFAULT_CLUE_WEIGHT)
    }

    #[inline(always)]
    fn weight(&self, a: usize, b: usize) -> i64 {
        if self.fixed[a] || self.fixed[b] {
            self.clue_weight
        } else {
            1
        }
    }

    /// Weighted conflicts `digit` would have at `site`.
    #[inline(always)]
    pub fn conflicts(&self, config: &Configuration<u8>, site: usize, digit: u8) -> i64 {
        self.groups
            .peers(site)
            .iter()
            .filter(|&&p| config.get(p) == digit)
            .map(|&p| self.weight(site, p))
            .sum()
    }
}

impl CostModel<Configuration<u8>, PointMove<u8>> for SudokuCost<'_> {
    type Energy = i64;

    fn cost(&self, config: &Configuration<u8>) -> i64 {
        let mut total = 0;
        for site in 0..config.len() {
            let v = config.get(site);
            for &p in self.groups.peers(site) {
                if p > site && config.get(p) == v {
                    total += self.weight(site, p);
                }
            }
        }
        total
    }

    #[inline(always)]
    fn delta(&self, config: &Configuration<u8>, mv: &PointMove<u8>) -> i64 {
        let old = config.get(mv.site);
        self.conflicts(config, mv.site, mv.to) - self.conflicts(config, mv.site, old)
    }

    fn max_delta(&self) -> Option<usize> {
        Some(self.max_delta)
    }
}

/// Givens fixed in place, every open site (`0`) filled with a random digit.
pub fn random_start(
    groups: &ConstraintGroups,
    givens: &[u8],
    rng: &mut RandomSource,
) -> MetroResult<Configuration<u8>> {
    if givens.len() != groups.size().len() {
        return Err(MetropolisError::Input(format!(
            "puzzle has {} cells, expected {}",
            givens.len(),
            groups.size().len()
        )));
    }
    if let Some(&bad) = givens.iter().find(|&&v| v > groups.symbols()) {
        return Err(MetropolisError::Input(format!(
            "digit {} outside 1..={}",
            bad,
            groups.symbols()
        )));
    }
    let template: Vec<Option<u8>> = givens
        .iter()
        .map(|&v| if v == 0 { None } else { Some(v) })
        .collect();
    Configuration::randomized(&template, &groups.domain(), rng)
}
