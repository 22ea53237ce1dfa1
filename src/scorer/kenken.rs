use super::CostModel;
use crate::error::{MetroResult, MetropolisError};
use crate::geometry::{GridSize, MAX_SYMBOLS};
use crate::optimizer::{Configuration, SwapMove};
use crate::random::RandomSource;
use strum_macros::{Display, EnumIter, EnumString};

pub const DEFAULT_TEMPERATURE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, Display)]
pub enum CageOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(to_string = "*", serialize = "x")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "=")]
    Given,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cage {
    pub op: CageOp,
    pub target: i64,
    pub sites: Vec<usize>,
}

impl Cage {
    /// Whether the digits in the cage produce its target.
    pub fn satisfied(&self, value: impl Fn(usize) -> u8) -> bool {
        let mut digits = self.sites.iter().map(|&s| value(s) as i64);
        match self.op {
            CageOp::Add => digits.sum::<i64>() == self.target,
            CageOp::Mul => digits.fold(1i64, |acc, d| acc.saturating_mul(d)) == self.target,
            CageOp::Given => digits.next() == Some(self.target),
            CageOp::Sub | CageOp::Div => {
                let (Some(x), Some(y)) = (digits.next(), digits.next()) else {
                    return false;
                };
                let (hi, lo) = (x.max(y), x.min(y));
                if self.op == CageOp::Sub {
                    hi - lo == self.target
                } else {
                    lo != 0 && hi % lo == 0 && hi / lo == self.target
                }
            }
        }
    }
}

/// An `n x n` KenKen: a Latin square whose cages must hit arithmetic targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KenKenPuzzle {
    n: usize,
    cages: Vec<Cage>,
    cage_of: Vec<usize>,
}

impl KenKenPuzzle {
    pub fn new(n: usize, cages: Vec<Cage>) -> MetroResult<Self> {
        if n < 2 || n > MAX_SYMBOLS as usize {
            return Err(MetropolisError::Input(format!(
                "KenKen side must be in 2..={}, got {}",
                MAX_SYMBOLS, n
            )));
        }
        let mut cage_of = vec![usize::MAX; n * n];
        for (i, cage) in cages.iter().enumerate() {
            let arity_ok = match cage.op {
                CageOp::Sub | CageOp::Div => cage.sites.len() == 2,
                CageOp::Given => cage.sites.len() == 1,
                CageOp::Add | CageOp::Mul => !cage.sites.is_empty(),
            };
            if !arity_ok {
                return Err(MetropolisError::Input(format!(
                    "cage {} ({}{}) has {} cells",
                    i,
                    cage.op,
                    cage.target,
                    cage.sites.len()
                )));
            }
            for &site in &cage.sites {
                if site >= cage_of.len() || cage_of[site] != usize::MAX {
                    return Err(MetropolisError::Input(format!(
                        "cell {} is outside the grid or in two cages",
                        site
                    )));
                }
                cage_of[site] = i;
            }
        }
        if let Some(site) = cage_of.iter().position(|&c| c == usize::MAX) {
            return Err(MetropolisError::Input(format!("cell {} is in no cage", site)));
        }
        Ok(Self { n, cages, cage_of })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn size(&self) -> GridSize {
        GridSize::square(self.n)
    }

    pub fn cages(&self) -> &[Cage] {
        &self.cages
    }

    pub fn cage_of(&self, site: usize) -> usize {
        self.cage_of[site]
    }

    /// Every digit exactly `n` times in random order, so swaps keep row and
    /// column totals reachable.
    pub fn random_start(&self, rng: &mut RandomSource) -> Configuration<u8> {
        let mut sites: Vec<u8> = (1..=self.n as u8)
            .flat_map(|d| std::iter::repeat(d).take(self.n))
            .collect();
        rng.shuffle(&mut sites);
        Configuration::free(sites)
    }
}

/// Latin-square deviation plus one per unsatisfied cage.
///
/// Each row and column contributes the sum over digits of `|count - 1|`.
/// Unsatisfiable cages keep the cost from ever reaching zero.
#[derive(Debug, Clone)]
pub struct KenKenCost<'p> {
    puzzle: &'p KenKenPuzzle,
}

impl<'p> KenKenCost<'p> {
    pub fn new(puzzle: &'p KenKenPuzzle) -> Self {
        Self { puzzle }
    }

    fn row_deviation(&self, row: usize, value: &impl Fn(usize) -> u8) -> i64 {
        let n = self.puzzle.n;
        deviation((0..n).map(|c| value(row * n + c)), n)
    }

    fn col_deviation(&self, col: usize, value: &impl Fn(usize) -> u8) -> i64 {
        let n = self.puzzle.n;
        deviation((0..n).map(|r| value(r * n + col)), n)
    }

    fn cage_miss(&self, cage: usize, value: &impl Fn(usize) -> u8) -> i64 {
        i64::from(!self.puzzle.cages[cage].satisfied(value))
    }

    /// Cost restricted to the rows, columns and cages touching `a` and `b`.
    fn local(&self, a: usize, b: usize, value: &impl Fn(usize) -> u8) -> i64 {
        let n = self.puzzle.n;
        let (ra, rb, ca, cb) = (a / n, b / n, a % n, b % n);
        let (ga, gb) = (self.puzzle.cage_of[a], self.puzzle.cage_of[b]);

        let mut total = self.row_deviation(ra, value) + self.col_deviation(ca, value);
        total += self.cage_miss(ga, value);
        if rb != ra {
            total += self.row_deviation(rb, value);
        }
        if cb != ca {
            total += self.col_deviation(cb, value);
        }
        if gb != ga {
            total += self.cage_miss(gb, value);
        }
        total
    }
}

fn deviation(digits: impl Iterator<Item = u8>, n: usize) -> i64 {
    let mut counts = [0i64; MAX_SYMBOLS as usize + 1];
    for d in digits {
        counts[d as usize] += 1;
    }
    counts[1..=n].iter().map(|&c| (c - 1).abs()).sum()
}

impl CostModel<Configuration<u8>, SwapMove> for KenKenCost<'_> {
    type Energy = i64;

    fn cost(&self, config: &Configuration<u8>) -> i64 {
        let value = |s: usize| config.get(s);
        let n = self.puzzle.n;
        let lines: i64 = (0..n)
            .map(|i| self.row_deviation(i, &value) + self.col_deviation(i, &value))
            .sum();
        let cages: i64 = (0..self.puzzle.cages.len())
            .map(|g| self.cage_miss(g, &value))
            .sum();
        lines + cages
    }

    fn delta(&self, config: &Configuration<u8>, mv: &SwapMove) -> i64 {
        let (a, b) = (mv.a, mv.b);
        let (va, vb) = (config.get(a), config.get(b));
        let before = |s: usize| config.get(s);
        let after = |s: usize| {
            if s == a {
                vb
            } else if s == b {
                va
            } else {
                config.get(s)
            }
        };
        self.local(a, b, &after) - self.local(a, b, &before)
    }

    fn max_delta(&self) -> Option<usize> {
        // Two digit counts shift in up to four lines, plus two cages.
        Some(10)
    }
}
