use super::CostModel;
use crate::error::{MetroResult, MetropolisError};
use crate::optimizer::{Configuration, SwapMove};
use crate::random::RandomSource;

pub const DEFAULT_TEMPERATURE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Row(usize),
    Col(usize),
    Diagonal,
    AntiDiagonal,
}

/// Sum of `|line sum - M|` over the rows, columns and both diagonals of an
/// `n x n` arrangement of `1..=n^2`, where `M = n(n^2 + 1) / 2`.
#[derive(Debug, Clone)]
pub struct MagicSquareCost {
    n: usize,
    magic: i64,
}

impl MagicSquareCost {
    pub fn new(n: usize) -> MetroResult<Self> {
        if n < 3 {
            return Err(MetropolisError::Config(format!(
                "magic squares exist for n >= 3, got {}",
                n
            )));
        }
        let magic = (n * (n * n + 1) / 2) as i64;
        Ok(Self { n, magic })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn magic_constant(&self) -> i64 {
        self.magic
    }

    pub fn random_start(&self, rng: &mut RandomSource) -> Configuration<u32> {
        let mut sites: Vec<u32> = (1..=(self.n * self.n) as u32).collect();
        rng.shuffle(&mut sites);
        Configuration::free(sites)
    }

    fn contains(&self, line: Line, site: usize) -> bool {
        let (r, c) = (site / self.n, site % self.n);
        match line {
            Line::Row(i) => r == i,
            Line::Col(j) => c == j,
            Line::Diagonal => r == c,
            Line::AntiDiagonal => r + c == self.n - 1,
        }
    }

    fn line_sum(&self, config: &Configuration<u32>, line: Line) -> i64 {
        let n = self.n;
        (0..n)
            .map(|k| {
                let site = match line {
                    Line::Row(i) => i * n + k,
                    Line::Col(j) => k * n + j,
                    Line::Diagonal => k * n + k,
                    Line::AntiDiagonal => k * n + (n - 1 - k),
                };
                config.get(site) as i64
            })
            .sum()
    }

    fn lines_through(&self, site: usize, out: &mut Vec<Line>) {
        let (r, c) = (site / self.n, site % self.n);
        for line in [
            Line::Row(r),
            Line::Col(c),
            Line::Diagonal,
            Line::AntiDiagonal,
        ] {
            if self.contains(line, site) && !out.contains(&line) {
                out.push(line);
            }
        }
    }
}

impl CostModel<Configuration<u32>, SwapMove> for MagicSquareCost {
    type Energy = i64;

    fn cost(&self, config: &Configuration<u32>) -> i64 {
        let mut lines: Vec<Line> = (0..self.n)
            .flat_map(|i| [Line::Row(i), Line::Col(i)])
            .collect();
        lines.push(Line::Diagonal);
        lines.push(Line::AntiDiagonal);
        lines
            .into_iter()
            .map(|line| (self.line_sum(config, line) - self.magic).abs())
            .sum()
    }

    fn delta(&self, config: &Configuration<u32>, mv: &SwapMove) -> i64 {
        let (va, vb) = (config.get(mv.a) as i64, config.get(mv.b) as i64);
        let mut lines = Vec::with_capacity(8);
        self.lines_through(mv.a, &mut lines);
        self.lines_through(mv.b, &mut lines);

        lines
            .into_iter()
            .map(|line| {
                let has_a = self.contains(line, mv.a);
                let has_b = self.contains(line, mv.b);
                let shift = match (has_a, has_b) {
                    (true, false) => vb - va,
                    (false, true) => va - vb,
                    _ => 0,
                };
                if shift == 0 {
                    return 0;
                }
                let sum = self.line_sum(config, line);
                (sum + shift - self.magic).abs() - (sum - self.magic).abs()
            })
            .sum()
    }

    fn max_delta(&self) -> Option<usize> {
        // At most six lines contain exactly one of the swapped sites.
        Some(6 * (self.n * self.n - 1))
    }
}
