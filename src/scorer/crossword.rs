use super::CostModel;
use crate::error::{MetroResult, MetropolisError};
use crate::optimizer::{Configuration, PointMove};
use crate::random::RandomSource;

pub const DEFAULT_TEMPERATURE: f64 = 0.137;

/// Word square: every row and every column of an `n x n` letter grid should
/// read as a dictionary word.
///
/// A line costs its Hamming distance to the nearest word of length `n`, so
/// one letter change moves the total by at most 2.
#[derive(Debug, Clone)]
pub struct CrosswordCost {
    n: usize,
    words: Vec<Vec<u8>>,
    alphabet: Vec<u8>,
}

impl CrosswordCost {
    pub fn new(n: usize, words: Vec<Vec<u8>>) -> MetroResult<Self> {
        if n == 0 {
            return Err(MetropolisError::Config("word square side must be positive".into()));
        }
        let words: Vec<Vec<u8>> = words.into_iter().filter(|w| w.len() == n).collect();
        if words.is_empty() {
            return Err(MetropolisError::Input(format!(
                "dictionary has no {}-letter words",
                n
            )));
        }

        let mut alphabet: Vec<u8> = words.iter().flatten().copied().collect();
        alphabet.sort_unstable();
        alphabet.dedup();

        Ok(Self { n, words, alphabet })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Letters that occur anywhere in the dictionary.
    pub fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    pub fn words(&self) -> &[Vec<u8>] {
        &self.words
    }

    /// A grid of random dictionary letters.
    pub fn random_start(&self, rng: &mut RandomSource) -> Configuration<u8> {
        let sites = (0..self.n * self.n)
            .map(|_| self.alphabet[rng.index(self.alphabet.len())])
            .collect();
        Configuration::free(sites)
    }

    /// Distance from the line to the closest word.
    fn line_cost(&self, letter: impl Fn(usize) -> u8) -> i64 {
        let mut best = self.n;
        for word in &self.words {
            let d = word
                .iter()
                .enumerate()
                .filter(|&(i, &ch)| letter(i) != ch)
                .count();
            if d < best {
                best = d;
                if best == 0 {
                    break;
                }
            }
        }
        best as i64
    }

    fn row_cost(&self, row: usize, value: &impl Fn(usize) -> u8) -> i64 {
        self.line_cost(|i| value(row * self.n + i))
    }

    fn col_cost(&self, col: usize, value: &impl Fn(usize) -> u8) -> i64 {
        self.line_cost(|i| value(i * self.n + col))
    }

    /// True when every row and column is a dictionary word.
    pub fn is_solved(&self, config: &Configuration<u8>) -> bool {
        self.cost(config) == 0
    }
}

impl CostModel<Configuration<u8>, PointMove<u8>> for CrosswordCost {
    type Energy = i64;

    fn cost(&self, config: &Configuration<u8>) -> i64 {
        let value = |s: usize| config.get(s);
        (0..self.n)
            .map(|i| self.row_cost(i, &value) + self.col_cost(i, &value))
            .sum()
    }

    fn delta(&self, config: &Configuration<u8>, mv: &PointMove<u8>) -> i64 {
        let (row, col) = (mv.site / self.n, mv.site % self.n);
        let before = |s: usize| config.get(s);
        let after = |s: usize| if s == mv.site { mv.to } else { config.get(s) };
        let old = self.row_cost(row, &before) + self.col_cost(col, &before);
        let new = self.row_cost(row, &after) + self.col_cost(col, &after);
        new - old
    }

    fn max_delta(&self) -> Option<usize> {
        Some(2)
    }
}
