use crate::error::{MetroResult, MetropolisError};
use serde::{Deserialize, Serialize};

/// Rectangular grid dimensions. Sites are indexed row-major from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

impl GridSize {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn square(n: usize) -> Self {
        Self { rows: n, cols: n }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline(always)]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline(always)]
    pub fn row(&self, site: usize) -> usize {
        site / self.cols
    }

    #[inline(always)]
    pub fn col(&self, site: usize) -> usize {
        site % self.cols
    }

    /// 180-degree point reflection through the grid center.
    #[inline(always)]
    pub fn reflect(&self, site: usize) -> usize {
        self.len() - 1 - site
    }

    /// The only site that reflects onto itself, present when the site count is odd.
    pub fn center(&self) -> Option<usize> {
        let n = self.len();
        (n % 2 == 1).then_some(n / 2)
    }

    /// Orthogonal neighbours that lie inside the grid.
    pub fn neighbors4(&self, site: usize) -> impl Iterator<Item = usize> {
        let (r, c) = (self.row(site), self.col(site));
        let (rows, cols) = (self.rows, self.cols);
        [
            (r > 0).then(|| site - cols),
            (r + 1 < rows).then(|| site + cols),
            (c > 0).then(|| site - 1),
            (c + 1 < cols).then(|| site + 1),
        ]
        .into_iter()
        .flatten()
    }
}

/// A grid partitioned into all-different groups over the symbols `1..=symbols`.
///
/// For Sudoku the groups are the rows, the columns and the boxes. Each group
/// holds exactly `symbols` sites, so in a solved grid every group contains
/// every symbol once.
#[derive(Debug, Clone)]
pub struct ConstraintGroups {
    size: GridSize,
    symbols: u8,
    groups: Vec<Vec<usize>>,
    site_groups: Vec<Vec<usize>>,
    peers: Vec<Vec<usize>>,
}

/// Candidate sets are bitmasks, so symbol counts are capped by the mask width.
pub const MAX_SYMBOLS: u8 = 64;

impl ConstraintGroups {
    pub fn new(size: GridSize, symbols: u8, groups: Vec<Vec<usize>>) -> MetroResult<Self> {
        if symbols == 0 || symbols > MAX_SYMBOLS {
            return Err(MetropolisError::Config(format!(
                "symbol count must be in 1..={}, got {}",
                MAX_SYMBOLS, symbols
            )));
        }

        let n = size.len();
        let mut site_groups = vec![Vec::new(); n];
        for (g, group) in groups.iter().enumerate() {
            if group.len() != symbols as usize {
                return Err(MetropolisError::Config(format!(
                    "group {} has {} sites, expected {}",
                    g,
                    group.len(),
                    symbols
                )));
            }
            for &site in group {
                if site >= n {
                    return Err(MetropolisError::Config(format!(
                        "group {} references site {} outside a {}x{} grid",
                        g, site, size.rows, size.cols
                    )));
                }
                site_groups[site].push(g);
            }
        }

        let peers = (0..n)
            .map(|site| {
                let mut p: Vec<usize> = site_groups[site]
                    .iter()
                    .flat_map(|&g| groups[g].iter().copied())
                    .filter(|&other| other != site)
                    .collect();
                p.sort_unstable();
                p.dedup();
                p
            })
            .collect();

        Ok(Self {
            size,
            symbols,
            groups,
            site_groups,
            peers,
        })
    }

    /// Rows and columns of an `n x n` Latin square.
    pub fn latin(n: usize) -> MetroResult<Self> {
        let symbols = symbol_count(n)?;
        let size = GridSize::square(n);
        let mut groups = Vec::with_capacity(2 * n);
        for r in 0..n {
            groups.push((0..n).map(|c| size.index(r, c)).collect());
        }
        for c in 0..n {
            groups.push((0..n).map(|r| size.index(r, c)).collect());
        }
        Self::new(size, symbols, groups)
    }

    /// Sudoku of side `box_rows * box_cols` with boxes `box_rows` tall and `box_cols` wide.
    pub fn sudoku(box_rows: usize, box_cols: usize) -> MetroResult<Self> {
        let n = box_rows * box_cols;
        let Self {
            size,
            symbols,
            mut groups,
            ..
        } = Self::latin(n)?;

        for band in 0..(n / box_rows) {
            for stack in 0..(n / box_cols) {
                let mut block = Vec::with_capacity(n);
                for r in 0..box_rows {
                    for c in 0..box_cols {
                        block.push(size.index(band * box_rows + r, stack * box_cols + c));
                    }
                }
                groups.push(block);
            }
        }
        Self::new(size, symbols, groups)
    }

    /// Sudoku of side `n` with the squarest boxes that tile it: 9 gives 3x3, 6 gives 2x3.
    pub fn sudoku_of_side(n: usize) -> MetroResult<Self> {
        let box_rows = (1..=n)
            .take_while(|r| r * r <= n)
            .filter(|r| n % r == 0)
            .last()
            .unwrap_or(1);
        Self::sudoku(box_rows, n / box_rows.max(1))
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn symbols(&self) -> u8 {
        self.symbols
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    #[inline(always)]
    pub fn groups_of(&self, site: usize) -> &[usize] {
        &self.site_groups[site]
    }

    /// Every other site sharing at least one group with `site`, sorted.
    #[inline(always)]
    pub fn peers(&self, site: usize) -> &[usize] {
        &self.peers[site]
    }

    /// The full symbol domain `1..=symbols`.
    pub fn domain(&self) -> Vec<u8> {
        (1..=self.symbols).collect()
    }

    /// True when `values` is a complete grid in which every group holds every symbol once.
    pub fn is_solution(&self, values: &[u8]) -> bool {
        if values.len() != self.size.len() {
            return false;
        }
        let full = full_mask(self.symbols);
        self.groups.iter().all(|group| {
            let mut seen = 0u64;
            for &site in group {
                let v = values[site];
                if v == 0 || v > self.symbols {
                    return false;
                }
                seen |= bit(v);
            }
            seen == full
        })
    }
}

fn symbol_count(n: usize) -> MetroResult<u8> {
    u8::try_from(n)
        .ok()
        .filter(|&s| s > 0 && s <= MAX_SYMBOLS)
        .ok_or_else(|| {
            MetropolisError::Config(format!(
                "grid side must be in 1..={}, got {}",
                MAX_SYMBOLS, n
            ))
        })
}

#[inline(always)]
pub(crate) fn bit(value: u8) -> u64 {
    1u64 << (value - 1)
}

#[inline(always)]
pub(crate) fn full_mask(symbols: u8) -> u64 {
    if symbols >= 64 {
        u64::MAX
    } else {
        (1u64 << symbols) - 1
    }
}
