use crate::error::{MetroResult, MetropolisError};
use crate::geometry::GridSize;
use crate::optimizer::Move;

/// Which sites of a solved grid are shown as clues.
///
/// Always symmetric under 180-degree point reflection: a site is a clue
/// exactly when its reflection is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueSet {
    size: GridSize,
    flags: Vec<bool>,
    count: usize,
}

impl ClueSet {
    /// Every site a clue.
    pub fn full(size: GridSize) -> Self {
        Self {
            size,
            flags: vec![true; size.len()],
            count: size.len(),
        }
    }

    pub fn from_mask(size: GridSize, mask: Vec<bool>) -> MetroResult<Self> {
        if mask.len() != size.len() {
            return Err(MetropolisError::Input(format!(
                "clue mask has {} sites, expected {}",
                mask.len(),
                size.len()
            )));
        }
        if let Some(site) = (0..mask.len()).find(|&s| mask[s] != mask[size.reflect(s)]) {
            return Err(MetropolisError::Input(format!(
                "clue mask is not point-symmetric at site {}",
                site
            )));
        }
        let count = mask.iter().filter(|&&c| c).count();
        Ok(Self {
            size,
            flags: mask,
            count,
        })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mask(&self) -> &[bool] {
        &self.flags
    }

    #[inline(always)]
    pub fn is_clue(&self, site: usize) -> bool {
        self.flags[site]
    }

    /// One representative per symmetric pair: sites up to and including the center.
    pub fn canonical_sites(&self) -> std::ops::RangeInclusive<usize> {
        0..=(self.size.len().saturating_sub(1) / 2)
    }

    /// Toggles `site` together with its reflection and returns the change in clue count.
    pub fn flip(&mut self, site: usize) -> i64 {
        let mirror = self.size.reflect(site);
        let mut delta = self.toggle(site);
        if mirror != site {
            delta += self.toggle(mirror);
        }
        delta
    }

    /// Clue-count change `flip(site)` would produce, without flipping.
    pub fn flip_delta(&self, site: usize) -> i64 {
        let width = if self.size.reflect(site) == site { 1 } else { 2 };
        if self.flags[site] {
            -width
        } else {
            width
        }
    }

    fn toggle(&mut self, site: usize) -> i64 {
        self.flags[site] = !self.flags[site];
        if self.flags[site] {
            self.count += 1;
            1
        } else {
            self.count -= 1;
            -1
        }
    }
}

/// Removes or restores one symmetric clue pair. Its own inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClueFlip {
    pub site: usize,
}

impl Move<ClueSet> for ClueFlip {
    fn apply(&self, state: &mut ClueSet) {
        state.flip(self.site);
    }

    fn undo(&self, state: &mut ClueSet) {
        state.flip(self.site);
    }
}
