use crate::error::{MetroResult, MetropolisError};
use crate::random::RandomSource;

/// A full assignment of values to sites, some of which are fixed.
///
/// Fixed sites (clues, anchors) are never touched by the bundled move
/// generators. `mutable` caches the indices of the remaining sites so a
/// uniform draw over them is O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration<V> {
    sites: Vec<V>,
    fixed: Vec<bool>,
    mutable: Vec<usize>,
}

impl<V: Copy> Configuration<V> {
    /// Every site mutable.
    pub fn free(sites: Vec<V>) -> Self {
        let fixed = vec![false; sites.len()];
        let mutable = (0..sites.len()).collect();
        Self {
            sites,
            fixed,
            mutable,
        }
    }

    pub fn new(sites: Vec<V>, fixed: Vec<bool>) -> MetroResult<Self> {
        if sites.len() != fixed.len() {
            return Err(MetropolisError::Input(format!(
                "configuration has {} sites but a fixed mask of {}",
                sites.len(),
                fixed.len()
            )));
        }
        let mutable = fixed
            .iter()
            .enumerate()
            .filter(|(_, &f)| !f)
            .map(|(i, _)| i)
            .collect();
        Ok(Self {
            sites,
            fixed,
            mutable,
        })
    }

    /// Fixes every `Some` site and fills every `None` site uniformly from `domain`.
    pub fn randomized(
        template: &[Option<V>],
        domain: &[V],
        rng: &mut RandomSource,
    ) -> MetroResult<Self> {
        if domain.is_empty() && template.iter().any(Option::is_none) {
            return Err(MetropolisError::Config(
                "cannot randomize free sites over an empty domain".into(),
            ));
        }
        let mut sites = Vec::with_capacity(template.len());
        let mut fixed = Vec::with_capacity(template.len());
        for slot in template {
            match *slot {
                Some(v) => {
                    sites.push(v);
                    fixed.push(true);
                }
                None => {
                    sites.push(domain[rng.index(domain.len())]);
                    fixed.push(false);
                }
            }
        }
        Self::new(sites, fixed)
    }

    #[inline(always)]
    pub fn get(&self, site: usize) -> V {
        self.sites[site]
    }

    #[inline(always)]
    pub fn set(&mut self, site: usize, value: V) {
        self.sites[site] = value;
    }

    #[inline(always)]
    pub fn swap(&mut self, a: usize, b: usize) {
        self.sites.swap(a, b);
    }

    /// Reverses the inclusive position range `start..=end`.
    #[inline(always)]
    pub fn reverse(&mut self, start: usize, end: usize) {
        self.sites[start..=end].reverse();
    }

    pub fn sites(&self) -> &[V] {
        &self.sites
    }

    pub fn into_sites(self) -> Vec<V> {
        self.sites
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    #[inline(always)]
    pub fn is_fixed(&self, site: usize) -> bool {
        self.fixed[site]
    }

    pub fn fixed_mask(&self) -> &[bool] {
        &self.fixed
    }

    #[inline(always)]
    pub fn mutable_sites(&self) -> &[usize] {
        &self.mutable
    }
}
