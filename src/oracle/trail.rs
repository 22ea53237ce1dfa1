use crate::geometry::{bit, full_mask, ConstraintGroups};

/// One decision on the trail: the site, the value currently tried there, and
/// the candidates not yet tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub site: usize,
    pub value: u8,
    pub untried: u64,
}

impl Frame {
    pub fn remaining(&self) -> u32 {
        self.untried.count_ones()
    }
}

/// Which half of the search loop runs next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Advance,
    Retreat,
}

/// How a search pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Every site holds a value consistent with all groups.
    Complete,
    /// The trail unwound past the first decision.
    Exhausted,
}

/// Depth-first search over all completions of a set of givens.
///
/// Givens sit below the trail and are never revisited. Every trail frame is
/// consistent with the givens and the frames before it, so a value is used
/// at most once per group and `used[g]` can be a plain bitmask.
pub struct Trail<'g> {
    groups: &'g ConstraintGroups,
    values: Vec<u8>,
    used: Vec<u64>,
    frames: Vec<Frame>,
    open: usize,
    full: u64,
}

impl<'g> Trail<'g> {
    /// `givens[site]` is `0` for an open site. Returns `None` when two givens clash.
    pub fn new(groups: &'g ConstraintGroups, givens: &[u8]) -> Option<Self> {
        let mut trail = Self {
            groups,
            values: vec![0; givens.len()],
            used: vec![0; groups.groups().len()],
            frames: Vec::with_capacity(givens.len()),
            open: givens.len(),
            full: full_mask(groups.symbols()),
        };
        for (site, &v) in givens.iter().enumerate() {
            if v == 0 {
                continue;
            }
            if v > groups.symbols() || trail.candidates(site) & bit(v) == 0 {
                return None;
            }
            trail.place(site, v);
        }
        Some(trail)
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Runs Advance/Retreat until the trail is complete or exhausted.
    pub fn run(&mut self, mut phase: Phase) -> Pass {
        loop {
            phase = match phase {
                Phase::Advance => match self.advance() {
                    Some(next) => next,
                    None => return Pass::Complete,
                },
                Phase::Retreat => match self.retreat() {
                    Some(next) => next,
                    None => return Pass::Exhausted,
                },
            };
        }
    }

    /// Extends the trail at the open site with the fewest candidates.
    ///
    /// Ties go to the first such site in row-major order. `None` means the
    /// trail already covers every site.
    fn advance(&mut self) -> Option<Phase> {
        if self.open == 0 {
            return None;
        }

        let mut best: Option<(usize, u64)> = None;
        let mut best_count = u32::MAX;
        for site in 0..self.values.len() {
            if self.values[site] != 0 {
                continue;
            }
            let mask = self.candidates(site);
            let count = mask.count_ones();
            if count == 0 {
                return Some(Phase::Retreat);
            }
            if count < best_count {
                best_count = count;
                best = Some((site, mask));
            }
        }

        let (site, mask) = best?;
        let value = lowest(mask);
        self.place(site, value);
        self.frames.push(Frame {
            site,
            value,
            untried: mask & !bit(value),
        });
        Some(Phase::Advance)
    }

    /// Moves the newest frame to its next untried candidate, popping frames
    /// that have none left. `None` means the trail is back at the givens.
    fn retreat(&mut self) -> Option<Phase> {
        while let Some(frame) = self.frames.last().copied() {
            self.clear(frame.site, frame.value);
            if frame.untried != 0 {
                let value = lowest(frame.untried);
                self.place(frame.site, value);
                if let Some(top) = self.frames.last_mut() {
                    top.value = value;
                    top.untried &= !bit(value);
                }
                return Some(Phase::Advance);
            }
            self.frames.pop();
        }
        None
    }

    #[inline(always)]
    fn candidates(&self, site: usize) -> u64 {
        let taken = self
            .groups
            .groups_of(site)
            .iter()
            .fold(0u64, |acc, &g| acc | self.used[g]);
        self.full & !taken
    }

    #[inline(always)]
    fn place(&mut self, site: usize, value: u8) {
        self.values[site] = value;
        self.open -= 1;
        let b = bit(value);
        for &g in self.groups.groups_of(site) {
            self.used[g] |= b;
        }
    }

    #[inline(always)]
    fn clear(&mut self, site: usize, value: u8) {
        self.values[site] = 0;
        self.open += 1;
        let b = bit(value);
        for &g in self.groups.groups_of(site) {
            self.used[g] &= !b;
        }
    }
}

#[inline(always)]
fn lowest(mask: u64) -> u8 {
    mask.trailing_zeros() as u8 + 1
}
