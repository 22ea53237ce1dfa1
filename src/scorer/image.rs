use super::CostModel;
use crate::error::{MetroResult, MetropolisError};
use crate::geometry::GridSize;
use crate::optimizer::{Configuration, PointMove};
use crate::random::RandomSource;

pub const DEFAULT_TEMPERATURE: f64 = 0.5;

/// Chance that one degradation step flips a given pixel.
const FLIP_PER_STEP: f64 = 1.0 / 40_000.0;
const STEPS_PER_YEAR: f64 = 40.0;

/// Fraction of pixels expected to be flipped after `years` of degradation.
pub fn flip_probability(years: f64) -> f64 {
    (1.0 - (1.0 - 2.0 * FLIP_PER_STEP).powf(STEPS_PER_YEAR * years)) / 2.0
}

/// Smoothness weight matched to a flip probability `p` in `(0, 0.5)`.
pub fn lambda_for_probability(p: f64) -> f64 {
    1.0 / (1.0 + ((1.0 - p) / p).ln())
}

pub fn lambda_for_years(years: f64) -> f64 {
    lambda_for_probability(flip_probability(years))
}

/// Random single-pixel flips that age an image of `pixels` pixels by `years`.
pub fn flips_for(pixels: usize, years: f64) -> usize {
    (STEPS_PER_YEAR * years * pixels as f64 * FLIP_PER_STEP).round() as usize
}

/// Ages a clean image: each flip picks a pixel uniformly, repeats allowed.
pub fn degrade(image: &[u8], years: f64, rng: &mut RandomSource) -> MetroResult<Vec<u8>> {
    if !years.is_finite() || years < 0.0 {
        return Err(MetropolisError::Config(format!(
            "years must be finite and non-negative, got {}",
            years
        )));
    }
    let mut aged = image.to_vec();
    if aged.is_empty() {
        return Ok(aged);
    }
    for _ in 0..flips_for(aged.len(), years) {
        let site = rng.index(aged.len());
        aged[site] ^= 1;
    }
    Ok(aged)
}

/// Pixels where two images differ.
pub fn disagreement(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

/// Restores a noisy black-and-white image.
///
/// Energy is `lambda * B + (1 - lambda) * D`, where `B` counts black/white
/// boundary segments (outside the image is white) and `D` counts pixels that
/// disagree with the degraded input. Pixels are `0` (white) or `1` (black).
#[derive(Debug, Clone)]
pub struct DenoiseCost {
    size: GridSize,
    degraded: Vec<u8>,
    lambda: f64,
}

impl DenoiseCost {
    pub fn new(size: GridSize, degraded: Vec<u8>, lambda: f64) -> MetroResult<Self> {
        if degraded.len() != size.len() {
            return Err(MetropolisError::Input(format!(
                "image has {} pixels, expected {}x{}",
                degraded.len(),
                size.rows,
                size.cols
            )));
        }
        if degraded.iter().any(|&p| p > 1) {
            return Err(MetropolisError::Input("pixels must be 0 or 1".into()));
        }
        if !(0.0..=1.0).contains(&lambda) {
            return Err(MetropolisError::Config(format!(
                "lambda must lie in [0, 1], got {}",
                lambda
            )));
        }
        Ok(Self {
            size,
            degraded,
            lambda,
        })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn degraded(&self) -> &[u8] {
        &self.degraded
    }

    /// The degraded image itself, every pixel free.
    pub fn start(&self) -> Configuration<u8> {
        Configuration::free(self.degraded.clone())
    }

    /// Boundary segments around `site`, counting the white border.
    fn boundary_at(&self, config: &Configuration<u8>, site: usize) -> i64 {
        let v = config.get(site);
        let inside = self.size.neighbors4(site);
        let mut count = 0;
        let mut seen = 0;
        for nb in inside {
            seen += 1;
            if config.get(nb) != v {
                count += 1;
            }
        }
        // Missing neighbours are the white border.
        if v == 1 {
            count += 4 - seen;
        }
        count
    }
}

impl CostModel<Configuration<u8>, PointMove<u8>> for DenoiseCost {
    type Energy = f64;

    fn cost(&self, config: &Configuration<u8>) -> f64 {
        let (rows, cols) = (self.size.rows, self.size.cols);
        let mut boundary = 0i64;
        let mut mismatch = 0i64;
        for site in 0..config.len() {
            let v = config.get(site);
            let (r, c) = (self.size.row(site), self.size.col(site));
            // Right and down edges, plus the border where the image ends.
            if c + 1 < cols {
                boundary += i64::from(config.get(site + 1) != v);
            }
            if r + 1 < rows {
                boundary += i64::from(config.get(site + cols) != v);
            }
            if v == 1 {
                let border = [r == 0, r + 1 == rows, c == 0, c + 1 == cols];
                boundary += border.iter().filter(|&&b| b).count() as i64;
            }
            mismatch += i64::from(v != self.degraded[site]);
        }
        self.lambda * boundary as f64 + (1.0 - self.lambda) * mismatch as f64
    }

    fn delta(&self, config: &Configuration<u8>, mv: &PointMove<u8>) -> f64 {
        let current = config.get(mv.site);
        if mv.to == current {
            return 0.0;
        }
        // Flipping a pixel turns each of its four boundary segments over.
        let d_boundary = 4 - 2 * self.boundary_at(config, mv.site);
        let d_mismatch = if current == self.degraded[mv.site] { 1 } else { -1 };
        self.lambda * d_boundary as f64 + (1.0 - self.lambda) * d_mismatch as f64
    }
}
