use super::{budget_options, CliLogger};
use crate::reports;
use clap::Args;
use metropolis::config::SearchParams;
use metropolis::optimizer::{Annealer, PointMutation};
use metropolis::scorer::image::{self, DenoiseCost, DEFAULT_TEMPERATURE};
use metropolis::scorer::loader;
use metropolis::{MetroResult, RandomSource};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct DenoiseArgs {
    /// Bitmap of `0/1` or `./#` rows.
    #[arg(short, long)]
    pub image: String,

    /// Age of the image; sets the smoothness weight.
    #[arg(long, default_value_t = 1.0)]
    pub years: f64,

    /// Explicit smoothness weight. Overrides `--years`.
    #[arg(long)]
    pub lambda: Option<f64>,

    /// Treat the input as clean and age it by `--years` before restoring.
    #[arg(long)]
    pub degrade: bool,

    #[command(flatten)]
    pub search: SearchParams,
}

pub fn run(args: &DenoiseArgs, search: &SearchParams, rng: &mut RandomSource) -> MetroResult<()> {
    info!("📂 Loading Bitmap: {}", args.image);
    let (size, pixels) = loader::load_bitmap(&args.image)?;
    let original = if args.degrade {
        Some(pixels.clone())
    } else {
        None
    };
    let pixels = match &original {
        Some(clean) => {
            let aged = image::degrade(clean, args.years, rng)?;
            info!(
                "   Aged {} years: {} of {} pixels flipped",
                args.years,
                image::disagreement(clean, &aged),
                aged.len()
            );
            aged
        }
        None => pixels,
    };
    let lambda = args
        .lambda
        .unwrap_or_else(|| image::lambda_for_years(args.years));
    info!("   {}x{} pixels, lambda {:.4}", size.rows, size.cols, lambda);

    let model = DenoiseCost::new(size, pixels, lambda)?;
    let mut moves = PointMutation::new(&[0u8, 1u8])?;
    let annealer = Annealer::new(budget_options(search, DEFAULT_TEMPERATURE))?;
    let outcome = annealer.run(model.start(), &model, &mut moves, rng, &CliLogger)?;

    reports::print_run_summary(&outcome);
    if let Some(clean) = &original {
        reports::print_bitmap("ORIGINAL", size, clean);
    }
    reports::print_bitmap("DEGRADED", size, model.degraded());
    reports::print_bitmap("RESTORED", size, outcome.best.config.sites());

    if let Some(clean) = &original {
        info!(
            "🏆 Wrong pixels: {} degraded, {} restored",
            image::disagreement(clean, model.degraded()),
            image::disagreement(clean, outcome.best.config.sites())
        );
    }
    Ok(())
}
