use super::{budget_options, CliLogger};
use crate::reports;
use clap::Args;
use metropolis::config::SearchParams;
use metropolis::optimizer::{Annealer, LotTransfer};
use metropolis::scorer::loader;
use metropolis::scorer::portfolio::{PortfolioCost, DEFAULT_LOTS, DEFAULT_TEMPERATURE};
use metropolis::{MetroResult, RandomSource};
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct PortfolioArgs {
    /// CSV covariance matrix: a header row of asset names, then one row per asset.
    #[arg(short, long)]
    pub covariance: String,

    /// Number of lots the portfolio is split into.
    #[arg(long, default_value_t = DEFAULT_LOTS)]
    pub lots: i64,

    /// Allow negative holdings.
    #[arg(long)]
    pub allow_shorts: bool,

    #[command(flatten)]
    pub search: SearchParams,
}

pub fn run(args: &PortfolioArgs, search: &SearchParams, rng: &mut RandomSource) -> MetroResult<()> {
    info!("📂 Loading Covariance: {}", args.covariance);
    let (tickers, cov) = loader::load_covariance(&args.covariance)?;
    let model = PortfolioCost::new(tickers.len(), cov, args.lots)?;
    info!(
        "   {} assets in {} lots, shorts {}",
        model.assets(),
        model.lots(),
        if args.allow_shorts { "allowed" } else { "forbidden" }
    );

    let mut moves = LotTransfer::new(1)?;
    if !args.allow_shorts {
        moves = moves.long_only();
    }
    let annealer = Annealer::new(budget_options(search, DEFAULT_TEMPERATURE))?;
    let outcome = annealer.run(model.equal_start(), &model, &mut moves, rng, &CliLogger)?;

    reports::print_run_summary(&outcome);
    let best = &outcome.best.config;
    reports::print_weights("HOLDINGS", &tickers, best.sites(), &model.weights(best));

    info!(
        "🏆 Variance {:.6e}, volatility {:.6}",
        outcome.best.cost,
        outcome.best.cost.max(0.0).sqrt()
    );
    if model.is_stable(best, moves.amount(), moves.is_long_only()) {
        info!("✅ No single-lot transfer lowers the variance.");
    } else {
        warn!("❌ Budget ran out before the holdings settled.");
    }
    if args.allow_shorts {
        let optimum = model.min_variance_weights()?;
        info!("   Closed-form minimum variance {:.6e}", model.variance_of(&optimum));
    }
    Ok(())
}
