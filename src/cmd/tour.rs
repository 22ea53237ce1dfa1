use super::{budget_options, CliLogger};
use crate::reports;
use clap::Args;
use metropolis::config::SearchParams;
use metropolis::optimizer::{Annealer, SegmentReversal};
use metropolis::scorer::loader;
use metropolis::scorer::tour::{TourCost, DEFAULT_TEMPERATURE};
use metropolis::{MetroResult, RandomSource};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct TourArgs {
    /// CSV with `x,y` columns, one city per row. City 0 starts the tour.
    #[arg(short, long)]
    pub points: String,

    #[command(flatten)]
    pub search: SearchParams,
}

pub fn run(args: &TourArgs, search: &SearchParams, rng: &mut RandomSource) -> MetroResult<()> {
    info!("📂 Loading Cities: {}", args.points);
    let points = loader::load_points(&args.points)?;
    let model = TourCost::from_points(&points)?;
    info!("   {} cities", model.cities());

    let annealer = Annealer::new(budget_options(search, DEFAULT_TEMPERATURE))?;
    let outcome = annealer.run(
        model.random_start(rng)?,
        &model,
        &mut SegmentReversal::anchored(),
        rng,
        &CliLogger,
    )?;

    reports::print_run_summary(&outcome);
    let order: Vec<String> = outcome
        .best
        .config
        .sites()
        .iter()
        .map(|c| c.to_string())
        .collect();
    info!("🏆 Tour length {:.4}: {}", outcome.best.cost, order.join(" -> "));
    Ok(())
}
