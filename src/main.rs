use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use metropolis::config::{Config, ReduceParams, SearchParams};
use metropolis::{MetroResult, RandomSource};
use std::process;
use tracing::{error, info};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Seed for the random stream. Drawn from entropy and logged when absent.
    #[arg(global = true, short = 'S', long)]
    seed: Option<u64>,

    /// JSON config file; flags given on the command line win.
    #[arg(global = true, long)]
    config: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve a Sudoku read from a file
    Solve(cmd::solve::SolveArgs),
    /// Generate a uniquely solvable, symmetric Sudoku
    Generate(cmd::generate::GenerateArgs),
    /// Solve a KenKen read from a file
    Kenken(cmd::kenken::KenKenArgs),
    /// Fill a word square from a dictionary
    Crossword(cmd::crossword::CrosswordArgs),
    /// Shorten a closed tour through points read from CSV
    Tour(cmd::tour::TourArgs),
    /// Arrange 1..=n^2 into a magic square
    Magic(cmd::magic::MagicArgs),
    /// Restore a noisy black-and-white bitmap
    Denoise(cmd::denoise::DenoiseArgs),
    /// Find minimum-variance holdings from a covariance CSV
    Portfolio(cmd::portfolio::PortfolioArgs),
}

impl Commands {
    fn search(&self) -> &SearchParams {
        match self {
            Commands::Solve(a) => &a.search,
            Commands::Generate(a) => &a.search,
            Commands::Kenken(a) => &a.search,
            Commands::Crossword(a) => &a.search,
            Commands::Tour(a) => &a.search,
            Commands::Magic(a) => &a.search,
            Commands::Denoise(a) => &a.search,
            Commands::Portfolio(a) => &a.search,
        }
    }
}

/// File values first, then whatever the user typed on top.
fn resolve_config(cli: &Cli, sub_matches: &ArgMatches) -> MetroResult<Config> {
    let Some(path) = &cli.config else {
        let reduce = match &cli.command {
            Commands::Generate(a) => a.reduce.clone(),
            _ => ReduceParams::default(),
        };
        return Ok(Config {
            search: cli.command.search().clone(),
            reduce,
        });
    };

    info!("⚙️  Loading Config from: {}", path);
    let mut config = Config::load_from_file(path)?;
    config.search.merge_from_cli(cli.command.search(), sub_matches);
    if let Commands::Generate(a) = &cli.command {
        config.reduce.merge_from_cli(&a.reduce, sub_matches);
    }
    Ok(config)
}

fn run(cli: &Cli, sub_matches: &ArgMatches) -> MetroResult<()> {
    let config = resolve_config(cli, sub_matches)?;

    let mut rng = match cli.seed {
        Some(s) => RandomSource::with_seed(s),
        None => RandomSource::from_entropy(),
    };
    info!("🎲 Seed: {}", rng.seed());

    let search = &config.search;
    match &cli.command {
        Commands::Solve(args) => cmd::solve::run(args, search, &mut rng),
        Commands::Generate(args) => cmd::generate::run(args, search, &config.reduce, &mut rng),
        Commands::Kenken(args) => cmd::kenken::run(args, search, &mut rng),
        Commands::Crossword(args) => cmd::crossword::run(args, search, &mut rng),
        Commands::Tour(args) => cmd::tour::run(args, search, &mut rng),
        Commands::Magic(args) => cmd::magic::run(args, search, &mut rng),
        Commands::Denoise(args) => cmd::denoise::run(args, search, &mut rng),
        Commands::Portfolio(args) => cmd::portfolio::run(args, search, &mut rng),
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    // Raw matches tell user input apart from defaults when merging a config file.
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    let Some((_, sub_matches)) = matches.subcommand() else {
        error!("❌ No command given.");
        process::exit(2);
    };

    info!("🚀 Initializing Metropolis...");
    if let Err(e) = run(&cli, sub_matches) {
        error!("❌ {}", e);
        process::exit(1);
    }
}
