use clap::Parser;
use gridq::report::{run_seeds, write_csv, Summary};
use gridq::GridError;
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "trainagent", about = "Train the grid-world agent without a window")]
struct Cli {
    /// Episodes per seed
    #[arg(long, default_value_t = 300)]
    episodes: u32,

    /// Comma separated RNG seeds, one independent run each
    #[arg(long, value_delimiter = ',', default_value = "0")]
    seeds: Vec<u64>,

    /// Give up on a run after this many steps
    #[arg(long, default_value_t = 1_000_000)]
    step_limit: u64,

    /// Trailing episodes averaged in the summary
    #[arg(long, default_value_t = 20)]
    window: usize,

    /// Write every episode record to this CSV file
    #[arg(long)]
    out: Option<PathBuf>,
}

fn init_logging() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(d) = "gridq=info".parse() {
        filter = filter.add_directive(d);
    }
    fmt().with_env_filter(filter).init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();

    if cli.seeds.is_empty() {
        return Err(GridError::InvalidArgument {
            name: "seeds".to_owned(),
            reason: "at least one seed is required".to_owned(),
        }
        .into());
    }

    info!(episodes = cli.episodes, seeds = ?cli.seeds, "starting headless training");
    let runs = run_seeds(&cli.seeds, cli.episodes, cli.step_limit);

    for run in &runs {
        let summary = Summary::from_records(&run.records, cli.window)?;
        println!(
            "seed {}: {} episodes, {} goals, {} pits, mean steps {:.1}, mean reward (last {}) {:.2}, epsilon {:.3}",
            run.seed,
            summary.episodes,
            summary.goals,
            summary.pits,
            summary.mean_steps,
            cli.window,
            summary.mean_recent_reward,
            run.state.agent.epsilon,
        );
        println!("{}", run.state.grid.policy_map());
    }

    if let Some(path) = &cli.out {
        let records: Vec<_> = runs.iter().flat_map(|run| run.records.iter().cloned()).collect();
        write_csv(&records, File::create(path)?)?;
        info!(path = %path.display(), records = records.len(), "wrote episode records");
    }

    Ok(())
}
