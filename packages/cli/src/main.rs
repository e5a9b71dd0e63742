use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod demo;
mod scenario;

/// Tickwork CLI
/// Replays scheduler scenarios and runs built-in demonstrations
#[derive(Parser)]
#[command(name = "tickwork", version)]
#[command(about = "Deterministic virtual-time routine scheduler", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "debug", "tickwork=trace")
    #[arg(long, global = true, default_value = "info", env = "TICKWORK_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a TOML scenario and print its invocation trace
    Replay {
        /// Scenario file
        scenario: PathBuf,

        /// Replay this many times and check every trace is identical
        #[arg(short, long, default_value_t = 1)]
        repeat: u32,
    },
    /// Run a built-in demonstration
    Demo {
        #[arg(value_enum)]
        which: DemoKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DemoKind {
    /// A routine spawning a hundred children
    Spawn,
    /// Multi-segment routines interleaving
    Segments,
    /// Timed events through the event simulator
    Events,
}

fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    info!("tickwork {}", tickwork::VERSION);

    match cli.command {
        Commands::Replay { scenario, repeat } => {
            let scenario = scenario::Scenario::load(&scenario)?;
            let trace = scenario.replay_checked(repeat.max(1))?;
            for line in &trace {
                println!("{line}");
            }
            info!(invocations = trace.len(), repeat, "replay finished");
        }
        Commands::Demo { which } => match which {
            DemoKind::Spawn => demo::spawn(),
            DemoKind::Segments => demo::segments(),
            DemoKind::Events => demo::events(),
        },
    }

    Ok(())
}
