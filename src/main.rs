use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Builder;
use log::{LevelFilter, info};
use std::path::{Path, PathBuf};

use iot_network_routing::analysis::{PathFinder, PathObjective, compute_statistics};
use iot_network_routing::config::AppConfig;
use iot_network_routing::topology::{ConnectivityRule, Network, NetworkGenerator, NetworkSnapshot, NodeId};

#[derive(Parser)]
#[command(name = "iot-network", about = "Generate and inspect simulated IoT network topologies")]
struct Cli {
    /// TOML configuration file (defaults to ./iot-network.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level override: off, error, warn, info, debug, trace
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a random network and save it as JSON
    Generate {
        /// Number of nodes
        #[arg(short, long)]
        nodes: Option<usize>,
        /// Map width
        #[arg(short, long)]
        width: Option<f64>,
        /// Map height
        #[arg(long)]
        height: Option<f64>,
        /// Maximum communication range
        #[arg(short = 'r', long)]
        max_range: Option<f64>,
        /// Seed for reproducible results
        #[arg(short, long)]
        seed: Option<u64>,
        /// Output file
        #[arg(short, long, default_value = "network.json")]
        output: PathBuf,
    },
    /// Print statistics of a saved network
    Stats { input: PathBuf },
    /// Find the shortest path between two nodes of a saved network
    Path {
        input: PathBuf,
        source: NodeId,
        destination: NodeId,
        /// Override the configured path objective
        #[arg(long)]
        objective: Option<ObjectiveArg>,
    },
    /// Compute best paths from every node and save them as JSON
    Paths {
        input: PathBuf,
        /// Output file
        #[arg(short, long, default_value = "paths.json")]
        output: PathBuf,
        /// Override the configured path objective
        #[arg(long)]
        objective: Option<ObjectiveArg>,
    },
    /// Load a saved network and check its invariants
    Validate { input: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum ObjectiveArg {
    Distance,
    HopCount,
}

impl From<ObjectiveArg> for PathObjective {
    fn from(arg: ObjectiveArg) -> Self {
        match arg {
            ObjectiveArg::Distance => PathObjective::Distance,
            ObjectiveArg::HopCount => PathObjective::HopCount,
        }
    }
}

fn init_logging(level: LevelFilter) {
    Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter(Some("iot_network_routing"), level)
        .filter(Some("iot_network"), level)
        .parse_default_env()
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(cli.config.as_deref()).map_err(anyhow::Error::msg)?;
    let mut logging = config.logging.clone();
    if let Some(level) = cli.log_level {
        logging.level = level;
    }
    let level = logging.level_filter().map_err(anyhow::Error::msg)?;
    init_logging(level);

    match cli.command {
        Command::Generate {
            nodes,
            width,
            height,
            max_range,
            seed,
            output,
        } => {
            let mut params = config.generator.clone();
            params.node_count = nodes.unwrap_or(params.node_count);
            params.width = width.unwrap_or(params.width);
            params.height = height.unwrap_or(params.height);
            params.max_range = max_range.unwrap_or(params.max_range);
            params.seed = seed.or(params.seed);

            let network = NetworkGenerator::new(params).with_rule(config.routing.rule).generate()?;
            println!("Generated {}", network);
            network.save_to_file(&output)?;
            println!("Network saved to {}", output.display());
        }
        Command::Stats { input } => {
            let network = load(&input, config.routing.rule)?;
            let report = compute_statistics(&network);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Path {
            input,
            source,
            destination,
            objective,
        } => {
            let network = load(&input, config.routing.rule)?;
            let objective = objective.map(PathObjective::from).unwrap_or(config.routing.objective);
            let result = PathFinder::new(&network).with_objective(objective).find_path(source, destination)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Paths { input, output, objective } => {
            let network = load(&input, config.routing.rule)?;
            let objective = objective.map(PathObjective::from).unwrap_or(config.routing.objective);
            let table = PathFinder::new(&network).with_objective(objective).path_table()?;
            let json = serde_json::to_string_pretty(&table)?;
            std::fs::write(&output, json).with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Path calculations for {} sources saved to {}", table.len(), output.display());
        }
        Command::Validate { input } => {
            let network = load(&input, config.routing.rule)?;
            println!("{} is valid: {}", input.display(), network);
        }
    }

    Ok(())
}

fn load(path: &Path, rule: ConnectivityRule) -> anyhow::Result<Network> {
    info!("Loading network from {}", path.display());
    let snapshot = NetworkSnapshot::read_from_file(path)?;
    Network::from_snapshot_with_rule(&snapshot, rule).with_context(|| format!("Failed to load network from {}", path.display()))
}
