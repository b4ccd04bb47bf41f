mod engine;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use lib::search::{DEFAULT_DEPTH, DEFAULT_NODE_LIMIT};
use lib::{Agent, GreedyAgent, MinimaxAgent, SearchConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "skirmish")]
#[command(about = "Picks the next action for one side of a two-player grid skirmish")]
#[command(version)]
struct Cli {
    /// Game description to read
    #[arg(default_value = "input.txt")]
    input: PathBuf,

    /// Number of passes the search looks ahead
    #[arg(short, long, env = "SKIRMISH_DEPTH", default_value_t = DEFAULT_DEPTH)]
    depth: u32,

    /// Nodes one decision may expand before the rest is scored statically (0 for no limit)
    #[arg(long, env = "SKIRMISH_NODE_LIMIT", default_value_t = DEFAULT_NODE_LIMIT)]
    node_limit: u64,

    /// Decision strategy
    #[arg(short, long, value_enum, default_value = "minimax")]
    agent: AgentType,

    /// Print the action as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AgentType {
    Minimax,
    Greedy,
}

impl AgentType {
    fn create(self, config: SearchConfig) -> Box<dyn Agent> {
        match self {
            AgentType::Minimax => Box::new(MinimaxAgent::new(config)),
            AgentType::Greedy => Box::new(GreedyAgent::new()),
        }
    }
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> color_eyre::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    color_eyre::install()?;

    let config = SearchConfig {
        depth: cli.depth,
        node_limit: (cli.node_limit > 0).then_some(cli.node_limit),
    };
    let agent = cli.agent.create(config);
    info!(agent = agent.name(), depth = config.depth, "starting");

    let action = engine::calc_move(&cli.input, &*agent);
    if cli.json {
        println!("{}", serde_json::to_string(&action)?);
    } else {
        println!("{action}");
    }
    Ok(())
}
