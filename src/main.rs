//! Command-line front end for the UCT engine, playing tic-tac-toe.
//!
//! Subcommands:
//!   decide - run one search from a board and print the chosen cell with root statistics
//!   match  - play a series of games between the engine and an opponent
//!
//! Usage:
//!   uct_bot decide --board "X../.O./..." --iterations 2000 --seed 7
//!   uct_bot decide --preset modified --json
//!   uct_bot match --games 20 --opponent random --seed 2025

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::path::PathBuf;

use uct_bot::game::tic_tac_toe::{Board, TicTacToe};
use uct_bot::logging::setup_logging;
use uct_bot::match_runner::{play_match, Agent};
use uct_bot::{FinalActionPolicy, GameOracle, SearchConfig, TreeSearchEngine};

// ============================================================
// CLI
// ============================================================

#[derive(Parser, Debug)]
#[command(
    name = "uct_bot",
    about = "Monte Carlo Tree Search (UCT) player for two-player games"
)]
struct Cli {
    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Write rotating log files to this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pick one move for the side to play
    Decide {
        /// Board as nine cells of X, O or '.', rows optionally separated by '/'
        #[arg(long)]
        board: Option<String>,

        /// Print the full search report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        #[command(flatten)]
        search: SearchArgs,
    },
    /// Play several games against an opponent, alternating who starts
    Match {
        /// Number of games to play
        #[arg(short, long, default_value_t = 10)]
        games: usize,

        /// Opponent agent
        #[arg(long, value_enum, default_value = "random")]
        opponent: OpponentCli,

        /// RNG seed for the whole match
        #[arg(long)]
        match_seed: Option<u64>,

        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum PresetCli {
    /// C = 2.0, iteration budget only
    Vanilla,
    /// C = 10.0 with a one-second clock
    Modified,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OpponentCli {
    Random,
    Vanilla,
    Modified,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// JSON file with a SearchConfig; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base configuration when no file is given
    #[arg(long, value_enum, default_value = "vanilla")]
    preset: PresetCli,

    /// Number of playouts per decision
    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Exploration constant C
    #[arg(short = 'c', long)]
    exploration: Option<f64>,

    /// Wall-clock limit per decision, in seconds
    #[arg(long)]
    time_budget: Option<f64>,

    /// RNG seed for reproducible searches
    #[arg(short, long)]
    seed: Option<u64>,

    /// Choose the most visited root child instead of the best win rate
    #[arg(long, default_value_t = false)]
    most_visited: bool,
}

impl SearchArgs {
    fn to_config(&self) -> uct_bot::Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::from_json_file(path)?,
            None => match self.preset {
                PresetCli::Vanilla => SearchConfig::vanilla(),
                PresetCli::Modified => SearchConfig::modified(),
            },
        };

        if let Some(iterations) = self.iterations {
            config.iteration_budget = iterations;
        }
        if let Some(c) = self.exploration {
            config.exploration_constant = c;
        }
        if let Some(seconds) = self.time_budget {
            config.time_budget_seconds = Some(seconds);
        }
        if let Some(seed) = self.seed {
            config.random_seed = Some(seed);
        }
        if self.most_visited {
            config.final_action = FinalActionPolicy::MostVisited;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let _logger = setup_logging(&cli.log_level, cli.log_dir.as_deref())?;

    match cli.command {
        Commands::Decide {
            board,
            json,
            search,
        } => run_decide(board.as_deref(), json, &search),
        Commands::Match {
            games,
            opponent,
            match_seed,
            search,
        } => run_match(games, opponent, match_seed, &search),
    }
}

fn run_decide(board: Option<&str>, json: bool, search: &SearchArgs) -> Result<(), Box<dyn Error>> {
    let game = TicTacToe::new();
    let state = match board {
        Some(text) => Board::parse(text)?,
        None => game.initial_state(),
    };
    let config = search.to_config()?;

    log::info!("Searching with {}", config.to_config_string());
    let result = TreeSearchEngine::new(&game, &config).search(&state)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}\n", state);
    println!("{} to move", game.current_player(&state));
    println!(
        "Chosen cell        : {} (row {}, col {})",
        result.action,
        result.action / 3,
        result.action % 3
    );
    println!(
        "Iterations         : {} ({:?})",
        result.iterations, result.termination
    );
    println!("Nodes              : {}", result.nodes_created);
    println!("Elapsed            : {:.1} ms", result.elapsed_ms);
    println!();
    println!("cell  visits  winrate");
    for child in &result.children {
        let marker = if child.action == result.action { "*" } else { " " };
        println!(
            "{}{:>3}  {:>6}  {:>7.3}",
            marker, child.action, child.visits, child.signed_winrate
        );
    }
    Ok(())
}

fn run_match(
    games: usize,
    opponent: OpponentCli,
    match_seed: Option<u64>,
    search: &SearchArgs,
) -> Result<(), Box<dyn Error>> {
    let game = TicTacToe::new();
    let config = search.to_config()?;
    let agent_a = Agent::Mcts(config.clone());
    let agent_b = match opponent {
        OpponentCli::Random => Agent::Random,
        OpponentCli::Vanilla => Agent::Mcts(SearchConfig {
            iteration_budget: config.iteration_budget,
            ..SearchConfig::vanilla()
        }),
        OpponentCli::Modified => Agent::Mcts(SearchConfig {
            iteration_budget: config.iteration_budget,
            ..SearchConfig::modified()
        }),
    };

    let summary = play_match(
        &game,
        &game.initial_state(),
        &agent_a,
        &agent_b,
        games,
        match_seed,
    )?;

    println!("\n===== Match Summary =====");
    println!("A                  : {}", agent_a.label());
    println!("B                  : {}", agent_b.label());
    println!("Games              : {}", summary.games);
    println!("A wins             : {}", summary.wins_a);
    println!("B wins             : {}", summary.wins_b);
    println!("Draws              : {}", summary.draws);
    println!("A score            : {:.3}", summary.score_a());
    Ok(())
}
