use anyhow::{bail, Context};
use ballsort_solver::engine::{BallSortRules, BallSortState};
use ballsort_solver::heuristics::Heuristic;
use ballsort_solver::utils::load_map;
use ballsort_solver::{Algorithm, SearchConfig, Solver, Termination};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlgorithmArg {
    Astar,
    Lazy,
    Greedy,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Astar => Algorithm::AStar,
            AlgorithmArg::Lazy => Algorithm::LazyAStar,
            AlgorithmArg::Greedy => Algorithm::Greedy,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON map file ({"capacity": N, "tubes": ["RGB", ...]})
    map_file: Option<PathBuf>,

    /// Search algorithm
    #[clap(short, long, value_enum, default_value = "astar")]
    algorithm: AlgorithmArg,

    /// Heuristic used to rank states
    #[clap(long, value_enum, default_value = "majority")]
    heuristic: Heuristic,

    /// Weight applied to the heuristic in A* keys
    #[clap(short, long, default_value_t = 1.0)]
    weight: f64,

    /// Stop after this many expansions
    #[clap(long)]
    max_expansions: Option<u64>,

    /// Stop after this many seconds
    #[clap(long)]
    time_limit: Option<f64>,

    /// Generate a random solvable puzzle from this seed instead of loading a map
    #[clap(long)]
    random_seed: Option<u64>,

    /// Colors in a generated puzzle
    #[clap(long, default_value_t = 4)]
    colors: usize,

    /// Tube capacity in a generated puzzle
    #[clap(long, default_value_t = 4)]
    capacity: usize,

    /// Empty tubes in a generated puzzle
    #[clap(long, default_value_t = 2)]
    empty: usize,

    /// Scramble moves applied to a generated puzzle
    #[clap(long, default_value_t = 40)]
    scramble: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_puzzle(args: &Args) -> anyhow::Result<BallSortState> {
    match (&args.map_file, args.random_seed) {
        (Some(path), None) => {
            load_map(path).with_context(|| format!("Failed to load map {}", path.display()))
        }
        (None, Some(seed)) => {
            BallSortState::scrambled(args.colors, args.capacity, args.empty, args.scramble, seed)
                .context("Failed to generate puzzle")
        }
        (Some(_), Some(_)) => bail!("pass either a map file or --random-seed, not both"),
        (None, None) => bail!("no puzzle given: pass a map file or --random-seed"),
    }
}

fn search_config(args: &Args) -> anyhow::Result<SearchConfig> {
    let mut config = SearchConfig::default().with_weight(args.weight);
    if let Some(max) = args.max_expansions {
        config = config.with_max_expansions(max);
    }
    if let Some(secs) = args.time_limit {
        let limit = Duration::try_from_secs_f64(secs).context("Invalid --time-limit")?;
        config = config.with_time_limit(limit);
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let initial = load_puzzle(&args)?;
    let config = search_config(&args)?;
    let algorithm = Algorithm::from(args.algorithm);

    println!("Initial state:\n{}", initial);
    println!(
        "Searching with {} and the {} heuristic...\n",
        algorithm,
        args.heuristic.name()
    );

    let rules = BallSortRules::default();
    let mut solver = Solver::with_config(rules, args.heuristic.function(), config);
    let outcome = solver.run(algorithm, &initial)?;
    let stats = &outcome.stats;

    match (&outcome.solution, outcome.termination) {
        (Some(solution), _) => {
            println!("The search was successful at finding a solution.");
            println!("Moves ({}):", solution.len());
            if solution.is_empty() {
                println!("  No moves needed.");
            }
            for (i, mv) in solution.moves.iter().enumerate() {
                println!("  Move {}: {}", i + 1, mv);
            }

            let mut replay = initial.clone();
            for mv in &solution.moves {
                replay = rules
                    .apply(&replay, *mv)
                    .with_context(|| format!("Solution move {mv} is illegal on replay"))?;
            }
            if &replay != solution.final_state() {
                bail!("replaying the solution did not reach the reported final state");
            }
            println!("\nFinal state:\n{}", replay);
            println!("Total cost: {}", solution.cost);
        }
        (None, Termination::LimitReached) => println!("Search limit reached before a solution was found."),
        (None, _) => println!("No solution exists for this puzzle."),
    }

    println!("Number of expansions: {}", stats.expansions);
    println!("Nodes generated: {}", stats.generated);
    println!("Nodes left in the open list: {}", stats.open_size);
    println!("Peak open list size: {}", stats.max_open_size);
    println!("Time: {:.3}s", stats.elapsed.as_secs_f64());
    println!("Heuristic consistent on this run: {}", stats.admissible);
    Ok(())
}
