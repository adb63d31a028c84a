use ballsort_solver::engine::{BallSortRules, BallSortState};
use ballsort_solver::heuristics::Heuristic;
use ballsort_solver::{Algorithm, SearchConfig, Solver};
use clap::Parser;
use std::collections::HashMap;

const START_SEED: u64 = 0;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare heuristics and algorithms on random puzzles")]
struct Args {
    /// Number of random puzzles to evaluate
    #[clap(short, long, default_value_t = 20)]
    boards: u64,

    /// Colors per puzzle
    #[clap(long, default_value_t = 4)]
    colors: usize,

    /// Tube capacity
    #[clap(long, default_value_t = 4)]
    capacity: usize,

    /// Empty tubes per puzzle
    #[clap(long, default_value_t = 2)]
    empty: usize,

    /// Scramble moves per puzzle
    #[clap(long, default_value_t = 30)]
    scramble: usize,

    /// Expansion cap per run
    #[clap(long, default_value_t = 200_000)]
    max_expansions: u64,
}

#[derive(Default)]
struct Totals {
    solved: u32,
    cost: u64,
    expansions: u64,
    seconds: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let runs: Vec<(Algorithm, Heuristic)> = [Algorithm::AStar, Algorithm::Greedy]
        .into_iter()
        .flat_map(|algorithm| Heuristic::ALL.map(|heuristic| (algorithm, heuristic)))
        .collect();
    let mut totals: HashMap<(Algorithm, Heuristic), Totals> = HashMap::new();
    let config = SearchConfig::default().with_max_expansions(args.max_expansions);

    println!("Starting heuristic evaluation for {} puzzles...", args.boards);

    for board_idx in 0..args.boards {
        let seed = START_SEED + board_idx;
        let initial =
            BallSortState::scrambled(args.colors, args.capacity, args.empty, args.scramble, seed)?;
        println!("\nEvaluating puzzle {} (Seed: {})", board_idx, seed);

        for &(algorithm, heuristic) in &runs {
            let mut solver = Solver::with_config(
                BallSortRules::default(),
                heuristic.function(),
                config.clone(),
            );
            let outcome = solver.run(algorithm, &initial)?;
            let entry = totals.entry((algorithm, heuristic)).or_default();
            entry.expansions += outcome.stats.expansions;
            entry.seconds += outcome.stats.elapsed.as_secs_f64();
            match &outcome.solution {
                Some(solution) => {
                    entry.solved += 1;
                    entry.cost += solution.cost;
                    println!(
                        "  {:<18} {:<10} cost {:<4} expansions {}",
                        algorithm.to_string(),
                        heuristic.name(),
                        solution.cost,
                        outcome.stats.expansions
                    );
                }
                None => println!(
                    "  {:<18} {:<10} unsolved ({:?})",
                    algorithm.to_string(),
                    heuristic.name(),
                    outcome.termination
                ),
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    for (algorithm, heuristic) in &runs {
        let Some(t) = totals.get(&(*algorithm, *heuristic)) else {
            continue;
        };
        let avg_cost = if t.solved > 0 {
            t.cost as f64 / t.solved as f64
        } else {
            f64::NAN
        };
        println!(
            "{:<18} {:<10}: solved {}/{}, average cost {:.2}, total expansions {}, {:.3}s",
            algorithm.to_string(),
            heuristic.name(),
            t.solved,
            args.boards,
            avg_cost,
            t.expansions,
            t.seconds
        );
    }
    Ok(())
}
