use std::process;
use std::time::Duration;

use clap::{App, Arg, ArgGroup};
use log::info;

use hospital_solver::config::{self, HeuristicKind, Library, SearchConfig, Strategy};
use hospital_solver::{LoadLevel, Solve};

fn main() {
    env_logger::init();

    let matches = App::new("hospital-solver")
        .about("Graph-search planner for the MAvis hospital domain")
        .arg(Arg::with_name("bfs")
            .long("--bfs")
            .help("breadth-first search (default)"))
        .arg(Arg::with_name("dfs")
            .long("--dfs")
            .help("depth-first search"))
        .arg(Arg::with_name("astar")
            .long("--astar")
            .help("A* search"))
        .arg(Arg::with_name("greedy")
            .long("--greedy")
            .help("greedy best-first search"))
        .group(ArgGroup::with_name("strategy")
            .args(&["bfs", "dfs", "astar", "greedy"]))
        .arg(Arg::with_name("zeroheuristic")
            .long("--zeroheuristic")
            .help("h = 0"))
        .arg(Arg::with_name("goalcount")
            .long("--goalcount")
            .help("h = unsatisfied goal count (default)"))
        .arg(Arg::with_name("advancedheuristic")
            .long("--advancedheuristic")
            .help("h = normalized nearest-goal distances"))
        .group(ArgGroup::with_name("heuristic")
            .args(&["zeroheuristic", "goalcount", "advancedheuristic"]))
        .arg(Arg::with_name("mapfactions")
            .long("--mapfactions")
            .help("NoOp and moves only, no box manipulation"))
        .arg(Arg::with_name("defaultactions")
            .long("--defaultactions")
            .help("the full hospital action library (default)"))
        .group(ArgGroup::with_name("library")
            .args(&["mapfactions", "defaultactions"]))
        .arg(Arg::with_name("max-memory")
            .long("--max-memory")
            .takes_value(true)
            .default_value("4g")
            .help("resident memory limit, e.g. 4g"))
        .arg(Arg::with_name("max-time")
            .long("--max-time")
            .takes_value(true)
            .help("wall clock limit in seconds"))
        .arg(Arg::with_name("file")
            .required(true))
        .get_matches();

    let strategy = if matches.is_present("dfs") {
        Strategy::Dfs
    } else if matches.is_present("astar") {
        Strategy::AStar
    } else if matches.is_present("greedy") {
        Strategy::Greedy
    } else {
        Strategy::Bfs
    };
    let heuristic = if matches.is_present("zeroheuristic") {
        HeuristicKind::Zero
    } else if matches.is_present("advancedheuristic") {
        HeuristicKind::Advanced
    } else {
        HeuristicKind::GoalCount
    };
    let library = if matches.is_present("mapfactions") {
        Library::Mapf
    } else {
        Library::Hospital
    };

    let max_memory = config::parse_memory_limit(matches.value_of("max-memory").unwrap())
        .unwrap_or_else(|err| {
            eprintln!("{}", err);
            process::exit(1);
        });
    let max_time = matches.value_of("max-time").map(|seconds| {
        let seconds: u64 = seconds.parse().unwrap_or_else(|_| {
            eprintln!("Invalid time limit: {}", seconds);
            process::exit(1);
        });
        Duration::from_secs(seconds)
    });

    let config = SearchConfig {
        strategy,
        heuristic,
        library,
        max_memory,
        max_time,
    };

    let path = matches.value_of("file").unwrap();
    let level = path.load_level().unwrap_or_else(|err| {
        eprintln!("Can't load level {}: {}", path, err);
        process::exit(1);
    });
    info!("Loaded level {} ({} goals)", level.name, level.num_goals());

    eprintln!("Solving {}...", path);
    let solver_ok = level.solve(&config, true).unwrap_or_else(|err| {
        eprintln!("{}", err);
        process::exit(1);
    });
    eprintln!("{}", solver_ok.stats);

    // the plan (and only the plan) goes to stdout, one joint action per line
    match solver_ok.plan {
        Some(plan) => {
            eprintln!("Found plan with {} steps", plan.step_cnt());
            print!("{}", plan);
        }
        None => println!("No solution"),
    }
}
