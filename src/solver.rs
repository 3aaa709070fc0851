use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::time::{Duration, Instant};

use fnv::FnvHashSet;
use log::debug;
use prettytable::format::consts::FORMAT_CLEAN;
use prettytable::{Cell, Row, Table};
use separator::Separatable;
use typed_arena::Arena;

use crate::action::Action;
use crate::config::{SearchConfig, Strategy};
use crate::frontier::{Frontier, FrontierBestFirst, FrontierBfs, FrontierDfs};
use crate::goal::GoalDescription;
use crate::level::Level;
use crate::memory;
use crate::plan::Plan;
use crate::state::State;
use crate::Solve;

/// How often (in expansions) the time and memory ceilings are rechecked.
const RESOURCE_CHECK_INTERVAL: u64 = 10_000;

/// Wall-clock start and resource ceilings of one search run.
#[derive(Debug)]
pub struct SearchContext {
    start: Instant,
    max_memory: u64,
    max_time: Option<Duration>,
}

impl SearchContext {
    pub fn new(max_memory: u64, max_time: Option<Duration>) -> Self {
        SearchContext {
            start: Instant::now(),
            max_memory,
            max_time,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn exhausted(&self) -> Option<Exhaustion> {
        if let Some(max_time) = self.max_time {
            if self.elapsed() >= max_time {
                return Some(Exhaustion::Time);
            }
        }
        if memory::resident_bytes() > self.max_memory {
            return Some(Exhaustion::Memory);
        }
        None
    }
}

enum Exhaustion {
    Time,
    Memory,
}

/// Per-depth search counters. Expanded = popped and not a goal, generated =
/// allocated and handed to the frontier (the root counts as generated at
/// depth 0).
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Stats {
    expanded_states: Vec<u64>,
    generated_states: Vec<u64>,
    /// Filled in when the search ends (or aborts).
    pub elapsed: Duration,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_expanded(&self) -> u64 {
        self.expanded_states.iter().sum()
    }

    pub fn total_generated(&self) -> u64 {
        self.generated_states.iter().sum()
    }

    /// Returns true when this is the first state expanded at its depth.
    pub fn add_expanded(&mut self, depth: u32) -> bool {
        Self::add(&mut self.expanded_states, depth)
    }

    pub fn add_generated(&mut self, depth: u32) -> bool {
        Self::add(&mut self.generated_states, depth)
    }

    fn add(counts: &mut Vec<u64>, depth: u32) -> bool {
        let mut ret = false;

        while depth as usize >= counts.len() {
            counts.push(0);
            ret = true;
        }
        counts[depth as usize] += 1;
        ret
    }
}

impl Debug for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "expanded by depth: {:?}", self.expanded_states)?;
        writeln!(f, "generated by depth: {:?}", self.generated_states)?;
        writeln!(f, "total expanded: {}", self.total_expanded().separated_string())?;
        writeln!(f, "total generated: {}", self.total_generated().separated_string())
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "States generated total: {}", self.total_generated().separated_string())?;
        writeln!(f, "States expanded total: {}", self.total_expanded().separated_string())?;
        writeln!(f, "Search time: {:.3} s", self.elapsed.as_secs_f64())?;

        let mut table = Table::new();
        table.set_format(*FORMAT_CLEAN);
        table.set_titles(Row::new(vec![
            Cell::new("Depth"),
            Cell::new("Generated"),
            Cell::new("Expanded"),
        ]));
        // generated_states is always the longer vec
        for depth in 0..self.generated_states.len() {
            let expanded = self.expanded_states.get(depth).copied().unwrap_or(0);
            table.add_row(Row::new(vec![
                Cell::new(&depth.to_string()),
                Cell::new(&self.generated_states[depth].separated_string()),
                Cell::new(&expanded.separated_string()),
            ]));
        }
        write!(f, "{}", table)
    }
}

#[derive(Debug)]
pub struct SolverOk {
    /// `None` means the frontier was exhausted - provably no plan exists.
    pub plan: Option<Plan>,
    pub stats: Stats,
}

impl SolverOk {
    fn new(plan: Option<Plan>, stats: Stats) -> Self {
        SolverOk { plan, stats }
    }
}

/// Resource exhaustion. Distinct from the well-defined negative result
/// (`SolverOk` with no plan); carries the counters collected so far.
#[derive(Debug)]
pub enum SolverErr {
    OutOfMemory(Stats),
    OutOfTime(Stats),
}

impl Display for SolverErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SolverErr::OutOfMemory(_) => write!(f, "Memory limit exceeded"),
            SolverErr::OutOfTime(_) => write!(f, "Time limit exceeded"),
        }
    }
}

impl Error for SolverErr {}

impl Solve for Level {
    fn solve(&self, config: &SearchConfig, print_status: bool) -> Result<SolverOk, SolverErr> {
        let ctx = SearchContext::new(config.max_memory, config.max_time);
        let goal_description = GoalDescription::from_level(self);
        let library = config.actions();
        let arena = Arena::new();

        match config.strategy {
            Strategy::Bfs => {
                let mut frontier = FrontierBfs::new();
                graph_search(&ctx, &arena, self, library, &goal_description, &mut frontier, print_status)
            }
            Strategy::Dfs => {
                let mut frontier = FrontierDfs::new();
                graph_search(&ctx, &arena, self, library, &goal_description, &mut frontier, print_status)
            }
            Strategy::AStar => {
                let mut frontier = FrontierBestFirst::astar(config.build_heuristic());
                graph_search(&ctx, &arena, self, library, &goal_description, &mut frontier, print_status)
            }
            Strategy::Greedy => {
                let mut frontier = FrontierBestFirst::greedy(config.build_heuristic());
                graph_search(&ctx, &arena, self, library, &goal_description, &mut frontier, print_status)
            }
        }
    }
}

/// The search driver: pops from the frontier, tests the goal, expands through
/// the action library and defers duplicate detection to value equality of
/// states.
///
/// All states live in `arena`; parent links borrow from it, so extracting the
/// plan is a walk over shared references.
pub fn graph_search<'a, F: Frontier<'a>>(
    ctx: &SearchContext,
    arena: &'a Arena<State<'a>>,
    level: &'a Level,
    library: &[Action],
    goal_description: &GoalDescription,
    frontier: &mut F,
    print_status: bool,
) -> Result<SolverOk, SolverErr> {
    let mut stats = Stats::new();
    let mut expanded: FnvHashSet<&'a State<'a>> = FnvHashSet::default();

    frontier.prepare(level, goal_description);
    if print_status {
        eprintln!("Starting {}", frontier.name());
    }

    let root = &*arena.alloc(State::initial(level));
    stats.add_generated(0);
    frontier.add(root);

    let mut iterations: u64 = 0;
    loop {
        if iterations % RESOURCE_CHECK_INTERVAL == 0 {
            match ctx.exhausted() {
                Some(Exhaustion::Time) => {
                    stats.elapsed = ctx.elapsed();
                    return Err(SolverErr::OutOfTime(stats));
                }
                Some(Exhaustion::Memory) => {
                    stats.elapsed = ctx.elapsed();
                    return Err(SolverErr::OutOfMemory(stats));
                }
                None => {}
            }
        }
        iterations += 1;

        let current = match frontier.pop() {
            Some(state) => state,
            None => {
                stats.elapsed = ctx.elapsed();
                return Ok(SolverOk::new(None, stats));
            }
        };

        if goal_description.is_goal(current) {
            stats.elapsed = ctx.elapsed();
            return Ok(SolverOk::new(Some(current.extract_plan()), stats));
        }

        if stats.add_expanded(current.path_cost) && print_status {
            eprintln!(
                "Expanding new depth: {} (frontier: {}, memory: {} B, time: {:.3} s)",
                current.path_cost,
                frontier.size().separated_string(),
                memory::resident_bytes().separated_string(),
                ctx.elapsed().as_secs_f64(),
            );
            eprint!("{:?}", stats);
        }
        debug!("expanding depth {}:\n{}", current.path_cost, current);

        expanded.insert(current);

        for joint_action in current.applicable_actions(library) {
            let child = current.result(&joint_action);
            if !expanded.contains(&child) && !frontier.contains(&child) {
                stats.add_generated(child.path_cost);
                frontier.add(arena.alloc(child));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use typed_arena::Arena;

    use super::*;
    use crate::config::{HeuristicKind, Library};

    fn config(strategy: Strategy) -> SearchConfig {
        SearchConfig {
            strategy,
            ..SearchConfig::default()
        }
    }

    fn solve(level_text: &str, config: &SearchConfig) -> SolverOk {
        let level: Level = level_text.parse().unwrap();
        level.solve(config, false).unwrap()
    }

    const ONE_STEP_EAST: &str = r"
#domain
hospital
#levelname
onestep
#colors
red: 0
#initial
+++++
+0  +
+++++
#goal
+++++
+ 0 +
+++++
#end
";

    #[test]
    fn one_step_east() {
        let solver_ok = solve(ONE_STEP_EAST, &config(Strategy::Bfs));
        let plan = solver_ok.plan.unwrap();
        assert_eq!(plan.to_string(), "Move(E)\n");
        // root plus at most the two reachable neighbors
        assert!(solver_ok.stats.total_generated() <= 3);
    }

    #[test]
    fn already_solved_level_has_empty_plan() {
        let level_text = r"
#domain
hospital
#levelname
solved
#colors
red: 0
#initial
+++++
+ 0 +
+++++
#goal
+++++
+ 0 +
+++++
#end
";
        let solver_ok = solve(level_text, &config(Strategy::Bfs));
        let plan = solver_ok.plan.unwrap();
        assert!(plan.is_empty());
        assert_eq!(solver_ok.stats.total_generated(), 1);
        assert_eq!(solver_ok.stats.total_expanded(), 0);
    }

    #[test]
    fn push_into_goal_cell() {
        let level_text = r"
#domain
hospital
#levelname
onepush
#colors
red: 0, A
#initial
+++++
+0A +
+++++
#goal
+++++
+  A+
+++++
#end
";
        let solver_ok = solve(level_text, &config(Strategy::Bfs));
        let plan = solver_ok.plan.unwrap();
        assert_eq!(plan.to_string(), "Push(E,E)\n");
    }

    #[test]
    fn corridor_swap_is_unsolvable() {
        // two agents in a width-1 corridor cannot pass each other; the
        // frontier runs dry, which is a negative answer, not an error
        let level_text = r"
#domain
hospital
#levelname
swap
#colors
red: 0
blue: 1
#initial
+++++
+0 1+
+++++
#goal
+++++
+1 0+
+++++
#end
";
        let solver_ok = solve(level_text, &config(Strategy::Bfs));
        assert!(solver_ok.plan.is_none());
        assert!(solver_ok.stats.total_expanded() > 0);
    }

    const TWO_AGENTS: &str = r"
#domain
hospital
#levelname
twoagents
#colors
red: 0, A
blue: 1, B
#initial
+++++++
+0A B1+
+     +
+++++++
#goal
+++++++
+    A+
+B    +
+++++++
#end
";

    #[test]
    fn bfs_and_astar_zero_agree_on_length() {
        let bfs = solve(TWO_AGENTS, &config(Strategy::Bfs));
        let astar = solve(
            TWO_AGENTS,
            &SearchConfig {
                strategy: Strategy::AStar,
                heuristic: HeuristicKind::Zero,
                ..SearchConfig::default()
            },
        );

        let bfs_plan = bfs.plan.unwrap();
        let astar_plan = astar.plan.unwrap();
        assert_eq!(bfs_plan.step_cnt(), astar_plan.step_cnt());
    }

    #[test]
    fn greedy_reaches_the_goal() {
        let greedy = solve(
            TWO_AGENTS,
            &SearchConfig {
                strategy: Strategy::Greedy,
                heuristic: HeuristicKind::Advanced,
                ..SearchConfig::default()
            },
        );
        assert!(greedy.plan.is_some());
    }

    #[test]
    fn replaying_the_plan_reaches_the_goal() {
        let level: Level = TWO_AGENTS.parse().unwrap();
        let goal_description = GoalDescription::from_level(&level);
        let solver_ok = level.solve(&config(Strategy::Bfs), false).unwrap();
        let plan = solver_ok.plan.unwrap();

        let arena = Arena::new();
        let mut current = &*arena.alloc(State::initial(&level));
        assert!(!goal_description.is_goal(current));
        for joint_action in &plan {
            current = arena.alloc(current.result(joint_action));
        }
        assert!(goal_description.is_goal(current));
        assert_eq!(current.path_cost as usize, plan.step_cnt());
    }

    #[test]
    fn mapf_library_cannot_solve_box_levels() {
        let level_text = r"
#domain
hospital
#levelname
needspush
#colors
red: 0, A
#initial
+++++
+0A +
+++++
#goal
+++++
+  A+
+++++
#end
";
        let mapf = SearchConfig {
            library: Library::Mapf,
            ..config(Strategy::Bfs)
        };
        let solver_ok = solve(level_text, &mapf);
        assert!(solver_ok.plan.is_none());
    }

    #[test]
    fn zero_time_limit_aborts() {
        let zero_time = SearchConfig {
            max_time: Some(Duration::from_secs(0)),
            ..config(Strategy::Bfs)
        };
        let level: Level = TWO_AGENTS.parse().unwrap();
        match level.solve(&zero_time, false) {
            Err(SolverErr::OutOfTime(stats)) => assert_eq!(stats.total_expanded(), 0),
            other => panic!("expected OutOfTime, got {:?}", other),
        }
    }

    #[test]
    fn stats_display_renders_depth_table() {
        let solver_ok = solve(ONE_STEP_EAST, &config(Strategy::Bfs));
        let rendered = solver_ok.stats.to_string();
        assert!(rendered.contains("States generated total: 2"));
        assert!(rendered.contains("States expanded total: 1"));
        assert!(rendered.contains("Depth"));
        assert!(rendered.contains("Generated"));
        assert!(rendered.contains("Expanded"));
    }

    #[test]
    fn stats_depth_bookkeeping() {
        let mut stats = Stats::new();
        assert!(stats.add_generated(0));
        assert!(!stats.add_generated(0));
        assert!(stats.add_generated(2));
        assert_eq!(stats.total_generated(), 3);
        assert!(stats.add_expanded(1));
        assert_eq!(stats.total_expanded(), 1);
    }
}
