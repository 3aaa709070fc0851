use std::fmt::Debug;

use fnv::FnvHashMap;

use crate::data::Pos;
use crate::goal::GoalDescription;
use crate::level::Level;
use crate::state::State;

/// Estimates remaining cost toward the goal description. `preprocess` runs
/// once per search before the first `h` call and may precompute whatever the
/// level allows.
///
/// Values are `f64` because [`Advanced`] normalizes by the goal count;
/// frontiers order them with `total_cmp`.
pub trait Heuristic: Debug {
    fn preprocess(&mut self, _level: &Level) {}

    fn h(&self, state: &State<'_>, goal_description: &GoalDescription) -> f64;
}

/// h = 0 everywhere. Turns A* into uniform-cost search, greedy into a plain
/// queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct Zero;

impl Heuristic for Zero {
    fn h(&self, _state: &State<'_>, _goal_description: &GoalDescription) -> f64 {
        0.0
    }
}

/// Number of goal literals not yet satisfied.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoalCount;

impl Heuristic for GoalCount {
    fn h(&self, state: &State<'_>, goal_description: &GoalDescription) -> f64 {
        (goal_description.total() - goal_description.num_satisfied(state)) as f64
    }
}

/// For every agent and box that has a goal, the Manhattan distance to the
/// nearest unsatisfied goal cell labeled with its character, summed over all
/// objects and normalized by the total number of goal literals.
///
/// Not admissible (several objects can share a nearest goal), so it is a
/// greedy-quality estimate rather than an optimality-preserving one.
#[derive(Debug, Clone, Default)]
pub struct Advanced {
    /// Positive goal cells grouped by object character.
    goal_cells: FnvHashMap<char, Vec<Pos>>,
}

impl Heuristic for Advanced {
    fn preprocess(&mut self, level: &Level) {
        self.goal_cells.clear();
        for goal in level.box_goals.iter().chain(level.agent_goals.iter()) {
            if goal.positive {
                self.goal_cells
                    .entry(goal.character)
                    .or_insert_with(Vec::new)
                    .push(goal.pos);
            }
        }
    }

    fn h(&self, state: &State<'_>, goal_description: &GoalDescription) -> f64 {
        let total = goal_description.total();
        if total == 0 {
            return 0.0;
        }

        let objects = state.agents.iter().chain(state.boxes.iter());
        let mut sum = 0;
        for &(pos, character) in objects {
            if let Some(cells) = self.goal_cells.get(&character) {
                let nearest_unmet = cells
                    .iter()
                    .filter(|&&cell| state.object_at(cell) != Some(character))
                    .map(|&cell| pos.dist(cell))
                    .min();
                if let Some(dist) = nearest_unmet {
                    sum += dist;
                }
            }
        }
        f64::from(sum) / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    fn level() -> Level {
        r"
#domain
hospital
#levelname
heuristics
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
"
        .parse()
        .unwrap()
    }

    #[test]
    fn zero_is_zero() {
        let level = level();
        let state = State::initial(&level);
        let goal_description = GoalDescription::from_level(&level);
        assert_eq!(Zero.h(&state, &goal_description), 0.0);
    }

    #[test]
    fn goal_count_counts_unsatisfied() {
        let level = level();
        let state = State::initial(&level);
        let goal_description = GoalDescription::from_level(&level);

        // both box goals unmet initially
        assert_eq!(GoalCount.h(&state, &goal_description), 2.0);

        // an empty conjunction is always satisfied
        assert_eq!(GoalCount.h(&state, &GoalDescription::default()), 0.0);
    }

    #[test]
    fn advanced_sums_nearest_goal_distances() {
        let level = level();
        let state = State::initial(&level);
        let goal_description = GoalDescription::from_level(&level);

        let mut advanced = Advanced::default();
        advanced.preprocess(&level);

        // A at (1,2) is 3 from its goal (1,5); B at (1,4) is 4 from (2,1);
        // neither agent has a goal; normalized by 2 goal literals
        assert_eq!(advanced.h(&state, &goal_description), (3.0 + 4.0) / 2.0);

        // no goals, no division
        assert_eq!(advanced.h(&state, &GoalDescription::default()), 0.0);
    }

    #[test]
    fn advanced_ignores_satisfied_goals() {
        let level = level();
        let goal_description = GoalDescription::from_level(&level);

        let mut advanced = Advanced::default();
        advanced.preprocess(&level);

        // move B onto its goal cell: only A's distance remains
        let agents = level.initial_agents.clone();
        let boxes = vec![(crate::data::Pos::new(1, 2), 'A'), (crate::data::Pos::new(2, 1), 'B')];
        let state = State::new(&level, agents, boxes);
        assert_eq!(advanced.h(&state, &goal_description), 3.0 / 2.0);
    }
}
