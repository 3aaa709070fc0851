use std::fmt::{self, Display, Formatter};

use crate::data::Pos;
use crate::level::Level;
use crate::state::State;

/// A single goal literal: `positive` means the character must occupy the
/// cell, negative means it must not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Goal {
    pub pos: Pos,
    pub character: char,
    pub positive: bool,
}

impl Goal {
    pub fn new(pos: Pos, character: char, positive: bool) -> Goal {
        Goal { pos, character, positive }
    }

    pub fn holds(&self, state: &State<'_>) -> bool {
        let occupant = state.object_at(self.pos);
        if self.positive {
            occupant == Some(self.character)
        } else {
            occupant != Some(self.character)
        }
    }
}

impl Display for Goal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "{}@{}", self.character, self.pos)
        } else {
            write!(f, "!{}@{}", self.character, self.pos)
        }
    }
}

/// A conjunction of goal literals - a state is a goal state iff all of them
/// hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalDescription {
    pub goals: Vec<Goal>,
}

impl GoalDescription {
    pub fn new(goals: Vec<Goal>) -> GoalDescription {
        GoalDescription { goals }
    }

    /// Box goals first, then agent goals, matching the level's literal order.
    pub fn from_level(level: &Level) -> GoalDescription {
        let mut goals = level.box_goals.clone();
        goals.extend_from_slice(&level.agent_goals);
        GoalDescription::new(goals)
    }

    pub fn total(&self) -> usize {
        self.goals.len()
    }

    pub fn num_satisfied(&self, state: &State<'_>) -> usize {
        self.goals.iter().filter(|goal| goal.holds(state)).count()
    }

    pub fn is_goal(&self, state: &State<'_>) -> bool {
        self.goals.iter().all(|goal| goal.holds(state))
    }
}
