use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

use crate::action::Action;
use crate::data::Pos;
use crate::level::Level;
use crate::plan::{JointAction, Plan};

/// A node of the search graph: dynamic object positions plus the trail back
/// to the root.
///
/// Equality and hashing only look at `agents` and `boxes` - two states
/// reached along different paths are the same node. The box list is kept
/// sorted so that states differing only in box list order compare equal.
///
/// States are allocated in a `typed_arena::Arena` by the search driver and
/// borrow their parent from it, so plan extraction never chases owned
/// pointers.
#[derive(Clone)]
pub struct State<'a> {
    pub level: &'a Level,
    /// Index = agent id.
    pub agents: Vec<(Pos, char)>,
    /// Sorted by position.
    pub boxes: Vec<(Pos, char)>,
    pub parent: Option<&'a State<'a>>,
    /// The joint action that produced this state, `None` for the root.
    pub joint_action: Option<JointAction>,
    pub path_cost: u32,
}

impl<'a> State<'a> {
    pub fn initial(level: &'a Level) -> State<'a> {
        State::new(
            level,
            level.initial_agents.clone(),
            level.initial_boxes.clone(),
        )
    }

    /// A root state with the given object positions. Sorts the boxes into
    /// canonical order.
    pub fn new(level: &'a Level, agents: Vec<(Pos, char)>, mut boxes: Vec<(Pos, char)>) -> State<'a> {
        boxes.sort();
        State {
            level,
            agents,
            boxes,
            parent: None,
            joint_action: None,
            path_cost: 0,
        }
    }

    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    pub fn agent_at(&self, pos: Pos) -> Option<char> {
        self.agents
            .iter()
            .find(|&&(agent_pos, _)| agent_pos == pos)
            .map(|&(_, agent_char)| agent_char)
    }

    pub fn box_at(&self, pos: Pos) -> Option<char> {
        self.boxes
            .iter()
            .find(|&&(box_pos, _)| box_pos == pos)
            .map(|&(_, box_char)| box_char)
    }

    /// The agent or box occupying the cell, if any.
    pub fn object_at(&self, pos: Pos) -> Option<char> {
        self.agent_at(pos).or_else(|| self.box_at(pos))
    }

    /// A cell is free if it is inside the grid, not a wall and not occupied.
    pub fn free_at(&self, pos: Pos) -> bool {
        !self.level.wall_at(pos) && self.object_at(pos).is_none()
    }

    /// All legal joint actions: the cartesian product of each agent's
    /// individually applicable actions, minus the conflicting combinations.
    ///
    /// Enumerated with an odometer over per-agent indices rather than
    /// recursion, so the agent count does not grow the stack.
    pub fn applicable_actions(&self, library: &[Action]) -> Vec<JointAction> {
        let per_agent: Vec<Vec<Action>> = (0..self.agents.len())
            .map(|agent_index| {
                library
                    .iter()
                    .copied()
                    .filter(|action| action.is_applicable(agent_index, self))
                    .collect()
            })
            .collect();

        // an agent with no applicable action makes the whole product empty
        if per_agent.iter().any(Vec::is_empty) {
            return Vec::new();
        }

        let mut joint_actions = Vec::new();
        let mut indices = vec![0; per_agent.len()];
        let mut current: Vec<Action> = per_agent
            .iter()
            .map(|actions| actions[0])
            .collect();
        loop {
            if !self.is_conflicting(&current) {
                joint_actions.push(JointAction::new(current.clone()));
            }

            let mut agent = 0;
            loop {
                if agent == per_agent.len() {
                    return joint_actions;
                }
                indices[agent] += 1;
                if indices[agent] < per_agent[agent].len() {
                    current[agent] = per_agent[agent][indices[agent]];
                    break;
                }
                indices[agent] = 0;
                current[agent] = per_agent[agent][0];
                agent += 1;
            }
        }
    }

    /// Whether two agents' actions collide: they claim the same destination
    /// cell, or they move the same box.
    pub fn is_conflicting(&self, actions: &[Action]) -> bool {
        let conflicts: Vec<_> = actions
            .iter()
            .enumerate()
            .map(|(agent_index, action)| action.conflicts(agent_index, self))
            .collect();

        for (i, a) in conflicts.iter().enumerate() {
            for b in &conflicts[i + 1..] {
                if a.destination == b.destination {
                    return true;
                }
                if a.moved_box.is_some() && a.moved_box == b.moved_box {
                    return true;
                }
            }
        }
        false
    }

    /// The successor state after all agents execute `joint_action` at once.
    ///
    /// Assumes the joint action came out of `applicable_actions` - individual
    /// applicability and the conflict check are not repeated here.
    pub fn result(&'a self, joint_action: &JointAction) -> State<'a> {
        let mut agents = self.agents.clone();
        let mut boxes = self.boxes.clone();
        for (agent_index, &action) in joint_action.iter().enumerate() {
            action.apply(agent_index, &mut agents, &mut boxes);
        }
        boxes.sort();
        State {
            level: self.level,
            agents,
            boxes,
            parent: Some(self),
            joint_action: Some(joint_action.clone()),
            path_cost: self.path_cost + 1,
        }
    }

    /// Walks the parent chain back to the root and reverses it.
    pub fn extract_plan(&self) -> Plan {
        let mut steps = Vec::with_capacity(self.path_cost as usize);
        let mut state = self;
        while let Some(parent) = state.parent {
            if let Some(joint_action) = &state.joint_action {
                steps.push(joint_action.clone());
            }
            state = parent;
        }
        steps.reverse();
        Plan::new(steps)
    }
}

impl<'a> PartialEq for State<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.agents == other.agents && self.boxes == other.boxes
    }
}

impl<'a> Eq for State<'a> {}

impl<'a> Hash for State<'a> {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.agents.hash(hasher);
        self.boxes.hash(hasher);
    }
}

impl<'a> Display for State<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for r in 0..i32::from(self.level.rows()) {
            for c in 0..i32::from(self.level.cols()) {
                let pos = Pos::new(r, c);
                let cell = if let Some(object) = self.object_at(pos) {
                    object
                } else if self.level.wall_at(pos) {
                    '+'
                } else {
                    ' '
                };
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<'a> Debug for State<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "path_cost: {}", self.path_cost)?;
        write!(f, "{}", self)
    }
}
