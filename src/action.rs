use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::data::{Dir, Pos};
use crate::state::State;

/// One agent's action for one time step. Actions are plain data - the closed
/// set of variants below is the whole action model.
///
/// Every variant answers three questions:
/// - `is_applicable`: can this agent perform the action in this state,
///   independently of what the other agents do?
/// - `apply`: mutate a copy of the positions accordingly. Only ever called
///   after `is_applicable` and the joint conflict check both passed, so it
///   does not re-validate.
/// - `conflicts`: which cells does the action claim, for the concurrency
///   check across agents (see `State::is_conflicting`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    NoOp,
    Move(Dir),
    /// `Push(agent_dir, box_dir)`: the agent steps `agent_dir` onto the cell
    /// of a box of its own color, which in turn moves `box_dir`.
    Push(Dir, Dir),
    /// `Pull(agent_dir, box_dir)`: the agent steps `agent_dir` and the box in
    /// the cell opposite `box_dir` moves into the agent's old cell.
    Pull(Dir, Dir),
}

/// Cells an action claims for the joint-action legality check: the one cell
/// it newly occupies, and the pre-move cell of the box it moves (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflicts {
    pub destination: Pos,
    pub moved_box: Option<Pos>,
}

impl Action {
    pub fn is_applicable(self, agent_index: usize, state: &State<'_>) -> bool {
        let (agent_pos, agent_char) = state.agents[agent_index];
        match self {
            // NoOp can never change a single-agent state, skip it there
            Action::NoOp => state.agents.len() > 1,
            Action::Move(dir) => state.free_at(agent_pos + dir),
            Action::Push(agent_dir, box_dir) => {
                let box_pos = agent_pos + agent_dir;
                match state.box_at(box_pos) {
                    Some(box_char) => {
                        same_color(state, agent_char, box_char)
                            && state.free_at(box_pos + box_dir)
                    }
                    None => false,
                }
            }
            Action::Pull(agent_dir, box_dir) => {
                // the box sits opposite the direction it will be pulled in
                let box_pos = agent_pos - box_dir;
                match state.box_at(box_pos) {
                    Some(box_char) => {
                        same_color(state, agent_char, box_char)
                            && state.free_at(agent_pos + agent_dir)
                    }
                    None => false,
                }
            }
        }
    }

    pub(crate) fn apply(
        self,
        agent_index: usize,
        agents: &mut [(Pos, char)],
        boxes: &mut [(Pos, char)],
    ) {
        let (agent_pos, agent_char) = agents[agent_index];
        match self {
            Action::NoOp => {}
            Action::Move(dir) => agents[agent_index] = (agent_pos + dir, agent_char),
            Action::Push(agent_dir, box_dir) => {
                let box_pos = agent_pos + agent_dir;
                move_box(boxes, box_pos, box_pos + box_dir);
                agents[agent_index] = (box_pos, agent_char);
            }
            Action::Pull(agent_dir, box_dir) => {
                let box_pos = agent_pos - box_dir;
                move_box(boxes, box_pos, agent_pos);
                agents[agent_index] = (agent_pos + agent_dir, agent_char);
            }
        }
    }

    pub fn conflicts(self, agent_index: usize, state: &State<'_>) -> Conflicts {
        let (agent_pos, _) = state.agents[agent_index];
        match self {
            // a staying agent still claims its own cell
            Action::NoOp => Conflicts { destination: agent_pos, moved_box: None },
            Action::Move(dir) => Conflicts { destination: agent_pos + dir, moved_box: None },
            Action::Push(agent_dir, box_dir) => {
                let box_pos = agent_pos + agent_dir;
                Conflicts {
                    destination: box_pos + box_dir,
                    moved_box: Some(box_pos),
                }
            }
            Action::Pull(agent_dir, box_dir) => Conflicts {
                destination: agent_pos + agent_dir,
                moved_box: Some(agent_pos - box_dir),
            },
        }
    }
}

fn same_color(state: &State<'_>, a: char, b: char) -> bool {
    match (state.level.color_of(a), state.level.color_of(b)) {
        (Some(color_a), Some(color_b)) => color_a == color_b,
        _ => false,
    }
}

fn move_box(boxes: &mut [(Pos, char)], from: Pos, to: Pos) {
    for slot in boxes.iter_mut() {
        if slot.0 == from {
            slot.0 = to;
            return;
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Action::NoOp => write!(f, "NoOp"),
            Action::Move(dir) => write!(f, "Move({})", dir),
            Action::Push(agent_dir, box_dir) => write!(f, "Push({},{})", agent_dir, box_dir),
            Action::Pull(agent_dir, box_dir) => write!(f, "Pull({},{})", agent_dir, box_dir),
        }
    }
}

/// An action name the library does not recognize. Can only come up when
/// decoding a plan for replay or rendering - the search itself only ever
/// applies actions it enumerated as applicable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAction(pub String);

impl Display for InvalidAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Unrecognized action name: {}", self.0)
    }
}

impl Error for InvalidAction {}

impl FromStr for Action {
    type Err = InvalidAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn dir(s: &str) -> Option<Dir> {
            match s {
                "N" => Some(Dir::N),
                "S" => Some(Dir::S),
                "E" => Some(Dir::E),
                "W" => Some(Dir::W),
                _ => None,
            }
        }

        fn parse_args(s: &str, name: &str) -> Option<(Dir, Option<Dir>)> {
            let args = s.strip_prefix(name)?.strip_prefix('(')?.strip_suffix(')')?;
            let mut parts = args.split(',');
            let first = dir(parts.next()?.trim())?;
            let second = match parts.next() {
                Some(part) => Some(dir(part.trim())?),
                None => None,
            };
            if parts.next().is_some() {
                return None;
            }
            Some((first, second))
        }

        let s = s.trim();
        let action = if s == "NoOp" {
            Some(Action::NoOp)
        } else if s.starts_with("Move") {
            match parse_args(s, "Move") {
                Some((dir, None)) => Some(Action::Move(dir)),
                _ => None,
            }
        } else if s.starts_with("Push") {
            match parse_args(s, "Push") {
                Some((agent_dir, Some(box_dir))) => Some(Action::Push(agent_dir, box_dir)),
                _ => None,
            }
        } else if s.starts_with("Pull") {
            match parse_args(s, "Pull") {
                Some((agent_dir, Some(box_dir))) => Some(Action::Pull(agent_dir, box_dir)),
                _ => None,
            }
        } else {
            None
        };
        action.ok_or_else(|| InvalidAction(s.to_string()))
    }
}

/// NoOp plus the four moves - pure multi-agent pathfinding, no box
/// manipulation.
pub const MAPF_LIBRARY: [Action; 5] = [
    Action::NoOp,
    Action::Move(Dir::N),
    Action::Move(Dir::S),
    Action::Move(Dir::E),
    Action::Move(Dir::W),
];

/// The full hospital domain: moves plus every non-degenerate push and pull
/// direction pair.
pub const HOSPITAL_LIBRARY: [Action; 29] = [
    Action::NoOp,
    Action::Move(Dir::N),
    Action::Move(Dir::S),
    Action::Move(Dir::E),
    Action::Move(Dir::W),
    Action::Push(Dir::N, Dir::N),
    Action::Push(Dir::N, Dir::E),
    Action::Push(Dir::N, Dir::W),
    Action::Push(Dir::S, Dir::S),
    Action::Push(Dir::S, Dir::E),
    Action::Push(Dir::S, Dir::W),
    Action::Push(Dir::E, Dir::N),
    Action::Push(Dir::E, Dir::S),
    Action::Push(Dir::E, Dir::E),
    Action::Push(Dir::W, Dir::N),
    Action::Push(Dir::W, Dir::S),
    Action::Push(Dir::W, Dir::W),
    Action::Pull(Dir::N, Dir::N),
    Action::Pull(Dir::N, Dir::E),
    Action::Pull(Dir::N, Dir::W),
    Action::Pull(Dir::S, Dir::S),
    Action::Pull(Dir::S, Dir::E),
    Action::Pull(Dir::S, Dir::W),
    Action::Pull(Dir::E, Dir::N),
    Action::Pull(Dir::E, Dir::S),
    Action::Pull(Dir::E, Dir::E),
    Action::Pull(Dir::W, Dir::N),
    Action::Pull(Dir::W, Dir::S),
    Action::Pull(Dir::W, Dir::W),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    #[test]
    fn canonical_names_round_trip() {
        for &action in HOSPITAL_LIBRARY.iter() {
            let name = action.to_string();
            assert_eq!(name.parse::<Action>().unwrap(), action);
        }
        assert_eq!("Move(E)".parse::<Action>().unwrap(), Action::Move(Dir::E));
        assert_eq!(
            "Pull(S,W)".parse::<Action>().unwrap(),
            Action::Pull(Dir::S, Dir::W)
        );
    }

    #[test]
    fn invalid_names_are_rejected() {
        for name in &["Teleport(N)", "Move", "Move()", "Move(X)", "Push(N)", "noop", ""] {
            let err = name.parse::<Action>().unwrap_err();
            assert_eq!(err, InvalidAction(name.trim().to_string()));
        }
    }

    fn level() -> Level {
        // agent 0 and box A are red, agent 1 and box B are blue
        r"
#domain
hospital
#levelname
actions
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
+     +
+++++++
#end
"
        .parse()
        .unwrap()
    }

    #[test]
    fn move_applicability() {
        let level = level();
        let state = State::initial(&level);

        // agent 0 at (1,1): E is blocked by box A, W by wall, S is open
        assert!(!Action::Move(Dir::E).is_applicable(0, &state));
        assert!(!Action::Move(Dir::W).is_applicable(0, &state));
        assert!(!Action::Move(Dir::N).is_applicable(0, &state));
        assert!(Action::Move(Dir::S).is_applicable(0, &state));
    }

    #[test]
    fn push_requires_matching_color() {
        let level = level();
        let state = State::initial(&level);

        // agent 0 can push its own (red) box A east
        assert!(Action::Push(Dir::E, Dir::E).is_applicable(0, &state));
        // agent 1 at (1,5) can push its blue box B from (1,4) further west
        assert!(Action::Push(Dir::W, Dir::W).is_applicable(1, &state));
        // no box east of agent 1, only a wall
        assert!(!Action::Push(Dir::E, Dir::E).is_applicable(1, &state));

        // put agent 1 between the two boxes: it may push its own box B but
        // not the red box A, even though the cell behind A is free
        let agents = vec![(Pos::new(2, 1), '0'), (Pos::new(1, 3), '1')];
        let state = State::new(&level, agents, level.initial_boxes.clone());
        assert!(Action::Push(Dir::E, Dir::E).is_applicable(1, &state));
        assert!(!Action::Push(Dir::W, Dir::W).is_applicable(1, &state));
    }

    #[test]
    fn pull_applicability() {
        let level = level();
        let state = State::initial(&level);

        // agent 1 at (1,5) has box B at (1,4) = opposite of box_dir E,
        // and no room to step east (wall)
        assert!(!Action::Pull(Dir::E, Dir::E).is_applicable(1, &state));
        // stepping south while pulling B east works
        assert!(Action::Pull(Dir::S, Dir::E).is_applicable(1, &state));
        // agent 0 cannot pull blue box B
        assert!(!Action::Pull(Dir::S, Dir::E).is_applicable(0, &state));
    }

    #[test]
    fn conflict_projection() {
        let level = level();
        let state = State::initial(&level);

        let noop = Action::NoOp.conflicts(0, &state);
        assert_eq!(noop.destination, Pos::new(1, 1));
        assert_eq!(noop.moved_box, None);

        let push = Action::Push(Dir::E, Dir::E).conflicts(0, &state);
        // box A moves from (1,2) to (1,3)
        assert_eq!(push.destination, Pos::new(1, 3));
        assert_eq!(push.moved_box, Some(Pos::new(1, 2)));

        let pull = Action::Pull(Dir::S, Dir::E).conflicts(1, &state);
        // agent 1 steps from (1,5) to (2,5), box B is at (1,4)
        assert_eq!(pull.destination, Pos::new(2, 5));
        assert_eq!(pull.moved_box, Some(Pos::new(1, 4)));
    }
}
