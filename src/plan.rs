use std::fmt::{self, Debug, Display, Formatter};
use std::slice;
use std::str::FromStr;
use std::vec;

use crate::action::{Action, InvalidAction};

/// One action per agent, executed simultaneously in one time step.
///
/// The textual form joins the per-agent action names with `|`, the way the
/// MAvis client protocol sends joint actions.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct JointAction(Vec<Action>);

impl JointAction {
    pub fn new(actions: Vec<Action>) -> Self {
        JointAction(actions)
    }

    pub fn num_agents(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> slice::Iter<'_, Action> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a JointAction {
    type Item = &'a Action;
    type IntoIter = slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for JointAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, action) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            write!(f, "{}", action)?;
        }
        Ok(())
    }
}

impl Debug for JointAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for JointAction {
    type Err = InvalidAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let actions = s
            .split('|')
            .map(str::parse)
            .collect::<Result<Vec<Action>, _>>()?;
        Ok(JointAction(actions))
    }
}

/// An ordered sequence of joint actions from the root state to a goal state.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Plan(Vec<JointAction>);

impl Plan {
    pub fn new(steps: Vec<JointAction>) -> Self {
        Plan(steps)
    }

    /// Number of time steps, i.e. the path cost of the goal state.
    pub fn step_cnt(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, JointAction> {
        self.0.iter()
    }
}

impl IntoIterator for Plan {
    type Item = JointAction;
    type IntoIter = vec::IntoIter<JointAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a JointAction;
    type IntoIter = slice::Iter<'a, JointAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Plan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for step in &self.0 {
            writeln!(f, "{}", step)?;
        }
        Ok(())
    }
}

impl Debug for Plan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for Plan {
    type Err = InvalidAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let steps = s
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<JointAction>, _>>()?;
        Ok(Plan(steps))
    }
}
