use std::fmt::{self, Display, Formatter};

use fnv::FnvHashMap;

use crate::data::Pos;
use crate::goal::Goal;
use crate::vec2d::Vec2d;

/// Object colors from the `#colors` section. Two objects of different colors
/// never interact - an agent can only push or pull boxes of its own color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Blue,
    Red,
    Cyan,
    Purple,
    Green,
    Orange,
    Pink,
    Grey,
    Lightblue,
    Brown,
}

impl Color {
    pub(crate) fn from_name(name: &str) -> Option<Color> {
        match name.to_ascii_lowercase().as_str() {
            "blue" => Some(Color::Blue),
            "red" => Some(Color::Red),
            "cyan" => Some(Color::Cyan),
            "purple" => Some(Color::Purple),
            "green" => Some(Color::Green),
            "orange" => Some(Color::Orange),
            "pink" => Some(Color::Pink),
            "grey" => Some(Color::Grey),
            "lightblue" => Some(Color::Lightblue),
            "brown" => Some(Color::Brown),
            _ => None,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Cyan => "cyan",
            Color::Purple => "purple",
            Color::Green => "green",
            Color::Orange => "orange",
            Color::Pink => "pink",
            Color::Grey => "grey",
            Color::Lightblue => "lightblue",
            Color::Brown => "brown",
        };
        write!(f, "{}", name)
    }
}

/// The static part of a level: walls, colors, initial object positions and
/// goal literals. Built once by the parser, never mutated afterwards; every
/// `State` of a search shares one `Level` by reference.
#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    pub(crate) walls: Vec2d<bool>,
    pub colors: FnvHashMap<char, Color>,
    /// Index = agent id (the agent character minus '0').
    pub initial_agents: Vec<(Pos, char)>,
    pub initial_boxes: Vec<(Pos, char)>,
    pub agent_goals: Vec<Goal>,
    pub box_goals: Vec<Goal>,
}

impl Level {
    pub fn rows(&self) -> u16 {
        self.walls.rows()
    }

    pub fn cols(&self) -> u16 {
        self.walls.cols()
    }

    /// Everything outside the grid counts as wall, so callers never need a
    /// separate bounds check.
    pub fn wall_at(&self, pos: Pos) -> bool {
        self.walls.get(pos).copied().unwrap_or(true)
    }

    pub fn color_of(&self, object: char) -> Option<Color> {
        self.colors.get(&object).copied()
    }

    pub fn num_goals(&self) -> usize {
        self.box_goals.len() + self.agent_goals.len()
    }
}
