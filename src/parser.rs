use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use fnv::FnvHashMap;

use crate::data::Pos;
use crate::goal::Goal;
use crate::level::{Color, Level};
use crate::vec2d::Vec2d;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserErr {
    UnknownDomain(String),
    UnknownSection(String),
    MissingSection(&'static str),
    BadColorLine(usize),
    UnknownColor(String),
    InvalidCell(usize, usize, char),
    DuplicateAgent(char),
    NonConsecutiveAgents,
    NoAgents,
    Uncolored(char),
    UnmatchedGoal(char),
}

impl Display for ParserErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ParserErr::UnknownDomain(ref domain) => write!(f, "Unknown domain: {}", domain),
            ParserErr::UnknownSection(ref section) => write!(f, "Unknown section: {}", section),
            ParserErr::MissingSection(section) => write!(f, "Missing section: {}", section),
            ParserErr::BadColorLine(line) => write!(f, "Malformed color line: {}", line),
            ParserErr::UnknownColor(ref color) => write!(f, "Unknown color: {}", color),
            ParserErr::InvalidCell(r, c, ch) => {
                write!(f, "Invalid character {:?} at [{}, {}]", ch, r, c)
            }
            ParserErr::DuplicateAgent(ch) => write!(f, "Agent {} appears more than once", ch),
            ParserErr::NonConsecutiveAgents => {
                write!(f, "Agents must be numbered 0..n without gaps")
            }
            ParserErr::NoAgents => write!(f, "No agents"),
            ParserErr::Uncolored(ch) => write!(f, "No color assigned to {}", ch),
            ParserErr::UnmatchedGoal(ch) => {
                write!(f, "Goal for {} but no such object in the level", ch)
            }
        }
    }
}

impl Error for ParserErr {}

impl FromStr for Level {
    type Err = ParserErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Domain,
    LevelName,
    Colors,
    Initial,
    Goal,
}

pub fn parse(text: &str) -> Result<Level, ParserErr> {
    // everything after #end is ignored
    let text = text.split("#end").next().unwrap_or("");

    let mut section = Section::None;
    let mut domain = None;
    let mut name = None;
    let mut colors = FnvHashMap::default();
    let mut initial_rows: Vec<&str> = Vec::new();
    let mut goal_rows: Vec<&str> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        if line.starts_with('#') {
            section = match line.trim_end() {
                "#domain" => Section::Domain,
                "#levelname" => Section::LevelName,
                "#colors" => Section::Colors,
                "#initial" => Section::Initial,
                "#goal" => Section::Goal,
                other => return Err(ParserErr::UnknownSection(other.to_string())),
            };
            continue;
        }

        match section {
            Section::None => {
                if !line.trim().is_empty() {
                    return Err(ParserErr::MissingSection("#domain"));
                }
            }
            Section::Domain => domain = Some(line.trim()),
            Section::LevelName => name = Some(line.trim()),
            Section::Colors => parse_color_line(line, line_no, &mut colors)?,
            // grid rows keep leading whitespace, it is part of the layout
            Section::Initial => initial_rows.push(line.trim_end()),
            Section::Goal => goal_rows.push(line.trim_end()),
        }
    }

    let domain = domain.ok_or(ParserErr::MissingSection("#domain"))?;
    if domain != "hospital" {
        return Err(ParserErr::UnknownDomain(domain.to_string()));
    }
    let name = name.unwrap_or("").to_string();

    if initial_rows.iter().all(|row| row.is_empty()) {
        return Err(ParserErr::MissingSection("#initial"));
    }

    let (walls, agents, boxes) = parse_initial(&initial_rows)?;
    let (agent_goals, box_goals) = parse_goals(&goal_rows)?;

    let mut agents = agents;
    agents.sort_by_key(|&(_, ch)| ch);
    if agents.is_empty() {
        return Err(ParserErr::NoAgents);
    }
    for window in agents.windows(2) {
        if window[0].1 == window[1].1 {
            return Err(ParserErr::DuplicateAgent(window[0].1));
        }
    }
    // agent ids must be 0..n so they can double as indices
    for (id, &(_, ch)) in agents.iter().enumerate() {
        if ch as usize - '0' as usize != id {
            return Err(ParserErr::NonConsecutiveAgents);
        }
    }

    for &(_, ch) in agents.iter().chain(boxes.iter()) {
        if !colors.contains_key(&ch) {
            return Err(ParserErr::Uncolored(ch));
        }
    }

    // a goal no object can ever satisfy makes the whole level unsolvable
    for goal in agent_goals.iter().chain(box_goals.iter()) {
        let matched = agents
            .iter()
            .chain(boxes.iter())
            .any(|&(_, ch)| ch == goal.character);
        if !matched {
            return Err(ParserErr::UnmatchedGoal(goal.character));
        }
    }

    Ok(Level {
        name,
        walls,
        colors,
        initial_agents: agents,
        initial_boxes: boxes,
        agent_goals,
        box_goals,
    })
}

fn parse_color_line(
    line: &str,
    line_no: usize,
    colors: &mut FnvHashMap<char, Color>,
) -> Result<(), ParserErr> {
    if line.trim().is_empty() {
        return Ok(());
    }
    let mut parts = line.splitn(2, ':');
    let color_name = parts.next().unwrap_or("").trim();
    let objects = parts.next().ok_or(ParserErr::BadColorLine(line_no))?;

    let color =
        Color::from_name(color_name).ok_or_else(|| ParserErr::UnknownColor(color_name.to_string()))?;

    for object in objects.split(',') {
        let object = object.trim();
        let mut chars = object.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if ch.is_ascii_digit() || ch.is_ascii_uppercase() => {
                colors.insert(ch, color);
            }
            _ => return Err(ParserErr::BadColorLine(line_no)),
        }
    }
    Ok(())
}

type Objects = Vec<(Pos, char)>;

fn parse_initial(rows: &[&str]) -> Result<(Vec2d<bool>, Objects, Objects), ParserErr> {
    let mut walls = Vec::new();
    let mut agents = Vec::new();
    let mut boxes = Vec::new();

    for (r, row) in rows.iter().enumerate() {
        let mut wall_row = Vec::new();
        for (c, ch) in row.chars().enumerate() {
            let pos = Pos::new(r as i32, c as i32);
            match ch {
                '+' => {
                    wall_row.push(true);
                    continue;
                }
                ' ' => {}
                '0'..='9' => agents.push((pos, ch)),
                'A'..='Z' => boxes.push((pos, ch)),
                _ => return Err(ParserErr::InvalidCell(r, c, ch)),
            }
            wall_row.push(false);
        }
        walls.push(wall_row);
    }

    // short rows are padded with wall, consistent with out-of-bounds reads
    Ok((Vec2d::new(&walls, true), agents, boxes))
}

fn parse_goals(rows: &[&str]) -> Result<(Vec<Goal>, Vec<Goal>), ParserErr> {
    let mut agent_goals = Vec::new();
    let mut box_goals = Vec::new();

    for (r, row) in rows.iter().enumerate() {
        for (c, ch) in row.chars().enumerate() {
            let pos = Pos::new(r as i32, c as i32);
            match ch {
                '+' | ' ' => {}
                // the text format can only express positive literals
                '0'..='9' => agent_goals.push(Goal::new(pos, ch, true)),
                'A'..='Z' => box_goals.push(Goal::new(pos, ch, true)),
                _ => return Err(ParserErr::InvalidCell(r, c, ch)),
            }
        }
    }

    Ok((agent_goals, box_goals))
}
