use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use crate::action::{Action, HOSPITAL_LIBRARY, MAPF_LIBRARY};
use crate::heuristic::{Advanced, GoalCount, Heuristic, Zero};

/// Which frontier drives the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Bfs,
    Dfs,
    AStar,
    Greedy,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Strategy::Bfs => write!(f, "bfs"),
            Strategy::Dfs => write!(f, "dfs"),
            Strategy::AStar => write!(f, "astar"),
            Strategy::Greedy => write!(f, "greedy"),
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bfs" => Ok(Strategy::Bfs),
            "dfs" => Ok(Strategy::Dfs),
            "astar" => Ok(Strategy::AStar),
            "greedy" => Ok(Strategy::Greedy),
            _ => Err(ConfigErr::UnknownStrategy),
        }
    }
}

/// Which estimate best-first strategies order the frontier by. Ignored by
/// bfs/dfs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeuristicKind {
    Zero,
    GoalCount,
    Advanced,
}

impl Display for HeuristicKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            HeuristicKind::Zero => write!(f, "zero"),
            HeuristicKind::GoalCount => write!(f, "goalcount"),
            HeuristicKind::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for HeuristicKind {
    type Err = ConfigErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" => Ok(HeuristicKind::Zero),
            "goalcount" => Ok(HeuristicKind::GoalCount),
            "advanced" => Ok(HeuristicKind::Advanced),
            _ => Err(ConfigErr::UnknownHeuristic),
        }
    }
}

/// Which action library the expansion enumerates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Library {
    /// NoOp and the four moves - pure pathfinding.
    Mapf,
    /// The full hospital set including pushes and pulls.
    Hospital,
}

impl Display for Library {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Library::Mapf => write!(f, "mapf"),
            Library::Hospital => write!(f, "hospital"),
        }
    }
}

impl FromStr for Library {
    type Err = ConfigErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mapf" => Ok(Library::Mapf),
            "hospital" => Ok(Library::Hospital),
            _ => Err(ConfigErr::UnknownLibrary),
        }
    }
}

/// Everything the solver needs to know besides the level itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub strategy: Strategy,
    pub heuristic: HeuristicKind,
    pub library: Library,
    /// Resident-memory ceiling in bytes.
    pub max_memory: u64,
    /// Wall-clock ceiling, unlimited when `None`.
    pub max_time: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            strategy: Strategy::Bfs,
            heuristic: HeuristicKind::GoalCount,
            library: Library::Hospital,
            max_memory: 4 * GIB,
            max_time: None,
        }
    }
}

impl SearchConfig {
    pub fn actions(&self) -> &'static [Action] {
        match self.library {
            Library::Mapf => &MAPF_LIBRARY,
            Library::Hospital => &HOSPITAL_LIBRARY,
        }
    }

    pub fn build_heuristic(&self) -> Box<dyn Heuristic> {
        match self.heuristic {
            HeuristicKind::Zero => Box::new(Zero),
            HeuristicKind::GoalCount => Box::new(GoalCount),
            HeuristicKind::Advanced => Box::new(Advanced::default()),
        }
    }
}

const GIB: u64 = 1024 * 1024 * 1024;

/// Parses a memory limit of the form `<n>g` (gibibytes) into bytes.
pub fn parse_memory_limit(s: &str) -> Result<u64, ConfigErr> {
    let digits = s
        .strip_suffix('g')
        .or_else(|| s.strip_suffix('G'))
        .ok_or(ConfigErr::BadMemoryLimit)?;
    let gib: u64 = digits.parse().map_err(|_| ConfigErr::BadMemoryLimit)?;
    if gib == 0 {
        return Err(ConfigErr::BadMemoryLimit);
    }
    gib.checked_mul(GIB).ok_or(ConfigErr::BadMemoryLimit)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErr {
    UnknownStrategy,
    UnknownHeuristic,
    UnknownLibrary,
    BadMemoryLimit,
}

impl Display for ConfigErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ConfigErr::UnknownStrategy => {
                write!(f, "Unknown strategy (expected bfs, dfs, astar or greedy)")
            }
            ConfigErr::UnknownHeuristic => {
                write!(f, "Unknown heuristic (expected zero, goalcount or advanced)")
            }
            ConfigErr::UnknownLibrary => {
                write!(f, "Unknown action library (expected mapf or hospital)")
            }
            ConfigErr::BadMemoryLimit => {
                write!(f, "Invalid memory limit (expected e.g. 4g)")
            }
        }
    }
}

impl Error for ConfigErr {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_round_trips() {
        for &strategy in &[Strategy::Bfs, Strategy::Dfs, Strategy::AStar, Strategy::Greedy] {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
        assert_eq!("nope".parse::<Strategy>(), Err(ConfigErr::UnknownStrategy));
        assert_eq!(
            "manhattan".parse::<HeuristicKind>(),
            Err(ConfigErr::UnknownHeuristic)
        );
    }

    #[test]
    fn memory_limits() {
        assert_eq!(parse_memory_limit("4g").unwrap(), 4 * GIB);
        assert_eq!(parse_memory_limit("16G").unwrap(), 16 * GIB);
        assert!(parse_memory_limit("4").is_err());
        assert!(parse_memory_limit("g").is_err());
        assert!(parse_memory_limit("0g").is_err());
        assert!(parse_memory_limit("4gb").is_err());
        // would overflow u64 bytes
        assert!(parse_memory_limit("18446744073g").is_err());
    }

    #[test]
    fn default_library_is_hospital() {
        let config = SearchConfig::default();
        assert_eq!(config.actions().len(), 29);
        let mapf = SearchConfig { library: Library::Mapf, ..config };
        assert_eq!(mapf.actions().len(), 5);
    }
}
