// Opt in to warnings about new 2018 idioms
#![warn(rust_2018_idioms)]
// Additional warnings that are allow by default (`rustc -W help`)
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unused)]

pub mod action;
pub mod config;
pub mod data;
pub mod frontier;
pub mod goal;
pub mod heuristic;
pub mod level;
pub mod parser;
pub mod plan;
pub mod solver;
pub mod state;

mod memory;
mod vec2d;

use std::error::Error;
use std::fs;
use std::path::Path;

use crate::config::SearchConfig;
use crate::level::Level;
use crate::solver::{SolverErr, SolverOk};

pub trait LoadLevel {
    fn load_level(&self) -> Result<Level, Box<dyn Error>>;
}

impl<P: AsRef<Path>> LoadLevel for P {
    fn load_level(&self) -> Result<Level, Box<dyn Error>> {
        let text = fs::read_to_string(self)?;
        let level = text.parse::<Level>()?;
        Ok(level)
    }
}

pub trait Solve {
    fn solve(&self, config: &SearchConfig, print_status: bool) -> Result<SolverOk, SolverErr>;
}
