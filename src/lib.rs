//! Conway's Game of Life and other Life-like automata, drawn in the terminal
//! or in an SDL window.

pub mod automaton;
pub mod config;
pub mod error;
pub mod grid;
pub mod run;
pub mod screen;
pub mod shapes;

pub use automaton::{CellularAutomaton, ConwayLife, LifeLike, Rule};
pub use error::{Error, Result};
pub use grid::{Edges, Grid};
