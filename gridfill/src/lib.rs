//! Tiled parallel grid generation and 4-connected flood fill labeling.

pub mod digits;
pub mod error;
pub mod generate;
pub mod grid;
pub mod label;
pub mod point;
pub mod tile;

pub use error::{GridError, Result};
pub use generate::{generate, Generator, GeneratorConfig, ACTIVE, INACTIVE};
pub use grid::{Grid, GridView};
pub use label::{label, label_traced, FloodFill, UNVISITED, VISITED};
pub use point::Point;
