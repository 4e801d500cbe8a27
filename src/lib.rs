//! Conway's Game of Life on a fixed, non-wrapping grid.

pub mod config;
pub mod driver;
pub mod enc;
pub mod engine;
pub mod grid;
pub mod pos;
pub mod sink;
pub mod stats;

pub use config::{ConfigError, SimulationConfig};
pub use driver::{DriverError, Phase, Simulation, SimulationSource};
pub use enc::{PatternCodec, RleError, RunLengthEncoded};
pub use engine::{Engine, next_grid, next_grid_parallel};
pub use grid::{Cell, Grid, GridWindow, MAX_CELLS, ShapeError, Symbols, cell_count};
pub use pos::Coord;
pub use sink::{FrameRenderer, GenerationSink, History, SinkError, StateLog, VideoEncoder};
pub use stats::{CsvStats, ProgressReport};
