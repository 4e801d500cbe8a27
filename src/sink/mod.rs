//! Collaborators that consume each generation of a simulation.

mod frames;
mod statelog;
mod video;

pub use self::frames::FrameRenderer;
pub use self::statelog::StateLog;
pub use self::video::VideoEncoder;
use crate::grid::Grid;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to encode frame: {0}")]
    Png(#[from] png::EncodingError),
    #[error("a {rows}x{columns} grid at scale {scale} does not fit in a PNG frame")]
    FrameTooLarge {
        rows: usize,
        columns: usize,
        scale: u32,
    },
    #[error("video encoding failed: {0}")]
    Video(String),
    #[error("interrupted by user")]
    Interrupted,
}

/// Receives every generation of a simulation, in order and without gaps
pub trait GenerationSink {
    fn emit(&mut self, generation: usize, grid: &Grid) -> Result<(), SinkError>;

    /// Called once after the final generation was emitted
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: GenerationSink + ?Sized> GenerationSink for &mut S {
    fn emit(&mut self, generation: usize, grid: &Grid) -> Result<(), SinkError> {
        (**self).emit(generation, grid)
    }
    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}

impl<S: GenerationSink + ?Sized> GenerationSink for Box<S> {
    fn emit(&mut self, generation: usize, grid: &Grid) -> Result<(), SinkError> {
        (**self).emit(generation, grid)
    }
    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}

/// Keeps a copy of every emitted generation in memory
#[derive(Debug, Default)]
pub struct History {
    generations: Vec<(usize, Grid)>,
}
impl History {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn generations(&self) -> &[(usize, Grid)] {
        &self.generations
    }

    pub fn into_inner(self) -> Vec<(usize, Grid)> {
        self.generations
    }
}
impl GenerationSink for History {
    fn emit(&mut self, generation: usize, grid: &Grid) -> Result<(), SinkError> {
        self.generations.push((generation, grid.clone()));
        Ok(())
    }
}
