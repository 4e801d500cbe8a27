use super::{GenerationSink, SinkError};
use crate::grid::{Grid, Symbols};
use std::{
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

pub const STATE_LOG_NAME: &str = "GameOfLife_States.txt";

/// Appends every generation as text to a log file
///
/// Each entry is a `# iteration: N` header, the rows drawn with the
/// configured symbols, then an empty line.
pub struct StateLog<W: Write = BufWriter<fs::File>> {
    writer: W,
    symbols: Symbols,
}

impl StateLog {
    /// Creates (or truncates) `GameOfLife_States.txt` inside `dir`
    pub fn create<P: AsRef<Path>>(dir: P, symbols: Symbols) -> io::Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path: PathBuf = dir.join(STATE_LOG_NAME);
        log::info!("writing states to {}", path.display());
        let file = fs::File::create(path)?;
        Ok(Self::new(BufWriter::new(file), symbols))
    }
}

impl<W: Write> StateLog<W> {
    pub fn new(writer: W, symbols: Symbols) -> Self {
        Self { writer, symbols }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> GenerationSink for StateLog<W> {
    fn emit(&mut self, generation: usize, grid: &Grid) -> Result<(), SinkError> {
        writeln!(self.writer, "# iteration: {}", generation)?;
        self.writer.write_all(grid.render(&self.symbols).as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(self.writer.flush()?)
    }
}
