use crate::{
    grid::Grid,
    sink::{GenerationSink, SinkError},
};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

const REPORT_INTERVAL: Duration = Duration::from_millis(500);

/// Logs throughput and population at most every 500ms
pub struct ProgressReport {
    generation: usize,
    alive: usize,
    gens_in_report: usize,
    last_report: Instant,
}
impl ProgressReport {
    pub fn new() -> Self {
        Self {
            generation: 0,
            alive: 0,
            gens_in_report: 0,
            last_report: Instant::now(),
        }
    }

    fn has_report(&self) -> bool {
        self.last_report.elapsed() >= REPORT_INTERVAL
    }

    /// Summarizes the generations since the last report and starts a new one
    pub fn report(&mut self) -> String {
        let gens_per_sec = self.gens_in_report as f64 / self.last_report.elapsed().as_secs_f64();
        // reset stats for next report
        self.last_report = Instant::now();
        self.gens_in_report = 0;

        format!(
            "{:.02}gen/s generation:{}, alive:{}",
            gens_per_sec, self.generation, self.alive
        )
    }
}
impl Default for ProgressReport {
    fn default() -> Self {
        Self::new()
    }
}
impl GenerationSink for ProgressReport {
    fn emit(&mut self, generation: usize, grid: &Grid) -> Result<(), SinkError> {
        self.generation = generation;
        self.gens_in_report += 1;
        self.alive = grid.alive_count();

        if self.has_report() {
            log::info!("{}", self.report());
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        log::info!("{}", self.report());
        Ok(())
    }
}

/// Records per-generation timing and population, written as csv on finish
pub struct CsvStats {
    path: PathBuf,
    data: Vec<(u128, usize)>,
    last: Instant,
}
impl CsvStats {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_owned(),
            data: Vec::new(),
            last: Instant::now(),
        }
    }

    pub fn save<W: Write>(&self, mut out: W) -> io::Result<()> {
        out.write_all(b"generation,delta_t,alive\n")?;
        for (i, (delta, alive)) in self.data.iter().enumerate() {
            writeln!(out, "{},{},{}", i, delta, alive)?;
        }
        out.flush()
    }
}
impl GenerationSink for CsvStats {
    fn emit(&mut self, _generation: usize, grid: &Grid) -> Result<(), SinkError> {
        let delta = self.last.elapsed().as_micros();
        self.last = Instant::now();

        self.data.push((delta, grid.alive_count()));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        log::info!("writing stats to {}", self.path.display());
        let file = fs::File::create(&self.path)?;
        Ok(self.save(io::BufWriter::new(file))?)
    }
}
