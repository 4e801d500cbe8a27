//! Sequencing of generations and hand-off to collaborators.

use crate::{
    config::ConfigError,
    engine::Engine,
    grid::{Cell, Grid, ShapeError},
    sink::{GenerationSink, SinkError},
};

/// Anything that can describe the starting point of a simulation
pub trait SimulationSource {
    /// `(rows, columns)` of the initial grid
    fn dimensions(&self) -> (usize, usize);
    fn initial_cells(&self) -> Vec<Vec<Cell>>;
    fn n_iterations(&self) -> i64;
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("simulation has already run")]
    AlreadyCompleted,
    #[error("generation {generation}: {source}")]
    Collaborator {
        generation: usize,
        #[source]
        source: SinkError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Holding the initial grid, nothing emitted yet
    Initialized,
    Running,
    /// Every generation was emitted and every sink finished
    Completed,
    /// A sink failed; no further generations will be produced
    Halted,
}

/// Owns the current [`Grid`] and steps it through `n_iterations` transitions
///
/// Every generation, starting with the initial grid as generation 0, is
/// handed to each registered [`GenerationSink`] in registration order.
/// A simulation runs once: calling [`Simulation::run`] again after it
/// completed (or halted on a sink failure) returns
/// [`DriverError::AlreadyCompleted`].
pub struct Simulation<'a> {
    current: Grid,
    generation: usize,
    n_iterations: usize,
    engine: Engine,
    phase: Phase,
    sinks: Vec<Box<dyn GenerationSink + 'a>>,
}

impl<'a> Simulation<'a> {
    pub fn new(initial: Grid, n_iterations: i64) -> Result<Self, ConfigError> {
        Ok(Self::with_iterations(initial, iteration_count(n_iterations)?))
    }

    pub fn from_source<S: SimulationSource + ?Sized>(source: &S) -> Result<Self, DriverError> {
        let n_iterations = iteration_count(source.n_iterations())?;
        let (rows, columns) = source.dimensions();
        let initial = Grid::new(rows, columns, source.initial_cells())?;
        Ok(Self::with_iterations(initial, n_iterations))
    }

    fn with_iterations(initial: Grid, n_iterations: usize) -> Self {
        Self {
            current: initial,
            generation: 0,
            n_iterations,
            engine: Engine::default(),
            phase: Phase::Initialized,
            sinks: Vec::new(),
        }
    }

    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    pub fn add_sink<S: GenerationSink + 'a>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }
    #[inline]
    pub fn n_iterations(&self) -> usize {
        self.n_iterations
    }
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }
    #[inline]
    pub fn current(&self) -> &Grid {
        &self.current
    }

    pub fn into_grid(self) -> Grid {
        self.current
    }

    /// Emits generation 0, then computes and emits generations `1..=n_iterations`
    ///
    /// Stops at the first sink failure, reporting the generation it failed on.
    /// Every sink is finished even when an earlier one fails to; the first
    /// failure is the one reported.
    pub fn run(&mut self) -> Result<(), DriverError> {
        if matches!(self.phase, Phase::Completed | Phase::Halted) {
            return Err(DriverError::AlreadyCompleted);
        }
        self.phase = Phase::Running;
        log::info!(
            "running {} generations on a {}x{} grid ({:?} engine)",
            self.n_iterations,
            self.current.rows(),
            self.current.columns(),
            self.engine
        );

        self.emit()?;
        while self.generation < self.n_iterations {
            self.current = self.engine.step(&self.current);
            self.generation += 1;
            log::debug!(
                "generation {}: {} alive",
                self.generation,
                self.current.alive_count()
            );
            self.emit()?;
        }

        let mut failure = None;
        for (i, sink) in self.sinks.iter_mut().enumerate() {
            if let Err(source) = sink.finish() {
                log::warn!("sink {} failed to finish: {}", i, source);
                failure.get_or_insert(source);
            }
        }
        if let Some(source) = failure {
            self.phase = Phase::Halted;
            return Err(DriverError::Collaborator {
                generation: self.generation,
                source,
            });
        }
        self.phase = Phase::Completed;
        log::info!(
            "simulation complete after {} generations, {} alive",
            self.generation,
            self.current.alive_count()
        );
        Ok(())
    }

    fn emit(&mut self) -> Result<(), DriverError> {
        let generation = self.generation;
        for sink in self.sinks.iter_mut() {
            if let Err(source) = sink.emit(generation, &self.current) {
                self.phase = Phase::Halted;
                return Err(DriverError::Collaborator { generation, source });
            }
        }
        Ok(())
    }
}

fn iteration_count(n_iterations: i64) -> Result<usize, ConfigError> {
    usize::try_from(n_iterations).map_err(|_| ConfigError::NegativeIterations(n_iterations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::grid;
    use crate::sink::History;
    use std::io;

    fn blinker() -> Grid {
        grid(
            ".....
             ..#..
             ..#..
             ..#..
             .....",
        )
    }

    /// Fails on a chosen generation
    struct FailAt(usize);
    impl GenerationSink for FailAt {
        fn emit(&mut self, generation: usize, _: &Grid) -> Result<(), SinkError> {
            if generation == self.0 {
                Err(io::Error::other("disk full").into())
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct CountFinish(usize);
    impl GenerationSink for CountFinish {
        fn emit(&mut self, _: usize, _: &Grid) -> Result<(), SinkError> {
            Ok(())
        }
        fn finish(&mut self) -> Result<(), SinkError> {
            self.0 += 1;
            Ok(())
        }
    }

    #[test]
    fn emits_every_generation_once() {
        let mut history = History::new();
        let mut sim = Simulation::new(blinker(), 5).unwrap().add_sink(&mut history);
        sim.run().unwrap();
        assert_eq!(sim.phase(), Phase::Completed);
        assert_eq!(sim.generation(), 5);
        drop(sim);

        let generations: Vec<usize> = history.generations().iter().map(|(g, _)| *g).collect();
        assert_eq!(generations, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn zero_iterations_emits_initial_grid() {
        let mut history = History::new();
        let mut sim = Simulation::new(blinker(), 0).unwrap().add_sink(&mut history);
        sim.run().unwrap();
        drop(sim);

        assert_eq!(history.into_inner(), vec![(0, blinker())]);
    }

    #[test]
    fn emitted_grids_follow_transitions() {
        let mut history = History::new();
        let mut sim = Simulation::new(blinker(), 2).unwrap().add_sink(&mut history);
        sim.run().unwrap();
        let last = sim.into_grid();

        let grids = history.into_inner();
        assert_eq!(grids[0].1, blinker());
        assert_ne!(grids[1].1, blinker());
        assert_eq!(grids[2].1, blinker());
        assert_eq!(last, blinker());
    }

    #[test]
    fn negative_iterations_is_config_error() {
        let result = Simulation::new(blinker(), -1);

        assert!(matches!(result, Err(ConfigError::NegativeIterations(-1))));
    }

    #[test]
    fn rerun_is_rejected() {
        let mut sim = Simulation::new(blinker(), 1).unwrap();
        sim.run().unwrap();

        assert!(matches!(sim.run(), Err(DriverError::AlreadyCompleted)));
        assert_eq!(sim.generation(), 1);
    }

    #[test]
    fn sink_failure_halts_with_generation() {
        let mut history = History::new();
        let mut sim = Simulation::new(blinker(), 10)
            .unwrap()
            .add_sink(FailAt(3))
            .add_sink(&mut history);

        let err = sim.run().unwrap_err();
        assert!(matches!(
            err,
            DriverError::Collaborator {
                generation: 3,
                source: SinkError::Io(_)
            }
        ));
        assert_eq!(sim.phase(), Phase::Halted);
        assert_eq!(sim.generation(), 3);
        assert!(matches!(sim.run(), Err(DriverError::AlreadyCompleted)));
        drop(sim);

        // the failing sink comes first, so generation 3 never reached the history
        let generations: Vec<usize> = history.generations().iter().map(|(g, _)| *g).collect();
        assert_eq!(generations, vec![0, 1, 2]);
    }

    #[test]
    fn finish_runs_once_per_sink() {
        let mut first = CountFinish::default();
        let mut second = CountFinish::default();
        let mut sim = Simulation::new(blinker(), 3)
            .unwrap()
            .add_sink(&mut first)
            .add_sink(&mut second);
        sim.run().unwrap();
        drop(sim);

        assert_eq!((first.0, second.0), (1, 1));
    }

    struct FailFinish;
    impl GenerationSink for FailFinish {
        fn emit(&mut self, _: usize, _: &Grid) -> Result<(), SinkError> {
            Ok(())
        }
        fn finish(&mut self) -> Result<(), SinkError> {
            Err(SinkError::Video("ffmpeg exited with status 1".to_owned()))
        }
    }

    #[test]
    fn finish_failure_still_finishes_later_sinks() {
        let mut later = CountFinish::default();
        let mut sim = Simulation::new(blinker(), 2)
            .unwrap()
            .add_sink(FailFinish)
            .add_sink(&mut later)
            .add_sink(FailFinish);

        let err = sim.run().unwrap_err();
        assert!(matches!(
            err,
            DriverError::Collaborator {
                generation: 2,
                source: SinkError::Video(_)
            }
        ));
        assert_eq!(sim.phase(), Phase::Halted);
        drop(sim);

        assert_eq!(later.0, 1);
    }

    #[test]
    fn parallel_engine_matches_serial_run() {
        let glider = grid(
            ".#......
             ..#.....
             ###.....
             ........
             ........
             ........",
        );
        let mut serial = Simulation::new(glider.clone(), 8).unwrap();
        serial.run().unwrap();
        let mut parallel = Simulation::new(glider, 8)
            .unwrap()
            .with_engine(Engine::Parallel);
        parallel.run().unwrap();

        assert_eq!(serial.current(), parallel.current());
    }

    struct Params {
        cells: Vec<Vec<Cell>>,
        n_iterations: i64,
    }
    impl SimulationSource for Params {
        fn dimensions(&self) -> (usize, usize) {
            (self.cells.len(), self.cells.first().map_or(0, Vec::len))
        }
        fn initial_cells(&self) -> Vec<Vec<Cell>> {
            self.cells.clone()
        }
        fn n_iterations(&self) -> i64 {
            self.n_iterations
        }
    }

    #[test]
    fn from_source_validates_shape() {
        let jagged = Params {
            cells: vec![vec![Cell::Dead; 3], vec![Cell::Dead; 2]],
            n_iterations: 1,
        };

        assert!(matches!(
            Simulation::from_source(&jagged),
            Err(DriverError::Shape(ShapeError::RowLength { row: 1, .. }))
        ));
    }

    #[test]
    fn from_source_validates_iterations() {
        let params = Params {
            cells: vec![vec![Cell::Alive; 2]; 2],
            n_iterations: -1,
        };

        assert!(matches!(
            Simulation::from_source(&params),
            Err(DriverError::Config(ConfigError::NegativeIterations(-1)))
        ));
    }

    #[test]
    fn from_source_checks_iterations_before_shape() {
        let params = Params {
            cells: vec![vec![Cell::Dead; 3], vec![Cell::Dead; 2]],
            n_iterations: -2,
        };

        assert!(matches!(
            Simulation::from_source(&params),
            Err(DriverError::Config(ConfigError::NegativeIterations(-2)))
        ));
    }

    #[test]
    fn from_source_builds_simulation() {
        let params = Params {
            cells: vec![vec![Cell::Alive; 2]; 2],
            n_iterations: 4,
        };
        let mut sim = Simulation::from_source(&params).unwrap();
        sim.run().unwrap();

        // a block never changes
        assert_eq!(sim.current().alive_count(), 4);
        assert_eq!(sim.n_iterations(), 4);
    }
}
