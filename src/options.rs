use std::{path::PathBuf, str::FromStr, time::Duration};

use gridlife::{Coord, Grid, ShapeError, cell_count};

const DEFAULT_CONFIG: &str = "./config/config.config";
const DEFAULT_OUT_DIR: &str = "./output";
const DEFAULT_SIZE: (usize, usize) = (100, 100);
const DEFAULT_SCALE: u32 = 8;
const DEFAULT_FPS: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error(transparent)]
    Parse(#[from] getopts::Fail),
    #[error("invalid value {value:?} for --{name}")]
    Invalid { name: &'static str, value: String },
}

pub struct Args {
    matches: getopts::Matches,
}

impl Args {
    fn new<T: AsRef<str>>(args: &[T]) -> Result<Option<Self>, OptionsError> {
        let mut opts = getopts::Options::new();
        opts.optflag("", "help", "print this help menu");
        opts.optopt("", "config", "configuration file", "FILE");
        opts.optopt("i", "input", "RLE pattern to start from", "FILE");
        opts.optopt("f", "fill", "seed the grid: random, alternating, all, empty", "TYPE");
        opts.optopt("w", "width", "set grid width for --fill", "WIDTH");
        opts.optopt("h", "height", "set grid height for --fill", "HEIGHT");
        opts.optopt("g", "gens", "number of generations to compute", "COUNT");
        opts.optopt("d", "out-dir", "directory for states, frames and video", "DIR");
        opts.optflag("", "no-frames", "do not render PNG frames (implies --no-video)");
        opts.optflag("", "no-video", "do not stitch frames into a video");
        opts.optopt("", "scale", "pixels per cell in rendered frames", "PX");
        opts.optopt("", "fps", "video frame rate", "N");
        opts.optopt("t", "threads", "compute each generation on N threads", "N");
        opts.optflag("c", "console", "show the simulation in the terminal");
        opts.optopt(
            "s",
            "sleep",
            "the amount of time to sleep between generations",
            "MILLIS",
        );
        opts.optopt("", "stats", "write stats csv to file", "FILE");
        opts.optopt("o", "output", "write the final generation as RLE", "FILE");

        let matches = opts.parse(args.iter().map(T::as_ref))?;
        if matches.opt_present("help") {
            println!("{}", opts.usage("usage: gridlife [options]"));
            Ok(None)
        } else {
            Ok(Some(Self { matches }))
        }
    }
    pub fn from_env() -> Result<Option<Self>, OptionsError> {
        let env = std::env::args().skip(1).collect::<Vec<_>>();
        Self::new(&env)
    }

    fn get<T: FromStr>(&self, name: &'static str) -> Result<Option<T>, OptionsError> {
        match self.matches.opt_str(name) {
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| OptionsError::Invalid { name, value }),
            None => Ok(None),
        }
    }

    pub fn console(&self) -> bool {
        self.matches.opt_present("console")
    }
    pub fn threads(&self) -> Result<Option<usize>, OptionsError> {
        self.get("threads")
    }

    /// Overrides the configured iteration count
    pub fn generations(&self) -> Result<Option<i64>, OptionsError> {
        self.get("gens")
    }
    pub fn sleep(&self) -> Result<Option<Duration>, OptionsError> {
        Ok(match self.get("sleep")? {
            Some(millis) => Some(Duration::from_millis(millis)),
            None if self.console() => Some(Duration::from_millis(100)),
            None => None,
        })
    }

    /// `(rows, columns)` of a filled grid
    pub fn grid_size(&self) -> Result<(usize, usize), OptionsError> {
        let default = if self.console() {
            crossterm::terminal::size()
                .map(|(cols, rows)| (rows.saturating_sub(1).max(1) as usize, cols.max(1) as usize))
                .unwrap_or(DEFAULT_SIZE)
        } else {
            DEFAULT_SIZE
        };

        Ok((
            self.get("height")?.unwrap_or(default.0),
            self.get("width")?.unwrap_or(default.1),
        ))
    }
    pub fn fill_mode(&self) -> Result<Option<FillMode>, OptionsError> {
        self.get("fill")
    }

    pub fn config_file(&self) -> PathBuf {
        self.matches
            .opt_str("config")
            .unwrap_or_else(|| DEFAULT_CONFIG.to_owned())
            .into()
    }
    pub fn input_file(&self) -> Option<String> {
        self.matches.opt_str("input")
    }
    pub fn output_file(&self) -> Option<String> {
        self.matches.opt_str("output")
    }
    pub fn stats_file(&self) -> Option<String> {
        self.matches.opt_str("stats")
    }
    pub fn out_dir(&self) -> PathBuf {
        self.matches
            .opt_str("out-dir")
            .unwrap_or_else(|| DEFAULT_OUT_DIR.to_owned())
            .into()
    }

    pub fn frames(&self) -> bool {
        !self.matches.opt_present("no-frames")
    }
    pub fn video(&self) -> bool {
        self.frames() && !self.matches.opt_present("no-video")
    }
    pub fn scale(&self) -> Result<u32, OptionsError> {
        Ok(self.get("scale")?.unwrap_or(DEFAULT_SCALE))
    }
    pub fn fps(&self) -> Result<u32, OptionsError> {
        Ok(self.get("fps")?.unwrap_or(DEFAULT_FPS))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    Random,
    Alternating,
    All,
    Empty,
}
impl FromStr for FillMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "alternating" => Ok(Self::Alternating),
            "all" => Ok(Self::All),
            "empty" => Ok(Self::Empty),
            _ => Err(()),
        }
    }
}
impl FillMode {
    fn reserve_size(&self, total: usize) -> usize {
        match self {
            Self::Random => total.div_ceil(2),
            Self::Alternating => total.div_ceil(2),
            Self::All => total,
            Self::Empty => 0,
        }
    }
    fn fill_cell<R: rand::Rng>(&self, cell: Coord, rng: &mut R) -> bool {
        match self {
            Self::Random => rng.random_bool(0.5),
            Self::Alternating => (cell.row + cell.column) % 2 == 0,
            Self::All => true,
            Self::Empty => false,
        }
    }
    pub fn create_alive(self, rows: usize, columns: usize) -> Result<Vec<Coord>, ShapeError> {
        let mut alive = Vec::new();
        let reserve_size = self.reserve_size(cell_count(rows, columns)?);
        if reserve_size == 0 {
            // reserve_size indicates this will produce no alive cells
            return Ok(alive);
        }

        let mut rng = rand::rng();
        alive.reserve(reserve_size);
        for row in 0..rows {
            for column in 0..columns {
                let cell = Coord { row, column };
                if self.fill_cell(cell, &mut rng) {
                    alive.push(cell);
                }
            }
        }
        Ok(alive)
    }
    pub fn create_grid(self, rows: usize, columns: usize) -> Result<Grid, ShapeError> {
        Grid::from_alive(rows, columns, &self.create_alive(rows, columns)?)
    }
}
