//! Text configuration describing the symbols, seed pattern and iteration count.
//!
//! ```text
//! n_iterations: 20
//! dead_symbol: "."
//! live_symbol: "#"
//! init_state:
//! "
//! ..#..
//! ..#..
//! ..#..
//! "
//! ```
//!
//! The rows of `init_state` are the lines between the line holding the
//! opening quote and a line holding only the closing quote.

use crate::{
    driver::SimulationSource,
    grid::{Cell, Grid, ShapeError, Symbols},
};
use regex::Regex;
use std::{io, path::Path, str::FromStr, sync::LazyLock};

static ITERATIONS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*n_iterations:[ \t]*(\S*)").expect("valid regex"));
static DEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*dead_symbol:(.*)$").expect("valid regex"));
static LIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*live_symbol:(.*)$").expect("valid regex"));
static STATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*init_state:").expect("valid regex"));

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("value {0} is missing")]
    MissingField(&'static str),
    #[error("n_iterations {0:?} is not an integer")]
    InvalidIterations(String),
    #[error("n_iterations must not be negative, got {0}")]
    NegativeIterations(i64),
    #[error("{0} must be a single character in double quotes")]
    InvalidSymbol(&'static str),
    #[error("dead_symbol and live_symbol are both {0:?}")]
    SameSymbols(char),
    #[error("init_state must be followed by a block opened and closed by '\"'")]
    MalformedState,
    #[error("init_state line {line} contains invalid character {found:?}")]
    InvalidCell { line: usize, found: char },
    #[error("invalid init_state: {0}")]
    Shape(#[from] ShapeError),
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
}

/// A parsed configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    n_iterations: i64,
    symbols: Symbols,
    initial: Grid,
}

impl SimulationConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("reading config {}", path.display());
        std::fs::read_to_string(path)?.parse()
    }

    #[inline]
    pub fn symbols(&self) -> Symbols {
        self.symbols
    }
    #[inline]
    pub fn initial(&self) -> &Grid {
        &self.initial
    }

    /// Replaces the iteration count read from the file
    pub fn set_n_iterations(&mut self, n_iterations: i64) {
        self.n_iterations = n_iterations;
    }
}

impl SimulationSource for SimulationConfig {
    fn dimensions(&self) -> (usize, usize) {
        (self.initial.rows(), self.initial.columns())
    }
    fn initial_cells(&self) -> Vec<Vec<Cell>> {
        (0..self.initial.rows())
            .map(|row| self.initial.row(row).to_vec())
            .collect()
    }
    fn n_iterations(&self) -> i64 {
        self.n_iterations
    }
}

impl FromStr for SimulationConfig {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let n_iterations = parse_iterations(content)?;
        let dead = parse_symbol(content, &DEAD_RE, "dead_symbol")?;
        let live = parse_symbol(content, &LIVE_RE, "live_symbol")?;
        if dead == live {
            return Err(ConfigError::SameSymbols(dead));
        }
        let symbols = Symbols { dead, live };
        let initial = parse_state(content, &symbols)?;

        Ok(Self {
            n_iterations,
            symbols,
            initial,
        })
    }
}

fn parse_iterations(content: &str) -> Result<i64, ConfigError> {
    let caps = ITERATIONS_RE
        .captures(content)
        .ok_or(ConfigError::MissingField("n_iterations"))?;
    let value = &caps[1];
    value
        .parse()
        .map_err(|_| ConfigError::InvalidIterations(value.to_owned()))
}

fn parse_symbol(content: &str, re: &Regex, field: &'static str) -> Result<char, ConfigError> {
    let caps = re.captures(content).ok_or(ConfigError::MissingField(field))?;
    let quoted = caps[1].trim();
    let inner = quoted
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or(ConfigError::InvalidSymbol(field))?;

    let mut chars = inner.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(ConfigError::InvalidSymbol(field)),
    }
}

fn parse_state(content: &str, symbols: &Symbols) -> Result<Grid, ConfigError> {
    let key = STATE_RE
        .find(content)
        .ok_or(ConfigError::MissingField("init_state"))?;

    // the opening quote may sit on the key's line or on a later one
    let rest = content[key.end()..].trim_start();
    let rest = rest.strip_prefix('"').ok_or(ConfigError::MalformedState)?;
    let mut lines = rest.lines();
    if lines.next().is_some_and(|tail| !tail.trim().is_empty()) {
        return Err(ConfigError::MalformedState);
    }

    let mut rows = Vec::new();
    let mut closed = false;
    for (i, line) in lines.enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim_end() == "\"" {
            closed = true;
            break;
        }
        let row = line
            .chars()
            .map(|c| match c {
                c if c == symbols.live => Ok(Cell::Alive),
                c if c == symbols.dead => Ok(Cell::Dead),
                found => Err(ConfigError::InvalidCell { line: i + 1, found }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    if !closed {
        return Err(ConfigError::MalformedState);
    }

    Ok(Grid::from_rows(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos::Coord;

    const BLINKER: &str = r##"n_iterations: 20
dead_symbol: "."
live_symbol: "#"
init_state:
"
.....
..#..
..#..
..#..
.....
"
"##;

    #[test]
    fn parses_full_config() {
        let config: SimulationConfig = BLINKER.parse().unwrap();

        assert_eq!(config.n_iterations(), 20);
        assert_eq!(
            config.symbols(),
            Symbols {
                dead: '.',
                live: '#'
            }
        );
        assert_eq!(config.dimensions(), (5, 5));
        let alive: Vec<_> = config.initial().alive().collect();
        assert_eq!(
            alive,
            vec![Coord::new(1, 2), Coord::new(2, 2), Coord::new(3, 2)]
        );
    }

    #[test]
    fn quote_on_key_line() {
        let content = "n_iterations: 1\ndead_symbol: \"-\"\nlive_symbol: \"x\"\ninit_state: \"\nx-\n-x\n\"\n";
        let config: SimulationConfig = content.parse().unwrap();

        assert_eq!(config.initial().render(&config.symbols()), "x-\n-x\n");
    }

    #[test]
    fn fields_may_come_in_any_order() {
        let content = "live_symbol: \"o\"\ninit_state:\n\"\no.\n\"\ndead_symbol: \".\"\nn_iterations: 3\n";
        let config: SimulationConfig = content.parse().unwrap();

        assert_eq!(config.n_iterations(), 3);
        assert!(config.initial().is_alive(0, 0));
    }

    #[test]
    fn missing_iterations() {
        let content = BLINKER.replace("n_iterations: 20", "");

        assert!(matches!(
            content.parse::<SimulationConfig>(),
            Err(ConfigError::MissingField("n_iterations"))
        ));
    }

    #[test]
    fn decimal_iterations_rejected() {
        let content = BLINKER.replace("n_iterations: 20", "n_iterations: 2.5");

        assert!(matches!(
            content.parse::<SimulationConfig>(),
            Err(ConfigError::InvalidIterations(v)) if v == "2.5"
        ));
    }

    #[test]
    fn negative_iterations_parse() {
        // rejected later, when the simulation is built
        let content = BLINKER.replace("n_iterations: 20", "n_iterations: -1");
        let config: SimulationConfig = content.parse().unwrap();

        assert_eq!(config.n_iterations(), -1);
    }

    #[test]
    fn multi_character_symbol_rejected() {
        let content = BLINKER.replace(r#"dead_symbol: ".""#, r#"dead_symbol: "..""#);

        assert!(matches!(
            content.parse::<SimulationConfig>(),
            Err(ConfigError::InvalidSymbol("dead_symbol"))
        ));
    }

    #[test]
    fn identical_symbols_rejected() {
        let content = BLINKER.replace(r##"live_symbol: "#""##, r#"live_symbol: ".""#);

        assert!(matches!(
            content.parse::<SimulationConfig>(),
            Err(ConfigError::SameSymbols('.'))
        ));
    }

    #[test]
    fn invalid_cell_reports_line() {
        let content = BLINKER.replace("..#..\n..#..\n..#..", "..#..\n..?..\n..#..");

        assert!(matches!(
            content.parse::<SimulationConfig>(),
            Err(ConfigError::InvalidCell {
                line: 3,
                found: '?'
            })
        ));
    }

    #[test]
    fn jagged_state_is_shape_error() {
        let content = BLINKER.replace("..#..\n..#..\n..#..", "..#..\n..#.\n..#..");

        assert!(matches!(
            content.parse::<SimulationConfig>(),
            Err(ConfigError::Shape(ShapeError::RowLength {
                row: 2,
                expected: 5,
                found: 4
            }))
        ));
    }

    #[test]
    fn unterminated_state() {
        let content = BLINKER.trim_end().trim_end_matches('"');

        assert!(matches!(
            content.parse::<SimulationConfig>(),
            Err(ConfigError::MalformedState)
        ));
    }

    #[test]
    fn empty_state_is_shape_error() {
        let content = "n_iterations: 1\ndead_symbol: \".\"\nlive_symbol: \"#\"\ninit_state:\n\"\n\"\n";

        assert!(matches!(
            content.parse::<SimulationConfig>(),
            Err(ConfigError::Shape(ShapeError::Empty { .. }))
        ));
    }

    #[test]
    fn from_file_reads_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.config");
        std::fs::write(&path, BLINKER).unwrap();

        let config = SimulationConfig::from_file(&path).unwrap();
        assert_eq!(config.initial().alive_count(), 3);

        assert!(matches!(
            SimulationConfig::from_file(dir.path().join("missing")),
            Err(ConfigError::Io(_))
        ));
    }
}
