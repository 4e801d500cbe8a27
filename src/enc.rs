use crate::{
    grid::{Grid, ShapeError, cell_count},
    pos::Coord,
};
use regex::Regex;
use std::sync::LazyLock;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*x\s*=\s*(\d+)\s*,\s*y\s*=\s*(\d+)").expect("valid regex")
});
static RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d*)([bo$!])").expect("valid regex"));

#[derive(Debug, thiserror::Error)]
pub enum RleError {
    #[error("invalid run length {0:?}")]
    InvalidRun(String),
    #[error("pattern does not fit its grid: {0}")]
    Shape(#[from] ShapeError),
}

pub trait PatternCodec {
    fn encode(self, grid: &Grid) -> String;
    fn decode(self, value: &str) -> Result<Grid, RleError>;
}

struct RunEncoder {
    sequence: String,
    line_len: usize,
    max_line_len: usize,
}
impl RunEncoder {
    fn new(max_line_len: usize) -> Self {
        Self {
            sequence: String::new(),
            line_len: 0,
            max_line_len,
        }
    }

    fn push_run(&mut self, run: usize, c: char) {
        let append = match run {
            0 => String::new(),
            1 => c.to_string(),
            n => format!("{}{}", n, c),
        };
        if self.line_len + append.len() > self.max_line_len {
            self.sequence.push('\n');
            self.line_len = 0;
        }
        self.line_len += append.len();
        self.sequence.push_str(&append);
    }

    pub fn end(mut self) -> String {
        self.sequence.push('!');
        self.sequence
    }
}

/// The run-length encoded pattern format, sized to the whole grid
pub struct RunLengthEncoded {
    name: Option<String>,
}
impl RunLengthEncoded {
    pub fn set_name<T: AsRef<str>>(mut self, name: T) -> Self {
        self.name = Some(name.as_ref().to_owned());
        self
    }

    fn encode_header(&self, grid: &Grid) -> String {
        let mut header = String::new();
        if let Some(name) = &self.name {
            header.push_str(&format!("#N {}\n", name));
        }
        header.push_str(&format!(
            "x = {}, y = {}, rule = B3/S23",
            grid.columns(),
            grid.rows()
        ));
        header
    }
    fn encode_cells(&self, grid: &Grid) -> String {
        // runs are relative to the grid origin; `None` stands for the
        // position just before (0, 0)
        let mut last: Option<Coord> = None;
        let mut alive_run = 0;
        let mut seq = RunEncoder::new(70);
        for pos in grid.alive() {
            let (lines_run, dead_run) = match last {
                // one ahead of the last, only extend the run
                Some(prev) if prev.row == pos.row && prev.column + 1 == pos.column => {
                    alive_run += 1;
                    last = Some(pos);
                    continue;
                }
                Some(prev) if prev.row == pos.row => (0, pos.column - prev.column - 1),
                Some(prev) => (pos.row - prev.row, pos.column),
                None => (pos.row, pos.column),
            };
            // NOTE: order matters!
            seq.push_run(alive_run, 'o');
            seq.push_run(lines_run, '$');
            seq.push_run(dead_run, 'b');

            alive_run = 1;
            last = Some(pos);
        }

        seq.push_run(alive_run, 'o');
        seq.end()
    }
}
impl Default for RunLengthEncoded {
    fn default() -> Self {
        Self { name: None }
    }
}

impl PatternCodec for RunLengthEncoded {
    fn encode(self, grid: &Grid) -> String {
        format!("{}\n{}\n", self.encode_header(grid), self.encode_cells(grid))
    }

    /// Decodes a pattern, sized by its `x = .., y = ..` header or, without
    /// one, by the bounding box of its live cells
    fn decode(self, value: &str) -> Result<Grid, RleError> {
        let mut size: Option<(usize, usize)> = None;
        // bounding box of the live cells seen so far, as (rows, columns)
        let mut extent = (0, 0);
        let mut alive = Vec::new();
        let mut cursor = Coord::default();
        'lines_loop: for mut line in value.lines() {
            if let Some(i) = line.find('#') {
                line = &line[..i];
            }
            if let Some(caps) = HEADER_RE.captures(line) {
                let columns = parse_run(&caps[1])?;
                let rows = parse_run(&caps[2])?;
                cell_count(rows, columns)?;
                size = Some((rows, columns));
                continue;
            }

            for (_, [run_str, state]) in RUN_RE.captures_iter(line).map(|x| x.extract()) {
                let run = match run_str {
                    "" => 1,
                    s => parse_run(s)?,
                };
                match state {
                    "!" => break 'lines_loop,
                    "o" if run == 0 => {}
                    "o" => {
                        let end = advance(cursor.column, run, run_str)?;
                        match size {
                            Some((rows, columns)) if cursor.row >= rows || end > columns => {
                                let column = if cursor.row >= rows {
                                    cursor.column
                                } else {
                                    cursor.column.max(columns)
                                };
                                return Err(ShapeError::OutOfBounds {
                                    row: cursor.row,
                                    column,
                                    rows,
                                    columns,
                                }
                                .into());
                            }
                            Some(_) => {}
                            None => {
                                extent = (
                                    extent.0.max(cursor.row.saturating_add(1)),
                                    extent.1.max(end),
                                );
                                cell_count(extent.0, extent.1)?;
                            }
                        }
                        let row = cursor.row;
                        alive.extend((cursor.column..end).map(|column| Coord::new(row, column)));
                        cursor.column = end;
                    }
                    "b" => cursor.column = advance(cursor.column, run, run_str)?,
                    "$" => {
                        cursor.column = 0;
                        cursor.row = advance(cursor.row, run, run_str)?;
                    }
                    _ => unreachable!(),
                }
            }
        }

        let (rows, columns) = size.unwrap_or(extent);
        Ok(Grid::from_alive(rows, columns, &alive)?)
    }
}

fn parse_run(s: &str) -> Result<usize, RleError> {
    s.parse().map_err(|_| RleError::InvalidRun(s.to_owned()))
}

/// Moves a cursor coordinate `run` cells forward
fn advance(from: usize, run: usize, run_str: &str) -> Result<usize, RleError> {
    from.checked_add(run)
        .ok_or_else(|| RleError::InvalidRun(run_str.to_owned()))
}
