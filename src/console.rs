use crossterm::{
    cursor,
    event::{self, KeyCode, KeyEvent, KeyModifiers},
    execute, queue, terminal,
};
use gridlife::{Coord, GenerationSink, Grid, SinkError};
use std::{io, thread, time::Duration};

pub enum ConsoleCommand {
    Exit,
    Handled,
}

/// Draws each generation into the terminal
///
/// Arrow keys scroll the view, Ctrl+C stops the simulation.
pub struct ConsoleRender {
    tl: Coord,
    sleep: Option<Duration>,
}
impl ConsoleRender {
    pub fn new(sleep: Option<Duration>) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), cursor::Hide)?;
        Ok(Self {
            tl: Coord::default(),
            sleep,
        })
    }

    pub fn render(&self, generation: usize, grid: &Grid) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        // leave the last line for the footer
        let br = Coord::new(
            self.tl.row + rows.saturating_sub(1) as usize,
            self.tl.column + cols as usize,
        );
        let mut stdout = io::stdout();
        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
        for cell in grid.window(self.tl, br).iter() {
            let row = (cell.row - self.tl.row) as u16;
            let column = (cell.column - self.tl.column) as u16;
            queue!(stdout, cursor::MoveTo(column, row))?;
            io::Write::write_all(&mut stdout, b"\xE2\x96\x88")?;
        }

        // write footer
        let report = format!("generation:{} alive:{}", generation, grid.alive_count());
        queue!(stdout, cursor::MoveTo(0, rows.saturating_sub(1)))?;
        io::Write::write_all(&mut stdout, report.as_bytes())?;

        io::Write::flush(&mut stdout)
    }

    pub fn poll_events(&mut self) -> io::Result<Option<ConsoleCommand>> {
        // make sure event is preset for us to take
        if !event::poll(Duration::from_secs(0))? {
            return Ok(None);
        }

        let mut outp = Ok(Some(ConsoleCommand::Handled));
        match event::read()? {
            // CTRL+C
            event::Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }) => {
                outp = Ok(Some(ConsoleCommand::Exit));
            }
            // arrows to move grid
            event::Event::Key(KeyEvent { code, .. }) => match code {
                KeyCode::Up => self.tl.row = self.tl.row.saturating_sub(1),
                KeyCode::Down => self.tl.row += 1,
                KeyCode::Left => self.tl.column = self.tl.column.saturating_sub(1),
                KeyCode::Right => self.tl.column += 1,
                _ => {}
            },
            _ => {}
        }
        outp
    }
}
impl GenerationSink for ConsoleRender {
    fn emit(&mut self, generation: usize, grid: &Grid) -> Result<(), SinkError> {
        while let Some(cmd) = self.poll_events()? {
            if let ConsoleCommand::Exit = cmd {
                return Err(SinkError::Interrupted);
            }
        }
        self.render(generation, grid)?;
        if let Some(time) = self.sleep {
            thread::sleep(time);
        }
        Ok(())
    }
}
impl Drop for ConsoleRender {
    fn drop(&mut self) {
        // best effort, the terminal may already be gone
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), cursor::Show);
    }
}
