//! Interactive terminal dashboard over a loaded dataset

pub mod state;
pub mod views;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::Duration;

use crate::dataset::Dataset;
use crate::filter::FormSelection;

pub use state::{DashboardData, DashboardState, Tab};

pub struct Dashboard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    data: DashboardData,
    state: DashboardState,
}

impl Dashboard {
    pub fn new(title: impl Into<String>, dataset: Dataset, forms: FormSelection) -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            data: DashboardData::new(title, dataset),
            state: DashboardState::new(forms),
        })
    }

    /// Redraw on every key press until the user quits
    pub fn run(mut self) -> Result<()> {
        while !self.state.should_quit {
            let data = &self.data;
            let state = &self.state;
            self.terminal.draw(|frame| views::draw(frame, data, state))?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.state.handle_key(key.code, &self.data);
                    }
                }
            }
        }
        Ok(())
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        terminal::disable_raw_mode().ok();
        self.terminal
            .backend_mut()
            .execute(LeaveAlternateScreen)
            .ok();
        self.terminal.show_cursor().ok();
    }
}
