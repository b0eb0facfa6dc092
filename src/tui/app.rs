//! Main TUI application: one page, one Predict action.
//!
//! Handles:
//! - Input event handling for the sidebar form
//! - Idle → Displayed / Failed transitions
//! - Service integration

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::adapters::logit::LogisticModel;
use crate::application::{collect, PredictionService};
use crate::MortalityError;

use super::ui::{
    form::{render_sidebar, SidebarForm},
    render_disclaimer, render_footer, render_header,
    result::{render_result, ResultState},
    summary::render_input_summary,
};

/// Default artifact location, relative to the working directory.
const DEFAULT_MODEL_PATH: &str = "models/logit_model.json";

/// Configured model path (`MORTALITY_MODEL_PATH`, or the default).
#[must_use]
pub fn model_path_from_env() -> PathBuf {
    std::env::var("MORTALITY_MODEL_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH))
}

/// Main application state
pub struct App {
    /// Whether the app should quit
    should_quit: bool,

    /// Prediction service over the process-wide model
    service: PredictionService<LogisticModel>,

    /// Sidebar form state
    form: SidebarForm,

    /// Result area state
    result: ResultState,
}

impl App {
    /// Create a new application, loading the model from the configured path.
    ///
    /// # Errors
    /// Returns error if the model artifact cannot be loaded. This is fatal:
    /// no predictions can be served without it.
    pub fn new() -> Result<Self> {
        let model_path = model_path_from_env();
        let model = LogisticModel::load(&model_path)
            .map_err(MortalityError::from)
            .with_context(|| {
                format!(
                    "Failed to load model from {:?}. Set MORTALITY_MODEL_PATH to the model artifact or its directory.",
                    model_path
                )
            })?;

        Ok(Self::with_dependencies(PredictionService::new(Arc::new(model))))
    }

    /// Create application with an injected prediction service.
    #[must_use]
    pub fn with_dependencies(service: PredictionService<LogisticModel>) -> Self {
        Self {
            should_quit: false,
            service,
            form: SidebarForm::default(),
            result: ResultState::Idle,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        self.form.clear_sensitive();
        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&self, f: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Header
                Constraint::Min(0),    // Sidebar + main
                Constraint::Length(2), // Key hints / errors
                Constraint::Length(2), // Disclaimer
            ])
            .split(f.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
            .split(rows[1]);

        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(16), // Input summary: 13 rows + header + borders
                Constraint::Min(0),     // Result
            ])
            .split(columns[1]);

        let model = self.service.classifier();
        render_header(f, rows[0], model.fingerprint(), model.description());
        render_sidebar(f, columns[0], &self.form);
        render_input_summary(f, main[0], &self.form);
        render_result(f, main[1], &self.result);
        render_footer(f, rows[2], self.form.error_message.as_deref());
        render_disclaimer(f, rows[3]);
    }

    pub(crate) fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let edited = match key {
            KeyCode::Esc => {
                self.should_quit = true;
                false
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.form.prev_field();
                false
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form.next_field();
                false
            }
            KeyCode::Enter | KeyCode::Char('p') | KeyCode::Char('P') => {
                self.predict();
                false
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.form.reset();
                true
            }
            KeyCode::Char(' ') => self.form.toggle(),
            KeyCode::Char(c) => self.form.input_char(c),
            KeyCode::Backspace => self.form.delete_char(),
            KeyCode::Delete => self.form.clear_field(),
            _ => false,
        };

        // Any edit invalidates the displayed result.
        if edited {
            self.result = ResultState::Idle;
        }
    }

    /// Collect the form, score it, and update the result area.
    fn predict(&mut self) {
        let record = match collect(&self.form) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Rejected form input; prediction not run");
                self.form.error_message = Some(e.to_string());
                self.result = ResultState::Idle;
                return;
            }
        };

        self.result = match self.service.score(&record) {
            Ok(result) => ResultState::Displayed {
                result,
                scored_at: chrono::Local::now(),
            },
            Err(e) => {
                tracing::error!("Prediction failed: {}", e);
                ResultState::Failed {
                    message: e.to_string(),
                }
            }
        };
    }
}
