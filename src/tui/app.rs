//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration

use std::io;
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
    Terminal,
};

use crate::adapters::LogisticModel;
use crate::application::PredictionService;
use crate::config::{AppConfig, MODEL_PATH_ENV};
use crate::ports::Classifier;
use crate::HeartcheckError;

use super::ui::{
    about::{render_about, AboutState},
    form::{render_patient_form, PatientFormState},
    render_disclaimer,
    result::{render_result, ResultState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Result,
    About,
}

/// Main application state
pub struct App {
    screen: Screen,

    /// Screen to return to when leaving the about view
    previous_screen: Screen,

    should_quit: bool,

    service: PredictionService<dyn Classifier>,

    form_state: PatientFormState,
    result_state: ResultState,
    about_state: AboutState,
}

impl App {
    /// Create the application, loading the model artifact named by `config`.
    ///
    /// # Errors
    /// Fails if the artifact cannot be found, read or validated. There is no
    /// fallback model: the app refuses to start without one.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let model_path = config.resolve_model_path()?;
        let model = LogisticModel::load(&model_path)
            .with_context(|| format!("Set {MODEL_PATH_ENV} to a valid model artifact"))?;

        let about_state = AboutState {
            model_path: model_path.display().to_string(),
            model_fingerprint: model.fingerprint().map(str::to_owned),
        };
        let classifier: Arc<dyn Classifier> = Arc::new(model);

        Ok(Self::with_dependencies(
            PredictionService::new(classifier),
            about_state,
        ))
    }

    /// Create the application around an already-built service.
    #[must_use]
    pub fn with_dependencies(
        service: PredictionService<dyn Classifier>,
        about_state: AboutState,
    ) -> Self {
        Self {
            screen: Screen::Form,
            previous_screen: Screen::Form,
            should_quit: false,
            service,
            form_state: PatientFormState::default(),
            result_state: ResultState::default(),
            about_state,
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
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

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                match self.screen {
                    Screen::Form => render_patient_form(f, chunks[0], &self.form_state),
                    Screen::Result => render_result(f, chunks[0], &self.result_state),
                    Screen::About => render_about(f, chunks[0], &self.about_state),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    // Windows reports releases too
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

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Form => self.handle_form_key(key),
            Screen::Result => self.handle_result_key(key),
            Screen::About => self.handle_about_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::BackTab => self.form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form_state.next_field(),
            KeyCode::Left => self.form_state.cycle_option(false),
            KeyCode::Right => self.form_state.cycle_option(true),
            KeyCode::Char('?') => self.open_about(),
            KeyCode::Char(c) => self.form_state.input_char(c),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Delete => self.form_state.clear_field(),
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.screen = Screen::Form;
            }
            KeyCode::Char('?') => self.open_about(),
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_about_key(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?')) {
            self.screen = self.previous_screen;
        }
    }

    fn open_about(&mut self) {
        self.previous_screen = self.screen;
        self.screen = Screen::About;
    }

    fn submit_form(&mut self) {
        let raw = self.form_state.to_raw_answers();

        match self.service.assess_raw(&raw) {
            Ok(assessment) => {
                self.result_state = ResultState::Complete { assessment };
                self.screen = Screen::Result;
                self.form_state.clear_sensitive();
            }
            Err(HeartcheckError::InvalidInput { field, reason }) => {
                self.form_state.focus(field);
                self.form_state.error_message = Some(format!("{field}: {reason}"));
            }
            Err(e) => {
                tracing::error!("Prediction failed: {}", e);
                self.result_state = ResultState::Error {
                    message: e.to_string(),
                };
                self.screen = Screen::Result;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Field, FeatureVector, Prediction};
    use crate::ports::ClassifierError;

    struct FixedLabel(i64);

    impl Classifier for FixedLabel {
        fn predict(&self, batch: &[FeatureVector]) -> std::result::Result<Vec<i64>, ClassifierError> {
            Ok(vec![self.0; batch.len()])
        }
    }

    fn app_with_label(label: i64) -> App {
        let classifier: Arc<dyn Classifier> = Arc::new(FixedLabel(label));
        App::with_dependencies(
            PredictionService::new(classifier),
            crate::tui::AboutState::default(),
        )
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    #[test]
    fn test_submit_shows_positive_result() {
        let mut app = app_with_label(1);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::Result);
        match &app.result_state {
            ResultState::Complete { assessment } => {
                assert_eq!(assessment.prediction, Prediction::Positive);
            }
            other => panic!("Expected a completed result, got {other:?}"),
        }
    }

    #[test]
    fn test_contract_violation_shows_error() {
        let mut app = app_with_label(7);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::Result);
        assert!(matches!(app.result_state, ResultState::Error { .. }));
    }

    #[test]
    fn test_invalid_input_stays_on_form() {
        let mut app = app_with_label(0);
        app.form_state.focus(Field::MaxHeartRate);
        press(&mut app, KeyCode::Delete);
        app.form_state.selected_field = 0;
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::Form);
        assert!(app.form_state.error_message.is_some());
        assert_eq!(
            app.form_state.fields[app.form_state.selected_field].field,
            Field::MaxHeartRate
        );
    }

    #[test]
    fn test_about_returns_to_previous_screen() {
        let mut app = app_with_label(0);
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.screen(), Screen::About);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Screen::Form);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_ctrl_q_quits_anywhere() {
        let mut app = app_with_label(0);
        press(&mut app, KeyCode::Char('?'));
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_new_fails_without_artifact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig {
            model_path: Some(dir.path().join("absent.json")),
            ..AppConfig::from_lookup(|_| None)
        };
        assert!(App::new(&config).is_err());
    }
}
