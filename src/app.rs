//! Application state management for the dualcast form
//!
//! This module contains the form state, handling keyboard input, submitting
//! requests to the forecast pipeline and state transitions between editing,
//! fetching and error notices.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::cli::FormPrefill;
use crate::forecast::{ForecastError, ForecastPipeline, ForecastReport};
use crate::presenter::present_error;

/// Application state enum representing what the form is doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Fields accept input
    Editing,
    /// A request is in flight
    Fetching,
    /// A blocking message must be dismissed before editing resumes
    Notice(Notice),
}

/// A blocking error message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    fn from_error(err: &ForecastError) -> Self {
        Self {
            title: err.title().to_string(),
            message: present_error(err).join("\n"),
        }
    }
}

/// Input fields, in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    City,
    Country,
    Date,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::City, Field::Country, Field::Date];

    /// Field label shown above the input
    pub fn label(&self) -> &'static str {
        match self {
            Field::City => "City",
            Field::Country => "Country (Phone Code)",
            Field::Date => "Date (YYYY-MM-DD)",
        }
    }

    fn next(self) -> Self {
        match self {
            Field::City => Field::Country,
            Field::Country => Field::Date,
            Field::Date => Field::City,
        }
    }

    fn previous(self) -> Self {
        match self {
            Field::City => Field::Date,
            Field::Country => Field::City,
            Field::Date => Field::Country,
        }
    }
}

/// Contents of the result panel
#[derive(Debug, Default)]
pub enum ResultPanel {
    /// Nothing submitted yet
    #[default]
    Empty,
    /// Last successful forecast
    Report(ForecastReport),
    /// Both providers failed; lines explain why
    Unavailable(Vec<String>),
}

/// Main application struct managing form state and the pipeline
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Field that receives typed characters
    pub focus: Field,
    /// City input
    pub city: String,
    /// Country code input
    pub country: String,
    /// Date input
    pub date: String,
    /// What the result panel shows
    pub panel: ResultPanel,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag indicating the user asked for a forecast
    pub submit_requested: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Validation, geocoding and providers
    pipeline: ForecastPipeline,
}

impl App {
    /// Creates a new App with empty fields
    pub fn new(pipeline: ForecastPipeline) -> Self {
        Self {
            state: AppState::Editing,
            focus: Field::City,
            city: String::new(),
            country: String::new(),
            date: String::new(),
            panel: ResultPanel::Empty,
            should_quit: false,
            submit_requested: false,
            show_help: false,
            pipeline,
        }
    }

    /// Fills in fields passed on the command line
    ///
    /// Focus moves to the first field still empty.
    pub fn with_prefill(mut self, prefill: FormPrefill) -> Self {
        self.city = prefill.city;
        self.country = prefill.country;
        self.date = prefill.date;
        self.focus = Field::ALL
            .into_iter()
            .find(|field| self.value(*field).is_empty())
            .unwrap_or(Field::City);
        self
    }

    /// Current text of a field
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::City => &self.city,
            Field::Country => &self.country,
            Field::Date => &self.date,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::City => &mut self.city,
            Field::Country => &mut self.country,
            Field::Date => &mut self.date,
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `Ctrl-C`: Quit from anywhere
    /// - `Esc` (editing): Quit the application
    /// - `Tab`/`Down`, `Shift-Tab`/`Up`: Move between fields
    /// - `Enter` (editing): Request a forecast
    /// - `Backspace`: Delete the last character of the focused field
    /// - `F1`: Toggle help
    /// - `Enter`/`Esc` (notice): Dismiss the notice
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            if matches!(key_event.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Enter) {
                self.show_help = false;
            }
            return;
        }

        match &self.state {
            AppState::Fetching => {}
            AppState::Notice(_) => {
                if matches!(key_event.code, KeyCode::Enter | KeyCode::Esc) {
                    self.state = AppState::Editing;
                }
            }
            AppState::Editing => match key_event.code {
                KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Tab | KeyCode::Down => {
                    self.focus = self.focus.next();
                }
                KeyCode::BackTab | KeyCode::Up => {
                    self.focus = self.focus.previous();
                }
                KeyCode::Enter => {
                    self.submit_requested = true;
                }
                KeyCode::Backspace => {
                    self.value_mut(self.focus).pop();
                }
                KeyCode::F(1) => {
                    self.show_help = true;
                }
                KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.value_mut(self.focus).push(c);
                }
                _ => {}
            },
        }
    }

    /// Marks a requested submission as in flight
    ///
    /// Returns `true` if there was a request; the caller should redraw and
    /// then await [`submit`](Self::submit).
    pub fn begin_submit(&mut self) -> bool {
        if !self.submit_requested {
            return false;
        }
        self.submit_requested = false;
        self.state = AppState::Fetching;
        true
    }

    /// Runs the pipeline on the current fields and stores the outcome
    ///
    /// Validation and lookup errors become a notice and leave the previous
    /// result in place. A request with no provider data replaces the panel.
    pub async fn submit(&mut self) {
        let result = self
            .pipeline
            .compute_forecast(&self.city, &self.country, &self.date)
            .await;

        self.state = AppState::Editing;
        match result {
            Ok(report) => {
                self.panel = ResultPanel::Report(report);
            }
            Err(err @ ForecastError::NoForecast { .. }) => {
                self.panel = ResultPanel::Unavailable(present_error(&err));
            }
            Err(err) => {
                self.state = AppState::Notice(Notice::from_error(&err));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Coordinates, FetchError, Forecast, ForecastSource, Geocoder};
    use async_trait::async_trait;
    use chrono::{Duration, Local, NaiveDate};
    use crossterm::event::{KeyEventKind, KeyEventState};

    struct StubGeocoder;

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn locate(
            &self,
            city: &str,
            _: &str,
        ) -> Result<Option<Coordinates>, FetchError> {
            Ok((city != "Atlantis").then(|| Coordinates::new(12.9, 77.6)))
        }
    }

    struct StubSource(Option<Forecast>);

    #[async_trait]
    impl ForecastSource for StubSource {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn fetch(&self, _: Coordinates, date: NaiveDate) -> Result<Forecast, FetchError> {
            self.0.ok_or(FetchError::NoDataForDate(date))
        }
    }

    fn app_with(a: Option<Forecast>, b: Option<Forecast>) -> App {
        App::new(ForecastPipeline::new(
            Box::new(StubGeocoder),
            Box::new(StubSource(a)),
            Box::new(StubSource(b)),
        ))
    }

    fn app() -> App {
        app_with(Some(Forecast::new(30.0, 20.0, 0.0)), None)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn upcoming_date() -> String {
        (Local::now().date_naive() + Duration::days(3))
            .format("%Y-%m-%d")
            .to_string()
    }

    fn fill(app: &mut App, city: &str, country: &str, date: &str) {
        app.city = city.to_string();
        app.country = country.to_string();
        app.date = date.to_string();
    }

    #[test]
    fn test_initial_state() {
        let app = app();
        assert_eq!(app.state, AppState::Editing);
        assert_eq!(app.focus, Field::City);
        assert!(matches!(app.panel, ResultPanel::Empty));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut app = app();
        type_text(&mut app, "Pune");
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "91");
        app.handle_key(key(KeyCode::Down));
        type_text(&mut app, "2026-10-20");

        assert_eq!(app.city, "Pune");
        assert_eq!(app.country, "91");
        assert_eq!(app.date, "2026-10-20");
    }

    #[test]
    fn test_backspace_deletes_from_focused_field() {
        let mut app = app();
        type_text(&mut app, "Londonx");
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.city, "London");
    }

    #[test]
    fn test_focus_wraps_both_ways() {
        let mut app = app();
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.focus, Field::Date);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Field::City);
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.focus, Field::Date);
    }

    #[test]
    fn test_esc_quits_while_editing() {
        let mut app = app();
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_from_notice() {
        let mut app = app();
        app.state = AppState::Notice(Notice {
            title: "Date Error".to_string(),
            message: "past".to_string(),
        });
        app.handle_key(KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('c'))
        });
        assert!(app.should_quit);
        assert!(app.city.is_empty());
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = app();
        app.handle_key(key(KeyCode::F(1)));
        assert!(app.show_help);

        type_text(&mut app, "abc");
        assert!(app.city.is_empty(), "Typing should not reach fields under help");

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_enter_requests_submit_once() {
        let mut app = app();
        assert!(!app.begin_submit());

        app.handle_key(key(KeyCode::Enter));
        assert!(app.submit_requested);
        assert!(app.begin_submit());
        assert_eq!(app.state, AppState::Fetching);
        assert!(!app.begin_submit());
    }

    #[test]
    fn test_prefill_focuses_first_empty_field() {
        let app = app().with_prefill(FormPrefill {
            city: "London".to_string(),
            country: "44".to_string(),
            date: String::new(),
        });
        assert_eq!(app.city, "London");
        assert_eq!(app.focus, Field::Date);
    }

    #[tokio::test]
    async fn test_submit_success_shows_report() {
        let mut app = app();
        fill(&mut app, "Bengaluru", "91", &upcoming_date());

        app.submit().await;

        assert_eq!(app.state, AppState::Editing);
        match &app.panel {
            ResultPanel::Report(report) => {
                assert_eq!(report.forecast, Forecast::new(30.0, 20.0, 0.0));
            }
            other => panic!("Expected a report, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_with_blank_field_shows_input_notice() {
        let mut app = app();
        fill(&mut app, "Bengaluru", "", &upcoming_date());

        app.submit().await;

        match &app.state {
            AppState::Notice(notice) => {
                assert_eq!(notice.title, "Input Error");
                assert!(notice.message.contains("country"));
            }
            other => panic!("Expected a notice, got {:?}", other),
        }
        assert!(matches!(app.panel, ResultPanel::Empty));
    }

    #[tokio::test]
    async fn test_submit_unknown_city_shows_location_notice() {
        let mut app = app();
        fill(&mut app, "Atlantis", "1", &upcoming_date());

        app.submit().await;

        match &app.state {
            AppState::Notice(notice) => assert_eq!(notice.title, "Location Error"),
            other => panic!("Expected a notice, got {:?}", other),
        }

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Editing);
    }

    #[tokio::test]
    async fn test_submit_without_provider_data_replaces_panel() {
        let mut app = app_with(None, None);
        fill(&mut app, "Bengaluru", "91", &upcoming_date());

        app.submit().await;

        assert_eq!(app.state, AppState::Editing);
        match &app.panel {
            ResultPanel::Unavailable(lines) => {
                assert_eq!(lines[0], "No forecast available.");
                assert_eq!(lines.len(), 3);
            }
            other => panic!("Expected unavailable panel, got {:?}", other),
        }
    }
}
