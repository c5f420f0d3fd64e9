//! Application state and core logic

use crate::captcha::{CaptchaHooks, CaptchaSignal, ChallengeCaptcha};
use crate::config::TuiConfig;
use crate::state::{FieldEdit, Focus, FormController, SubmitOutcome, CAPTCHA_REQUIRED_MESSAGE};
use crate::validation::FieldId;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

/// Main application struct
pub struct App {
    /// Registration form controller
    pub controller: FormController<ChallengeCaptcha>,
    /// Notifications raised by the CAPTCHA widget's hooks
    captcha_signals: UnboundedReceiver<CaptchaSignal>,
    /// Whether the app should quit
    quit: bool,
    /// Feedback shown in the status bar
    pub status_message: Option<String>,
}

impl App {
    /// Create a new App instance
    pub fn new(config: &TuiConfig) -> Self {
        let (tx, rx) = unbounded_channel();
        let captcha = ChallengeCaptcha::new(config.captcha_ttl(), CaptchaHooks::from_sender(tx));

        Self {
            controller: FormController::new(config, captcha),
            captcha_signals: rx,
            quit: false,
            status_message: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Advance time-driven state: token expiry, hook signals, pending reset
    pub fn tick(&mut self, now: Instant) {
        self.controller.captcha_mut().tick(now);
        self.drain_captcha_signals();

        let was_success = self.controller.success_visible();
        self.controller.tick(now);
        if was_success && self.controller.form_visible() {
            self.status_message = None;
        }
    }

    fn drain_captcha_signals(&mut self) {
        while let Ok(signal) = self.captcha_signals.try_recv() {
            tracing::debug!("CAPTCHA signal: {signal:?}");
            self.controller.apply_captcha_signal(signal);
        }
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Any key leaves the success screen early
        if self.controller.success_visible() {
            self.controller.dismiss_success();
            self.status_message = None;
            return;
        }

        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.submit();
                return;
            }
            KeyCode::Char('w') if key.modifiers.contains(crate::platform::SUBMIT_MODIFIER) => {
                self.submit();
                return;
            }
            KeyCode::Esc => {
                self.quit = true;
                return;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.controller.focus_next();
                return;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.controller.focus_prev();
                return;
            }
            _ => {}
        }

        match self.controller.focus() {
            Focus::Field(field) => self.handle_field_key(field, key),
            Focus::Captcha => self.handle_captcha_key(key),
            Focus::Submit => self.handle_submit_key(key),
        }
    }

    fn handle_field_key(&mut self, field: FieldId, key: KeyEvent) {
        let is_plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter if field == FieldId::Terms => {
                self.controller.handle_input(field, FieldEdit::Toggle);
            }
            KeyCode::Char(c) if is_plain && field != FieldId::Terms => {
                self.controller.handle_input(field, FieldEdit::Push(c));
            }
            KeyCode::Backspace if field != FieldId::Terms => {
                self.controller.handle_input(field, FieldEdit::Backspace);
            }
            KeyCode::Enter => self.controller.focus_next(),
            _ => {}
        }
    }

    fn handle_captcha_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.controller.captcha_mut().push_char(c),
            KeyCode::Backspace => self.controller.captcha_mut().pop_char(),
            KeyCode::Enter => {
                let solved = self.controller.captcha_mut().submit_answer(Instant::now());
                self.drain_captcha_signals();
                if solved {
                    self.status_message = Some("CAPTCHA verificado".to_string());
                    self.controller.focus_next();
                }
            }
            _ => {}
        }
    }

    fn handle_submit_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            if self.controller.submit_enabled() {
                self.submit();
            } else {
                self.status_message = Some("Completa el formulario para continuar".to_string());
            }
        }
    }

    /// Run the form's submit action and report the outcome
    fn submit(&mut self) {
        self.drain_captcha_signals();
        let outcome = self.controller.submit(Instant::now());
        let message = match outcome {
            SubmitOutcome::Accepted => "¡Registro exitoso!",
            SubmitOutcome::InvalidFields => "Corrige los campos marcados",
            SubmitOutcome::CaptchaRequired => CAPTCHA_REQUIRED_MESSAGE,
            SubmitOutcome::Ignored => return,
        };
        self.status_message = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FormPhase;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    /// Read the challenge prompt and compute its answer
    fn captcha_answer(app: &App) -> u16 {
        app.controller
            .captcha()
            .prompt()
            .split(|c: char| !c.is_ascii_digit())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<u16>().unwrap())
            .sum()
    }

    /// Fill every field with valid input using only the keyboard
    fn fill_form(app: &mut App) {
        let values = [
            "Ana María",
            "ana@correo.com",
            "Abcdefghi1@",
            "Abcdefghi1@",
            "1990-04-12",
            "3101234567",
            "",
        ];
        for value in values {
            type_str(app, value);
            app.handle_key(key(KeyCode::Tab));
        }
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Tab));
    }

    fn solve_captcha(app: &mut App) {
        assert_eq!(app.controller.focus(), Focus::Captcha);
        let answer = captcha_answer(app);
        type_str(app, &answer.to_string());
        app.handle_key(key(KeyCode::Enter));
    }

    mod app_basic_tests {
        use super::*;

        #[test]
        fn test_should_quit_initially_false() {
            let app = App::new(&TuiConfig::default());
            assert!(!app.should_quit());
            assert!(app.status_message.is_none());
        }

        #[test]
        fn test_esc_quits() {
            let mut app = App::new(&TuiConfig::default());
            app.handle_key(key(KeyCode::Esc));
            assert!(app.should_quit());
        }

        #[test]
        fn test_tab_and_backtab_move_focus() {
            let mut app = App::new(&TuiConfig::default());
            app.handle_key(key(KeyCode::Tab));
            assert_eq!(app.controller.focus(), Focus::Field(FieldId::Email));
            app.handle_key(key(KeyCode::BackTab));
            app.handle_key(key(KeyCode::Up));
            assert_eq!(app.controller.focus(), Focus::Submit);
        }
    }

    mod field_input_tests {
        use super::*;

        #[test]
        fn test_typing_goes_to_focused_field() {
            let mut app = App::new(&TuiConfig::default());
            type_str(&mut app, "Ana");
            assert_eq!(app.controller.form().field(FieldId::Name).as_text(), "Ana");
        }

        #[test]
        fn test_shifted_chars_are_typed() {
            let mut app = App::new(&TuiConfig::default());
            app.handle_key(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT));
            assert_eq!(app.controller.form().field(FieldId::Name).as_text(), "A");
        }

        #[test]
        fn test_control_chars_are_not_typed() {
            let mut app = App::new(&TuiConfig::default());
            app.handle_key(ctrl('a'));
            assert_eq!(app.controller.form().field(FieldId::Name).as_text(), "");
        }

        #[test]
        fn test_backspace_edits_and_revalidates() {
            let mut app = App::new(&TuiConfig::default());
            type_str(&mut app, "Ana");
            app.handle_key(key(KeyCode::Backspace));
            let field = app.controller.form().field(FieldId::Name);
            assert_eq!(field.as_text(), "An");
            assert!(field.invalid);
        }

        #[test]
        fn test_enter_advances_from_text_field() {
            let mut app = App::new(&TuiConfig::default());
            app.handle_key(key(KeyCode::Enter));
            assert_eq!(app.controller.focus(), Focus::Field(FieldId::Email));
        }

        #[test]
        fn test_space_toggles_terms() {
            let mut app = App::new(&TuiConfig::default());
            for _ in 0..7 {
                app.handle_key(key(KeyCode::Tab));
            }
            assert_eq!(app.controller.focus(), Focus::Field(FieldId::Terms));
            app.handle_key(key(KeyCode::Char(' ')));
            assert!(app.controller.form().field(FieldId::Terms).is_checked());
            app.handle_key(key(KeyCode::Enter));
            assert!(!app.controller.form().field(FieldId::Terms).is_checked());
        }
    }

    mod captcha_tests {
        use super::*;

        #[test]
        fn test_solving_captcha_enables_submit() {
            let mut app = App::new(&TuiConfig::default());
            fill_form(&mut app);
            assert!(!app.controller.submit_enabled());

            solve_captcha(&mut app);

            assert!(app.controller.is_captcha_verified());
            assert!(app.controller.submit_enabled());
            assert_eq!(app.controller.focus(), Focus::Submit);
        }

        #[test]
        fn test_wrong_answer_keeps_submit_disabled() {
            let mut app = App::new(&TuiConfig::default());
            fill_form(&mut app);
            let wrong = captcha_answer(&app) + 1;
            type_str(&mut app, &wrong.to_string());
            app.handle_key(key(KeyCode::Enter));

            assert!(!app.controller.is_captcha_verified());
            assert!(app.controller.captcha().feedback.is_some());
            assert!(!app.controller.submit_enabled());
        }

        #[test]
        fn test_token_expiry_disables_submit() {
            let config = TuiConfig {
                captcha_ttl_secs: Some(60),
                ..Default::default()
            };
            let mut app = App::new(&config);
            fill_form(&mut app);
            solve_captcha(&mut app);
            assert!(app.controller.submit_enabled());

            app.tick(Instant::now() + Duration::from_secs(61));

            assert!(!app.controller.submit_enabled());
            assert_eq!(
                app.controller.captcha_message(),
                Some(CAPTCHA_REQUIRED_MESSAGE)
            );
        }
    }

    mod submit_tests {
        use super::*;

        #[test]
        fn test_ctrl_s_without_captcha_reports_it() {
            let mut app = App::new(&TuiConfig::default());
            fill_form(&mut app);

            app.handle_key(ctrl('s'));

            assert!(app.controller.form_visible());
            assert_eq!(
                app.status_message.as_deref(),
                Some(CAPTCHA_REQUIRED_MESSAGE)
            );
            assert_eq!(
                app.controller.captcha_message(),
                Some(CAPTCHA_REQUIRED_MESSAGE)
            );
        }

        #[test]
        fn test_ctrl_s_on_empty_form_marks_fields() {
            let mut app = App::new(&TuiConfig::default());
            app.handle_key(ctrl('s'));
            assert_eq!(
                app.status_message.as_deref(),
                Some("Corrige los campos marcados")
            );
            assert!(app.controller.form().field(FieldId::Email).invalid);
        }

        #[test]
        fn test_enter_on_disabled_submit_does_nothing() {
            let mut app = App::new(&TuiConfig::default());
            app.handle_key(key(KeyCode::BackTab));
            assert_eq!(app.controller.focus(), Focus::Submit);

            app.handle_key(key(KeyCode::Enter));

            assert!(app.controller.form_visible());
            assert!(!app.controller.form().field(FieldId::Email).invalid);
        }

        #[test]
        fn test_full_flow_resets_after_delay() {
            let config = TuiConfig {
                reset_delay_ms: Some(2500),
                ..Default::default()
            };
            let mut app = App::new(&config);
            fill_form(&mut app);
            solve_captcha(&mut app);

            app.handle_key(key(KeyCode::Enter));
            assert!(app.controller.success_visible());
            assert_eq!(app.controller.phase(), FormPhase::SubmittedSuccess);
            assert_eq!(app.status_message.as_deref(), Some("¡Registro exitoso!"));

            app.tick(Instant::now() + Duration::from_millis(2600));

            assert!(app.controller.form_visible());
            assert!(!app.controller.submit_enabled());
            assert!(!app.controller.is_captcha_verified());
            assert!(app.status_message.is_none());
            assert_eq!(app.controller.focus(), Focus::Field(FieldId::Name));
            for field in app.controller.form().fields() {
                assert_eq!(field.as_text(), "");
                assert!(!field.invalid);
            }
        }

        #[test]
        fn test_key_during_success_dismisses_it() {
            let mut app = App::new(&TuiConfig::default());
            fill_form(&mut app);
            solve_captcha(&mut app);
            app.handle_key(ctrl('s'));
            assert!(app.controller.success_visible());

            app.handle_key(key(KeyCode::Char('x')));

            assert!(app.controller.form_visible());
            assert_eq!(app.controller.form().field(FieldId::Name).as_text(), "");
            assert!(!app.should_quit());
        }
    }
}
