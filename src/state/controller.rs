//! Registration form controller
//!
//! Owns the form, the CAPTCHA widget and the CAPTCHA-verified flag, and keeps
//! field markers, submit eligibility and the success flow consistent with
//! them. Every operation runs synchronously to completion; the only
//! temporal element is the reset deadline, driven by [`FormController::tick`].

use super::forms::{Focus, Form, RegistrationForm};
use super::reset_timer::ResetTimer;
use crate::captcha::{CaptchaSignal, CaptchaWidget};
use crate::config::TuiConfig;
use crate::validation::{FieldId, RuleSet, ValidationContext, Verdict, RULES};
use chrono::{Local, NaiveDate};
use std::time::Instant;

pub const CAPTCHA_REQUIRED_MESSAGE: &str = "Por favor completa el CAPTCHA";

/// Where the form is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Some field is invalid or the CAPTCHA is unsolved
    Editing,
    /// Everything checks out; submit is enabled
    SubmitEligible,
    /// Success message is showing; the form is hidden until reset
    SubmittedSuccess,
}

/// A mutation of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Push(char),
    Backspace,
    Toggle,
    Replace(String),
}

/// Result of a submit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    InvalidFields,
    CaptchaRequired,
    /// A success screen is already showing
    Ignored,
}

pub struct FormController<W: CaptchaWidget> {
    form: RegistrationForm,
    rules: RuleSet,
    captcha: W,
    captcha_verified: bool,
    captcha_message: Option<String>,
    phase: FormPhase,
    submit_enabled: bool,
    reset_timer: ResetTimer,
    fixed_today: Option<NaiveDate>,
}

impl<W: CaptchaWidget> FormController<W> {
    pub fn new(config: &TuiConfig, captcha: W) -> Self {
        Self {
            form: RegistrationForm::new(),
            rules: RuleSet::new(config.rules.clone()),
            captcha,
            captcha_verified: false,
            captcha_message: None,
            phase: FormPhase::Editing,
            submit_enabled: false,
            reset_timer: ResetTimer::new(config.reset_delay()),
            fixed_today: None,
        }
    }

    /// Pin the reference date used for age checks
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn captcha(&self) -> &W {
        &self.captcha
    }

    pub fn captcha_mut(&mut self) -> &mut W {
        &mut self.captcha
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn is_captcha_verified(&self) -> bool {
        self.captcha_verified
    }

    pub fn captcha_message(&self) -> Option<&str> {
        self.captcha_message.as_deref()
    }

    pub fn form_visible(&self) -> bool {
        self.phase != FormPhase::SubmittedSuccess
    }

    pub fn success_visible(&self) -> bool {
        self.phase == FormPhase::SubmittedSuccess
    }

    /// How far the pending reset has progressed, in `0.0..=1.0`
    pub fn reset_progress(&self, now: Instant) -> f32 {
        self.reset_timer.progress(now)
    }

    pub fn focus(&self) -> Focus {
        self.form.focus()
    }

    pub fn focus_next(&mut self) {
        self.form.next_field();
    }

    pub fn focus_prev(&mut self) {
        self.form.prev_field();
    }

    fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    fn verdict(&self, field: FieldId) -> Verdict {
        let ctx = ValidationContext::new(self.form.field(FieldId::Password).as_text(), self.today());
        self.rules.validate(field, &self.form.field(field).value, &ctx)
    }

    /// Apply an input/change event to `field`.
    ///
    /// The edited field becomes touched, then the whole form is re-scanned,
    /// so a password edit also refreshes a touched confirmation.
    pub fn handle_input(&mut self, field: FieldId, edit: FieldEdit) {
        if self.phase == FormPhase::SubmittedSuccess {
            return;
        }

        let slot = self.form.field_mut(field);
        match edit {
            FieldEdit::Push(c) => slot.push_char(c),
            FieldEdit::Backspace => slot.pop_char(),
            FieldEdit::Toggle => slot.toggle(),
            FieldEdit::Replace(value) => slot.set_text(value),
        }
        slot.touched = true;

        let all_valid = self.rescan();
        tracing::debug!(
            field = field.name(),
            valid = !self.form.field(field).invalid,
            all_valid,
            "field changed"
        );
    }

    /// Re-run every rule, refresh markers on touched fields and recompute
    /// eligibility. Returns aggregate field validity.
    fn rescan(&mut self) -> bool {
        let mut all_valid = true;
        for rule in &RULES {
            let verdict = self.verdict(rule.field);
            let slot = self.form.field_mut(rule.field);
            if slot.touched {
                slot.apply_verdict(&verdict);
            }
            all_valid &= verdict.valid;
        }
        self.recompute_eligibility(all_valid);
        all_valid
    }

    fn recompute_eligibility(&mut self, all_valid: bool) {
        self.submit_enabled = all_valid && self.captcha_verified;
        if self.phase != FormPhase::SubmittedSuccess {
            self.phase = if self.submit_enabled {
                FormPhase::SubmitEligible
            } else {
                FormPhase::Editing
            };
        }
    }

    /// Route a hook notification from the CAPTCHA widget
    pub fn apply_captcha_signal(&mut self, signal: CaptchaSignal) {
        match signal {
            CaptchaSignal::Verified => self.on_captcha_verified(),
            CaptchaSignal::Expired => self.on_captcha_expired(),
        }
    }

    pub fn on_captcha_verified(&mut self) {
        self.captcha_verified = true;
        self.captcha_message = None;
        self.rescan();
    }

    pub fn on_captcha_expired(&mut self) {
        self.captcha_verified = false;
        self.captcha_message = Some(CAPTCHA_REQUIRED_MESSAGE.to_string());
        self.rescan();
    }

    /// Handle the submit action.
    ///
    /// Validates every field and checks for a CAPTCHA token. On success the
    /// form is replaced by the success message until the reset fires.
    pub fn submit(&mut self, now: Instant) -> SubmitOutcome {
        if self.phase == FormPhase::SubmittedSuccess {
            return SubmitOutcome::Ignored;
        }

        for field in FieldId::ALL {
            self.form.field_mut(field).touched = true;
        }
        let all_valid = self.rescan();

        let has_token = self.captcha.token().is_some();
        if !has_token {
            self.captcha_message = Some(CAPTCHA_REQUIRED_MESSAGE.to_string());
        }

        if !all_valid {
            let invalid: Vec<_> = self
                .form
                .fields()
                .iter()
                .filter(|f| f.invalid)
                .map(|f| f.id.name())
                .collect();
            tracing::warn!("Submit rejected, invalid fields: {}", invalid.join(", "));
            return SubmitOutcome::InvalidFields;
        }
        if !has_token {
            tracing::warn!("Submit rejected: no CAPTCHA token");
            return SubmitOutcome::CaptchaRequired;
        }

        self.phase = FormPhase::SubmittedSuccess;
        self.reset_timer.schedule(now);
        tracing::info!(
            "Registration accepted, resetting in {:?}",
            self.reset_timer.delay()
        );
        SubmitOutcome::Accepted
    }

    /// Fire the pending reset once its deadline has passed
    pub fn tick(&mut self, now: Instant) {
        if self.reset_timer.fire_if_due(now) {
            self.reset();
        }
    }

    /// Leave the success screen early
    pub fn dismiss_success(&mut self) {
        if self.phase == FormPhase::SubmittedSuccess {
            self.reset();
        }
    }

    /// Return to an empty, editable form with an unsolved CAPTCHA
    pub fn reset(&mut self) {
        if self.reset_timer.is_pending() {
            tracing::debug!("Cancelling pending reset");
        }
        self.reset_timer.cancel();
        self.form.clear();
        self.captcha.reset();
        self.captcha_verified = false;
        self.captcha_message = None;
        self.phase = FormPhase::Editing;
        self.rescan();
        tracing::info!("Form reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captcha::MockCaptchaWidget;
    use std::time::Duration;

    const DELAY: Duration = Duration::from_millis(3000);

    const VALID_INPUT: [(FieldId, &str); 7] = [
        (FieldId::Name, "María Núñez"),
        (FieldId::Email, "maria@correo.co"),
        (FieldId::Password, "Abcdefghi1@"),
        (FieldId::ConfirmPassword, "Abcdefghi1@"),
        (FieldId::Birthdate, "1990-04-12"),
        (FieldId::Mobile, "3101234567"),
        (FieldId::Landline, "6012345"),
    ];

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn controller(token: Option<&str>) -> FormController<MockCaptchaWidget> {
        let mut captcha = MockCaptchaWidget::new();
        captcha
            .expect_token()
            .return_const(token.map(str::to_string));
        FormController::new(&TuiConfig::default(), captcha).with_today(today())
    }

    fn fill_valid(c: &mut FormController<MockCaptchaWidget>) {
        for (field, value) in VALID_INPUT {
            c.handle_input(field, FieldEdit::Replace(value.to_string()));
        }
        c.handle_input(FieldId::Terms, FieldEdit::Toggle);
    }

    fn type_text(c: &mut FormController<MockCaptchaWidget>, field: FieldId, text: &str) {
        for ch in text.chars() {
            c.handle_input(field, FieldEdit::Push(ch));
        }
    }

    mod editing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_starts_editing_with_submit_disabled() {
            let c = controller(None);
            assert_eq!(c.phase(), FormPhase::Editing);
            assert!(!c.submit_enabled());
            assert!(c.form_visible());
            assert!(!c.success_visible());
            assert!(c.captcha_message().is_none());
        }

        #[test]
        fn test_invalid_input_marks_field() {
            let mut c = controller(None);
            type_text(&mut c, FieldId::Mobile, "2051234567");
            let field = c.form().field(FieldId::Mobile);
            assert!(field.invalid);
            assert_eq!(
                field.error.as_deref(),
                Some("Debe ser un número colombiano (ej: 3101234567)")
            );
        }

        #[test]
        fn test_fixing_input_clears_marker() {
            let mut c = controller(None);
            type_text(&mut c, FieldId::Name, "An");
            assert!(c.form().field(FieldId::Name).invalid);
            c.handle_input(FieldId::Name, FieldEdit::Push('a'));
            assert!(!c.form().field(FieldId::Name).invalid);
            assert!(c.form().field(FieldId::Name).error.is_none());
        }

        #[test]
        fn test_backspace_revalidates() {
            let mut c = controller(None);
            type_text(&mut c, FieldId::Name, "Ana");
            c.handle_input(FieldId::Name, FieldEdit::Backspace);
            assert_eq!(c.form().field(FieldId::Name).as_text(), "An");
            assert!(c.form().field(FieldId::Name).invalid);
        }

        #[test]
        fn test_untouched_fields_show_no_errors() {
            let mut c = controller(None);
            type_text(&mut c, FieldId::Name, "Ana");
            for field in FieldId::ALL.into_iter().skip(1) {
                assert!(!c.form().field(field).invalid, "{field:?} marked");
            }
            assert!(!c.submit_enabled());
        }

        #[test]
        fn test_empty_landline_stays_valid_when_touched() {
            let mut c = controller(None);
            type_text(&mut c, FieldId::Landline, "1");
            assert!(c.form().field(FieldId::Landline).invalid);
            c.handle_input(FieldId::Landline, FieldEdit::Backspace);
            assert!(!c.form().field(FieldId::Landline).invalid);
        }

        #[test]
        fn test_password_change_revalidates_confirmation() {
            let mut c = controller(None);
            c.handle_input(FieldId::Password, FieldEdit::Replace("Abcdefghi1@".into()));
            c.handle_input(
                FieldId::ConfirmPassword,
                FieldEdit::Replace("Abcdefghi1@".into()),
            );
            assert!(!c.form().field(FieldId::ConfirmPassword).invalid);

            c.handle_input(FieldId::Password, FieldEdit::Push('x'));
            let confirm = c.form().field(FieldId::ConfirmPassword);
            assert!(confirm.invalid);
            assert_eq!(confirm.error.as_deref(), Some("Las contraseñas no coinciden"));
        }

        #[test]
        fn test_untouched_confirmation_not_marked_by_password_edit() {
            let mut c = controller(None);
            type_text(&mut c, FieldId::Password, "Abc");
            assert!(!c.form().field(FieldId::ConfirmPassword).invalid);
        }

        #[test]
        fn test_focus_navigation() {
            let mut c = controller(None);
            assert_eq!(c.focus(), Focus::Field(FieldId::Name));
            c.focus_prev();
            assert_eq!(c.focus(), Focus::Submit);
            c.focus_prev();
            assert_eq!(c.focus(), Focus::Captcha);
            c.focus_next();
            c.focus_next();
            assert_eq!(c.focus(), Focus::Field(FieldId::Name));
        }
    }

    mod eligibility {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_all_valid_without_captcha_is_not_eligible() {
            let mut c = controller(None);
            fill_valid(&mut c);
            assert!(!c.submit_enabled());
            assert_eq!(c.phase(), FormPhase::Editing);
        }

        #[test]
        fn test_captcha_without_fields_is_not_eligible() {
            let mut c = controller(Some("tok"));
            c.on_captcha_verified();
            assert!(c.is_captcha_verified());
            assert!(!c.submit_enabled());
        }

        #[test]
        fn test_enabled_exactly_when_all_conditions_hold() {
            let mut c = controller(Some("tok"));
            for (field, value) in VALID_INPUT {
                c.handle_input(field, FieldEdit::Replace(value.to_string()));
            }
            c.on_captcha_verified();
            assert!(!c.submit_enabled());

            c.handle_input(FieldId::Terms, FieldEdit::Toggle);
            assert!(c.submit_enabled());
            assert_eq!(c.phase(), FormPhase::SubmitEligible);
        }

        #[test]
        fn test_unchecking_terms_disables_again() {
            let mut c = controller(Some("tok"));
            fill_valid(&mut c);
            c.on_captcha_verified();
            assert!(c.submit_enabled());

            c.handle_input(FieldId::Terms, FieldEdit::Toggle);
            assert!(!c.submit_enabled());
            assert_eq!(c.phase(), FormPhase::Editing);
            assert_eq!(
                c.form().field(FieldId::Terms).error.as_deref(),
                Some("Debes aceptar los términos")
            );
        }

        #[test]
        fn test_captcha_expiry_disables_and_shows_message() {
            let mut c = controller(Some("tok"));
            fill_valid(&mut c);
            c.apply_captcha_signal(CaptchaSignal::Verified);
            assert!(c.submit_enabled());

            c.apply_captcha_signal(CaptchaSignal::Expired);
            assert!(!c.submit_enabled());
            assert!(!c.is_captcha_verified());
            assert_eq!(c.captcha_message(), Some(CAPTCHA_REQUIRED_MESSAGE));

            c.apply_captcha_signal(CaptchaSignal::Verified);
            assert!(c.submit_enabled());
            assert!(c.captcha_message().is_none());
        }

        #[test]
        fn test_optional_landline_may_stay_empty() {
            let mut c = controller(Some("tok"));
            fill_valid(&mut c);
            c.handle_input(FieldId::Landline, FieldEdit::Replace(String::new()));
            c.on_captcha_verified();
            assert!(c.submit_enabled());
        }
    }

    mod submit {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_missing_token_aborts_with_message() {
            let mut c = controller(None);
            fill_valid(&mut c);

            let outcome = c.submit(Instant::now());

            assert_eq!(outcome, SubmitOutcome::CaptchaRequired);
            assert!(c.form_visible());
            assert!(!c.success_visible());
            assert_eq!(c.captcha_message(), Some(CAPTCHA_REQUIRED_MESSAGE));
        }

        #[test]
        fn test_invalid_fields_abort_and_mark_everything() {
            let mut c = controller(None);
            type_text(&mut c, FieldId::Name, "Ana");

            let outcome = c.submit(Instant::now());

            assert_eq!(outcome, SubmitOutcome::InvalidFields);
            assert!(c.form_visible());
            for field in [FieldId::Email, FieldId::Password, FieldId::Terms] {
                assert!(c.form().field(field).invalid, "{field:?} not marked");
            }
            assert!(!c.form().field(FieldId::Name).invalid);
            assert!(!c.form().field(FieldId::Landline).invalid);
            assert_eq!(c.captcha_message(), Some(CAPTCHA_REQUIRED_MESSAGE));
        }

        #[test]
        fn test_invalid_fields_with_token_keeps_captcha_quiet() {
            let mut c = controller(Some("tok"));
            assert_eq!(c.submit(Instant::now()), SubmitOutcome::InvalidFields);
            assert!(c.captcha_message().is_none());
        }

        #[test]
        fn test_success_hides_form() {
            let mut c = controller(Some("tok"));
            fill_valid(&mut c);
            c.on_captcha_verified();

            let outcome = c.submit(Instant::now());

            assert_eq!(outcome, SubmitOutcome::Accepted);
            assert_eq!(c.phase(), FormPhase::SubmittedSuccess);
            assert!(!c.form_visible());
            assert!(c.success_visible());
        }

        #[test]
        fn test_token_alone_is_enough_to_submit() {
            let mut c = controller(Some("tok"));
            fill_valid(&mut c);
            assert!(!c.submit_enabled());
            assert_eq!(c.submit(Instant::now()), SubmitOutcome::Accepted);
        }

        #[test]
        fn test_resubmit_during_success_is_ignored() {
            let mut c = controller(Some("tok"));
            fill_valid(&mut c);
            let start = Instant::now();
            c.submit(start);

            assert_eq!(c.submit(start + DELAY / 2), SubmitOutcome::Ignored);

            c.captcha_mut().expect_reset().times(1).return_const(());
            c.tick(start + DELAY);
            assert!(c.form_visible());
        }

        #[test]
        fn test_edits_ignored_during_success() {
            let mut c = controller(Some("tok"));
            fill_valid(&mut c);
            c.submit(Instant::now());
            c.handle_input(FieldId::Name, FieldEdit::Push('x'));
            assert_eq!(c.form().field(FieldId::Name).as_text(), "María Núñez");
        }
    }

    mod auto_reset {
        use super::*;
        use pretty_assertions::assert_eq;

        fn submitted() -> (FormController<MockCaptchaWidget>, Instant) {
            let mut c = controller(Some("tok"));
            fill_valid(&mut c);
            c.on_captcha_verified();
            let start = Instant::now();
            assert_eq!(c.submit(start), SubmitOutcome::Accepted);
            (c, start)
        }

        #[test]
        fn test_nothing_happens_before_delay() {
            let (mut c, start) = submitted();
            c.tick(start + DELAY - Duration::from_millis(1));
            assert!(c.success_visible());
        }

        #[test]
        fn test_reset_after_delay() {
            let (mut c, start) = submitted();
            c.captcha_mut().expect_reset().times(1).return_const(());

            c.tick(start + DELAY);

            assert!(c.form_visible());
            assert!(!c.success_visible());
            assert_eq!(c.phase(), FormPhase::Editing);
            assert!(!c.submit_enabled());
            assert!(!c.is_captcha_verified());
            assert!(c.captcha_message().is_none());
            for field in c.form().fields() {
                assert_eq!(field.as_text(), "");
                assert!(!field.is_checked());
                assert!(!field.invalid);
                assert!(field.error.is_none());
                assert!(!field.touched);
            }
        }

        #[test]
        fn test_reset_fires_once() {
            let (mut c, start) = submitted();
            c.captcha_mut().expect_reset().times(1).return_const(());
            c.tick(start + DELAY);
            c.tick(start + DELAY * 2);
            c.tick(start + DELAY * 3);
        }

        #[test]
        fn test_dismiss_cancels_pending_timer() {
            let (mut c, start) = submitted();
            c.captcha_mut().expect_reset().times(1).return_const(());

            c.dismiss_success();
            assert!(c.form_visible());

            // The first deadline no longer resets the new session
            type_text(&mut c, FieldId::Name, "Ana");
            c.tick(start + DELAY);
            assert_eq!(c.form().field(FieldId::Name).as_text(), "Ana");
        }

        #[test]
        fn test_dismiss_while_editing_is_noop() {
            let mut c = controller(None);
            type_text(&mut c, FieldId::Name, "Ana");
            c.dismiss_success();
            assert_eq!(c.form().field(FieldId::Name).as_text(), "Ana");
        }

        #[test]
        fn test_reset_progress() {
            let (c, start) = submitted();
            assert_eq!(c.reset_progress(start), 0.0);
            assert_eq!(c.reset_progress(start + DELAY), 1.0);
        }
    }
}
