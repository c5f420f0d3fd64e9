//! CAPTCHA widget contract
//!
//! The form never talks to a CAPTCHA implementation directly. A widget
//! reports verification and expiry through injected [`CaptchaHooks`], and
//! the form asks it for the current token and resets it through
//! [`CaptchaWidget`].

mod challenge;
mod hooks;

pub use challenge::ChallengeCaptcha;
pub use hooks::{CaptchaHooks, CaptchaSignal};

/// Operations the form needs from a CAPTCHA widget
#[cfg_attr(test, mockall::automock)]
pub trait CaptchaWidget {
    /// Current proof-of-verification token, if any
    fn token(&self) -> Option<String>;

    /// Drop any verification and present a fresh challenge
    fn reset(&mut self);
}
