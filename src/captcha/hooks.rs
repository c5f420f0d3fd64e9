//! Verified / expired callback hooks

use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

/// Notification raised by a CAPTCHA widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptchaSignal {
    Verified,
    Expired,
}

type Hook = Box<dyn Fn() + Send + Sync>;

/// Callbacks a widget invokes when verification succeeds or lapses
pub struct CaptchaHooks {
    on_verified: Hook,
    on_expired: Hook,
}

impl CaptchaHooks {
    pub fn new(
        on_verified: impl Fn() + Send + Sync + 'static,
        on_expired: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_verified: Box::new(on_verified),
            on_expired: Box::new(on_expired),
        }
    }

    /// Hooks that forward every notification into a channel
    pub fn from_sender(tx: UnboundedSender<CaptchaSignal>) -> Self {
        let expired_tx = tx.clone();
        Self::new(
            move || forward(&tx, CaptchaSignal::Verified),
            move || forward(&expired_tx, CaptchaSignal::Expired),
        )
    }

    pub fn verified(&self) {
        (self.on_verified)();
    }

    pub fn expired(&self) {
        (self.on_expired)();
    }
}

impl fmt::Debug for CaptchaHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptchaHooks").finish_non_exhaustive()
    }
}

fn forward(tx: &UnboundedSender<CaptchaSignal>, signal: CaptchaSignal) {
    if tx.send(signal).is_err() {
        tracing::debug!("Dropping {signal:?}: form is gone");
    }
}
