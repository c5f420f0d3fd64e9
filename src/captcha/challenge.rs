//! Local arithmetic challenge widget

use super::hooks::CaptchaHooks;
use super::CaptchaWidget;
use rand::Rng;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Longest answer the input accepts
const MAX_ANSWER_LEN: usize = 3;

#[derive(Debug)]
struct IssuedToken {
    value: String,
    issued_at: Instant,
}

/// A small "what is a + b" challenge that issues an expiring token
#[derive(Debug)]
pub struct ChallengeCaptcha {
    operands: (u8, u8),
    input: String,
    token: Option<IssuedToken>,
    ttl: Duration,
    hooks: CaptchaHooks,
    /// Feedback after a wrong answer
    pub feedback: Option<String>,
}

impl ChallengeCaptcha {
    pub fn new(ttl: Duration, hooks: CaptchaHooks) -> Self {
        Self {
            operands: random_operands(),
            input: String::new(),
            token: None,
            ttl,
            hooks,
            feedback: None,
        }
    }

    pub fn prompt(&self) -> String {
        let (a, b) = self.operands;
        format!("¿Cuánto es {a} + {b}?")
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_verified(&self) -> bool {
        self.token.is_some()
    }

    /// Time left before the current token lapses
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.token
            .as_ref()
            .map(|t| self.ttl.saturating_sub(now.saturating_duration_since(t.issued_at)))
    }

    /// Push an answer digit
    pub fn push_char(&mut self, c: char) {
        if self.is_verified() || !c.is_ascii_digit() || self.input.len() >= MAX_ANSWER_LEN {
            return;
        }
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Check the typed answer.
    ///
    /// A correct answer issues a token and fires the verified hook; a wrong
    /// one rolls a new challenge.
    pub fn submit_answer(&mut self, now: Instant) -> bool {
        if self.is_verified() {
            return true;
        }

        let correct = self
            .input
            .parse::<u16>()
            .is_ok_and(|answer| answer == self.answer());

        if correct {
            self.token = Some(IssuedToken {
                value: Uuid::new_v4().to_string(),
                issued_at: now,
            });
            self.input.clear();
            self.feedback = None;
            tracing::debug!("CAPTCHA solved");
            self.hooks.verified();
        } else {
            self.feedback = Some("Respuesta incorrecta, intenta de nuevo".to_string());
            self.roll();
        }
        correct
    }

    /// Expire a token that has outlived its TTL
    pub fn tick(&mut self, now: Instant) {
        let expired = self
            .token
            .as_ref()
            .is_some_and(|t| now.saturating_duration_since(t.issued_at) >= self.ttl);

        if expired {
            self.token = None;
            self.roll();
            tracing::debug!("CAPTCHA token expired");
            self.hooks.expired();
        }
    }

    fn answer(&self) -> u16 {
        u16::from(self.operands.0) + u16::from(self.operands.1)
    }

    fn roll(&mut self) {
        self.operands = random_operands();
        self.input.clear();
    }
}

impl CaptchaWidget for ChallengeCaptcha {
    fn token(&self) -> Option<String> {
        self.token.as_ref().map(|t| t.value.clone())
    }

    fn reset(&mut self) {
        self.token = None;
        self.feedback = None;
        self.roll();
    }
}

fn random_operands() -> (u8, u8) {
    let mut rng = rand::thread_rng();
    (rng.gen_range(1..=9), rng.gen_range(1..=9))
}
