//! Rule verdicts

/// Outcome of evaluating one rule against one field value.
///
/// `message` is empty when the value passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    pub message: String,
}

impl Verdict {
    pub fn pass() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }

    /// The message to show in the field's error slot, if any
    pub fn error(&self) -> Option<&str> {
        if self.valid {
            None
        } else {
            Some(&self.message)
        }
    }
}
