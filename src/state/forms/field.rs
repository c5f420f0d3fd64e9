//! Form field value objects

use crate::validation::{FieldId, Verdict};

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checkbox(bool),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(checked: bool) -> Self {
        FieldValue::Checkbox(checked)
    }
}

impl FieldValue {
    /// Text content (empty for checkboxes)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Checkbox(_) => "",
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self, FieldValue::Checkbox(true))
    }
}

/// A single form field with its value, validity marker and error slot
#[derive(Debug, Clone)]
pub struct FormField {
    pub id: FieldId,
    pub label: String,
    pub value: FieldValue,
    /// Render the value as bullets
    pub is_masked: bool,
    /// Visual invalid marker
    pub invalid: bool,
    /// Inline error message slot
    pub error: Option<String>,
    /// Whether the user has edited the field since the last reset
    pub touched: bool,
}

impl FormField {
    /// Create an empty field of the right kind for `id`
    pub fn for_id(id: FieldId) -> Self {
        let value = if id.is_checkbox() {
            FieldValue::Checkbox(false)
        } else {
            FieldValue::Text(String::new())
        };
        Self {
            id,
            label: id.label().to_string(),
            value,
            is_masked: id.is_secret(),
            invalid: false,
            error: None,
            touched: false,
        }
    }

    pub fn as_text(&self) -> &str {
        self.value.as_text()
    }

    pub fn is_checked(&self) -> bool {
        self.value.is_checked()
    }

    pub fn is_checkbox(&self) -> bool {
        matches!(self.value, FieldValue::Checkbox(_))
    }

    /// Set the text value
    pub fn set_text(&mut self, value: String) {
        if !self.is_checkbox() {
            self.value = FieldValue::Text(value);
        }
    }

    /// Push a character to the field value
    pub fn push_char(&mut self, c: char) {
        match &mut self.value {
            FieldValue::Text(s) => s.push(c),
            FieldValue::Checkbox(_) => {
                // Checkboxes only change through toggle()
            }
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        if let FieldValue::Text(s) = &mut self.value {
            s.pop();
        }
    }

    /// Flip a checkbox
    pub fn toggle(&mut self) {
        if let FieldValue::Checkbox(checked) = &mut self.value {
            *checked = !*checked;
        }
    }

    /// Record a rule verdict in the marker and error slot
    pub fn apply_verdict(&mut self, verdict: &Verdict) {
        self.invalid = !verdict.valid;
        self.error = verdict.error().map(str::to_string);
    }

    pub fn clear_marker(&mut self) {
        self.invalid = false;
        self.error = None;
    }

    /// Return the field to its pristine state
    pub fn clear(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => s.clear(),
            FieldValue::Checkbox(checked) => *checked = false,
        }
        self.clear_marker();
        self.touched = false;
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) if self.is_masked => "•".repeat(s.chars().count()),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Checkbox(true) => "[x] Acepto los términos".to_string(),
            FieldValue::Checkbox(false) => "[ ] Acepto los términos".to_string(),
        }
    }
}
