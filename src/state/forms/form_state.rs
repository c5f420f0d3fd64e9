//! Registration form state

use super::field::FormField;
use crate::validation::FieldId;

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// Focus slot of the CAPTCHA answer, right after the input fields
pub const CAPTCHA_SLOT: usize = FieldId::ALL.len();
/// Focus slot of the submit button
pub const SUBMIT_SLOT: usize = CAPTCHA_SLOT + 1;

/// What currently has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FieldId),
    Captcha,
    Submit,
}

/// The registration form: every field in display order plus focus
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    fields: Vec<FormField>,
    pub active_field_index: usize,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self {
            fields: FieldId::ALL.into_iter().map(FormField::for_id).collect(),
            active_field_index: 0,
        }
    }

    pub fn field(&self, id: FieldId) -> &FormField {
        &self.fields[id.index()]
    }

    pub fn field_mut(&mut self, id: FieldId) -> &mut FormField {
        &mut self.fields[id.index()]
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn focus(&self) -> Focus {
        match self.active_field_index {
            CAPTCHA_SLOT => Focus::Captcha,
            i => FieldId::ALL
                .get(i)
                .map_or(Focus::Submit, |id| Focus::Field(*id)),
        }
    }

    /// Clear every field and return focus to the first one
    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
        self.active_field_index = 0;
    }
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for RegistrationForm {
    fn field_count(&self) -> usize {
        SUBMIT_SLOT + 1 // fields, captcha, submit
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(SUBMIT_SLOT);
    }
}
