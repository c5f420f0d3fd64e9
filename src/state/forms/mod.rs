//! Form domain layer
//!
//! Field values, validity markers and focus for the registration form.

mod field;
mod form_state;

pub use field::{FieldValue, FormField};
pub use form_state::{Focus, Form, RegistrationForm};
