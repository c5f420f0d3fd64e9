//! Field validation rules
//!
//! Pure, stateless rules for every field of the registration form:
//! - `field_id`: typed field identifiers and their wire names
//! - `rules`: the rule table and the `RuleSet` evaluator
//! - `age`: calendar-age arithmetic for the birthdate rule
//! - `verdict`: the `{valid, message}` result of a rule

mod age;
mod field_id;
mod rules;
mod verdict;

pub use field_id::FieldId;
pub use rules::{RuleSet, ValidationContext, RULES};
pub use verdict::Verdict;
