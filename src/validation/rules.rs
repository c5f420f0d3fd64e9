//! Rule table and evaluator

use super::age::{age_on, parse_birthdate};
use super::field_id::FieldId;
use super::verdict::Verdict;
use crate::config::RuleLimits;
use crate::state::FieldValue;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

// Case-sensitive: `(?i)` would fold U+212A and U+017F into the ASCII letters
static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-zÁ-ÿñÑ\s]{3,}$").unwrap());

// ASCII-only case folding
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i-u)^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.(com|co|org|net|edu)$").unwrap()
});

static MOBILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^3[0-9]{9}$").unwrap());

/// Symbols accepted (and one of which is required) in passwords
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

const INVALID_DATE_MESSAGE: &str = "Fecha inválida";

/// How a field's value is judged
#[derive(Debug, Clone, Copy)]
pub enum RuleKind {
    /// Trimmed value must match the pattern
    Pattern(&'static Lazy<Regex>),
    /// Lower, upper, digit and symbol classes plus a minimum length
    StrongPassword,
    /// Non-empty and equal to the password in the context
    MatchesPassword,
    /// Parsable date whose age falls within the configured bounds
    Adult,
    /// Empty, or digits only within the configured length range
    OptionalDigits,
    /// Checkbox must be ticked
    Checked,
}

/// One entry of the rule table
#[derive(Debug, Clone, Copy)]
pub struct RuleDescriptor {
    pub field: FieldId,
    pub kind: RuleKind,
}

/// The rule for every field, in `FieldId::ALL` order
pub static RULES: [RuleDescriptor; 8] = [
    RuleDescriptor {
        field: FieldId::Name,
        kind: RuleKind::Pattern(&NAME_RE),
    },
    RuleDescriptor {
        field: FieldId::Email,
        kind: RuleKind::Pattern(&EMAIL_RE),
    },
    RuleDescriptor {
        field: FieldId::Password,
        kind: RuleKind::StrongPassword,
    },
    RuleDescriptor {
        field: FieldId::ConfirmPassword,
        kind: RuleKind::MatchesPassword,
    },
    RuleDescriptor {
        field: FieldId::Birthdate,
        kind: RuleKind::Adult,
    },
    RuleDescriptor {
        field: FieldId::Mobile,
        kind: RuleKind::Pattern(&MOBILE_RE),
    },
    RuleDescriptor {
        field: FieldId::Landline,
        kind: RuleKind::OptionalDigits,
    },
    RuleDescriptor {
        field: FieldId::Terms,
        kind: RuleKind::Checked,
    },
];

pub fn descriptor_for(field: FieldId) -> &'static RuleDescriptor {
    &RULES[field.index()]
}

/// Cross-field data a rule may consult
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Current value of the password field
    pub password: &'a str,
    /// Reference date for age calculations
    pub today: NaiveDate,
}

impl<'a> ValidationContext<'a> {
    pub fn new(password: &'a str, today: NaiveDate) -> Self {
        Self { password, today }
    }
}

/// Evaluates the rule table with a set of configured thresholds
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    limits: RuleLimits,
}

impl RuleSet {
    pub fn new(limits: RuleLimits) -> Self {
        Self { limits }
    }

    /// Validate a field addressed by its host-form name.
    ///
    /// Names outside the rule table are accepted as-is.
    #[allow(dead_code)]
    pub fn validate_named(
        &self,
        name: &str,
        value: &FieldValue,
        ctx: &ValidationContext<'_>,
    ) -> Verdict {
        match FieldId::from_name(name) {
            Some(field) => self.validate(field, value, ctx),
            None => Verdict::pass(),
        }
    }

    pub fn validate(
        &self,
        field: FieldId,
        value: &FieldValue,
        ctx: &ValidationContext<'_>,
    ) -> Verdict {
        let text = value.as_text().trim();
        let descriptor = descriptor_for(field);

        let passed = match descriptor.kind {
            RuleKind::Pattern(re) => re.is_match(text),
            RuleKind::StrongPassword => self.is_strong_password(text),
            RuleKind::MatchesPassword => !text.is_empty() && text == ctx.password.trim(),
            RuleKind::Adult => {
                let Some(birth) = parse_birthdate(text) else {
                    return Verdict::fail(INVALID_DATE_MESSAGE);
                };
                self.is_age_allowed(birth, ctx.today)
            }
            RuleKind::OptionalDigits => text.is_empty() || self.is_landline(text),
            RuleKind::Checked => value.is_checked(),
        };

        if passed {
            Verdict::pass()
        } else {
            Verdict::fail(self.failure_message(field))
        }
    }

    fn is_strong_password(&self, text: &str) -> bool {
        let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c);
        text.chars().count() >= self.limits.password_min_len
            && text.chars().all(allowed)
            && text.chars().any(|c| c.is_ascii_lowercase())
            && text.chars().any(|c| c.is_ascii_uppercase())
            && text.chars().any(|c| c.is_ascii_digit())
            && text.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
    }

    fn is_age_allowed(&self, birth: NaiveDate, today: NaiveDate) -> bool {
        match age_on(birth, today) {
            Some(age) => {
                age >= self.limits.min_age && self.limits.max_age.map_or(true, |max| age <= max)
            }
            None => false,
        }
    }

    fn is_landline(&self, text: &str) -> bool {
        let len = text.len();
        text.bytes().all(|b| b.is_ascii_digit())
            && len >= self.limits.landline_min_digits
            && len <= self.limits.landline_max_digits
    }

    /// Message shown when `field` fails its rule
    pub fn failure_message(&self, field: FieldId) -> String {
        match field {
            FieldId::Name => "Mínimo 3 letras, solo texto".to_string(),
            FieldId::Email => "Correo inválido (ej: ejemplo@dominio.com)".to_string(),
            FieldId::Password => format!(
                "{} caracteres, 1 mayúscula, 1 minúscula, 1 número y 1 símbolo",
                self.limits.password_min_len
            ),
            FieldId::ConfirmPassword => "Las contraseñas no coinciden".to_string(),
            FieldId::Birthdate => match self.limits.max_age {
                Some(max) => format!(
                    "Debes tener entre {} y {} años",
                    self.limits.min_age, max
                ),
                None => format!("Debes tener más de {} años", self.limits.min_age),
            },
            FieldId::Mobile => "Debe ser un número colombiano (ej: 3101234567)".to_string(),
            FieldId::Landline => format!(
                "Entre {} y {} dígitos numéricos",
                self.limits.landline_min_digits, self.limits.landline_max_digits
            ),
            FieldId::Terms => "Debes aceptar los términos".to_string(),
        }
    }
}
