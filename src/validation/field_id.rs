//! Registration form field identifiers

/// The fields collected by the registration form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Name,
    Email,
    Password,
    ConfirmPassword,
    Birthdate,
    Mobile,
    Landline,
    Terms,
}

impl FieldId {
    pub const ALL: [FieldId; 8] = [
        FieldId::Name,
        FieldId::Email,
        FieldId::Password,
        FieldId::ConfirmPassword,
        FieldId::Birthdate,
        FieldId::Mobile,
        FieldId::Landline,
        FieldId::Terms,
    ];

    /// Field name as used by the host form
    pub fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::Birthdate => "birthdate",
            Self::Mobile => "mobile",
            Self::Landline => "landline",
            Self::Terms => "terms",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Nombre completo",
            Self::Email => "Correo electrónico",
            Self::Password => "Contraseña",
            Self::ConfirmPassword => "Confirmar contraseña",
            Self::Birthdate => "Fecha de nacimiento (AAAA-MM-DD)",
            Self::Mobile => "Celular",
            Self::Landline => "Teléfono fijo (opcional)",
            Self::Terms => "Términos y condiciones",
        }
    }

    /// Position in `FieldId::ALL`
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_secret(self) -> bool {
        matches!(self, Self::Password | Self::ConfirmPassword)
    }

    pub fn is_checkbox(self) -> bool {
        matches!(self, Self::Terms)
    }
}
