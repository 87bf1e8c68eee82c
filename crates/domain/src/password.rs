//! Password complexity policy.

use serde::Serialize;
use std::fmt;

/// Minimum password length, in UTF-16 code units.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// One unmet password requirement.
///
/// Variants are declared in check order; [`password_violations`] reports
/// them in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PasswordRequirement {
    /// At least [`MIN_PASSWORD_LENGTH`] characters.
    MinLength,
    /// At least one ASCII uppercase letter.
    Uppercase,
    /// At least one ASCII lowercase letter.
    Lowercase,
    /// At least one ASCII digit.
    Digit,
}

impl PasswordRequirement {
    /// Every requirement in check order.
    pub const ALL: [Self; 4] = [Self::MinLength, Self::Uppercase, Self::Lowercase, Self::Digit];

    /// Short description shown to the user.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MinLength => "Mínimo 8 caracteres",
            Self::Uppercase => "Uma letra maiúscula",
            Self::Lowercase => "Uma letra minúscula",
            Self::Digit => "Um número",
        }
    }

    fn is_met_by(self, password: &str) -> bool {
        match self {
            // Browser strings count UTF-16 units; keep the same notion of length.
            Self::MinLength => password.encode_utf16().count() >= MIN_PASSWORD_LENGTH,
            Self::Uppercase => password.chars().any(|ch| ch.is_ascii_uppercase()),
            Self::Lowercase => password.chars().any(|ch| ch.is_ascii_lowercase()),
            Self::Digit => password.chars().any(|ch| ch.is_ascii_digit()),
        }
    }
}

impl fmt::Display for PasswordRequirement {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.message())
    }
}

/// Every requirement the password misses, in check order.
///
/// An empty result means the password satisfies the policy.
///
/// ```
/// use ubs_diag_domain::{PasswordRequirement, password_violations};
///
/// assert!(password_violations("Abcdefg1").is_empty());
/// assert_eq!(
///     password_violations("abcdefgh"),
///     vec![PasswordRequirement::Uppercase, PasswordRequirement::Digit],
/// );
/// ```
pub fn password_violations(password: &str) -> Vec<PasswordRequirement> {
    PasswordRequirement::ALL
        .into_iter()
        .filter(|requirement| !requirement.is_met_by(password))
        .collect()
}

/// Composite form message for a non-empty violation list.
///
/// Returns `None` when nothing is violated.
pub fn password_error_message(violations: &[PasswordRequirement]) -> Option<String> {
    if violations.is_empty() {
        return None;
    }
    let joined = violations
        .iter()
        .map(|requirement| requirement.message())
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("Senha deve ter: {joined}."))
}
