//! Registration form validation.
//!
//! [`validate_registration`] applies every field rule independently and
//! collects the failures into [`ValidationErrors`]. Failures are data: the
//! function never errors, and a missing value is just another failing field.

use crate::cpf::is_valid_cpf;
use crate::injection::RiskReport;
use crate::password::{password_error_message, password_violations};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use ubs_diag_shared::SecretString;

/// Message for names shorter than two characters after trimming.
pub const NAME_TOO_SHORT: &str = "Nome deve ter no mínimo 2 caracteres.";
/// Message for names with characters outside letters and whitespace.
pub const NAME_NOT_LETTERS: &str = "Nome deve conter apenas letras.";
/// Message for malformed emails.
pub const EMAIL_INVALID: &str = "Email inválido.";
/// Message for CPFs failing the checksum.
pub const CPF_INVALID: &str = "CPF inválido.";
/// Message for mismatched password confirmation.
pub const PASSWORD_MISMATCH: &str = "Senhas não conferem.";
/// Message for the cross-field injection check.
pub const SUSPICIOUS_INPUT: &str = "Entrada contém padrão suspeito.";

/// Snapshot of the registration form at submission time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// CPF, digits optionally punctuated.
    pub cpf: String,
    /// Chosen password.
    pub password: SecretString,
    /// Password typed a second time.
    pub password_confirmation: SecretString,
}

/// Field keys of [`ValidationErrors`].
///
/// Serialized names are the keys the form front end binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegistrationField {
    /// `nome`
    #[serde(rename = "nome")]
    Name,
    /// `email`
    #[serde(rename = "email")]
    Email,
    /// `cpf`
    #[serde(rename = "cpf")]
    Cpf,
    /// `senha`
    #[serde(rename = "senha")]
    Password,
    /// `confirmarSenha`
    #[serde(rename = "confirmarSenha")]
    PasswordConfirmation,
    /// `seguranca`, the cross-field injection check.
    #[serde(rename = "seguranca")]
    Security,
}

impl RegistrationField {
    /// Key used on the wire and in form bindings.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Name => "nome",
            Self::Email => "email",
            Self::Cpf => "cpf",
            Self::Password => "senha",
            Self::PasswordConfirmation => "confirmarSenha",
            Self::Security => "seguranca",
        }
    }
}

impl fmt::Display for RegistrationField {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.wire_name())
    }
}

/// Failing fields and their messages. An absent key means the field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<RegistrationField, String>);

impl ValidationErrors {
    /// Returns true when every field passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: RegistrationField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Returns true when the field failed.
    #[must_use]
    pub fn contains(&self, field: RegistrationField) -> bool {
        self.0.contains_key(&field)
    }

    /// Failing fields in key order.
    pub fn fields(&self) -> impl Iterator<Item = RegistrationField> + '_ {
        self.0.keys().copied()
    }

    /// Iterate over `(field, message)` pairs in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, RegistrationField, String> {
        self.0.iter()
    }

    fn insert(&mut self, field: RegistrationField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = (&'a RegistrationField, &'a String);
    type IntoIter = btree_map::Iter<'a, RegistrationField, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Validate every registration field.
///
/// ```
/// use ubs_diag_domain::{RegistrationField, RegistrationForm, validate_registration};
///
/// let form = RegistrationForm {
///     name: "Maria Souza".into(),
///     email: "maria@ubs.gov.br".into(),
///     cpf: "529.982.247-25".into(),
///     password: "Abcdefg1".into(),
///     password_confirmation: "Abcdefg1".into(),
/// };
/// assert!(validate_registration(&form).is_empty());
///
/// let bad = RegistrationForm { name: "A".into(), ..form };
/// assert!(validate_registration(&bad).contains(RegistrationField::Name));
/// ```
pub fn validate_registration(form: &RegistrationForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if let Some(message) = name_error(&form.name) {
        errors.insert(RegistrationField::Name, message);
    }
    if !is_valid_email(&form.email) {
        errors.insert(RegistrationField::Email, EMAIL_INVALID);
    }
    if form.cpf.is_empty() || !is_valid_cpf(&form.cpf) {
        errors.insert(RegistrationField::Cpf, CPF_INVALID);
    }
    if let Some(message) = password_error_message(&password_violations(form.password.expose())) {
        errors.insert(RegistrationField::Password, message);
    }
    if form.password.expose() != form.password_confirmation.expose() {
        errors.insert(RegistrationField::PasswordConfirmation, PASSWORD_MISMATCH);
    }
    if [form.name.as_str(), form.email.as_str()]
        .into_iter()
        .any(|value| RiskReport::scan(value).is_suspicious())
    {
        errors.insert(RegistrationField::Security, SUSPICIOUS_INPUT);
    }

    errors
}

fn name_error(name: &str) -> Option<&'static str> {
    let trimmed = name.trim_matches(is_form_whitespace);
    if trimmed.encode_utf16().count() < 2 {
        return Some(NAME_TOO_SHORT);
    }
    // The character check runs on the untrimmed value.
    if !name.chars().all(is_name_char) {
        return Some(NAME_NOT_LETTERS);
    }
    None
}

/// ASCII letters, the Latin-1 block `À`..=`ÿ`, and whitespace.
///
/// The Latin-1 range is taken literally, so `×` and `÷` pass too.
fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ('\u{C0}'..='\u{FF}').contains(&ch) || is_form_whitespace(ch)
}

/// `local@domain.tld`: one `@`, no whitespace, and a dot after the `@` with
/// text on both sides.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let part_ok = |part: &str| {
        !part.is_empty() && !part.chars().any(|ch| ch == '@' || is_form_whitespace(ch))
    };
    if !part_ok(local) || !part_ok(domain) {
        return false;
    }
    domain
        .char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len())
}

/// Whitespace as browsers define it for form input: Unicode `White_Space`
/// without U+0085, plus the byte-order mark.
fn is_form_whitespace(ch: char) -> bool {
    (ch.is_whitespace() && ch != '\u{85}') || ch == '\u{FEFF}'
}
