//! CPF (Brazilian individual taxpayer id) check-digit validation.
//!
//! A CPF is 11 decimal digits: a 9-digit base followed by two mod-11 check
//! digits. Punctuation (`529.982.247-25`) is ignored. The eleven sequences
//! made of one repeated digit are rejected even where the arithmetic would
//! accept them.

use serde::{Deserialize, Serialize};
use std::fmt;
use ubs_diag_shared::{ErrorCode, ErrorEnvelope};

/// Number of digits in a normalized CPF.
pub const CPF_DIGITS: usize = 11;

/// Why a CPF failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpfError {
    /// Digit count after stripping punctuation is not 11.
    WrongLength {
        /// Digits found in the input.
        digits: usize,
    },
    /// All eleven digits are the same.
    RepeatedDigits,
    /// A computed check digit differs from the supplied one.
    CheckDigitMismatch {
        /// Zero-based index of the failing check digit (9 or 10).
        position: usize,
    },
}

impl fmt::Display for CpfError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength { digits } => {
                write!(formatter, "CPF must have 11 digits, found {digits}")
            },
            Self::RepeatedDigits => formatter.write_str("CPF cannot repeat a single digit"),
            Self::CheckDigitMismatch { position } => {
                write!(formatter, "CPF check digit at position {position} does not match")
            },
        }
    }
}

impl std::error::Error for CpfError {}

impl From<CpfError> for ErrorEnvelope {
    fn from(error: CpfError) -> Self {
        let envelope =
            Self::expected(ErrorCode::new("domain", "invalid_cpf"), error.to_string());
        match error {
            CpfError::WrongLength { digits } => {
                envelope.with_metadata("digit_count", digits.to_string())
            },
            CpfError::RepeatedDigits => envelope,
            CpfError::CheckDigitMismatch { position } => {
                envelope.with_metadata("position", position.to_string())
            },
        }
    }
}

/// A CPF whose check digits verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf([u8; CPF_DIGITS]);

impl Cpf {
    /// Parse and verify a CPF, ignoring every non-digit character.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, CpfError> {
        let digits: Vec<u8> = input
            .as_ref()
            .chars()
            .filter_map(|ch| ch.to_digit(10))
            .filter_map(|digit| u8::try_from(digit).ok())
            .collect();
        let count = digits.len();
        let digits = <[u8; CPF_DIGITS]>::try_from(digits)
            .map_err(|_| CpfError::WrongLength { digits: count })?;

        if digits.iter().all(|digit| *digit == digits[0]) {
            return Err(CpfError::RepeatedDigits);
        }
        if check_digit(&digits[..9]) != digits[9] {
            return Err(CpfError::CheckDigitMismatch { position: 9 });
        }
        if check_digit(&digits[..10]) != digits[10] {
            return Err(CpfError::CheckDigitMismatch { position: 10 });
        }

        Ok(Self(digits))
    }

    /// The 11 digits without punctuation.
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.iter().map(|digit| char::from(b'0' + digit)).collect()
    }

    /// The canonical `000.000.000-00` rendering.
    #[must_use]
    pub fn formatted(&self) -> String {
        let mut out = String::with_capacity(CPF_DIGITS + 3);
        for (index, digit) in self.0.iter().enumerate() {
            match index {
                3 | 6 => out.push('.'),
                9 => out.push('-'),
                _ => {},
            }
            out.push(char::from(b'0' + digit));
        }
        out
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.formatted())
    }
}

impl TryFrom<String> for Cpf {
    type Error = CpfError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Cpf> for String {
    fn from(value: Cpf) -> Self {
        value.digits()
    }
}

/// Returns true when the input holds a CPF with valid check digits.
///
/// ```
/// use ubs_diag_domain::is_valid_cpf;
///
/// assert!(is_valid_cpf("529.982.247-25"));
/// assert!(!is_valid_cpf("111.111.111-11"));
/// assert!(!is_valid_cpf("123"));
/// ```
pub fn is_valid_cpf(input: &str) -> bool {
    Cpf::parse(input).is_ok()
}

/// Mod-11 check digit over a prefix of 9 or 10 digits.
///
/// Weights run from `prefix.len() + 1` down to 2. A remainder below 2 yields
/// 0, otherwise `11 - remainder`.
fn check_digit(prefix: &[u8]) -> u8 {
    let top_weight = u32::try_from(prefix.len()).unwrap_or(0) + 1;
    let total: u32 = prefix
        .iter()
        .zip((2..=top_weight).rev())
        .map(|(digit, weight)| u32::from(*digit) * weight)
        .sum();
    match u8::try_from(total % 11) {
        Ok(remainder) if remainder >= 2 => 11 - remainder,
        _ => 0,
    }
}
