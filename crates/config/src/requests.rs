//! Request DTOs and conversion helpers.
//!
//! Requests are boundary inputs (CLI, fixtures, backend snapshots). This
//! module only checks shape: JSON syntax, field types, and ISO dates.
//! Business rules live in the domain validators and are not duplicated here.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use ubs_diag_domain::{
    CalendarDate, DiagnosisDraft, RegistrationForm, TerritoryProfile, UbsNeeds,
};
use ubs_diag_shared::{ErrorCode, ErrorEnvelope};

/// Registration form payload, keyed the way the web form binds its fields.
///
/// Missing and `null` fields become empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RegistrationRequestDto {
    /// Full name.
    pub nome: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// CPF, digits optionally punctuated.
    pub cpf: Option<String>,
    /// Password.
    pub senha: Option<String>,
    /// Password confirmation.
    #[serde(rename = "confirmarSenha")]
    pub confirmar_senha: Option<String>,
}

impl From<RegistrationRequestDto> for RegistrationForm {
    fn from(dto: RegistrationRequestDto) -> Self {
        Self {
            name: dto.nome.unwrap_or_default(),
            email: dto.email.unwrap_or_default(),
            cpf: dto.cpf.unwrap_or_default(),
            password: dto.senha.unwrap_or_default().into(),
            password_confirmation: dto.confirmar_senha.unwrap_or_default().into(),
        }
    }
}

/// Territory section of a report snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TerritoryProfileDto {
    /// Description of the covered territory.
    pub descricao_territorio: Option<String>,
}

/// Needs section of a report snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct UbsNeedsDto {
    /// Problems identified by the team.
    pub problemas_identificados: Option<String>,
}

/// Report snapshot checked before submission.
///
/// Unknown fields are ignored so full backend snapshots can be passed as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SubmissionRequestDto {
    /// Report title.
    pub nome_relatorio: Option<String>,
    /// Health unit name.
    pub nome_ubs: Option<String>,
    /// Health-facility registry number.
    pub cnes: Option<String>,
    /// Area served.
    pub area_atuacao: Option<String>,
    /// Active residents.
    pub numero_habitantes_ativos: Option<i64>,
    /// Micro-areas.
    pub numero_microareas: Option<i64>,
    /// Registered families.
    pub numero_familias_cadastradas: Option<i64>,
    /// Households.
    pub numero_domicilios: Option<i64>,
    /// Opening date, `YYYY-MM-DD`.
    pub data_inauguracao: Option<String>,
    /// Last renovation date, `YYYY-MM-DD`.
    pub data_ultima_reforma: Option<String>,
    /// Territory section.
    pub territory_profile: Option<TerritoryProfileDto>,
    /// Needs section.
    pub needs: Option<UbsNeedsDto>,
}

impl TryFrom<SubmissionRequestDto> for DiagnosisDraft {
    type Error = RequestValidationError;

    fn try_from(dto: SubmissionRequestDto) -> Result<Self, Self::Error> {
        Ok(Self {
            nome_relatorio: dto.nome_relatorio,
            nome_ubs: dto.nome_ubs,
            cnes: dto.cnes,
            area_atuacao: dto.area_atuacao,
            numero_habitantes_ativos: dto.numero_habitantes_ativos,
            numero_microareas: dto.numero_microareas,
            numero_familias_cadastradas: dto.numero_familias_cadastradas,
            numero_domicilios: dto.numero_domicilios,
            data_inauguracao: parse_date("data_inauguracao", dto.data_inauguracao)?,
            data_ultima_reforma: parse_date("data_ultima_reforma", dto.data_ultima_reforma)?,
            territory_profile: dto.territory_profile.map(|profile| TerritoryProfile {
                descricao_territorio: profile.descricao_territorio,
            }),
            needs: dto.needs.map(|needs| UbsNeeds {
                problemas_identificados: needs.problemas_identificados,
            }),
            ..Self::default()
        })
    }
}

// Blank dates count as absent, matching how an untouched date input submits.
fn parse_date(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<CalendarDate>, RequestValidationError> {
    let Some(raw) = value.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| RequestValidationError::InvalidDate { field, value: raw })
}

/// Request shape failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestValidationError {
    /// A date field is not `YYYY-MM-DD` or names no real day.
    InvalidDate {
        /// Field name.
        field: &'static str,
        /// Raw input.
        value: String,
    },
}

impl fmt::Display for RequestValidationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDate { field, value } => {
                write!(formatter, "{field} must be a YYYY-MM-DD date, got {value:?}")
            },
        }
    }
}

impl std::error::Error for RequestValidationError {}

impl From<RequestValidationError> for ErrorEnvelope {
    fn from(error: RequestValidationError) -> Self {
        let message = error.to_string();
        match error {
            RequestValidationError::InvalidDate { field, value } => {
                Self::expected(ErrorCode::new("request", "invalid_date"), message)
                    .with_metadata("field", field)
                    .with_metadata("value", value)
            },
        }
    }
}

/// Parse a registration request from JSON.
pub fn parse_registration_request_json(input: &str) -> Result<RegistrationForm, ErrorEnvelope> {
    let dto: RegistrationRequestDto = parse_request_json("registration", input)?;
    Ok(dto.into())
}

/// Parse a submission snapshot from JSON.
pub fn parse_submission_request_json(input: &str) -> Result<DiagnosisDraft, ErrorEnvelope> {
    let dto: SubmissionRequestDto = parse_request_json("submission", input)?;
    DiagnosisDraft::try_from(dto).map_err(Into::into)
}

fn parse_request_json<T: DeserializeOwned>(
    kind: &'static str,
    input: &str,
) -> Result<T, ErrorEnvelope> {
    serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("request", "invalid_json"),
            format!("invalid {kind} request JSON: {error}"),
        )
        .with_metadata("request_kind", kind)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_missing_registration_fields_become_empty() -> Result<(), ErrorEnvelope> {
        let form = parse_registration_request_json(r#"{"nome": null, "email": "a@b.co"}"#)?;
        assert_eq!(form.name, "");
        assert_eq!(form.email, "a@b.co");
        assert!(form.password.is_empty());
        Ok(())
    }

    #[test]
    fn confirmation_uses_camel_case_key() -> Result<(), ErrorEnvelope> {
        let form =
            parse_registration_request_json(r#"{"senha": "Abcdefg1", "confirmarSenha": "x"}"#)?;
        assert_eq!(form.password.expose(), "Abcdefg1");
        assert_eq!(form.password_confirmation.expose(), "x");
        Ok(())
    }

    #[test]
    fn malformed_json_is_an_expected_error() {
        let error = parse_registration_request_json("{").err();
        assert_eq!(
            error.as_ref().map(|error| (error.code.namespace(), error.code.code())),
            Some(("request", "invalid_json"))
        );
        assert!(error.is_some_and(|error| error.is_expected()));
    }

    #[test]
    fn wrong_field_type_is_rejected() {
        assert!(parse_registration_request_json(r#"{"cpf": 52998224725}"#).is_err());
    }

    #[test]
    fn submission_dates_parse_and_blank_dates_are_absent() -> Result<(), ErrorEnvelope> {
        let draft = parse_submission_request_json(
            r#"{"data_inauguracao": "2001-03-15", "data_ultima_reforma": "", "id": 42}"#,
        )?;
        assert_eq!(draft.data_inauguracao.map(|date| date.year()), Some(2001));
        assert_eq!(draft.data_ultima_reforma, None);
        Ok(())
    }

    #[test]
    fn invalid_submission_date_names_the_field() {
        let error = parse_submission_request_json(r#"{"data_ultima_reforma": "15/03/2001"}"#).err();
        assert_eq!(
            error.and_then(|error| error.metadata.get("field").cloned()),
            Some("data_ultima_reforma".to_string())
        );
    }
}
