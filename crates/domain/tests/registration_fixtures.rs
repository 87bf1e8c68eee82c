//! Integration coverage for the registration and submission rules.

use ubs_diag_domain::{
    CalendarDate, Cpf, CpfError, DiagnosisDraft, IssueCode, RegistrationField, RegistrationForm,
    ReportStatus, validate_before_submit, validate_registration,
};
use ubs_diag_shared::ErrorEnvelope;

fn weak_form() -> RegistrationForm {
    RegistrationForm {
        name: "A".into(),
        email: "x".into(),
        cpf: "123".into(),
        password: "abc".into(),
        password_confirmation: "abd".into(),
    }
}

#[test]
fn weak_fixture_reports_every_field_but_security() {
    let errors = validate_registration(&weak_form());
    let fields: Vec<_> = errors.fields().collect();
    assert_eq!(
        fields,
        vec![
            RegistrationField::Name,
            RegistrationField::Email,
            RegistrationField::Cpf,
            RegistrationField::Password,
            RegistrationField::PasswordConfirmation,
        ]
    );
    assert!(!errors.contains(RegistrationField::Security));
}

#[test]
fn error_map_serializes_with_form_keys() -> Result<(), Box<dyn std::error::Error>> {
    let value = serde_json::to_value(validate_registration(&weak_form()))?;
    let object = value.as_object().ok_or("expected an object")?;
    let keys: Vec<_> = object.keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 5);
    for key in ["nome", "email", "cpf", "senha", "confirmarSenha"] {
        assert!(keys.contains(&key), "missing {key}");
    }
    assert_eq!(
        object.get("senha").and_then(|value| value.as_str()),
        Some("Senha deve ter: Mínimo 8 caracteres, Uma letra maiúscula, Um número.")
    );
    Ok(())
}

#[test]
fn injected_email_trips_security_even_when_valid() {
    let form = RegistrationForm {
        name: "Maria Souza".into(),
        email: "drop@ubs.gov.br".into(),
        cpf: "529.982.247-25".into(),
        password: "Abcdefg1".into(),
        password_confirmation: "Abcdefg1".into(),
    };
    let errors = validate_registration(&form);
    assert_eq!(errors.len(), 1);
    assert!(errors.contains(RegistrationField::Security));
}

#[test]
fn cpf_errors_surface_as_envelopes() -> Result<(), CpfError> {
    let Err(error) = Cpf::parse("529.982.247-26") else {
        return Err(CpfError::RepeatedDigits);
    };
    let envelope: ErrorEnvelope = error.into();
    assert_eq!(envelope.code.namespace(), "domain");
    assert_eq!(envelope.metadata.get("position"), Some(&"10".to_string()));
    Ok(())
}

#[test]
fn draft_from_json_reports_date_logic_and_submits_after_fix()
-> Result<(), Box<dyn std::error::Error>> {
    let mut draft: DiagnosisDraft = serde_json::from_str(
        r#"{
            "nome_ubs": "UBS Jardim",
            "cnes": "7654321",
            "area_atuacao": "Rural",
            "numero_habitantes_ativos": 1500,
            "numero_microareas": 4,
            "numero_familias_cadastradas": 410,
            "numero_domicilios": 390,
            "data_inauguracao": "2015-06-01",
            "data_ultima_reforma": "2014-01-10",
            "territory_profile": {"descricao_territorio": "Zona rural"},
            "needs": {"problemas_identificados": "Estradas ruins"}
        }"#,
    )?;

    let issues = validate_before_submit(&draft);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues.first().map(|issue| issue.code), Some(IssueCode::DateLogic));
    assert!(draft.submit().is_err());

    draft.data_ultima_reforma = Some("2020-01-10".parse::<CalendarDate>()?);
    assert_eq!(draft.submit(), Ok(ReportStatus::Submitted));
    Ok(())
}
