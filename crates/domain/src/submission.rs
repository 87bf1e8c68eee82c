//! Submission-readiness rules for a situational diagnosis report.
//!
//! A report stays a mutable draft until every rule here passes; only then can
//! it move to [`ReportStatus::Submitted`]. Rules run in a fixed order and all
//! failures are reported together.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ubs_diag_shared::{ErrorCode, ErrorEnvelope};

/// Lifecycle state of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    /// Editable; the default for new reports.
    #[default]
    Draft,
    /// Finalized.
    Submitted,
}

impl ReportStatus {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Calendar date parsed from `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate {
    year: u16,
    month: u8,
    day: u8,
}

/// Invalid calendar date input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for DateParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "invalid date {:?}: expected YYYY-MM-DD", self.input)
    }
}

impl std::error::Error for DateParseError {}

impl From<DateParseError> for ErrorEnvelope {
    fn from(error: DateParseError) -> Self {
        let input = error.input.clone();
        Self::expected(ErrorCode::new("domain", "invalid_date"), error.to_string())
            .with_metadata("input", input)
    }
}

impl CalendarDate {
    /// Build a date, checking month and day ranges (leap years included).
    pub fn new(year: u16, month: u8, day: u8) -> Option<Self> {
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return None;
        }
        Some(Self { year, month, day })
    }

    /// Year component.
    #[must_use]
    pub const fn year(self) -> u16 {
        self.year
    }

    /// Month component (1-12).
    #[must_use]
    pub const fn month(self) -> u8 {
        self.month
    }

    /// Day component (1-31).
    #[must_use]
    pub const fn day(self) -> u8 {
        self.day
    }
}

const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl FromStr for CalendarDate {
    type Err = DateParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let fail = || DateParseError {
            input: input.to_owned(),
        };
        let mut parts = input.split('-');
        let (Some(year), Some(month), Some(day), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(fail());
        };
        let all_digits = |part: &str, width: usize| {
            part.len() == width && part.bytes().all(|byte| byte.is_ascii_digit())
        };
        if !all_digits(year, 4) || !all_digits(month, 2) || !all_digits(day, 2) {
            return Err(fail());
        }
        let year = year.parse().map_err(|_| fail())?;
        let month = month.parse().map_err(|_| fail())?;
        let day = day.parse().map_err(|_| fail())?;
        Self::new(year, month, day).ok_or_else(fail)
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = DateParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CalendarDate> for String {
    fn from(value: CalendarDate) -> Self {
        value.to_string()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Territory section of the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryProfile {
    /// Free-text description of the covered territory.
    #[serde(default)]
    pub descricao_territorio: Option<String>,
}

/// Needs section of the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UbsNeeds {
    /// Problems identified by the team.
    #[serde(default)]
    pub problemas_identificados: Option<String>,
}

/// Snapshot of a report as checked before submission.
///
/// Field names follow the report schema so snapshots deserialize directly
/// from the backend's JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosisDraft {
    /// Report title.
    pub nome_relatorio: Option<String>,
    /// Health unit name.
    pub nome_ubs: Option<String>,
    /// National health-facility registry number.
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
    /// Opening date.
    pub data_inauguracao: Option<CalendarDate>,
    /// Last renovation date.
    pub data_ultima_reforma: Option<CalendarDate>,
    /// Territory section.
    pub territory_profile: Option<TerritoryProfile>,
    /// Needs section.
    pub needs: Option<UbsNeeds>,
    /// Current lifecycle state.
    pub status: ReportStatus,
}

/// Category of a submission issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// A mandatory value is missing.
    Required,
    /// A numeric value is out of range.
    Range,
    /// Dates are inconsistent with each other.
    DateLogic,
}

impl IssueCode {
    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Range => "range",
            Self::DateLogic => "date_logic",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// One reason a draft cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionIssue {
    /// Dotted path of the offending field.
    pub field: String,
    /// User-facing message.
    pub message: String,
    /// Issue category.
    pub code: IssueCode,
}

impl SubmissionIssue {
    fn new(field: &str, message: &str, code: IssueCode) -> Self {
        Self {
            field: field.to_owned(),
            message: message.to_owned(),
            code,
        }
    }
}

/// Check a draft against every submission rule, in order.
pub fn validate_before_submit(draft: &DiagnosisDraft) -> Vec<SubmissionIssue> {
    let mut issues = Vec::new();

    let required_text = [
        ("nome_ubs", &draft.nome_ubs, "Nome da UBS é obrigatório"),
        ("cnes", &draft.cnes, "CNES é obrigatório"),
        ("area_atuacao", &draft.area_atuacao, "Área de atuação é obrigatória"),
    ];
    for (field, value, message) in required_text {
        if is_missing(value.as_deref()) {
            issues.push(SubmissionIssue::new(field, message, IssueCode::Required));
        }
    }

    let counts = [
        ("numero_habitantes_ativos", draft.numero_habitantes_ativos),
        ("numero_microareas", draft.numero_microareas),
        ("numero_familias_cadastradas", draft.numero_familias_cadastradas),
        ("numero_domicilios", draft.numero_domicilios),
    ];
    for (field, value) in counts {
        match value {
            None => issues.push(SubmissionIssue::new(
                field,
                "Campo numérico obrigatório para envio",
                IssueCode::Required,
            )),
            Some(count) if count < 0 => issues.push(SubmissionIssue::new(
                field,
                "Valor não pode ser negativo",
                IssueCode::Range,
            )),
            Some(_) => {},
        }
    }

    let territory = draft
        .territory_profile
        .as_ref()
        .and_then(|profile| profile.descricao_territorio.as_deref());
    if is_missing(territory) {
        issues.push(SubmissionIssue::new(
            "territory_profile.descricao_territorio",
            "Descrição do território é obrigatória",
            IssueCode::Required,
        ));
    }

    let problems = draft
        .needs
        .as_ref()
        .and_then(|needs| needs.problemas_identificados.as_deref());
    if is_missing(problems) {
        issues.push(SubmissionIssue::new(
            "needs.problemas_identificados",
            "Problemas identificados são obrigatórios",
            IssueCode::Required,
        ));
    }

    if let (Some(opened), Some(renovated)) = (draft.data_inauguracao, draft.data_ultima_reforma)
        && renovated < opened
    {
        issues.push(SubmissionIssue::new(
            "data_ultima_reforma",
            "Data da última reforma não pode ser anterior à data de inauguração",
            IssueCode::DateLogic,
        ));
    }

    issues
}

// Only absent or empty text counts as missing; whitespace is content.
fn is_missing(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

impl DiagnosisDraft {
    /// Move the draft to `Submitted` when every rule passes.
    ///
    /// Submitting an already submitted report is a no-op: the rules are not
    /// re-run and the status stays `Submitted`.
    pub fn submit(&mut self) -> Result<ReportStatus, Vec<SubmissionIssue>> {
        if self.status == ReportStatus::Submitted {
            return Ok(self.status);
        }
        let issues = validate_before_submit(self);
        if !issues.is_empty() {
            return Err(issues);
        }
        self.status = ReportStatus::Submitted;
        Ok(self.status)
    }
}
