//! Injection-risk heuristics for free-text form fields.
//!
//! These are substring scans, not parsers. They flag; they never sanitize.
//! Over-flagging is part of the contract: a marker inside an ordinary word
//! (`Rua Updated`, `Ana Dropbox`) still reports the text as SQL-risky.

use serde::Serialize;

/// SQL markers matched case-insensitively anywhere in the text.
pub const SQL_RISK_MARKERS: &[&str] = &[
    "union", "select", "insert", "update", "delete", "drop", ";", "--", "/*", "*/", "xp_",
];

/// Script-injection markers matched case-insensitively anywhere in the text.
pub const XSS_RISK_MARKERS: &[&str] = &[
    "<script",
    "<iframe",
    "javascript:",
    "onerror=",
    "onload=",
];

/// Returns true when the text contains any SQL-looking marker.
///
/// ```
/// use ubs_diag_domain::is_sql_risk;
///
/// assert!(is_sql_risk("SELECT * FROM users"));
/// assert!(is_sql_risk("Ana Dropbox"));
/// assert!(!is_sql_risk("Selecionar opção"));
/// assert!(!is_sql_risk("Maria da Silva"));
/// ```
pub fn is_sql_risk(text: &str) -> bool {
    contains_any_marker(text, SQL_RISK_MARKERS)
}

/// Returns true when the text contains any script-injection marker.
///
/// ```
/// use ubs_diag_domain::is_xss_risk;
///
/// assert!(is_xss_risk("<script>alert(1)</script>"));
/// assert!(!is_xss_risk("hello world"));
/// ```
pub fn is_xss_risk(text: &str) -> bool {
    contains_any_marker(text, XSS_RISK_MARKERS)
}

/// Both heuristics evaluated over one value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    /// SQL markers present.
    pub sql: bool,
    /// Script markers present.
    pub xss: bool,
}

impl RiskReport {
    /// Scan a single value.
    pub fn scan(text: &str) -> Self {
        Self {
            sql: is_sql_risk(text),
            xss: is_xss_risk(text),
        }
    }

    /// Returns true when either heuristic fired.
    #[must_use]
    pub const fn is_suspicious(self) -> bool {
        self.sql || self.xss
    }
}

// Markers are ASCII, so ASCII folding is enough; non-ASCII letters never
// fold onto them.
fn contains_any_marker(text: &str, markers: &[&str]) -> bool {
    if text.is_empty() {
        return false;
    }
    let folded = text.to_ascii_lowercase();
    markers.iter().any(|marker| folded.contains(marker))
}
