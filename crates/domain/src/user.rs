//! Authenticated user snapshot and login payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Coarse role derived on the client from the backend's user flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Health-unit staff member.
    Profissional,
    /// Regular user.
    #[default]
    Usuario,
}

impl Role {
    /// Role implied by the `is_profissional` flag.
    #[must_use]
    pub const fn from_profissional_flag(is_profissional: bool) -> Self {
        if is_profissional {
            Self::Profissional
        } else {
            Self::Usuario
        }
    }

    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Profissional => "profissional",
            Self::Usuario => "usuario",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// User record as returned by the backend and cached in the session.
///
/// Unknown backend fields are preserved in `extra` so a cached user
/// round-trips without loss.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    /// Login email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Staff flag set by the backend.
    #[serde(default)]
    pub is_profissional: bool,
    /// Role derived at login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Remaining backend fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CurrentUser {
    /// Copy of this user with `role` derived from `is_profissional`.
    #[must_use]
    pub fn with_derived_role(mut self) -> Self {
        self.role = Some(Role::from_profissional_flag(self.is_profissional));
        self
    }

    /// Stored role, or the one implied by the staff flag.
    #[must_use]
    pub fn effective_role(&self) -> Role {
        self.role
            .unwrap_or_else(|| Role::from_profissional_flag(self.is_profissional))
    }
}

/// Body of a successful `/auth/login` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token, when issued.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Authenticated user, when included.
    #[serde(default)]
    pub user: Option<CurrentUser>,
}
