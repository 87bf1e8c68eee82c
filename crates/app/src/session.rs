//! Authentication session kept in a key-value store.
//!
//! Two keys are used, matching the web client's storage layout:
//! `access_token` holds the bearer token and `current_user` holds the user
//! record as JSON.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use ubs_diag_domain::{CurrentUser, LoginResponse, Role};
use ubs_diag_ports::{KeyValueStore, LogFields, LoggerPort};
use ubs_diag_shared::{ErrorClass, ErrorCode, ErrorEnvelope, Result, SecretString};

/// Storage key for the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key for the cached user record.
pub const CURRENT_USER_KEY: &str = "current_user";

/// HTTP status that invalidates the stored session.
pub const UNAUTHORIZED_STATUS: u16 = 401;

/// Session facade over an injected store.
pub struct AuthSession<S> {
    store: S,
    logger: Option<Arc<dyn LoggerPort>>,
}

/// What `session show` reports. Never includes the token itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// A token is stored.
    pub authenticated: bool,
    /// Effective role of the cached user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Cached user record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<CurrentUser>,
}

impl<S: KeyValueStore> AuthSession<S> {
    /// Wrap a store.
    pub const fn new(store: S) -> Self {
        Self {
            store,
            logger: None,
        }
    }

    /// Attach a logger for session events.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn LoggerPort>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Borrow the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Store the bearer token.
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.store.set(ACCESS_TOKEN_KEY, token)
    }

    /// Stored bearer token, if any.
    pub fn token(&self) -> Result<Option<SecretString>> {
        Ok(self.store.get(ACCESS_TOKEN_KEY)?.map(SecretString::from))
    }

    /// Forget the bearer token.
    pub fn remove_token(&self) -> Result<()> {
        self.store.remove(ACCESS_TOKEN_KEY)
    }

    /// Cache the user record; `None` removes it.
    pub fn set_current_user(&self, user: Option<&CurrentUser>) -> Result<()> {
        let Some(user) = user else {
            return self.store.remove(CURRENT_USER_KEY);
        };
        let encoded = serde_json::to_string(user).map_err(|error| {
            ErrorEnvelope::unexpected(
                ErrorCode::new("session", "encode_user"),
                format!("failed to encode current user: {error}"),
                ErrorClass::NonRetriable,
            )
        })?;
        self.store.set(CURRENT_USER_KEY, &encoded)
    }

    /// Cached user record.
    ///
    /// A value that does not decode is treated as absent.
    pub fn current_user(&self) -> Result<Option<CurrentUser>> {
        let Some(raw) = self.store.get(CURRENT_USER_KEY)? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(_) => {
                self.log_warn("session.user_unreadable", "Cached user is not valid JSON");
                Ok(None)
            },
        }
    }

    /// Forget both token and user.
    pub fn clear(&self) -> Result<()> {
        self.remove_token()?;
        self.store.remove(CURRENT_USER_KEY)?;
        self.log_info("session.cleared", "Session cleared", None);
        Ok(())
    }

    /// `Authorization` header value for authenticated requests.
    pub fn bearer_header(&self) -> Result<Option<SecretString>> {
        Ok(self
            .token()?
            .filter(|token| !token.is_empty())
            .map(|token| SecretString::from(format!("Bearer {}", token.expose()))))
    }

    /// Persist a successful login.
    ///
    /// The token is stored when present; the user is stored with a role
    /// derived from `is_profissional`. Returns the stored user.
    pub fn record_login(&self, response: &LoginResponse) -> Result<Option<CurrentUser>> {
        if let Some(token) = response.access_token.as_deref().filter(|token| !token.is_empty()) {
            self.set_token(token)?;
        }
        let user = response.user.clone().map(CurrentUser::with_derived_role);
        if let Some(user) = user.as_ref() {
            self.set_current_user(Some(user))?;
        }

        let mut fields = LogFields::new();
        fields.insert(
            "role".into(),
            user.as_ref()
                .map_or(Value::Null, |user| Value::String(user.effective_role().to_string())),
        );
        self.log_info("session.login_recorded", "Login recorded", Some(fields));
        Ok(user)
    }

    /// Drop the session after the backend rejected the credentials.
    pub fn handle_unauthorized(&self) -> Result<()> {
        self.log_warn("session.unauthorized", "Backend rejected credentials");
        self.clear()
    }

    /// React to a response status; returns true when the session was cleared.
    ///
    /// Only authenticated requests that come back `401` clear the session.
    pub fn handle_status(&self, status: u16, requires_auth: bool) -> Result<bool> {
        if status == UNAUTHORIZED_STATUS && requires_auth {
            self.handle_unauthorized()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Summary of the stored session.
    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        let authenticated = self.token()?.is_some_and(|token| !token.is_empty());
        let user = self.current_user()?;
        Ok(SessionSnapshot {
            authenticated,
            role: user.as_ref().map(CurrentUser::effective_role),
            user,
        })
    }

    fn log_info(&self, event: &str, message: &str, fields: Option<LogFields>) {
        if let Some(logger) = self.logger.as_ref() {
            logger.info(event, message, fields);
        }
    }

    fn log_warn(&self, event: &str, message: &str) {
        if let Some(logger) = self.logger.as_ref() {
            logger.warn(event, message, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore(Mutex<BTreeMap<String, String>>);

    impl KeyValueStore for MapStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.0.lock().ok().and_then(|map| map.get(key).cloned()))
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if let Ok(mut map) = self.0.lock() {
                map.insert(key.to_owned(), value.to_owned());
            }
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<()> {
            if let Ok(mut map) = self.0.lock() {
                map.remove(key);
            }
            Ok(())
        }
    }

    fn session() -> AuthSession<MapStore> {
        AuthSession::new(MapStore::default())
    }

    #[test]
    fn token_round_trip_and_bearer_header() -> Result<()> {
        let session = session();
        assert!(session.bearer_header()?.is_none());

        session.set_token("abc.def")?;
        assert_eq!(session.token()?.map(|token| token.expose().to_owned()).as_deref(), Some("abc.def"));
        assert_eq!(
            session.bearer_header()?.map(|header| header.expose().to_owned()).as_deref(),
            Some("Bearer abc.def")
        );

        session.remove_token()?;
        assert!(session.token()?.is_none());
        Ok(())
    }

    #[test]
    fn none_user_removes_the_record() -> Result<()> {
        let session = session();
        let user = CurrentUser {
            nome: Some("Ana".into()),
            ..CurrentUser::default()
        };
        session.set_current_user(Some(&user))?;
        assert_eq!(session.current_user()?, Some(user));

        session.set_current_user(None)?;
        assert_eq!(session.store().get(CURRENT_USER_KEY)?, None);
        Ok(())
    }

    #[test]
    fn corrupt_user_reads_as_absent() -> Result<()> {
        let session = session();
        session.store().set(CURRENT_USER_KEY, "{not json")?;
        assert_eq!(session.current_user()?, None);
        Ok(())
    }

    #[test]
    fn login_stores_token_and_derives_role() -> Result<()> {
        let session = session();
        let response: LoginResponse = serde_json::from_value(serde_json::json!({
            "access_token": "tok",
            "user": {"id": 3, "nome": "Bruno", "is_profissional": true}
        }))
        .map_err(|error| {
            ErrorEnvelope::expected(ErrorCode::invalid_input(), error.to_string())
        })?;

        let stored = session.record_login(&response)?;
        assert_eq!(stored.and_then(|user| user.role), Some(Role::Profissional));
        assert!(session.token()?.is_some());

        let raw = session.store().get(CURRENT_USER_KEY)?.unwrap_or_default();
        assert!(raw.contains("\"role\":\"profissional\""));
        Ok(())
    }

    #[test]
    fn login_without_token_leaves_existing_token() -> Result<()> {
        let session = session();
        session.set_token("old")?;
        session.record_login(&LoginResponse::default())?;
        assert_eq!(
            session.token()?.map(|token| token.expose().to_owned()).as_deref(),
            Some("old")
        );
        Ok(())
    }

    #[test]
    fn only_authenticated_401_clears() -> Result<()> {
        let session = session();
        session.set_token("tok")?;
        session.set_current_user(Some(&CurrentUser::default()))?;

        assert!(!session.handle_status(401, false)?);
        assert!(!session.handle_status(403, true)?);
        assert!(session.snapshot()?.authenticated);

        assert!(session.handle_status(401, true)?);
        let snapshot = session.snapshot()?;
        assert!(!snapshot.authenticated);
        assert!(snapshot.user.is_none());
        Ok(())
    }
}
