//! Logger adapter forwarding port events to `tracing`.

use serde_json::Value;
use std::collections::BTreeMap;
use ubs_diag_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use ubs_diag_shared::redaction::{REDACTED, is_secret_key};

/// Forwards each [`LogEvent`] to the installed `tracing` subscriber.
///
/// Fields are redacted, merged over the base fields, and attached as one
/// JSON-encoded `fields` value so any subscriber layout can render them.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    base_fields: LogFields,
}

impl TracingLogger {
    /// Logger with no base fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base fields applied to every event.
    #[must_use]
    pub fn with_base_fields(mut self, fields: LogFields) -> Self {
        self.base_fields = fields;
        self
    }

    /// Merge, redact and encode the fields of one event.
    #[must_use]
    pub fn render_fields(&self, extra: Option<LogFields>) -> Option<String> {
        let mut fields = self.base_fields.clone();
        fields.extend(extra.unwrap_or_default());
        if fields.is_empty() {
            return None;
        }
        redact_fields(&mut fields);
        let object: BTreeMap<String, Value> = fields
            .into_iter()
            .map(|(key, value)| (key.into_string(), value))
            .collect();
        serde_json::to_string(&object).ok()
    }
}

impl LoggerPort for TracingLogger {
    fn log(&self, event: LogEvent) {
        let name = event.event.as_ref();
        let message = event.message.as_ref();
        let fields = self.render_fields(event.fields).unwrap_or_default();
        match event.level {
            LogLevel::Debug => tracing::debug!(event = name, fields = %fields, "{message}"),
            LogLevel::Info => tracing::info!(event = name, fields = %fields, "{message}"),
            LogLevel::Warn => tracing::warn!(event = name, fields = %fields, "{message}"),
            LogLevel::Error => tracing::error!(event = name, fields = %fields, "{message}"),
        }
    }
}

fn redact_fields(fields: &mut LogFields) {
    for (key, value) in fields.iter_mut() {
        if is_secret_key(key) {
            *value = Value::String(REDACTED.to_string());
        } else {
            redact_value(value);
        }
    }
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map.iter_mut() {
                if is_secret_key(key) {
                    *nested = Value::String(REDACTED.to_string());
                } else {
                    redact_value(nested);
                }
            }
        },
        Value::Array(items) => {
            for item in items {
                redact_value(item);
            }
        },
        _ => {},
    }
}
