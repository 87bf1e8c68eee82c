//! CLI command handlers.

pub mod check;
pub mod config;
pub mod info;
pub mod session;
pub mod validate;

pub use check::{run_check_cpf, run_check_password, run_check_text};
pub use config::{SchemaKind, run_config_schema, run_config_show};
pub use info::run_info;
pub use session::{run_session_logout, run_session_show};
pub use validate::{ValidateInput, run_validate_registration, run_validate_submission};
