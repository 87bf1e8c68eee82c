//! # ubs-diag-core
//!
//! Build metadata for the ubs-diag workspace.
//!
//! This crate has no workspace dependencies, so every other crate (and the
//! CLI `info` command) can import it freely.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

/// Product name reported by the CLI and used in the client user agent.
pub const PRODUCT_NAME: &str = "ubs-diag";

/// Compile-time facts about the running binary.
///
/// # Example
///
/// ```
/// use ubs_diag_core::build_info;
///
/// let info = build_info();
/// println!("{}", info.version_string());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    /// Crate name from Cargo.toml.
    pub name: &'static str,
    /// Crate version (semver).
    pub version: &'static str,
    /// Minimum supported Rust version declared by the workspace.
    pub rust_version: &'static str,
    /// `"debug"` or `"release"`.
    pub profile: &'static str,
    /// Short commit hash when `GIT_HASH` was set at build time.
    pub git_hash: Option<&'static str>,
}

impl BuildInfo {
    /// `name version` with the commit hash appended when known.
    #[must_use]
    pub fn version_string(&self) -> String {
        self.git_hash.map_or_else(
            || format!("{} {}", self.name, self.version),
            |hash| format!("{} {} ({hash})", self.name, self.version),
        )
    }

    /// Value sent as `User-Agent` by HTTP clients built on this workspace.
    #[must_use]
    pub fn user_agent(&self) -> String {
        format!("{PRODUCT_NAME}/{}", self.version)
    }

    /// Returns true for builds with debug assertions enabled.
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        matches!(self.profile.as_bytes(), b"debug")
    }
}

/// Returns build information captured at compile time.
#[must_use]
pub const fn build_info() -> BuildInfo {
    BuildInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        rust_version: env!("CARGO_PKG_RUST_VERSION"),
        profile: if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
        git_hash: option_env!("GIT_HASH"),
    }
}
