//! Sourcerepo CLI - command-line harness for the bootstrapper
//!
//! Loads layered settings, runs one reconciliation and prints the result as
//! JSON on stdout.

pub mod runner;
pub mod settings;

pub use runner::{RunError, reconcile};
pub use settings::{EngineSettings, Settings, SettingsError};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_defined() {
        assert!(!version().is_empty());
    }
}
