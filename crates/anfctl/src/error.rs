//! Error types for anfctl
//!
//! Wraps library errors and attaches suggestions for the user.

use anfctl_core::CoreError;
use anfctl_core::config::ConfigError;
use colored::Colorize;
use thiserror::Error;

use crate::console::Console;

/// Main error type for the anfctl binary
#[derive(Error, Debug)]
pub enum AnfCtlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Config file already exists at {path}")]
    ConfigExists { path: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("{0}")]
    Core(CoreError),

    #[error("Interrupted while working on {resource}")]
    Interrupted { resource: String },
}

/// Result type for anfctl commands
pub type Result<T> = std::result::Result<T, AnfCtlError>;

impl From<CoreError> for AnfCtlError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config(err) => AnfCtlError::Config(err),
            CoreError::Unauthorized { status, message } => AnfCtlError::AuthenticationFailed {
                message: format!("HTTP {status}: {message}"),
            },
            CoreError::WaitCancelled { resource } => AnfCtlError::Interrupted { resource },
            other => AnfCtlError::Core(other),
        }
    }
}

impl AnfCtlError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            AnfCtlError::Config(ConfigError::NotFound { .. }) => vec![
                "Create a config template: anfctl init".to_string(),
                "Point at an existing file: anfctl --config <path> run".to_string(),
            ],
            AnfCtlError::Config(ConfigError::Invalid(_)) => vec![
                "Show where the config lives: anfctl config-path".to_string(),
            ],
            AnfCtlError::ConfigExists { .. } => {
                vec!["Overwrite it: anfctl init --force".to_string()]
            }
            AnfCtlError::AuthenticationFailed { .. } => vec![
                "Refresh the token: az account get-access-token --query accessToken -o tsv"
                    .to_string(),
                "Export it as AZURE_ACCESS_TOKEN or pass --token".to_string(),
            ],
            AnfCtlError::Core(err) if err.is_timeout() => vec![
                "Allow more time: anfctl run --max-attempts <n> --interval <secs>".to_string(),
                "Check the resource state in the Azure portal".to_string(),
            ],
            AnfCtlError::Core(err) if err.is_server_error() => {
                vec!["The service returned a 5xx error; retry later".to_string()]
            }
            _ => vec![],
        }
    }

    /// Format the suggestions as indented tip lines
    pub fn format_suggestions(&self) -> String {
        self.suggestions()
            .iter()
            .map(|suggestion| format!("  {}{}{}", "tip".yellow().bold(), ": ".bold(), suggestion))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Print the error in red with a timestamp, followed by any tips
    pub fn report(&self, console: &Console) {
        console.error(&self.to_string());
        let tips = self.format_suggestions();
        if !tips.is_empty() {
            eprintln!("{tips}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_becomes_interrupted() {
        let err: AnfCtlError = CoreError::WaitCancelled {
            resource: "volume 'vol'".to_string(),
        }
        .into();
        assert!(matches!(err, AnfCtlError::Interrupted { .. }));
        assert!(err.to_string().contains("volume 'vol'"));
    }

    #[test]
    fn test_timeout_suggests_larger_budget() {
        let err: AnfCtlError = CoreError::WaitTimedOut {
            resource: "account 'acct'".to_string(),
            attempts: 5,
        }
        .into();
        assert!(
            err.suggestions()
                .iter()
                .any(|s| s.contains("--max-attempts"))
        );
    }

    #[test]
    fn test_missing_config_suggests_init() {
        let err = AnfCtlError::Config(ConfigError::NotFound {
            path: "/nope/config.toml".to_string(),
        });
        assert!(err.format_suggestions().contains("anfctl init"));
    }

    #[test]
    fn test_unauthorized_maps_to_authentication_failed() {
        let err: AnfCtlError = CoreError::Unauthorized {
            status: 401,
            message: "expired".to_string(),
        }
        .into();
        assert!(matches!(err, AnfCtlError::AuthenticationFailed { .. }));
    }
}
