//! AI Client Module
//!
//! Handles communication with an LLM command-line tool.

use crate::ai::prompts;
use crate::ai::responses::{self, AiInsight};
use crate::config::AiSettings;
use crate::models::RequestItem;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Default executable looked up on PATH
pub const DEFAULT_CLI: &str = "claude";

/// Errors that can occur during AI operations
#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI CLI not found at {0}")]
    CliNotFound(PathBuf),

    #[error("AI CLI execution failed: {0}")]
    CliExecFailed(String),

    #[error("Failed to serialize requests: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid response from AI: {0}")]
    InvalidResponse(String),

    #[error("An analysis is already running")]
    Busy,

    #[error("AI integration not available")]
    NotAvailable,
}

/// Produces strategic insight for a snapshot of requests
pub trait InsightProvider: Send + Sync {
    fn strategic_insights(&self, requests: &[RequestItem]) -> Result<AiInsight, AiError>;
}

/// AI operation mode
#[derive(Debug, Clone, Default)]
pub enum AiMode {
    /// Call a CLI in non-interactive print mode
    Cli { path: PathBuf },
    /// AI features disabled
    #[default]
    Disabled,
}

/// AI Client backed by an external CLI
#[derive(Debug, Clone)]
pub struct AiClient {
    mode: AiMode,
}

impl Default for AiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AiClient {
    /// Create a new AI client with auto-detected mode
    pub fn new() -> Self {
        Self {
            mode: Self::detect_mode(DEFAULT_CLI),
        }
    }

    /// Create a client with a specific mode
    pub fn with_mode(mode: AiMode) -> Self {
        Self { mode }
    }

    /// Create a client honoring the configured AI settings
    pub fn from_settings(settings: &AiSettings) -> Self {
        if !settings.enabled {
            return Self::with_mode(AiMode::Disabled);
        }
        match &settings.cli_path {
            Some(path) => Self::with_mode(AiMode::Cli { path: path.clone() }),
            None => Self::new(),
        }
    }

    fn detect_mode(program: &str) -> AiMode {
        match Self::find_cli(program) {
            Some(path) => AiMode::Cli { path },
            None => AiMode::Disabled,
        }
    }

    /// Find the CLI executable on PATH or in common install locations
    fn find_cli(program: &str) -> Option<PathBuf> {
        if let Ok(output) = Command::new("which").arg(program).output() {
            if output.status.success() {
                let path_str = String::from_utf8_lossy(&output.stdout);
                let path = PathBuf::from(path_str.trim());
                if path.exists() {
                    return Some(path);
                }
            }
        }

        let mut candidates = vec![
            Path::new("/usr/local/bin").join(program),
            Path::new("/usr/bin").join(program),
        ];
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".npm-global/bin").join(program));
        }

        candidates.into_iter().find(|path| path.exists())
    }

    /// Check if AI features are available
    pub fn is_available(&self) -> bool {
        match &self.mode {
            AiMode::Cli { path } => path.exists(),
            AiMode::Disabled => false,
        }
    }

    pub fn mode(&self) -> &AiMode {
        &self.mode
    }

    pub fn mode_description(&self) -> String {
        match &self.mode {
            AiMode::Cli { path } => format!("CLI ({})", path.display()),
            AiMode::Disabled => "Disabled".to_string(),
        }
    }

    /// Send a prompt and return the raw text response
    fn send_request(&self, prompt: &str) -> Result<String, AiError> {
        match &self.mode {
            AiMode::Cli { path } => Self::send_cli_request(path, prompt),
            AiMode::Disabled => Err(AiError::NotAvailable),
        }
    }

    fn send_cli_request(cli_path: &Path, prompt: &str) -> Result<String, AiError> {
        if !cli_path.exists() {
            return Err(AiError::CliNotFound(cli_path.to_path_buf()));
        }

        debug!("Sending {} byte prompt to {}", prompt.len(), cli_path.display());
        let output = Command::new(cli_path)
            .arg("--print")
            .arg("-p")
            .arg(prompt)
            .output()
            .map_err(|e| AiError::CliExecFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AiError::CliExecFailed(format!(
                "Exit code: {:?}, stderr: {}",
                output.status.code(),
                stderr
            )));
        }

        let response = String::from_utf8_lossy(&output.stdout).to_string();
        if response.trim().is_empty() {
            return Err(AiError::InvalidResponse("Empty response from CLI".to_string()));
        }

        Ok(response)
    }
}

impl InsightProvider for AiClient {
    fn strategic_insights(&self, requests: &[RequestItem]) -> Result<AiInsight, AiError> {
        let prompt = prompts::build_insight_prompt(requests)?;
        let response = self.send_request(&prompt)?;
        responses::parse_insight_response(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_detection() {
        let client = AiClient::new();
        // Just ensure it doesn't panic
        let _ = client.is_available();
        let _ = client.mode_description();
    }

    #[test]
    fn test_disabled_mode() {
        let client = AiClient::with_mode(AiMode::Disabled);
        assert!(!client.is_available());
        assert_eq!(client.mode_description(), "Disabled");
        let err = client.strategic_insights(&[]).unwrap_err();
        assert!(matches!(err, AiError::NotAvailable));
    }

    #[test]
    fn test_settings_disable_ai() {
        let settings = AiSettings {
            enabled: false,
            cli_path: Some(PathBuf::from("/usr/bin/true")),
        };
        let client = AiClient::from_settings(&settings);
        assert!(matches!(client.mode(), AiMode::Disabled));
    }

    #[test]
    fn test_missing_cli_path() {
        let client = AiClient::with_mode(AiMode::Cli {
            path: PathBuf::from("/definitely/not/here/llm"),
        });
        assert!(!client.is_available());
        let err = client.strategic_insights(&[]).unwrap_err();
        assert!(matches!(err, AiError::CliNotFound(_)));
    }
}
