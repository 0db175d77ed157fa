use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::workflows::bills::{CurrentUser, SessionError};

const DEFAULT_SESSION_USER: &str = r#"{"type":"Employee","email":"employee@test.tld"}"#;

/// Distinguishes runtime behavior for different stages of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the employee workspace.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub session: SessionConfig,
    pub store: StoreConfig,
    pub ui: UiConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("BILLED_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let raw_user =
            env::var("BILLED_SESSION_USER").unwrap_or_else(|_| DEFAULT_SESSION_USER.to_string());
        let user = CurrentUser::from_session_json(&raw_user)
            .map_err(|source| ConfigError::InvalidSessionUser { source })?;

        let fixtures = env::var("BILLED_FIXTURES")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let modal_width = env::var("BILLED_MODAL_WIDTH")
            .unwrap_or_else(|_| "800".to_string())
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidModalWidth)?;

        let log_level = env::var("BILLED_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            session: SessionConfig { user },
            store: StoreConfig { fixtures },
            ui: UiConfig { modal_width },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// The authenticated user, as stored in the session by the login flow.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub user: CurrentUser,
}

/// Where the in-memory bill store is seeded from.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub fixtures: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub modal_width: u32,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidModalWidth,
    InvalidSessionUser { source: SessionError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidModalWidth => write!(f, "BILLED_MODAL_WIDTH must be a valid u32"),
            ConfigError::InvalidSessionUser { .. } => {
                write!(f, "BILLED_SESSION_USER must be a JSON user with type and email")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidModalWidth => None,
            ConfigError::InvalidSessionUser { source } => Some(source),
        }
    }
}
