mod scoring;

pub use scoring::{FleetProfile, ScoringConfig};

use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
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

/// Top-level configuration for the scoring runner.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub scoring: ScoringSource,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let document = env::var("CREW_TRUST_CONFIG")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        let default_fleet = env::var("CREW_TRUST_FLEET")
            .ok()
            .map(|raw| raw.trim().to_ascii_lowercase())
            .filter(|raw| !raw.is_empty());

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            scoring: ScoringSource {
                document,
                default_fleet,
                require_document: environment == AppEnvironment::Production,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where the scoring document comes from and which fleet profile applies by default.
#[derive(Debug, Clone, Default)]
pub struct ScoringSource {
    pub document: Option<PathBuf>,
    pub default_fleet: Option<String>,
    /// Production runs must score against an explicit document, never the built-in defaults.
    pub require_document: bool,
}

impl ScoringSource {
    /// Load the scoring document, falling back to built-in defaults when no path is configured
    /// and the environment allows it.
    pub fn load(&self) -> Result<ScoringConfig, ConfigError> {
        match &self.document {
            Some(path) => ScoringConfig::from_path(path),
            None if self.require_document => Err(ConfigError::ScoringMissing),
            None => Ok(ScoringConfig::default()),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    ScoringMissing,
    ScoringRead {
        path: PathBuf,
        source: std::io::Error,
    },
    ScoringParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ScoringMissing => write!(
                f,
                "no scoring document configured; set CREW_TRUST_CONFIG or pass --config"
            ),
            ConfigError::ScoringRead { path, .. } => {
                write!(f, "unable to read scoring config '{}'", path.display())
            }
            ConfigError::ScoringParse { path, .. } => {
                write!(f, "scoring config '{}' is not valid JSON", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ScoringMissing => None,
            ConfigError::ScoringRead { source, .. } => Some(source),
            ConfigError::ScoringParse { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("CREW_TRUST_CONFIG");
        env::remove_var("CREW_TRUST_FLEET");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert!(config.scoring.document.is_none());
        assert!(config.scoring.default_fleet.is_none());
        assert!(!config.scoring.require_document);
        assert!(config.scoring.load().is_ok());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn fleet_and_environment_are_normalized() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", " Production ");
        env::set_var("CREW_TRUST_FLEET", "  Tanker ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.scoring.default_fleet.as_deref(), Some("tanker"));
        assert!(config.scoring.require_document);
        assert!(matches!(
            config.scoring.load(),
            Err(ConfigError::ScoringMissing)
        ));
        reset_env();
    }

    #[test]
    fn missing_scoring_file_reports_path() {
        let source = ScoringSource {
            document: Some(PathBuf::from("/nonexistent/crew-trust.json")),
            default_fleet: None,
            require_document: false,
        };
        match source.load() {
            Err(err @ ConfigError::ScoringRead { .. }) => {
                assert!(err.to_string().contains("crew-trust.json"));
            }
            other => panic!("expected read error, got {other:?}"),
        }
    }
}
