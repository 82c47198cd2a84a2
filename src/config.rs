//! # Configuration
//!
//! Typed settings for the client and the business rules.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. an optional `echange.toml` (or the file passed to [`AppConfig::load_with_path`])
//! 3. environment variables prefixed `ECHANGE__`, with `__` between sections,
//!    e.g. `ECHANGE__API__BASE_URL` or `ECHANGE__RULES__RATIO_MIN`
//!
//! A `.env` file is read first when present.
//!
//! ```toml
//! [api]
//! base_url = "https://api.example.com"
//! timeout_ms = 5000
//!
//! [rules]
//! delai_validite_jours = 45
//! ratio_min = "0.75"
//!
//! [logging]
//! level = "debug"
//! json = true
//! ```

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::services::equity::EquityPolicy;
use crate::domain::services::validation::{DEFAULT_DELAI_VALIDITE_JOURS, ValidationPolicy};
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CONFIG_NAME: &str = "echange";
const ENV_PREFIX: &str = "ECHANGE";
const ENV_SEPARATOR: &str = "__";

/// Backend API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the exchange backend, without trailing slash.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Business-rule thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Minimum title length.
    pub titre_min_chars: usize,
    /// Descriptions shorter than this raise a warning.
    pub description_warning_chars: usize,
    /// Days a listing stays valid when created without an expiration date.
    pub delai_validite_jours: i64,
    /// Value assumed for an offer without an estimate.
    pub valeur_par_defaut: Decimal,
    /// Lowest equitable ratio.
    pub ratio_min: Decimal,
    /// Highest equitable ratio.
    pub ratio_max: Decimal,
}

impl Default for RulesConfig {
    fn default() -> Self {
        let validation = ValidationPolicy::default();
        let equity = EquityPolicy::default();
        Self {
            titre_min_chars: validation.titre_min_chars,
            description_warning_chars: validation.description_warning_chars,
            delai_validite_jours: DEFAULT_DELAI_VALIDITE_JOURS,
            valeur_par_defaut: equity.valeur_par_defaut,
            ratio_min: equity.ratio_min,
            ratio_max: equity.ratio_max,
        }
    }
}

impl RulesConfig {
    /// Equity thresholds.
    #[must_use]
    pub fn equity_policy(&self) -> EquityPolicy {
        EquityPolicy {
            valeur_par_defaut: self.valeur_par_defaut,
            ratio_min: self.ratio_min,
            ratio_max: self.ratio_max,
        }
    }

    /// Validation thresholds, including the equity band.
    #[must_use]
    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            titre_min_chars: self.titre_min_chars,
            description_warning_chars: self.description_warning_chars,
            delai_validite_jours: self.delai_validite_jours,
            equity: self.equity_policy(),
        }
    }
}

/// Logging settings, passed to [`setup_logging`](crate::logging::setup_logging).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level or `EnvFilter` directive string.
    pub level: String,
    /// Emit JSON lines instead of compact text.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// All settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend API.
    pub api: ApiConfig,
    /// Business rules.
    pub rules: RulesConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads settings from `.env`, `echange.toml` and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if a source cannot be read or
    /// the resulting settings are invalid.
    pub fn load() -> ApplicationResult<Self> {
        Self::load_with_path(None)
    }

    /// Like [`load`](Self::load), reading `path` instead of the default
    /// file. An explicit path must exist.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if a source cannot be read or
    /// the resulting settings are invalid.
    pub fn load_with_path(path: Option<&str>) -> ApplicationResult<Self> {
        dotenvy::dotenv().ok();

        let builder = match path {
            Some(p) => Config::builder().add_source(File::from(Path::new(p)).required(true)),
            None => {
                Config::builder().add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false))
            }
        };
        let builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        );
        Self::from_builder(builder)
    }

    /// Parses settings from a TOML document, without reading the environment.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` for malformed TOML or
    /// invalid settings.
    pub fn from_toml(document: &str) -> ApplicationResult<Self> {
        Self::from_builder(Config::builder().add_source(File::from_str(document, FileFormat::Toml)))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> ApplicationResult<Self> {
        let settings: Self = builder
            .build()
            .and_then(|config| config.try_deserialize::<Self>())
            .map_err(|e| ApplicationError::configuration(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` naming the first bad setting.
    pub fn validate(&self) -> ApplicationResult<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ApplicationError::configuration("api.base_url is empty"));
        }
        if self.api.timeout_ms == 0 {
            return Err(ApplicationError::configuration("api.timeout_ms must be positive"));
        }
        if self.rules.delai_validite_jours <= 0 {
            return Err(ApplicationError::configuration(
                "rules.delai_validite_jours must be positive",
            ));
        }
        if self.rules.valeur_par_defaut.is_sign_negative() {
            return Err(ApplicationError::configuration(
                "rules.valeur_par_defaut must not be negative",
            ));
        }
        if self.rules.ratio_min.is_sign_negative() || self.rules.ratio_min > self.rules.ratio_max {
            return Err(ApplicationError::configuration(
                "rules.ratio_min must be between 0 and rules.ratio_max",
            ));
        }
        Ok(())
    }
}
