use anyhow::Result;
use config::{Config, ConfigBuilder, builder::DefaultState};
use serde::Deserialize;

use crate::constants::{CONFIG_FILE_STEM, DEFAULT_LOG_LEVEL, DEFAULT_TIMEZONE};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub calendar: CalendarConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// IANA name (`Asia/Tokyo`), `UTC`, or a fixed offset such as `+09:00`.
    pub timezone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `config.toml` into a `Settings`.
    /// Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let settings = Self::defaults()?
            // TOML file
            .add_source(config::File::with_name(CONFIG_FILE_STEM).required(false))
            // Env
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Builds a `Settings` from a TOML document layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the document is malformed or fails validation.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        let settings = Self::defaults()?
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("calendar.timezone", DEFAULT_TIMEZONE)?
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?)
    }

    /// ## Summary
    /// Rejects settings that cannot be applied.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` for blank values.
    pub fn validate(&self) -> CoreResult<()> {
        if self.calendar.timezone.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "calendar.timezone must not be empty".to_string(),
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "logging.level must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            calendar: CalendarConfig {
                timezone: DEFAULT_TIMEZONE.to_string(),
            },
            logging: LoggingConfig {
                level: DEFAULT_LOG_LEVEL.to_string(),
            },
        }
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(timezone = %settings.calendar.timezone, "Calendar settings loaded");

    Ok(settings)
}
