//! Handles settings for the application.
//!
//! Settings are read from an optional `settings` file (any format the
//! `config` crate understands, `settings.toml` by convention), then
//! overridden by `EXPENSE_TRACKER__*` environment variables, e.g.
//! `EXPENSE_TRACKER__SERVER__PORT=8080`.
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

/// Environment variable overriding the settings file path.
const SETTINGS_PATH_ENV: &str = "EXPENSE_TRACKER_SETTINGS";
const ENV_PREFIX: &str = "EXPENSE_TRACKER";

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "path", rename_all = "lowercase")]
pub enum Database {
    #[default]
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: None,
            port: 9292,
            database: Database::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let path = std::env::var(SETTINGS_PATH_ENV).unwrap_or_else(|_| "settings".to_string());

        Self::load(
            Config::builder()
                .add_source(File::with_name(&path).required(false))
                .add_source(
                    Environment::with_prefix(ENV_PREFIX)
                        .prefix_separator("__")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn load(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
