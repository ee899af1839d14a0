use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use strum::{AsRefStr, Display, EnumString};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub mealie: MealieConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MealieConfig {
    /// Instance URL, e.g. http://mealie.local:9000
    #[serde(default)]
    pub url: String,
    /// API token created at /user/profile/api-tokens
    #[serde(default)]
    pub api_token: String,
    /// Defaults to the user's default group when unset
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MealieConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_token: String::new(),
            group_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl MealieConfig {
    /// Instance URL suitable for building recipe links, if configured.
    pub fn base_url(&self) -> Option<&str> {
        let url = self.url.trim().trim_end_matches('/');
        (!url.is_empty()).then_some(url)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(
    Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CardSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    /// Number of days from today to display
    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,
    #[serde(default)]
    pub card_size: CardSize,
    #[serde(default)]
    pub fullscreen: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            days_ahead: default_days_ahead(),
            card_size: CardSize::default(),
            fullscreen: false,
        }
    }
}

fn default_days_ahead() -> u32 {
    mealweek_mealplan::DEFAULT_DAYS_AHEAD
}

#[derive(
    Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (MEALWEEK__MEALIE__URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("mealie.url", "")?
            .set_default("mealie.api_token", "")?
            .set_default("mealie.timeout_secs", default_timeout_secs() as i64)?
            .set_default("display.days_ahead", i64::from(default_days_ahead()))?
            .set_default("display.card_size", "medium")?
            .set_default("display.fullscreen", false)?
            .set_default("observability.log_level", default_log_level())?
            .set_default("observability.format", "pretty")?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // The file is optional
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MEALWEEK")
                .separator("__")
                .try_parsing(true),
        );

        // Also support plain variables without prefix
        if let Ok(url) = env::var("MEALIE_URL") {
            builder = builder.set_override("mealie.url", url)?;
        }
        if let Ok(token) = env::var("MEALIE_API_TOKEN") {
            builder = builder.set_override("mealie.api_token", token)?;
        }
        if let Ok(group_id) = env::var("MEALIE_GROUP_ID") {
            builder = builder.set_override("mealie.group_id", group_id)?;
        }

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.normalize();
        Ok(config)
    }

    fn normalize(&mut self) {
        self.mealie.url = self.mealie.url.trim().trim_end_matches('/').to_string();
        self.mealie.api_token = self.mealie.api_token.trim().to_string();
        self.mealie.group_id = self
            .mealie
            .group_id
            .take()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.mealie.url.is_empty() {
            if !(self.mealie.url.starts_with("http://") || self.mealie.url.starts_with("https://"))
            {
                return Err(format!(
                    "Invalid Mealie URL: {} (must start with http:// or https://)",
                    self.mealie.url
                ));
            }
            if let Err(e) = url::Url::parse(&self.mealie.url) {
                return Err(format!("Invalid Mealie URL: {}: {}", self.mealie.url, e));
            }
        }
        if !(1..=30).contains(&self.display.days_ahead) {
            return Err(format!(
                "display.days_ahead must be between 1 and 30, got {}",
                self.display.days_ahead
            ));
        }
        if self.mealie.timeout_secs == 0 {
            return Err("mealie.timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}
