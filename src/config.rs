use std::ops::RangeInclusive;
use std::path::PathBuf;

use actix_web::cookie::Key;
use log::warn;

const MIN_SECRET_LEN: usize = 32;
const BCRYPT_COSTS: RangeInclusive<u32> = 4..=31;
// one year of idle session, ten years of "remember me"
const SESSION_MINUTES: RangeInclusive<i64> = 1..=525_600;
const REMEMBER_DAYS: RangeInclusive<i64> = 1..=3_650;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("SECRET_KEY must be at least 32 bytes long")]
    SecretTooShort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// One global task list in a JSON file.
    SingleUser,
    /// Users, projects and per-project task lists in SQLite.
    MultiUser,
}

/// Settings read once at start-up and shared with every handler.
#[derive(Debug, Clone)]
pub struct Config {
    pub variant: Variant,
    pub bind_address: String,
    pub static_dir: PathBuf,
    pub tasks_file: PathBuf,
    pub database_url: String,
    pub chart_prefix: String,
    pub image_scale: u32,
    pub secret_key: Option<String>,
    pub bcrypt_cost: u32,
    pub session_minutes: i64,
    pub remember_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            variant: Variant::SingleUser,
            bind_address: "0.0.0.0:5000".to_string(),
            static_dir: PathBuf::from("static"),
            tasks_file: PathBuf::from("static").join("tasks.json"),
            database_url: "sqlite://gantt.db?mode=rwc".to_string(),
            chart_prefix: "gantt_chart".to_string(),
            image_scale: 2,
            secret_key: None,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            session_minutes: 30,
            remember_days: 10,
        }
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

fn parse_within<T>(key: &'static str, value: String, range: RangeInclusive<T>) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd,
{
    let parsed: T = parse(key, value.clone())?;
    if !range.contains(&parsed) {
        return Err(ConfigError::Invalid { key, value });
    }
    Ok(parsed)
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(value) = lookup("GANTT_VARIANT") {
            config.variant = match value.trim().to_ascii_lowercase().as_str() {
                "single" => Variant::SingleUser,
                "multi" => Variant::MultiUser,
                _ => return Err(ConfigError::Invalid { key: "GANTT_VARIANT", value }),
            };
        }
        if let Some(value) = lookup("GANTT_BIND") {
            config.bind_address = value;
        }
        if let Some(value) = lookup("GANTT_STATIC_DIR") {
            config.static_dir = PathBuf::from(value);
        }
        config.tasks_file = match lookup("GANTT_TASKS_FILE") {
            Some(value) => PathBuf::from(value),
            None => config.static_dir.join("tasks.json"),
        };
        if let Some(value) = lookup("DATABASE_URL") {
            config.database_url = value;
        }
        if let Some(value) = lookup("GANTT_CHART_PREFIX") {
            if value.trim().is_empty() || value.contains(['/', '\\']) {
                return Err(ConfigError::Invalid { key: "GANTT_CHART_PREFIX", value });
            }
            config.chart_prefix = value;
        }
        if let Some(value) = lookup("GANTT_IMAGE_SCALE") {
            config.image_scale = parse_within("GANTT_IMAGE_SCALE", value, 1..=4)?;
        }
        if let Some(value) = lookup("SECRET_KEY") {
            if value.len() < MIN_SECRET_LEN {
                return Err(ConfigError::SecretTooShort);
            }
            config.secret_key = Some(value);
        }
        if let Some(value) = lookup("GANTT_BCRYPT_COST") {
            config.bcrypt_cost = parse_within("GANTT_BCRYPT_COST", value, BCRYPT_COSTS)?;
        }
        if let Some(value) = lookup("GANTT_SESSION_MINUTES") {
            config.session_minutes = parse_within("GANTT_SESSION_MINUTES", value, SESSION_MINUTES)?;
        }
        if let Some(value) = lookup("GANTT_REMEMBER_DAYS") {
            config.remember_days = parse_within("GANTT_REMEMBER_DAYS", value, REMEMBER_DAYS)?;
        }

        Ok(config)
    }

    /// Key used to sign the session and flash cookies.
    pub fn cookie_key(&self) -> Key {
        match &self.secret_key {
            Some(secret) => Key::derive_from(secret.as_bytes()),
            None => {
                warn!("SECRET_KEY is not set; using a random key, sessions end when the process restarts");
                Key::generate()
            }
        }
    }
}
