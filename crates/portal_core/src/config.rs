use std::{env, fs, io, ops::Range, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use shared::domain::Credential;
use thiserror::Error;
use tracing::{info, warn};

pub const SETTINGS_FILE: &str = "portal.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to parse settings file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {value}")]
    InvalidOverride { key: String, value: String },
    #[error("login delay range is empty: {min_ms}..{max_ms} ms")]
    EmptyDelayRange { min_ms: u64, max_ms: u64 },
    #[error("notification ttl must be greater than zero")]
    ZeroNotificationTtl,
    #[error("credential allow-list is empty")]
    NoCredentials,
    #[error("initial gauge must be a finite number, got {0}")]
    NonFiniteInitialGauge(f64),
    #[error("drift magnitude must be a finite, non-negative number, got {0}")]
    InvalidDriftMagnitude(f64),
    #[error("drift interval must be greater than zero")]
    ZeroDriftInterval,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pages {
    pub main_menu: String,
    pub login: String,
    pub usage_history: String,
    pub points: String,
}

impl Default for Pages {
    fn default() -> Self {
        Self {
            main_menu: "mainmenu.html".into(),
            login: "login.html".into(),
            usage_history: "usage-history.html".into(),
            points: "point.html".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub credentials: Vec<Credential>,
    pub notification_ttl_ms: u64,
    pub login_delay_min_ms: u64,
    pub login_delay_max_ms: u64,
    pub login_redirect_delay_ms: u64,
    pub transition_delay_ms: u64,
    pub logout_delay_ms: u64,
    pub welcome_delay_ms: u64,
    pub drift_interval_secs: u64,
    pub drift_magnitude: f64,
    pub initial_gauge: f64,
    pub pages: Pages,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials: vec![
                Credential::new("admin", "1234", "010-0000-0000"),
                Credential::new("student", "2021001234", "010-1234-5678"),
                Credential::new("test", "2020001111", "010-9999-8888"),
            ],
            notification_ttl_ms: 4000,
            login_delay_min_ms: 1500,
            login_delay_max_ms: 2500,
            login_redirect_delay_ms: 1500,
            transition_delay_ms: 300,
            logout_delay_ms: 1500,
            welcome_delay_ms: 1000,
            drift_interval_secs: 30,
            drift_magnitude: 0.1,
            initial_gauge: 36.5,
            pages: Pages::default(),
        }
    }
}

impl Settings {
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn login_delay_range(&self) -> Range<Duration> {
        let min = Duration::from_millis(self.login_delay_min_ms);
        min..Duration::from_millis(self.login_delay_max_ms)
    }

    pub fn login_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.login_redirect_delay_ms)
    }

    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }

    pub fn logout_delay(&self) -> Duration {
        Duration::from_millis(self.logout_delay_ms)
    }

    pub fn welcome_delay(&self) -> Duration {
        Duration::from_millis(self.welcome_delay_ms)
    }

    pub fn drift_interval(&self) -> Duration {
        Duration::from_secs(self.drift_interval_secs)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.login_delay_min_ms >= self.login_delay_max_ms {
            return Err(SettingsError::EmptyDelayRange {
                min_ms: self.login_delay_min_ms,
                max_ms: self.login_delay_max_ms,
            });
        }
        if self.notification_ttl_ms == 0 {
            return Err(SettingsError::ZeroNotificationTtl);
        }
        if self.credentials.is_empty() {
            return Err(SettingsError::NoCredentials);
        }
        if !self.initial_gauge.is_finite() {
            return Err(SettingsError::NonFiniteInitialGauge(self.initial_gauge));
        }
        if !self.drift_magnitude.is_finite() || self.drift_magnitude < 0.0 {
            return Err(SettingsError::InvalidDriftMagnitude(self.drift_magnitude));
        }
        if self.drift_interval_secs == 0 {
            return Err(SettingsError::ZeroDriftInterval);
        }
        Ok(())
    }
}

/// Loads `portal.toml` from the working directory, then applies `APP__*` overrides.
pub fn load_settings() -> Result<Settings, SettingsError> {
    load_settings_from(Path::new(SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => parse_settings(&raw).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "settings file not found, using defaults");
            Settings::default()
        }
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };

    apply_env_overrides(&mut settings, |key| env::var(key).ok())?;
    settings.validate()?;
    Ok(settings)
}

pub fn parse_settings(raw: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str(raw)
}

fn apply_env_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), SettingsError> {
    override_value(&lookup, "APP__NOTIFICATION_TTL_MS", &mut settings.notification_ttl_ms)?;
    override_value(&lookup, "APP__LOGIN_DELAY_MIN_MS", &mut settings.login_delay_min_ms)?;
    override_value(&lookup, "APP__LOGIN_DELAY_MAX_MS", &mut settings.login_delay_max_ms)?;
    override_value(
        &lookup,
        "APP__LOGIN_REDIRECT_DELAY_MS",
        &mut settings.login_redirect_delay_ms,
    )?;
    override_value(&lookup, "APP__TRANSITION_DELAY_MS", &mut settings.transition_delay_ms)?;
    override_value(&lookup, "APP__LOGOUT_DELAY_MS", &mut settings.logout_delay_ms)?;
    override_value(&lookup, "APP__WELCOME_DELAY_MS", &mut settings.welcome_delay_ms)?;
    override_value(&lookup, "APP__DRIFT_INTERVAL_SECS", &mut settings.drift_interval_secs)?;
    override_value(&lookup, "APP__DRIFT_MAGNITUDE", &mut settings.drift_magnitude)?;
    override_value(&lookup, "APP__INITIAL_GAUGE", &mut settings.initial_gauge)?;

    if let Some(v) = lookup("APP__MAIN_MENU_PAGE") {
        settings.pages.main_menu = v;
    }
    if let Some(v) = lookup("APP__LOGIN_PAGE") {
        settings.pages.login = v;
    }

    Ok(())
}

fn override_value<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) -> Result<(), SettingsError> {
    let Some(raw) = lookup(key) else {
        return Ok(());
    };

    match raw.trim().parse() {
        Ok(parsed) => {
            *target = parsed;
            Ok(())
        }
        Err(_) => {
            warn!(key, value = %raw, "rejecting malformed settings override");
            Err(SettingsError::InvalidOverride {
                key: key.to_string(),
                value: raw,
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
