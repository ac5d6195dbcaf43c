use super::*;

use std::{
    collections::HashMap,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_path(name: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    env::temp_dir().join(format!("portal_settings_{name}_{suffix}.toml"))
}

#[test]
fn defaults_carry_the_three_known_credentials() {
    let settings = Settings::default();
    assert_eq!(settings.credentials.len(), 3);
    assert_eq!(settings.credentials[0], Credential::new("admin", "1234", "010-0000-0000"));
    assert_eq!(settings.notification_ttl(), Duration::from_millis(4000));
    assert_eq!(
        settings.login_delay_range(),
        Duration::from_millis(1500)..Duration::from_millis(2500)
    );
    assert_eq!(settings.pages.main_menu, "mainmenu.html");
    assert!(settings.validate().is_ok());
}

#[test]
fn partial_file_keeps_remaining_defaults() {
    let settings = parse_settings(
        r#"
notification_ttl_ms = 2500

[[credentials]]
username = "guest"
studentNumber = "5555"
phoneNumber = "010-5555-5555"

[pages]
main_menu = "home.html"
"#,
    )
    .expect("parse");

    assert_eq!(settings.notification_ttl_ms, 2500);
    assert_eq!(settings.credentials, vec![Credential::new("guest", "5555", "010-5555-5555")]);
    assert_eq!(settings.pages.main_menu, "home.html");
    assert_eq!(settings.pages.login, "login.html");
    assert_eq!(settings.initial_gauge, 36.5);
}

#[test]
fn env_overrides_replace_file_values() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("APP__LOGIN_DELAY_MIN_MS", "10"),
        ("APP__LOGIN_DELAY_MAX_MS", "20"),
        ("APP__INITIAL_GAUGE", "50.5"),
        ("APP__LOGIN_PAGE", "signin.html"),
    ]);
    let mut settings = Settings::default();

    apply_env_overrides(&mut settings, |key| vars.get(key).map(|v| v.to_string()))
        .expect("overrides");

    assert_eq!(settings.login_delay_min_ms, 10);
    assert_eq!(settings.login_delay_max_ms, 20);
    assert_eq!(settings.initial_gauge, 50.5);
    assert_eq!(settings.pages.login, "signin.html");
}

#[test]
fn malformed_override_is_rejected() {
    let mut settings = Settings::default();
    let err = apply_env_overrides(&mut settings, |key| {
        (key == "APP__NOTIFICATION_TTL_MS").then(|| "soon".to_string())
    })
    .expect_err("malformed");

    assert!(matches!(
        err,
        SettingsError::InvalidOverride { ref key, .. } if key == "APP__NOTIFICATION_TTL_MS"
    ));
    assert_eq!(settings.notification_ttl_ms, 4000);
}

#[test]
fn validation_rejects_unusable_values() {
    let mut settings = Settings {
        login_delay_min_ms: 2000,
        login_delay_max_ms: 2000,
        ..Settings::default()
    };
    assert!(matches!(settings.validate(), Err(SettingsError::EmptyDelayRange { .. })));

    settings.login_delay_max_ms = 3000;
    settings.notification_ttl_ms = 0;
    assert!(matches!(settings.validate(), Err(SettingsError::ZeroNotificationTtl)));

    settings.notification_ttl_ms = 4000;
    settings.credentials.clear();
    assert!(matches!(settings.validate(), Err(SettingsError::NoCredentials)));
}

#[test]
fn non_finite_initial_gauge_is_rejected() {
    for gauge in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let settings = Settings {
            initial_gauge: gauge,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::NonFiniteInitialGauge(_))
        ));
    }
}

#[test]
fn nan_gauge_override_fails_validation() {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, |key| {
        (key == "APP__INITIAL_GAUGE").then(|| "NaN".to_string())
    })
    .expect("NaN parses as f64");

    assert!(matches!(
        settings.validate(),
        Err(SettingsError::NonFiniteInitialGauge(_))
    ));
}

#[test]
fn drift_magnitude_must_be_finite_and_non_negative() {
    for magnitude in [f64::NAN, f64::INFINITY, -0.1] {
        let settings = Settings {
            drift_magnitude: magnitude,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidDriftMagnitude(_))
        ));
    }

    let still = Settings {
        drift_magnitude: 0.0,
        ..Settings::default()
    };
    assert!(still.validate().is_ok());
}

#[test]
fn zero_drift_interval_is_rejected() {
    let settings = Settings {
        drift_interval_secs: 0,
        ..Settings::default()
    };
    assert!(matches!(settings.validate(), Err(SettingsError::ZeroDriftInterval)));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let path = temp_path("missing");
    let settings = load_settings_from(&path).expect("defaults");
    assert_eq!(settings.credentials, Settings::default().credentials);
}

#[test]
fn malformed_file_is_an_error() {
    let path = temp_path("malformed");
    fs::write(&path, "notification_ttl_ms = \"later\"").expect("write");

    let err = load_settings_from(&path).expect_err("parse failure");
    assert!(matches!(err, SettingsError::Parse { .. }));

    fs::remove_file(path).expect("cleanup");
}
