//! Tests for layered settings loading

use std::env;
use std::path::PathBuf;

use tempfile::TempDir;

use synctrack::application::ApplicationError;
use synctrack::config::Settings;
use synctrack::domain::Domain;

#[test]
fn given_local_config_when_loading_then_overrides_only_specified_fields() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("synctrack.toml");
    std::fs::write(
        &config,
        "data_file = \"/srv/rollout/sites.toml\"\ntransport_domain = \"OTN\"\n",
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&config)).unwrap();

    // Assert
    assert_eq!(settings.data_file, PathBuf::from("/srv/rollout/sites.toml"));
    assert_eq!(settings.transport_domain, "OTN");
    assert_eq!(settings.policy().transport, Domain::Other("OTN".into()));
}

#[test]
fn given_home_relative_data_file_when_loading_then_path_is_expanded() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("synctrack.toml");
    std::fs::write(&config, "data_file = \"~/sheets/sites.toml\"\n").unwrap();

    let settings = Settings::load(Some(&config)).unwrap();

    assert!(!settings.data_file.starts_with("~"));
    assert!(settings.data_file.ends_with("sheets/sites.toml"));
}

#[test]
fn given_home_relative_override_when_replacing_data_file_then_path_is_expanded() {
    let home = env::var("HOME").unwrap();

    let settings = Settings::default().with_data_file("~/sheets/sites.toml");

    assert_eq!(
        settings.data_file,
        PathBuf::from(home).join("sheets/sites.toml")
    );
}

#[test]
fn given_missing_explicit_config_when_loading_then_config_error() {
    let temp = TempDir::new().unwrap();

    let result = Settings::load(Some(&temp.path().join("absent.toml")));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_malformed_config_when_loading_then_config_error_names_the_file() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("broken.toml");
    std::fs::write(&config, "data_file = [\n").unwrap();

    let result = Settings::load(Some(&config));

    match result {
        Err(ApplicationError::Config { message }) => assert!(message.contains("broken.toml")),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn given_env_override_when_loading_then_env_wins_over_file() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("synctrack.toml");
    std::fs::write(&config, "tracked_domain = \"IPMPLS\"\n").unwrap();
    env::set_var("SYNCTRACK_TRACKED_DOMAIN", "MPLS-TP");

    let settings = Settings::load(Some(&config));
    env::remove_var("SYNCTRACK_TRACKED_DOMAIN");

    let settings = settings.unwrap();
    assert_eq!(settings.tracked_domain, "MPLS-TP");
    assert_eq!(settings.policy().tracked, Domain::Other("MPLS-TP".into()));
}

#[test]
fn given_settings_when_rendering_toml_then_round_trips() {
    let settings = Settings::default();

    let rendered = settings.to_toml().unwrap();

    assert!(rendered.contains("tracked_domain = \"IPMPLS\""));
    assert_eq!(toml::from_str::<Settings>(&rendered).unwrap(), settings);
}
