use mod_installer_lib::services::config::{ConfigService, InstallerSettings};
use std::fs;
use tempfile::tempdir;

#[test]
fn save_settings_can_overwrite_existing_config_file() {
    let dir = tempdir().expect("temp dir should be created");
    let config_path = dir.path().join("config.json");
    let service = ConfigService::new(config_path.clone());

    let mut first = service.get_settings();
    first.meta_file_name = "mod.ini".to_string();
    service
        .save_settings(first)
        .expect("first save should create config file");

    let mut second = service.get_settings();
    second.password_attempts = 5;

    let second_save = service.save_settings(second.clone());
    assert!(
        second_save.is_ok(),
        "second save should replace existing config file without failing: {second_save:?}"
    );

    let saved_content = fs::read_to_string(&config_path).expect("config should exist");
    let saved_settings: InstallerSettings =
        serde_json::from_str(&saved_content).expect("saved config should be valid JSON");

    assert_eq!(saved_settings.password_attempts, 5);
    assert_eq!(saved_settings.meta_file_name, "mod.ini");
    assert!(!config_path.with_extension("json.tmp").exists());
}

#[test]
fn partial_config_file_keeps_defaults_for_missing_keys() {
    let dir = tempdir().expect("temp dir should be created");
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, r#"{ "mods_directory": "/games/mods" }"#).unwrap();

    let settings = ConfigService::new(config_path).get_settings();

    assert_eq!(settings.mods_directory, std::path::PathBuf::from("/games/mods"));
    assert_eq!(settings.ini_tweaks_directory, "INI Tweaks");
    assert!(settings.top_level_suffixes.contains(&"esp".to_string()));
}
