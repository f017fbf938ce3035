//! Configuration management tests
//!
//! Tests for ConfigManager and Config structures.

use docchat_core::config::{
    normalize_base_address, Config, ConfigManager, CoordinatorConfig, GeneralConfig,
    ServiceConfig, BACKEND_URL_ENV,
};
use docchat_core::Error;
use std::fs;
use tempfile::TempDir;

/// Create a temp directory for config tests
fn setup_config_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

mod config_structure_tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.service.base_address, "http://localhost:5000");
        assert!(config.service.request_timeout_secs.is_none());
        assert!(config.coordinator.exclusive);
        assert_eq!(config.general.log_level, "warn");
    }

    #[test]
    fn test_section_defaults() {
        assert!(CoordinatorConfig::default().exclusive);
        assert_eq!(GeneralConfig::default().log_level, "warn");
        assert!(ServiceConfig::default().user_agent.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_with_base_address() {
        let config = Config::default().with_base_address("http://docs.internal:8000");
        assert_eq!(config.service.base_address, "http://docs.internal:8000");
    }

    #[test]
    fn test_validate_normalizes_address() {
        let mut config = Config::default().with_base_address("  https://docs.example.com/ ");
        config.validate().unwrap();
        assert_eq!(config.service.base_address, "https://docs.example.com");
    }

    #[test]
    fn test_validate_rejects_bad_address() {
        let mut config = Config::default().with_base_address("localhost:5000");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got {:?}", err);

        assert!(normalize_base_address("file:///tmp/x").is_err());
    }
}

mod config_serialization_tests {
    use super::*;

    #[test]
    fn test_serialize_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config);

        assert!(toml_str.is_ok(), "Serialization failed: {:?}", toml_str.err());
        let toml_content = toml_str.unwrap();

        assert!(toml_content.contains("[service]"));
        assert!(toml_content.contains("base_address"));
        assert!(toml_content.contains("exclusive = true"));
        // Unset timeout is omitted
        assert!(!toml_content.contains("request_timeout_secs"));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: Config = toml::from_str(
            r#"
            [service]
            base_address = "http://10.0.0.5:5000"
            request_timeout_secs = 45
            "#,
        )
        .unwrap();

        assert_eq!(config.service.base_address, "http://10.0.0.5:5000");
        assert_eq!(config.service.request_timeout_secs, Some(45));
        assert!(config.coordinator.exclusive);
        assert!(config.service.user_agent.starts_with("docchat/"));
    }
}

mod config_manager_tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = setup_config_dir();
        let manager = ConfigManager::with_path(dir.path().join("config.toml")).unwrap();

        assert_eq!(manager.config().service.base_address, "http://localhost:5000");
        assert_eq!(manager.config_path(), dir.path().join("config.toml"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = setup_config_dir();
        let path = dir.path().join("nested").join("config.toml");

        let mut manager = ConfigManager::with_path(path.clone()).unwrap();
        manager.set_base_address("http://docs.lan:9000");
        manager.config_mut().coordinator.exclusive = false;
        manager.save().unwrap();

        assert!(path.exists());
        let reloaded = ConfigManager::with_path(path).unwrap();
        assert_eq!(reloaded.config().service.base_address, "http://docs.lan:9000");
        assert!(!reloaded.config().coordinator.exclusive);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = setup_config_dir();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[service\nbase_address = ").unwrap();

        let result = ConfigManager::with_path(path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    // Environment is process-wide, so every check touching it lives in this one test
    #[test]
    fn test_resolve_with_environment_override() {
        let dir = setup_config_dir();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[service]\nbase_address = \"http://from-file:5000/\"\n").unwrap();
        let manager = ConfigManager::with_path(path).unwrap();

        unsafe { std::env::remove_var(BACKEND_URL_ENV) };
        assert_eq!(manager.resolve().unwrap().service.base_address, "http://from-file:5000");

        unsafe { std::env::set_var(BACKEND_URL_ENV, "http://from-env:7000") };
        assert_eq!(manager.resolve().unwrap().service.base_address, "http://from-env:7000");

        unsafe { std::env::set_var(BACKEND_URL_ENV, "   ") };
        assert_eq!(manager.resolve().unwrap().service.base_address, "http://from-file:5000");

        unsafe { std::env::set_var(BACKEND_URL_ENV, "not a url") };
        assert!(manager.resolve().is_err());

        unsafe { std::env::remove_var(BACKEND_URL_ENV) };
    }
}
