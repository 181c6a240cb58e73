use keyhold_domain::config::AppConfig;

#[test]
fn defaults_target_in_memory_engine() {
    let config = AppConfig::default();

    assert_eq!(config.database.url, "mem://");
    assert_eq!(config.database.namespace, "keyhold");
    assert_eq!(config.database.database, "core");
    assert!(config.database.credentials.is_none());
}

#[test]
fn logger_defaults_to_console_info() {
    let config = AppConfig::default();

    assert!(config.logger.console);
    assert_eq!(config.logger.level, "info");
    assert!(config.logger.directory.is_none());
    assert!(!config.logger.json);
}

#[test]
fn config_clones_share_inner_state() {
    let config = AppConfig::default();
    let clone = config.clone();

    assert_eq!(config.database.url, clone.database.url);
}
