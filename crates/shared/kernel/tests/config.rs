use keyhold_kernel::config::load_config;
use keyhold_kernel::domain::config::AppConfig;
use std::io::Write;

#[test]
fn loads_layered_config_from_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("keyhold.toml");
    let mut file = std::fs::File::create(&path).expect("create config file");
    writeln!(
        file,
        "[database]\nurl = \"ws://localhost:8000\"\nnamespace = \"test\"\ndatabase = \"suite\""
    )
    .expect("write config file");

    let config: AppConfig = load_config(Some(&path)).expect("load config");

    assert_eq!(config.database.url, "ws://localhost:8000");
    assert_eq!(config.database.namespace, "test");
    assert_eq!(config.database.database, "suite");
    // Sections absent from the file fall back to defaults.
    assert!(config.logger.console);
}

#[test]
fn missing_file_is_an_error() {
    let result: Result<AppConfig, _> = load_config(Some("does/not/exist"));
    assert!(result.is_err());
}
