//! Configuration file handling on disk
use router_switch_scraper_lib::infrastructure::{AppConfig, ConfigManager};
use tempfile::tempdir;

#[tokio::test]
async fn first_load_writes_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let manager = ConfigManager::with_path(&path);

    let config = manager.load_config().await.unwrap();

    assert_eq!(config, AppConfig::default());
    assert!(path.exists());
    let saved: AppConfig = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved, config);
}

#[tokio::test]
async fn saved_values_survive_reload() {
    let dir = tempdir().unwrap();
    let manager = ConfigManager::with_path(dir.path().join("config.json"));

    let mut config = AppConfig::default();
    config.scraper.max_products_per_category = 25;
    config.http.requests_per_second = 2;
    manager.save_config(&config).await.unwrap();

    let loaded = manager.load_config().await.unwrap();
    assert_eq!(loaded.scraper.max_products_per_category, 25);
    assert_eq!(loaded.http.requests_per_second, 2);
}

#[tokio::test]
async fn partial_file_is_completed_with_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"output": {"directory": "results"}}"#).unwrap();

    let config = ConfigManager::with_path(&path).load_config().await.unwrap();
    assert_eq!(config.output.directory, std::path::PathBuf::from("results"));
    assert_eq!(config.scraper, AppConfig::default().scraper);
}

#[tokio::test]
async fn corrupted_file_is_backed_up_and_reset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let config = ConfigManager::with_path(&path).load_config().await.unwrap();

    assert_eq!(config, AppConfig::default());
    let backup = dir.path().join("config.json.corrupted");
    assert_eq!(std::fs::read_to_string(backup).unwrap(), "{ not json");
    let rewritten: AppConfig = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(rewritten, AppConfig::default());
}

#[tokio::test]
async fn invalid_values_are_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"http": {"max_retries": 0}}"#).unwrap();

    let err = ConfigManager::with_path(&path).load_config().await.unwrap_err();
    assert!(format!("{err:#}").contains("max_retries"));
}

#[tokio::test]
async fn reset_overwrites_custom_values() {
    let dir = tempdir().unwrap();
    let manager = ConfigManager::with_path(dir.path().join("config.json"));
    let mut config = AppConfig::default();
    config.scraper.strict_validation = true;
    manager.save_config(&config).await.unwrap();

    let reset = manager.reset_to_defaults().await.unwrap();
    assert!(!reset.scraper.strict_validation);
    assert_eq!(manager.load_config().await.unwrap(), AppConfig::default());
}

#[test]
fn default_budgets_are_fifty_per_category() {
    let scraper = AppConfig::default().scraper;
    assert_eq!(scraper.max_products_per_category, 50);
    assert_eq!(scraper.combined_products_per_category, 50);
    assert!(!scraper.strict_validation);
}
