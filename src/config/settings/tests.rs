use super::*;
use tempfile::TempDir;

#[test]
fn default_config_is_valid() {
    let config = Config {
        ollama: OllamaConfig::default(),
        store: StoreConfig::default(),
        scrape: ScrapeConfig::default(),
        base_dir: PathBuf::from("/tmp/apidex-test"),
    };

    assert!(config.validate().is_ok());
    assert_eq!(config.ollama.port, 11434);
    assert_eq!(config.ollama.embedding_dimension, 768);
    assert_eq!(config.store.table, "api_reference");
}

#[test]
fn load_without_file_returns_defaults() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let config = Config::load(temp_dir.path()).expect("should load defaults");

    assert_eq!(config.ollama, OllamaConfig::default());
    assert_eq!(config.base_dir, temp_dir.path());
}

#[test]
fn save_and_load_round_trip() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config = Config {
        ollama: OllamaConfig {
            model: "all-minilm".to_string(),
            batch_size: 32,
            ..OllamaConfig::default()
        },
        store: StoreConfig {
            table: "sklearn-api".to_string(),
        },
        scrape: ScrapeConfig::default(),
        base_dir: temp_dir.path().to_path_buf(),
    };

    config.save().expect("should save config");
    let loaded = Config::load(temp_dir.path()).expect("should reload config");

    assert_eq!(loaded.ollama.model, "all-minilm");
    assert_eq!(loaded.ollama.batch_size, 32);
    assert_eq!(loaded.store.table, "sklearn-api");
}

#[test]
fn invalid_port_rejected() {
    let config = OllamaConfig {
        port: 0,
        ..OllamaConfig::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidPort(0))
    ));
}

#[test]
fn invalid_protocol_rejected() {
    let config = OllamaConfig {
        protocol: "ftp".to_string(),
        ..OllamaConfig::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidProtocol(_))
    ));
}

#[test]
fn invalid_batch_size_rejected() {
    let config = OllamaConfig {
        batch_size: 0,
        ..OllamaConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidBatchSize(0))
    ));

    let config = OllamaConfig {
        batch_size: 1001,
        ..OllamaConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidBatchSize(1001))
    ));
}

#[test]
fn embedding_dimension_bounds() {
    let config = OllamaConfig {
        embedding_dimension: 63,
        ..OllamaConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidEmbeddingDimension(63))
    ));

    let config = OllamaConfig {
        embedding_dimension: 4097,
        ..OllamaConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn table_name_characters() {
    let config = StoreConfig {
        table: "api_reference-v2".to_string(),
    };
    assert!(config.validate().is_ok());

    let config = StoreConfig {
        table: String::new(),
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidTableName(_))
    ));

    let config = StoreConfig {
        table: "bad table".to_string(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn scrape_url_must_parse() {
    let config = ScrapeConfig {
        index_url: "not-a-url".to_string(),
        ..ScrapeConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidUrl(_))
    ));
}

#[test]
fn ollama_url_formats_host_and_port() {
    let config = OllamaConfig {
        host: "embed-box".to_string(),
        port: 4242,
        ..OllamaConfig::default()
    };

    let url = config.ollama_url().expect("should build URL");
    assert_eq!(url.host_str(), Some("embed-box"));
    assert_eq!(url.port(), Some(4242));
    assert_eq!(url.scheme(), "http");
}

#[test]
fn derived_paths_live_under_base_dir() {
    let config = Config {
        ollama: OllamaConfig::default(),
        store: StoreConfig::default(),
        scrape: ScrapeConfig::default(),
        base_dir: PathBuf::from("/data/apidex"),
    };

    assert_eq!(config.data_path(), PathBuf::from("/data/apidex/api-reference.json"));
    assert_eq!(config.vectors_path(), PathBuf::from("/data/apidex/vectors"));
    assert_eq!(
        config.config_file_path(),
        PathBuf::from("/data/apidex/config.toml")
    );
}
