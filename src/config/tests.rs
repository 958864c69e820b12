use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn config_file_persistence() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let config_path = temp_dir.path().join("config.toml");

    let mut original_config = Config::default();
    original_config.index.name = "test-catalog".to_string();
    original_config.retrieval.top_k = 8;

    let toml_content = toml::to_string_pretty(&original_config)
        .expect("config should convert to toml string successfully");
    fs::write(&config_path, toml_content).expect("should write to config_path successfully");

    let loaded_config = Config::load_from(&config_path).expect("should load config successfully");

    assert_eq!(original_config, loaded_config);
}

#[test]
fn invalid_toml_handling() {
    let invalid_toml = r#"
        [index
        name = "broken"
    "#;

    let result: Result<Config, toml::de::Error> = toml::from_str(invalid_toml);
    assert!(result.is_err());
}

#[test]
fn partial_config_with_defaults() {
    let partial_toml = r#"
        [llm]
        model = "llama-3.1-8b-instant"
    "#;

    let config: Config = toml::from_str(partial_toml).expect("partial config should parse");
    assert_eq!(config.llm.model, "llama-3.1-8b-instant");
    assert_eq!(config.llm.max_tokens, LlmConfig::default().max_tokens);
    assert_eq!(config.embedding, EmbeddingConfig::default());
}

#[test]
fn error_display_messages() {
    let errors = vec![
        ConfigError::MissingCredential("GROQ_API_KEY".to_string()),
        ConfigError::InvalidUrl("invalid-url".to_string()),
        ConfigError::InvalidBatchSize(0),
        ConfigError::InvalidIndexName("Bad Name".to_string()),
        ConfigError::InvalidScoreThreshold(1.5),
    ];

    for error in errors {
        let message = format!("{error}");
        assert!(!message.is_empty());
        assert!(message.len() > 10);
    }
}
