use super::*;
use std::collections::HashMap;

#[test]
fn test_defaults_match_reference_bot() {
    let cfg = Config::default();
    assert_eq!(cfg.provider.openai.model, "gpt-4");
    assert!((cfg.provider.openai.temperature - 0.7).abs() < f32::EPSILON);
    assert!(cfg.provider.openai.system_prompt.is_empty());
    assert_eq!(cfg.memory.max_turns, 10);
    assert_eq!(cfg.translation.pivot_language, "en");
    assert!(cfg.channel.telegram.enabled);
    assert!(cfg.channel.telegram.welcome_message.starts_with("Welcome"));
}

#[test]
fn test_empty_toml_uses_defaults() {
    let cfg = from_toml_str("").unwrap();
    assert_eq!(cfg.provider.openai.base_url, "https://api.openai.com/v1");
    assert_eq!(cfg.translation.base_url, "https://translate.googleapis.com");
}

#[test]
fn test_partial_toml_keeps_other_defaults() {
    let toml_str = r#"
        [provider.openai]
        model = "gpt-4o"
        temperature = 0.2

        [memory]
        max_turns = 4
    "#;
    let cfg = from_toml_str(toml_str).unwrap();
    assert_eq!(cfg.provider.openai.model, "gpt-4o");
    assert!((cfg.provider.openai.temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(cfg.provider.openai.base_url, "https://api.openai.com/v1");
    assert_eq!(cfg.memory.max_turns, 4);
}

#[test]
fn test_invalid_toml_is_config_error() {
    let err = from_toml_str("[memory\nmax_turns = ").unwrap_err();
    assert!(matches!(err, ParleyError::Config(_)));
}

#[test]
fn test_env_overrides_credentials() {
    let mut cfg = from_toml_str(
        r#"
        [channel.telegram]
        bot_token = "from-file"
    "#,
    )
    .unwrap();
    let env: HashMap<&str, &str> = [
        (TELEGRAM_TOKEN_ENV, "from-env"),
        (OPENAI_KEY_ENV, "sk-env"),
    ]
    .into_iter()
    .collect();
    cfg.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));
    assert_eq!(cfg.channel.telegram.bot_token, "from-env");
    assert_eq!(cfg.provider.openai.api_key, "sk-env");
}

#[test]
fn test_empty_env_value_keeps_file_value() {
    let mut cfg = Config::default();
    cfg.provider.openai.api_key = "sk-file".into();
    cfg.apply_env_overrides(|_| Some(String::new()));
    assert_eq!(cfg.provider.openai.api_key, "sk-file");
}

#[test]
fn test_validate_rejects_zero_turns() {
    let mut cfg = Config::default();
    cfg.memory.max_turns = 0;
    assert!(matches!(cfg.validate(), Err(ParleyError::Config(_))));
}

#[test]
fn test_validate_rejects_out_of_range_temperature() {
    let mut cfg = Config::default();
    cfg.provider.openai.temperature = 3.5;
    assert!(cfg.validate().is_err());
    cfg.provider.openai.temperature = 0.7;
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let cfg = load("/nonexistent/__parley_test__/config.toml").unwrap();
    assert_eq!(cfg.memory.max_turns, 10);
}

#[test]
fn test_load_reads_file() {
    let tmp = std::env::temp_dir().join("__parley_test_load_config__");
    let _ = std::fs::remove_dir_all(&tmp);
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("config.toml");
    std::fs::write(&path, "[memory]\nmax_turns = 6\n").unwrap();

    let cfg = load(path.to_str().unwrap()).unwrap();
    assert_eq!(cfg.memory.max_turns, 6);

    let _ = std::fs::remove_dir_all(&tmp);
}

#[test]
fn test_load_unreadable_path_is_config_error() {
    let tmp = std::env::temp_dir().join("__parley_test_load_dir__");
    std::fs::create_dir_all(&tmp).unwrap();

    // A directory exists but cannot be read as a file.
    let err = load(tmp.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, ParleyError::Config(_)));
    assert!(err.to_string().contains("failed to read"));

    let _ = std::fs::remove_dir_all(&tmp);
}
