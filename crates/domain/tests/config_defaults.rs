use lq_domain::config::{Config, ConfigSeverity, GeneratorKind};

#[test]
fn default_config_is_valid() {
    let config = Config::default();
    assert!(config.validate().is_empty());
}

#[test]
fn default_store_path() {
    let config = Config::default();
    assert_eq!(config.store.state_path, std::path::PathBuf::from("./data"));
}

#[test]
fn empty_toml_uses_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.followup.poll_interval_secs, 5);
    assert_eq!(config.followup.idle_threshold_secs, 10);
    assert_eq!(config.sessions.think_time_min_ms, 1_000);
    assert_eq!(config.sessions.think_time_max_ms, 3_000);
    assert_eq!(config.generator.provider, GeneratorKind::None);
    assert_eq!(config.generator.model, "gemini-pro");
    assert!(!config.observability.json_logs);
}

#[test]
fn followup_section_parses() {
    let toml_str = r#"
[followup]
poll_interval_secs = 1
idle_threshold_secs = 86400
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.followup.poll_interval_secs, 1);
    assert_eq!(config.followup.idle_threshold_secs, 86_400);
}

#[test]
fn generator_section_parses() {
    let toml_str = r#"
[generator]
provider = "gemini"
model = "gemini-2.0-flash"
api_key_env = "MY_KEY"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.generator.provider, GeneratorKind::Gemini);
    assert_eq!(config.generator.model, "gemini-2.0-flash");
    assert_eq!(config.generator.api_key_env, "MY_KEY");
    assert!(config.validate().is_empty());
}

#[test]
fn zero_poll_interval_is_an_error() {
    let toml_str = r#"
[followup]
poll_interval_secs = 0
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    assert!(issues
        .iter()
        .any(|e| e.severity == ConfigSeverity::Error && e.field == "followup.poll_interval_secs"));
}

#[test]
fn inverted_think_time_is_an_error() {
    let toml_str = r#"
[sessions]
think_time_min_ms = 500
think_time_max_ms = 100
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    assert!(issues
        .iter()
        .any(|e| e.severity == ConfigSeverity::Error && e.field == "sessions.think_time_min_ms"));
}

#[test]
fn slow_poll_is_only_a_warning() {
    let toml_str = r#"
[followup]
poll_interval_secs = 30
idle_threshold_secs = 10
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, ConfigSeverity::Warning);
}

#[test]
fn gemini_without_model_is_an_error() {
    let toml_str = r#"
[generator]
provider = "gemini"
model = ""
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    assert!(issues.iter().any(|e| e.field == "generator.model"));
}
