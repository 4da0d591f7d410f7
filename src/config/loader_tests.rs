//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

#[test]
fn default_config_path_contains_promptmine_config_toml() {
    if let Some(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(
            path_str.contains("promptmine") && path_str.ends_with("config.toml"),
            "Path should contain 'promptmine' and end with 'config.toml', got: {}",
            path_str
        );
    }
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = dir.path().join("config.toml");

    let toml_content = r#"
package = "@example/agent"
prompt = "Say hi"
output_dir = "out"
lightweight_marker = "mini"
tracer_command = ["claude-trace"]
keep_temp = true
"#;

    fs::write(&config_path, toml_content).expect("Failed to write test config");

    let config = load_config_file(&config_path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");

    assert_eq!(config.package, Some("@example/agent".to_string()));
    assert_eq!(config.prompt, Some("Say hi".to_string()));
    assert_eq!(config.output_dir, Some(PathBuf::from("out")));
    assert_eq!(config.lightweight_marker, Some("mini".to_string()));
    assert_eq!(config.tracer_command, Some(vec!["claude-trace".to_string()]));
    assert_eq!(config.keep_temp, Some(true));
    assert_eq!(config.patch_marker, None);
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = dir.path().join("invalid.toml");
    fs::write(&config_path, "package = [unterminated").expect("Failed to write test config");

    let result = load_config_file(&config_path);
    assert!(
        matches!(result, Err(ConfigError::ParseError { .. })),
        "Invalid TOML should be a parse error, got: {:?}",
        result
    );
}

#[test]
fn load_config_file_rejects_unknown_fields() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = dir.path().join("unknown.toml");
    fs::write(&config_path, "theme = \"monokai\"\n").expect("Failed to write test config");

    assert!(matches!(
        load_config_file(&config_path),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn merge_config_none_returns_defaults() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn merge_config_file_values_override_defaults() {
    let config_file = ConfigFile {
        package: Some("@example/agent".to_string()),
        npm_command: Some("pnpm".to_string()),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(config_file));
    assert_eq!(resolved.package, "@example/agent");
    assert_eq!(resolved.npm_command, "pnpm");
    assert_eq!(resolved.prompt, DEFAULT_PROMPT, "Unset fields keep defaults");
    assert_eq!(resolved.patch_marker, DEFAULT_GUARD_MARKER);
}

#[test]
fn defaults_match_module_constants() {
    let config = ResolvedConfig::default();
    assert_eq!(config.package, DEFAULT_PACKAGE);
    assert_eq!(config.lightweight_marker, "haiku");
    assert_eq!(config.reserved_tool_prefix, "mcp__");
    assert_eq!(config.output_dir, PathBuf::from("prompts"));
    assert!(!config.keep_temp);
    assert_eq!(config.log_file_path, None);
}

#[test]
#[serial(env)]
fn env_overrides_apply_over_file_values() {
    env::set_var("PROMPTMINE_PACKAGE", "@env/agent");
    env::set_var("PROMPTMINE_OUTPUT_DIR", "/tmp/env-out");

    let merged = merge_config(Some(ConfigFile {
        package: Some("@file/agent".to_string()),
        ..ConfigFile::default()
    }));
    let with_env = apply_env_overrides(merged);

    env::remove_var("PROMPTMINE_PACKAGE");
    env::remove_var("PROMPTMINE_OUTPUT_DIR");

    assert_eq!(with_env.package, "@env/agent");
    assert_eq!(with_env.output_dir, PathBuf::from("/tmp/env-out"));
}

#[test]
#[serial(env)]
fn env_overrides_noop_when_unset() {
    env::remove_var("PROMPTMINE_PACKAGE");
    env::remove_var("PROMPTMINE_PROMPT");
    env::remove_var("PROMPTMINE_OUTPUT_DIR");

    let config = apply_env_overrides(ResolvedConfig::default());
    assert_eq!(config, ResolvedConfig::default());
}

#[test]
#[serial(env)]
fn load_config_with_precedence_uses_env_path() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = dir.path().join("env.toml");
    fs::write(&config_path, "prompt = \"from env file\"\n").expect("Failed to write config");

    env::set_var("PROMPTMINE_CONFIG", &config_path);
    let result = load_config_with_precedence(None);
    env::remove_var("PROMPTMINE_CONFIG");

    let config = result.expect("Should load").expect("Should find file");
    assert_eq!(config.prompt, Some("from env file".to_string()));
}

#[test]
#[serial(env)]
fn explicit_path_beats_env_path() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let explicit = dir.path().join("explicit.toml");
    let from_env = dir.path().join("env.toml");
    fs::write(&explicit, "prompt = \"explicit\"\n").expect("Failed to write config");
    fs::write(&from_env, "prompt = \"env\"\n").expect("Failed to write config");

    env::set_var("PROMPTMINE_CONFIG", &from_env);
    let result = load_config_with_precedence(Some(explicit));
    env::remove_var("PROMPTMINE_CONFIG");

    let config = result.expect("Should load").expect("Should find file");
    assert_eq!(config.prompt, Some("explicit".to_string()));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let base = merge_config(Some(ConfigFile {
        prompt: Some("file prompt".to_string()),
        keep_temp: Some(false),
        ..ConfigFile::default()
    }));

    let resolved = apply_cli_overrides(
        base,
        CliOverrides {
            prompt: Some("cli prompt".to_string()),
            keep_temp: Some(true),
            ..CliOverrides::default()
        },
    );

    assert_eq!(resolved.prompt, "cli prompt");
    assert!(resolved.keep_temp);
    assert_eq!(resolved.package, DEFAULT_PACKAGE, "Untouched fields stay");
}

#[test]
fn cli_overrides_empty_is_identity() {
    let base = ResolvedConfig::default();
    assert_eq!(apply_cli_overrides(base.clone(), CliOverrides::default()), base);
}
