//! Integration tests for layered configuration loading

use super::test_utils::with_config_env;
use infiniprompt::config::{global_config_path, ConfigLoader, PromptConfig};
use tempfile::TempDir;

fn write(path: &std::path::Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

#[test]
fn test_defaults_without_any_files() {
    let config_home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let config = with_config_env(&config_home, &[], || ConfigLoader::load(workspace.path()))
        .unwrap();
    assert_eq!(config, PromptConfig::default());
}

#[test]
fn test_global_file_is_read_from_xdg_config_home() {
    let config_home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    write(
        &config_home.path().join("infiniprompt/config.toml"),
        "[generator]\nmax_prompts = 12\n",
    );

    let config = with_config_env(&config_home, &[], || {
        assert_eq!(
            global_config_path().unwrap(),
            config_home.path().join("infiniprompt/config.toml")
        );
        ConfigLoader::load(workspace.path())
    })
    .unwrap();
    assert_eq!(config.generator.max_prompts, 12);
    assert_eq!(config.generator.max_continues, 10);
}

#[test]
fn test_workspace_overrides_global() {
    let config_home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    write(
        &config_home.path().join("infiniprompt/config.toml"),
        "[generator]\nmax_prompts = 12\nmax_repeat = 8\n",
    );
    write(
        &workspace.path().join("config/config.toml"),
        "[generator]\nmax_prompts = 30\n",
    );

    let config = with_config_env(&config_home, &[], || ConfigLoader::load(workspace.path()))
        .unwrap();
    assert_eq!(config.generator.max_prompts, 30);
    assert_eq!(config.generator.max_repeat, 8);
}

#[test]
fn test_environment_specific_workspace_file() {
    let config_home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    write(
        &workspace.path().join("config/config.toml"),
        "[logging]\nlevel = \"info\"\n",
    );
    write(
        &workspace.path().join("config/staging.toml"),
        "[logging]\nlevel = \"debug\"\n",
    );

    let config = with_config_env(&config_home, &[("INFINIPROMPT_ENV", "staging")], || {
        ConfigLoader::load(workspace.path())
    })
    .unwrap();
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_environment_variables_override_files() {
    let config_home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    write(
        &workspace.path().join("config/config.toml"),
        "[generator]\nmax_depth = 16\ncleanup = true\n",
    );

    let config = with_config_env(
        &config_home,
        &[
            ("INFINIPROMPT__GENERATOR__MAX_DEPTH", "9"),
            ("INFINIPROMPT__GENERATOR__CLEANUP", "false"),
        ],
        || ConfigLoader::load(workspace.path()),
    )
    .unwrap();
    assert_eq!(config.generator.max_depth, 9);
    assert!(!config.generator.cleanup);
}

#[test]
fn test_invalid_values_fail_validation() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("bad.toml");
    write(&file, "[generator]\nmax_prompts = 0\n");
    let config = ConfigLoader::load_from_file(&file).unwrap();
    assert!(config.validate().is_err());
}
