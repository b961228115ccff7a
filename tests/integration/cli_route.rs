//! CLI route table: commands executed through RunContext

use super::test_utils::write_template;
use infiniprompt::cli::{Cli, Commands, RunContext};
use infiniprompt::config::PromptConfig;
use infiniprompt::ApiError;
use clap::Parser;
use tempfile::TempDir;

const STORY: &str = r#"{
    "entrypoint": "{$:hero} meets {@:friend} and {@:friend}.",
    "data": {
        "hero": ["Ann", "Bo"],
        "friend": ["Cy", "Di", "Ed"]
    }
}"#;

fn context(workspace: &TempDir) -> RunContext {
    RunContext::with_config(workspace.path().to_path_buf(), PromptConfig::default()).unwrap()
}

fn command(args: &[&str]) -> Commands {
    let mut argv = vec!["infiniprompt"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().command
}

#[test]
fn generate_text_is_reproducible() {
    let workspace = TempDir::new().unwrap();
    write_template(workspace.path(), "story.json", STORY);
    let ctx = context(&workspace);

    let cmd = command(&["generate", "story.json", "--seed", "11"]);
    let first = ctx.execute(&cmd).unwrap();
    let second = ctx.execute(&cmd).unwrap();
    assert_eq!(first, second);
    assert!(first.ends_with('.'));
    assert!(first.contains(" meets "));
}

#[test]
fn generate_json_reports_every_output() {
    let workspace = TempDir::new().unwrap();
    write_template(workspace.path(), "story.json", STORY);
    let ctx = context(&workspace);

    let out = ctx
        .execute(&command(&[
            "generate",
            "story.json",
            "--seed",
            "4",
            "--count",
            "2",
            "--continues",
            "1",
            "--param",
            "tone=dry",
            "--format",
            "json",
        ]))
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["seed"], 4);
    let results = value["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results[1]["pass_number"], 1);
    assert_eq!(results[1]["parameters"]["tone"], "dry");
    assert!(results[0]["statics"]["hero"].is_string());
}

#[test]
fn validate_reports_summary_or_error() {
    let workspace = TempDir::new().unwrap();
    write_template(workspace.path(), "story.json", STORY);
    write_template(
        workspace.path(),
        "broken.json",
        r#"{"entrypoint": "{unclosed", "data": {}}"#,
    );
    let ctx = context(&workspace);

    let out = ctx.execute(&command(&["validate", "story.json"])).unwrap();
    assert!(out.contains("Template is valid"));
    assert!(out.contains("Data keys: 2 (2 lists)"));

    let err = ctx.execute(&command(&["validate", "broken.json"])).unwrap_err();
    assert!(matches!(err, ApiError::Prompt(_)));
}

#[test]
fn missing_template_is_an_io_error() {
    let workspace = TempDir::new().unwrap();
    let ctx = context(&workspace);
    let err = ctx
        .execute(&command(&["generate", "absent.json"]))
        .unwrap_err();
    assert!(matches!(err, ApiError::Io { .. }));
}

#[test]
fn unknown_format_is_rejected() {
    let workspace = TempDir::new().unwrap();
    let ctx = context(&workspace);
    let err = ctx
        .execute(&command(&["operators", "--format", "yaml"]))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[test]
fn operators_table_lists_aliases() {
    let workspace = TempDir::new().unwrap();
    let ctx = context(&workspace);
    let out = ctx.execute(&command(&["operators"])).unwrap();
    assert!(out.contains("one_of"));
    assert!(out.contains("pick_one"));
}

#[test]
fn invalid_configuration_is_refused() {
    let workspace = TempDir::new().unwrap();
    let mut config = PromptConfig::default();
    config.generator.max_depth = 0;
    let err = RunContext::with_config(workspace.path().to_path_buf(), config).unwrap_err();
    assert!(matches!(err, ApiError::ConfigError(_)));
}
