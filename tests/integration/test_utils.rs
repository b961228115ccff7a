//! Shared test utilities for integration tests
//!
//! Serializes environment mutation (XDG and INFINIPROMPT__ variables) so that
//! tests running in parallel see a consistent configuration environment.

use infiniprompt::generator::{GenerateRequest, GeneratedPrompt};
use infiniprompt::{generate, Template};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment variable state to restore after test
struct EnvState {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvState {
    fn capture(keys: &[&'static str]) -> Self {
        Self {
            saved: keys.iter().map(|k| (*k, std::env::var(k).ok())).collect(),
        }
    }

    fn restore(self) {
        for (key, value) in self.saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

/// Run `f` with XDG_CONFIG_HOME pointing at `test_dir` and the given extra
/// environment variables set; everything is restored afterwards.
pub fn with_config_env<F, R>(test_dir: &TempDir, vars: &[(&'static str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let mut keys = vec!["XDG_CONFIG_HOME", "INFINIPROMPT_ENV"];
    keys.extend(vars.iter().map(|(k, _)| *k));
    let env_state = EnvState::capture(&keys);

    std::env::set_var("XDG_CONFIG_HOME", test_dir.path());
    std::env::remove_var("INFINIPROMPT_ENV");
    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let result = f();
    env_state.restore();
    result
}

/// Write a template JSON document into `dir`.
pub fn write_template(dir: &Path, name: &str, json: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, json).unwrap();
    path
}

/// The single successful output of a one-prompt batch.
pub fn render_one(template: &Template, seed: u64) -> GeneratedPrompt {
    let batch = generate(template, &GenerateRequest::new().with_seed(seed)).unwrap();
    assert_eq!(batch.len(), 1);
    match batch.results.into_iter().next().unwrap() {
        Ok(prompt) => prompt,
        Err(e) => panic!("generation failed: {}", e),
    }
}
