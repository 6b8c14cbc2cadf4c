//! Integration tests for CLI argument handling
//!
//! Runs the binary offline against a throwaway config and cache directory.

use std::path::{Path, PathBuf};
use std::process::Command;

use roihr::cache::CacheStore;
use roihr::config::{API_ROOT_ENV, CACHE_DIR_ENV, DEFAULT_API_ROOT};
use serde_json::json;
use tempfile::TempDir;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_roihr"))
        .args(args)
        .env_remove(API_ROOT_ENV)
        .env_remove(CACHE_DIR_ENV)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute roihr")
}

/// Writes a config that points the cache at `cache_dir`
fn write_config(dir: &Path, cache_dir: &Path) -> PathBuf {
    let path = dir.join("roihr.yaml");
    let contents = format!(
        "api_root: {}\ncache:\n  dir: \"{}\"\n",
        DEFAULT_API_ROOT,
        cache_dir.display()
    );
    std::fs::write(&path, contents).unwrap();
    path
}

fn setup() -> (TempDir, PathBuf, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let cache_dir = tmp.path().join("cache");
    let config = write_config(tmp.path(), &cache_dir);
    (tmp, config, cache_dir)
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("roihr"), "Help should mention roihr");
    assert!(stdout.contains("list"), "Help should mention the list command");
    assert!(stdout.contains("--offline"), "Help should mention --offline");
}

#[test]
fn test_missing_subcommand_fails() {
    let output = run_cli(&[]);
    assert!(!output.status.success());
}

#[test]
fn test_invalid_id_prints_error_and_exits() {
    let output = run_cli(&["show", "abc"]);
    assert!(!output.status.success(), "Expected non-numeric id to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid"),
        "Should print error message about invalid id: {}",
        stderr
    );
}

#[test]
fn test_missing_config_file_is_an_error() {
    let output = run_cli(&["--config", "/nonexistent/roihr.yaml", "--offline", "list"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Config file not found"), "stderr: {}", stderr);
}

#[test]
fn test_offline_list_without_cache() {
    let (_tmp, config, _cache_dir) = setup();

    let output = run_cli(&["--config", config.to_str().unwrap(), "--offline", "list"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("No cached people available."), "stdout: {}", stdout);
    assert!(stderr.contains("No internet connection"), "stderr: {}", stderr);
}

#[test]
fn test_offline_list_reads_cache_written_by_earlier_run() {
    let (_tmp, config, cache_dir) = setup();
    let store = CacheStore::on_disk(&cache_dir, 60);
    store
        .set(
            &format!("{}/People", DEFAULT_API_ROOT),
            &json!([{"id": 3, "name": "Alice Example", "department": {"id": 2, "name": "Engineering"}}]),
        )
        .unwrap();

    let output = run_cli(&["--config", config.to_str().unwrap(), "--offline", "list"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Alice Example"), "stdout: {}", stdout);
    assert!(stdout.contains("Engineering"), "stdout: {}", stdout);
}

#[test]
fn test_delete_requires_confirmation() {
    let (_tmp, config, _cache_dir) = setup();

    let output = run_cli(&["--config", config.to_str().unwrap(), "--offline", "delete", "3"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--yes"), "stderr: {}", stderr);
}

#[test]
fn test_cache_clear_empties_cache_dir() {
    let (_tmp, config, cache_dir) = setup();
    let key = format!("{}/People", DEFAULT_API_ROOT);
    CacheStore::on_disk(&cache_dir, 60).set(&key, &json!([])).unwrap();

    let output = run_cli(&["--config", config.to_str().unwrap(), "cache", "clear"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Cache cleared."));
    assert!(CacheStore::on_disk(&cache_dir, 60).get(&key).is_none());
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use roihr::cli::{confirm_delete, CacheAction, Cli, CliError, Command};

    #[test]
    fn test_cli_list_has_no_flags_set() {
        let cli = Cli::parse_from(["roihr", "list"]);
        assert_eq!(cli.command, Command::List);
        assert!(!cli.offline);
        assert!(cli.config.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["roihr", "departments", "--offline", "-vv"]);
        assert_eq!(cli.command, Command::Departments);
        assert!(cli.offline);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_update_takes_id_and_fields() {
        let cli = Cli::parse_from(["roihr", "update", "5", "--name", "Bob", "--city", "Oslo"]);
        match cli.command {
            Command::Update { id, person } => {
                assert_eq!(id, 5);
                assert_eq!(person.name, "Bob");
                assert_eq!(person.city.as_deref(), Some("Oslo"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_add_requires_name() {
        assert!(Cli::try_parse_from(["roihr", "add"]).is_err());
    }

    #[test]
    fn test_cli_cache_clear() {
        let cli = Cli::parse_from(["roihr", "cache", "clear"]);
        assert_eq!(
            cli.command,
            Command::Cache {
                action: CacheAction::Clear
            }
        );
    }

    #[test]
    fn test_confirm_delete() {
        assert!(confirm_delete(1, true).is_ok());
        assert_eq!(confirm_delete(1, false), Err(CliError::DeleteNotConfirmed(1)));
    }
}
