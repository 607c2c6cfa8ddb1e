//! Integration tests for claimcheck
//!
//! These drive the binary end to end without network access.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a claimcheck Command isolated from the caller's environment
fn claimcheck(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("claimcheck");
    cmd.current_dir(dir.path())
        .env_remove("PERPLEXITY_API_KEY")
        .env_remove("CLAIMCHECK_RESULTS_DIR")
        .env_remove("CLAIMCHECK_REASONING_BACKEND")
        .env_remove("RUST_LOG");
    cmd
}

fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_claimcheck_help() {
        let dir = temp_dir();
        claimcheck(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("verify"))
            .stdout(predicate::str::contains("serve"));
    }

    #[test]
    fn test_claimcheck_version() {
        let dir = temp_dir();
        claimcheck(&dir)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("claimcheck"));
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        let dir = temp_dir();
        claimcheck(&dir).arg("frobnicate").assert().failure();
    }
}

// =============================================================================
// Verify
// =============================================================================

mod verify {
    use super::*;

    #[test]
    fn test_verify_rejects_short_claim() {
        let dir = temp_dir();
        claimcheck(&dir)
            .args(["verify", "too short"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Claim is too short"));
    }

    #[test]
    fn test_verify_rejects_blank_claim() {
        let dir = temp_dir();
        claimcheck(&dir)
            .args(["verify", "   "])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Claim cannot be empty"));
    }

    #[test]
    fn test_verify_requires_search_credential() {
        let dir = temp_dir();
        claimcheck(&dir)
            .args(["verify", "The unemployment rate fell last year."])
            .assert()
            .failure()
            .stderr(predicate::str::contains("PERPLEXITY_API_KEY"));

        assert!(!dir.path().join("verification_results").exists());
    }
}

// =============================================================================
// Config
// =============================================================================

mod config {
    use super::*;

    #[test]
    fn test_config_init_writes_defaults() {
        let dir = temp_dir();
        claimcheck(&dir)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Wrote default configuration"));

        let content = fs::read_to_string(dir.path().join("claimcheck.toml")).unwrap();
        assert!(content.contains("[workflow]"));
        assert!(content.contains("num_search_queries = 10"));
    }

    #[test]
    fn test_config_init_refuses_to_overwrite() {
        let dir = temp_dir();
        fs::write(dir.path().join("claimcheck.toml"), "[workflow]\n").unwrap();

        claimcheck(&dir)
            .args(["config", "init"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--force"));

        claimcheck(&dir)
            .args(["config", "init", "--force"])
            .assert()
            .success();
        let content = fs::read_to_string(dir.path().join("claimcheck.toml")).unwrap();
        assert!(content.contains("max_parallel_workers = 3"));
    }

    #[test]
    fn test_config_show_reports_file_values_and_credentials() {
        let dir = temp_dir();
        fs::write(
            dir.path().join("claimcheck.toml"),
            "[workflow]\nnum_search_queries = 4\n",
        )
        .unwrap();

        claimcheck(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("num_search_queries = 4"))
            .stdout(predicate::str::contains("PERPLEXITY_API_KEY"));
    }

    #[test]
    fn test_config_flag_points_at_other_file() {
        let dir = temp_dir();
        fs::write(dir.path().join("alt.toml"), "[server]\nport = 9100\n").unwrap();

        claimcheck(&dir)
            .args(["--config", "alt.toml", "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("port = 9100"));
    }

    #[test]
    fn test_config_validate_rejects_zero_workers() {
        let dir = temp_dir();
        fs::write(
            dir.path().join("claimcheck.toml"),
            "[workflow]\nmax_parallel_workers = 0\n",
        )
        .unwrap();

        claimcheck(&dir)
            .args(["config", "validate"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("max_parallel_workers"));
    }

    #[test]
    fn test_config_validate_reports_warnings() {
        let dir = temp_dir();
        fs::write(
            dir.path().join("claimcheck.toml"),
            "[workflow]\nnum_search_queries = 2\nmax_parallel_workers = 5\n",
        )
        .unwrap();

        claimcheck(&dir)
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1 warning(s)"));
    }
}

// =============================================================================
// Results
// =============================================================================

mod results {
    use super::*;

    #[test]
    fn test_results_list_empty() {
        let dir = temp_dir();
        claimcheck(&dir)
            .args(["results", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No stored results."));
    }

    #[test]
    fn test_results_list_and_show() {
        let dir = temp_dir();
        let results = dir.path().join("verification_results");
        fs::create_dir_all(&results).unwrap();
        fs::write(
            results.join("20250101_120000_the_sky_is_blue.json"),
            r#"{"original_claim":"The sky is blue today.","workflow_version":"2.2_final"}"#,
        )
        .unwrap();

        claimcheck(&dir)
            .args(["results", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("20250101_120000_the_sky_is_blue.json"));

        claimcheck(&dir)
            .args(["results", "show", "20250101_120000_the_sky_is_blue.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"workflow_version\": \"2.2_final\""));
    }

    #[test]
    fn test_results_show_missing_and_invalid_names() {
        let dir = temp_dir();
        claimcheck(&dir)
            .args(["results", "show", "nope.json"])
            .assert()
            .failure();

        claimcheck(&dir)
            .args(["results", "show", "../secrets.json"])
            .assert()
            .failure();
    }

    #[test]
    fn test_results_dir_env_override() {
        let dir = temp_dir();
        let custom = dir.path().join("elsewhere");
        fs::create_dir_all(&custom).unwrap();
        fs::write(custom.join("r.json"), "{}").unwrap();

        claimcheck(&dir)
            .env("CLAIMCHECK_RESULTS_DIR", &custom)
            .args(["results", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("r.json"));
    }
}
