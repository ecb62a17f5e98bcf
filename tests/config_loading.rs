use std::error::Error;
use std::fs;
use std::path::PathBuf;

use devwatch::config::{DEFAULT_EXCLUDE_PATTERNS, load_and_validate};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(contents: &str) -> Result<(TempDir, PathBuf), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("Devwatch.toml");
    fs::write(&path, contents)?;
    Ok((dir, path))
}

#[test]
fn minimal_config_gets_defaults() -> TestResult {
    let (_dir, path) = write_config(
        r#"
[restart]
cmd = "echo hello"
"#,
    )?;

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.restart.cmd, "echo hello");
    assert_eq!(cfg.restart.delay_ms, 300);
    assert_eq!(cfg.watch.dir, ".");
    assert!(cfg.watch.include.is_empty());
    assert!(cfg.watch.use_default_excludes);

    let excludes = cfg.watch.effective_excludes();
    for pattern in DEFAULT_EXCLUDE_PATTERNS {
        assert!(excludes.iter().any(|p| p == pattern));
    }

    Ok(())
}

#[test]
fn full_config_round_trips() -> TestResult {
    let (_dir, path) = write_config(
        r#"
[restart]
cmd = "cargo run"
delay_ms = 150

[watch]
dir = "src"
include = ["(.*)\\.rs$"]
exclude = ["(.*)\\.tmp$"]
use_default_excludes = false
"#,
    )?;

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.restart.delay_ms, 150);
    assert_eq!(cfg.watch.dir, "src");
    assert_eq!(cfg.watch.include, vec!["(.*)\\.rs$".to_string()]);
    assert_eq!(cfg.watch.effective_excludes(), vec!["(.*)\\.tmp$".to_string()]);

    Ok(())
}

#[test]
fn missing_restart_section_is_rejected() -> TestResult {
    let (_dir, path) = write_config("[watch]\ndir = \".\"\n")?;
    assert!(load_and_validate(&path).is_err());
    Ok(())
}

#[test]
fn empty_command_is_rejected() -> TestResult {
    let (_dir, path) = write_config("[restart]\ncmd = \"  \"\n")?;
    assert!(load_and_validate(&path).is_err());
    Ok(())
}

#[test]
fn zero_delay_is_rejected() -> TestResult {
    let (_dir, path) = write_config(
        r#"
[restart]
cmd = "echo hello"
delay_ms = 0
"#,
    )?;
    assert!(load_and_validate(&path).is_err());
    Ok(())
}

#[test]
fn malformed_pattern_is_rejected_at_load_time() -> TestResult {
    let (_dir, path) = write_config(
        r#"
[restart]
cmd = "echo hello"

[watch]
exclude = ["("]
"#,
    )?;

    let err = load_and_validate(&path).unwrap_err();
    assert!(format!("{err:#}").contains("invalid [watch] patterns"));

    Ok(())
}

#[test]
fn missing_config_file_is_an_error() {
    assert!(load_and_validate("does/not/exist/Devwatch.toml").is_err());
}
