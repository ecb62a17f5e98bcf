use std::error::Error;
use std::path::MAIN_SEPARATOR_STR;

use devwatch::config::DEFAULT_EXCLUDE_PATTERNS;
use devwatch::watch::{RuleMatch, RuleSet, check_if_would_be_excluded};

type TestResult = Result<(), Box<dyn Error>>;

fn default_excludes() -> Vec<String> {
    DEFAULT_EXCLUDE_PATTERNS
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

/// Join path components with the platform separator, the same shape the
/// watcher hands to the rule engine.
fn native(parts: &[&str]) -> String {
    parts.join(MAIN_SEPARATOR_STR)
}

#[test]
fn include_match_wins_over_exclude() -> TestResult {
    let rules = RuleSet::new(
        &["(.*)included.txt".to_string()],
        &["(.*)assets(.*)".to_string()],
    )?;

    let outcome = rules.match_rule(&native(&["assets", "included.txt"]));
    assert!(outcome.proceed());
    assert!(matches!(outcome, RuleMatch::Include { .. }));
    assert_eq!(outcome.pattern(), "(.*)included.txt");

    Ok(())
}

#[test]
fn exclude_without_include_blocks() -> TestResult {
    let rules = RuleSet::new(&[], &["(.*)assets(.*)".to_string()])?;

    let outcome = rules.match_rule(&native(&["assets", "js", "script.js"]));
    assert!(!outcome.proceed());
    assert!(matches!(outcome, RuleMatch::Exclude { .. }));
    assert_eq!(outcome.pattern(), "(.*)assets(.*)");

    Ok(())
}

#[test]
fn unmatched_path_proceeds_by_default() -> TestResult {
    let rules = RuleSet::new(
        &["(.*)\\.rs$".to_string()],
        &["(.*)\\.tmp$".to_string()],
    )?;

    let outcome = rules.match_rule("README.md");
    assert!(outcome.proceed());
    assert_eq!(outcome, RuleMatch::Unmatched);
    assert_eq!(outcome.pattern(), "");

    Ok(())
}

#[test]
fn empty_patterns_and_empty_path_are_harmless() -> TestResult {
    let rules = RuleSet::new(&[], &[])?;
    assert!(rules.match_rule("").proceed());
    assert!(rules.match_rule("anything").proceed());

    assert!(!check_if_would_be_excluded(&[], "")?);

    Ok(())
}

#[test]
fn pattern_matches_anywhere_in_the_path() -> TestResult {
    // Search semantics: no anchors means a substring match counts.
    let rules = RuleSet::new(&[], &["assets".to_string()])?;
    assert!(!rules.match_rule(&native(&["deep", "assets", "x.js"])).proceed());

    Ok(())
}

#[test]
fn malformed_pattern_is_rejected_at_construction() {
    assert!(RuleSet::new(&["(".to_string()], &[]).is_err());
    assert!(RuleSet::new(&[], &["[".to_string()]).is_err());
    assert!(check_if_would_be_excluded(&["(".to_string()], "x").is_err());
}

#[test]
fn default_excludes_skip_built_assets() -> TestResult {
    let patterns = default_excludes();

    let script = native(&["target", "classes", "assets", "js", "script.js"]);
    assert!(check_if_would_be_excluded(&patterns, &script)?);

    let bare_assets = format!(
        "{sep}assets{sep}",
        sep = MAIN_SEPARATOR_STR
    );
    assert!(check_if_would_be_excluded(&patterns, &bare_assets)?);

    Ok(())
}

#[test]
fn default_excludes_keep_other_build_output() -> TestResult {
    let patterns = default_excludes();

    let other = native(&["target", "classes", "completelyDifferentPath"]);
    assert!(!check_if_would_be_excluded(&patterns, &other)?);

    Ok(())
}

#[test]
fn default_excludes_skip_compiled_templates_but_not_other_suffixes() -> TestResult {
    let patterns = default_excludes();

    let template = native(&[
        "target",
        "classes",
        "views",
        "ApplicationController",
        "index.ftl.html",
    ]);
    assert!(check_if_would_be_excluded(&patterns, &template)?);

    // The template pattern is anchored at the end, so a different suffix
    // is a different artifact and stays restart-worthy.
    let renamed = format!("{template}.bam");
    assert!(!check_if_would_be_excluded(&patterns, &renamed)?);

    Ok(())
}

#[test]
fn duplicate_patterns_are_harmless() -> TestResult {
    let rules = RuleSet::new(
        &[],
        &["(.*)assets(.*)".to_string(), "(.*)assets(.*)".to_string()],
    )?;
    assert!(!rules.match_rule("assets").proceed());

    Ok(())
}
