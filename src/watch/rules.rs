// src/watch/rules.rs

use anyhow::{Context, Result};
use regex::Regex;

/// A single compiled rule. The source pattern is kept alongside the regex
/// so match results can report which pattern fired.
#[derive(Debug, Clone)]
struct Rule {
    pattern: String,
    regex: Regex,
}

/// Outcome of classifying a path against a [`RuleSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatch {
    /// The path matched an include pattern. Includes always win, even when
    /// an exclude pattern would also match.
    Include { pattern: String },
    /// The path matched an exclude pattern and no include pattern.
    Exclude { pattern: String },
    /// The path matched neither set. Unmatched paths proceed by default.
    Unmatched,
}

impl RuleMatch {
    /// Whether the watcher should go ahead and request a restart.
    pub fn proceed(&self) -> bool {
        !matches!(self, RuleMatch::Exclude { .. })
    }

    /// The pattern that decided the outcome, or `""` when nothing matched.
    pub fn pattern(&self) -> &str {
        match self {
            RuleMatch::Include { pattern } | RuleMatch::Exclude { pattern } => pattern,
            RuleMatch::Unmatched => "",
        }
    }
}

/// Compiled include/exclude patterns for one watch root.
///
/// Patterns use *search* semantics: an unanchored pattern matches anywhere
/// in the path, so `assets` catches `target/classes/assets/js/script.js`.
/// Paths are evaluated relative to the watch root, with the platform path
/// separator. Duplicate patterns are harmless.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    includes: Vec<Rule>,
    excludes: Vec<Rule>,
}

impl RuleSet {
    /// Compile a rule set.
    ///
    /// A malformed pattern is caller misconfiguration and fails
    /// construction with an error naming the pattern.
    pub fn new(includes: &[String], excludes: &[String]) -> Result<Self> {
        Ok(Self {
            includes: compile_rules(includes).context("compiling include patterns")?,
            excludes: compile_rules(excludes).context("compiling exclude patterns")?,
        })
    }

    /// Classify a path relative to the watch root.
    ///
    /// Includes are tested first and short-circuit; then excludes; a path
    /// matching neither proceeds.
    pub fn match_rule(&self, relative_path: &str) -> RuleMatch {
        for rule in &self.includes {
            if rule.regex.is_match(relative_path) {
                return RuleMatch::Include {
                    pattern: rule.pattern.clone(),
                };
            }
        }

        for rule in &self.excludes {
            if rule.regex.is_match(relative_path) {
                return RuleMatch::Exclude {
                    pattern: rule.pattern.clone(),
                };
            }
        }

        RuleMatch::Unmatched
    }
}

/// Convenience predicate for exclude-only checks, e.g. "would this built
/// asset path be skipped?". Empty patterns or an empty path yield `false`.
pub fn check_if_would_be_excluded(exclude_patterns: &[String], path: &str) -> Result<bool> {
    let rules = RuleSet::new(&[], exclude_patterns)?;
    Ok(!rules.match_rule(path).proceed())
}

fn compile_rules(patterns: &[String]) -> Result<Vec<Rule>> {
    patterns
        .iter()
        .map(|pat| {
            let regex =
                Regex::new(pat).with_context(|| format!("invalid pattern: {pat}"))?;
            Ok(Rule {
                pattern: pat.clone(),
                regex,
            })
        })
        .collect()
}
