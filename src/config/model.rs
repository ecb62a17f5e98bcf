// src/config/model.rs

use serde::Deserialize;

/// Exclude patterns applied on top of user configuration unless disabled.
///
/// These cover build output that changes as a side effect of the app
/// running: generated view-template artifacts and compiled asset
/// directories. Tested with search semantics, so `(.*)assets(.*)` catches
/// an `assets` component anywhere in the path.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["(.*)ftl\\.html$", "(.*)assets(.*)"];

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [restart]
/// cmd = "cargo run"
/// delay_ms = 300
///
/// [watch]
/// dir = "src"
/// include = ["(.*)\\.rs$"]
/// exclude = ["(.*)\\.tmp$"]
/// ```
///
/// `[restart].cmd` is the only required field.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// `[restart]` section: what to run and how long to settle.
    pub restart: RestartSection,

    /// `[watch]` section: where to watch and which paths count.
    #[serde(default)]
    pub watch: WatchSection,
}

/// `[restart]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RestartSection {
    /// The command to (re)start when watched files change.
    pub cmd: String,

    /// Quiet period in milliseconds before a burst of changes becomes one
    /// restart. Editors often write several times per save, so this should
    /// stay in the hundreds-of-milliseconds range.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_delay_ms() -> u64 {
    300
}

/// `[watch]` section.
///
/// `include` and `exclude` are regexes tested against the path relative to
/// the watch root with search semantics (a match anywhere in the path
/// counts). A path matching an include is always restart-worthy; a path
/// matching only an exclude never is; anything else proceeds by default.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Directory tree to observe, relative to the config file's directory.
    #[serde(default = "default_watch_dir")]
    pub dir: String,

    /// Patterns that force a restart even for otherwise-excluded paths.
    #[serde(default)]
    pub include: Vec<String>,

    /// Patterns whose matches never cause a restart (unless included).
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether [`DEFAULT_EXCLUDE_PATTERNS`] are appended to `exclude`.
    #[serde(default = "default_true")]
    pub use_default_excludes: bool,
}

fn default_watch_dir() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            dir: default_watch_dir(),
            include: Vec::new(),
            exclude: Vec::new(),
            use_default_excludes: default_true(),
        }
    }
}

impl WatchSection {
    /// Configured exclude patterns with the built-in defaults appended when
    /// `use_default_excludes` is set.
    pub fn effective_excludes(&self) -> Vec<String> {
        let mut patterns = self.exclude.clone();
        if self.use_default_excludes {
            patterns.extend(DEFAULT_EXCLUDE_PATTERNS.iter().map(|s| (*s).to_string()));
        }
        patterns
    }
}
