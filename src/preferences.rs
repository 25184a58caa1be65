use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

const FILENAME: &str = "session-scribe.toml";

const DEFAULT_MODEL: &str = "haiku";
const DEFAULT_MAX_TURNS: u32 = 20;
const DEFAULT_SYSTEM_PROMPT: &str = "You are a session summarizer. Be concise.";
const DEFAULT_CLAUDE_BIN: &str = "claude";

/// The default session log template. Matches the layout the log readers
/// expect; the trailing newline is part of the file format.
pub const DEFAULT_LOG_TEMPLATE: &str = "\
# Session {{ session_id }}

**Date:** {{ timestamp }}
**Directory:** {{ cwd }}

## Summary

{{ summary }}
";

/// Session log template: either an inline Jinja2 string or a path to a
/// template file (relative to `~/.claude/`).
///
/// In TOML this looks like one of:
///
/// ```toml
/// [log_template]
/// inline = "# Session {{ session_id }}\n\n{{ summary }}\n"
///
/// # or:
///
/// [log_template]
/// file = "session-log.tmpl"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LogTemplate {
    /// An inline Jinja2 template string.
    Inline(String),
    /// Path to a template file (relative to `~/.claude/`).
    File(String),
}

impl Default for LogTemplate {
    fn default() -> Self {
        LogTemplate::Inline(DEFAULT_LOG_TEMPLATE.into())
    }
}

/// User-facing preferences stored in `~/.claude/session-scribe.toml`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Preferences {
    /// Model the summarization request runs on.
    #[serde(default = "default_model")]
    pub model: String,

    /// Turn limit passed to the summarization agent.
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// System prompt for the summarization agent.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Claude CLI binary to invoke (name on PATH or an absolute path).
    #[serde(default = "default_claude_bin")]
    pub claude_bin: String,

    /// Overrides the session log directory (default: `~/.claude/session-logs`).
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Session log template (inline or file reference).
    #[serde(default)]
    pub log_template: LogTemplate,
}

fn default_model() -> String {
    DEFAULT_MODEL.into()
}

fn default_max_turns() -> u32 {
    DEFAULT_MAX_TURNS
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.into()
}

fn default_claude_bin() -> String {
    DEFAULT_CLAUDE_BIN.into()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_turns: default_max_turns(),
            system_prompt: default_system_prompt(),
            claude_bin: default_claude_bin(),
            log_dir: None,
            log_template: LogTemplate::default(),
        }
    }
}

impl Preferences {
    /// Load preferences from `<dir>/session-scribe.toml`.
    ///
    /// If the file doesn't exist it is created with defaults. Missing keys
    /// in an existing file are filled in with defaults via serde.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(FILENAME);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let prefs: Preferences = toml::from_str(&contents)
                    .with_context(|| format!("parsing {}", path.display()))?;
                Ok(prefs)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let prefs = Preferences::default();
                let toml_str = toml::to_string_pretty(&prefs)
                    .context("serializing default preferences")?;
                fs::create_dir_all(dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
                fs::write(&path, &toml_str)
                    .with_context(|| format!("writing default {}", path.display()))?;
                Ok(prefs)
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }
}
