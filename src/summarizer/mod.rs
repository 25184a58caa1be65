use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::preferences::Preferences;

/// Fallback summary when the event stream ends without a terminal result,
/// or when a success result carries no text.
const NO_SUMMARY: &str = "No summary generated";

// ===================================================================
// Stream events (Claude CLI `--output-format stream-json` lines)
// ===================================================================

/// Relevant fields from the CLI's stream-json output. The stream carries
/// system/assistant/user events as the remote agent works; only the
/// terminal `result` event matters here, so everything else falls into the
/// `#[serde(other)]` catch-all rather than failing deserialization.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum StreamEvent {
    #[serde(rename = "result")]
    Result(ResultEvent),
    #[serde(other)]
    Unknown,
}

/// The terminal event: either an error flag plus detail, or result text.
#[derive(Debug, Deserialize)]
pub struct ResultEvent {
    pub subtype: String,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub result: Option<String>,
}

impl ResultEvent {
    /// Resolve the terminal event to the summary string. Errors degrade to
    /// a visible placeholder rather than failing the hook; the subtype
    /// stands in when the CLI omits the error detail.
    fn into_summary(self) -> String {
        if self.is_error {
            let detail = self.result.unwrap_or(self.subtype);
            format!("Summary failed: {detail}")
        } else {
            self.result.unwrap_or_else(|| NO_SUMMARY.into())
        }
    }
}

/// Consume a stream-json event sequence until the first `result` event and
/// resolve it to a summary string. Blank, non-JSON, and unknown-type lines
/// are skipped. Returns the fixed placeholder if the stream ends without a
/// terminal event.
pub async fn resolve_summary<R: AsyncBufRead + Unpin>(reader: R) -> Result<String> {
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("reading summarizer output")? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Ok(StreamEvent::Result(event)) = serde_json::from_str::<StreamEvent>(trimmed) {
            return Ok(event.into_summary());
        }
    }
    Ok(NO_SUMMARY.into())
}

// ===================================================================
// Summarizer: one-shot summarization via `claude -p`
// ===================================================================

/// Runs the summarization request through the Claude CLI in print mode.
pub struct Summarizer {
    claude_bin: PathBuf,
    model: String,
    max_turns: u32,
    system_prompt: String,
}

/// The fixed summarization prompt around the assembled transcript.
fn build_prompt(transcript: &str) -> String {
    format!(
        "Summarize this Claude Code session in 1-2 paragraphs. Focus on what \
         was accomplished, key decisions made, and any notable outcomes. Do \
         not include a header - just provide the summary text directly.\n\n\
         <transcript>\n{transcript}\n</transcript>"
    )
}

impl Summarizer {
    pub fn from_prefs(prefs: &Preferences) -> Self {
        Self {
            claude_bin: PathBuf::from(&prefs.claude_bin),
            model: prefs.model.clone(),
            max_turns: prefs.max_turns,
            system_prompt: prefs.system_prompt.clone(),
        }
    }

    /// Submit the transcript for summarization and await the terminal
    /// result. Spawn failures propagate (nothing useful can be written);
    /// remote-side failures come back as `"Summary failed: ..."` text.
    pub async fn summarize(&self, transcript: &str) -> Result<String> {
        let mut cmd = tokio::process::Command::new(&self.claude_bin);
        cmd.arg("-p")
            .arg(build_prompt(transcript))
            .arg("--model")
            .arg(&self.model)
            .arg("--max-turns")
            .arg(self.max_turns.to_string())
            .arg("--system-prompt")
            .arg(&self.system_prompt)
            .arg("--output-format")
            .arg("stream-json")
            .arg("--verbose")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            // Allow nesting: remove markers that prevent Claude Code from
            // spawning inside a hook.
            .env_remove("CLAUDE_CODE")
            .env_remove("CLAUDECODE");

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning {}", self.claude_bin.display()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("failed to capture summarizer stdout"))?;

        let summary = resolve_summary(BufReader::new(stdout)).await?;
        // The result event is the last thing the CLI prints; reap the child
        // rather than leaving a zombie.
        child.wait().await.context("waiting for summarizer")?;
        Ok(summary)
    }
}
