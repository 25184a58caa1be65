use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::io;

// ===================================================================
// Top-level transcript record (one per JSONL line)
// ===================================================================

/// A single line in a Claude Code `.jsonl` transcript file.
///
/// Discriminated by the `type` field. Only `user` and `assistant` records
/// contribute to the rendered transcript; everything else (progress
/// entries, file-history snapshots, system notices, future types) lands in
/// the catch-all variant and is ignored.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum TranscriptRecord {
    #[serde(rename = "user")]
    User(ConversationRecord),
    #[serde(rename = "assistant")]
    Assistant(ConversationRecord),
    #[serde(other)]
    Other,
}

/// The slice of a conversation record we consume. Transcript lines carry
/// many more fields (uuid, parentUuid, timestamp, usage); none of them
/// matter for summarization, so they are not modeled.
#[derive(Debug, Default, Deserialize)]
pub struct ConversationRecord {
    #[serde(default)]
    pub message: MessageBody,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub content: MessageContent,
}

/// `message.content` is a plain string on typed user prompts and an array
/// of content blocks on assistant responses and tool results.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

/// One element of a content-block array. Blocks are usually objects with a
/// `text` field (text, thinking, tool_use), occasionally bare strings, and
/// in principle any JSON value.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ContentBlock {
    Text(String),
    Object {
        #[serde(default)]
        text: String,
    },
    Other(serde_json::Value),
}

impl ContentBlock {
    /// The block's contribution to the joined content string. Objects use
    /// their `text` field (empty when absent); anything else is stringified
    /// directly.
    fn text(&self) -> String {
        match self {
            ContentBlock::Text(s) => s.clone(),
            ContentBlock::Object { text } => text.clone(),
            ContentBlock::Other(v) => v.to_string(),
        }
    }
}

impl MessageContent {
    /// Flatten content to a single string: plain text as-is, block arrays
    /// joined with single spaces.
    fn extract(&self) -> String {
        match self {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .map(|b| b.text())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

// ===================================================================
// Transcript: the ordered conversation extracted from a JSONL file
// ===================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// One rendered conversation turn: `"User: <text>"` or `"Assistant: <text>"`.
#[derive(Debug)]
pub struct TranscriptLine {
    pub role: Role,
    pub text: String,
}

/// The user/assistant conversation extracted from a JSONL transcript, in
/// file order.
pub struct Transcript {
    lines: Vec<TranscriptLine>,
}

impl Transcript {
    /// An empty transcript (no conversation lines).
    pub fn empty() -> Self {
        Self { lines: Vec::new() }
    }

    /// Parse a JSONL transcript string. Blank lines are skipped; a line
    /// that fails to decode is skipped silently and parsing continues.
    /// Records whose extracted content is empty contribute nothing.
    pub fn parse(contents: &str) -> Self {
        let mut lines = Vec::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Ok(record) = serde_json::from_str::<TranscriptRecord>(line) else {
                continue;
            };
            let (role, conv) = match &record {
                TranscriptRecord::User(c) => (Role::User, c),
                TranscriptRecord::Assistant(c) => (Role::Assistant, c),
                TranscriptRecord::Other => continue,
            };
            let text = conv.message.content.extract();
            if text.is_empty() {
                continue;
            }
            lines.push(TranscriptLine { role, text });
        }

        Self { lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    /// Render the conversation as prompt-ready text: one `"Role: <text>"`
    /// line per turn, separated by blank lines. The full transcript is
    /// assembled in memory, however large.
    pub fn render(&self) -> String {
        self.lines()
            .iter()
            .map(|l| format!("{}: {}", l.role.as_str(), l.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Read and parse the transcript at `path`. A missing file is not an
/// error: it yields an empty transcript, the signal to skip summarization.
pub fn load(path: &str) -> Result<Transcript> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Transcript::empty()),
        Err(e) => return Err(e).with_context(|| format!("reading transcript {path}")),
    };
    Ok(Transcript::parse(&contents))
}
