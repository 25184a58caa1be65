mod preferences;
mod session;
mod summarizer;
mod transcript;
mod types;

use anyhow::Result;
use session::Session;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use types::HookInput;

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// The whole flow: parse the transcript, short-circuit when there is
/// nothing to summarize, otherwise summarize and write the session log.
/// Returns the written path, or `None` on the skip path.
async fn run(input: &HookInput) -> Result<Option<PathBuf>> {
    let transcript = transcript::load(&input.transcript_path)?;
    if transcript.is_empty() {
        return Ok(None);
    }

    let session = Session::open(&input.session_id, &input.cwd)?;
    let summary = session.summarize(&transcript.render()).await?;
    let path = session.write_log(&summary)?;
    Ok(Some(path))
}

#[tokio::main]
async fn main() {
    let input = read_stdin().expect("Failed to read stdin");
    let hook_input: HookInput =
        serde_json::from_str(&input).expect("Failed to parse hook input");

    match run(&hook_input).await {
        Ok(Some(path)) => {
            println!("Session summary saved to {}", path.display());
        }
        Ok(None) => {
            println!("No transcript to summarize");
        }
        Err(err) => {
            eprintln!("session-scribe: {err:#}");
            process::exit(2);
        }
    }
}
