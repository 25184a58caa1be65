use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Run the hook binary with `home` as `$HOME`, feeding `stdin_json` to it.
/// Returns (exit_code, stdout, stderr).
pub fn run_cli(home: &Path, stdin_json: &str) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_session-scribe"))
        .env("HOME", home)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn binary");

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(stdin_json.as_bytes())
        .unwrap();

    let output = child.wait_with_output().unwrap();
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

/// Write a stub `claude` shell script under `home` that records its argv to
/// `$HOME/claude-args.txt` and prints the given stream-json lines, then
/// point the preferences file at it.
pub fn install_stub_claude(home: &Path, stream_lines: &[&str]) -> PathBuf {
    let stub = home.join("claude-stub.sh");
    let mut script = String::from("#!/bin/sh\nprintf '%s\\n' \"$@\" > \"$HOME/claude-args.txt\"\n");
    for line in stream_lines {
        script.push_str("echo '");
        script.push_str(line);
        script.push_str("'\n");
    }
    fs::write(&stub, script).unwrap();
    fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();

    write_prefs(home, &stub);
    stub
}

/// Write `$HOME/.claude/session-scribe.toml` pointing `claude_bin` at the
/// given path, leaving every other preference at its default.
pub fn write_prefs(home: &Path, claude_bin: &Path) {
    let claude_dir = home.join(".claude");
    fs::create_dir_all(&claude_dir).unwrap();
    fs::write(
        claude_dir.join("session-scribe.toml"),
        format!("claude_bin = \"{}\"\n", claude_bin.display()),
    )
    .unwrap();
}

/// Write a transcript file under `home` and return its path as a string.
pub fn write_transcript(home: &Path, contents: &str) -> String {
    let path = home.join("transcript.jsonl");
    fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

/// The argv the stub `claude` was invoked with, one argument per line.
pub fn stub_args(home: &Path) -> Vec<String> {
    fs::read_to_string(home.join("claude-args.txt"))
        .unwrap_or_default()
        .lines()
        .map(String::from)
        .collect()
}

/// Path of the session log the binary writes for `session_id`.
pub fn log_path(home: &Path, session_id: &str) -> PathBuf {
    home.join(".claude")
        .join("session-logs")
        .join(format!("{session_id}.md"))
}
