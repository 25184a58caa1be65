mod common;

use common::{run_cli, write_prefs, write_transcript};
use std::path::Path;

#[test]
fn rejects_invalid_stdin_json() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), "not json");
    assert_ne!(code, 0);
}

#[test]
fn rejects_non_object_stdin() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), "[1, 2, 3]");
    assert_ne!(code, 0);
}

#[test]
fn empty_object_falls_back_to_defaults_and_skips() {
    // No transcript_path means nothing to read, which is the skip path,
    // not an error.
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_cli(home.path(), "{}");
    assert_eq!(code, 0);
    assert_eq!(stdout, "No transcript to summarize\n");
    assert!(stderr.is_empty(), "expected no stderr, got: {stderr}");
}

#[test]
fn malformed_transcript_lines_do_not_fail_the_run() {
    let home = tempfile::tempdir().unwrap();
    // Only malformed lines: every one is skipped, so the transcript is
    // empty and the run skips cleanly.
    let transcript = write_transcript(home.path(), "{ bad\nworse\n");
    let input = format!(r#"{{"session_id":"s","transcript_path":"{transcript}","cwd":"/tmp"}}"#);
    let (code, stdout, _) = run_cli(home.path(), &input);
    assert_eq!(code, 0);
    assert_eq!(stdout, "No transcript to summarize\n");
}

#[test]
fn unspawnable_summarizer_is_fatal() {
    let home = tempfile::tempdir().unwrap();
    write_prefs(home.path(), Path::new("/nonexistent/claude"));
    let transcript = write_transcript(
        home.path(),
        concat!(r#"{"type":"user","message":{"content":"hello"}}"#, "\n"),
    );

    let input = format!(r#"{{"session_id":"s","transcript_path":"{transcript}","cwd":"/tmp"}}"#);
    let (code, stdout, stderr) = run_cli(home.path(), &input);

    assert_eq!(code, 2);
    assert!(stdout.is_empty(), "expected no stdout, got: {stdout}");
    assert!(stderr.contains("session-scribe:"), "got: {stderr}");
    assert!(stderr.contains("spawning"), "got: {stderr}");
}
