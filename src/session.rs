use anyhow::{Context, Result};
use minijinja::{Environment, context};
use std::fs;
use std::path::PathBuf;

use crate::preferences::{LogTemplate, Preferences};
use crate::summarizer::Summarizer;

const LOG_DIR: &str = "session-logs";

/// One hook invocation's worth of state: identity of the session being
/// logged, resolved directories, and loaded preferences.
pub struct Session {
    session_id: String,
    cwd: String,
    claude_dir: PathBuf,
    log_dir: PathBuf,
    pub prefs: Preferences,
}

impl Session {
    /// Resolve `~/.claude`, load preferences, and compute the log
    /// directory. Nothing is written here except the default preferences
    /// file on first use; the log directory itself is created at write
    /// time.
    pub fn open(session_id: &str, cwd: &str) -> Result<Self> {
        let home = dirs::home_dir().context("resolving home directory")?;
        let claude_dir = home.join(".claude");
        let prefs = Preferences::load(&claude_dir)?;
        let log_dir = match &prefs.log_dir {
            Some(dir) => PathBuf::from(dir),
            None => claude_dir.join(LOG_DIR),
        };
        Ok(Self {
            session_id: session_id.to_string(),
            cwd: cwd.to_string(),
            claude_dir,
            log_dir,
            prefs,
        })
    }

    fn log_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}.md", self.session_id))
    }

    /// Run the summarization request for the rendered transcript.
    pub async fn summarize(&self, transcript: &str) -> Result<String> {
        Summarizer::from_prefs(&self.prefs).summarize(transcript).await
    }

    // ---------------------------------------------------------------
    // Log template
    // ---------------------------------------------------------------

    /// Resolve the session log template to a string.
    fn load_log_template(&self) -> Result<String> {
        match &self.prefs.log_template {
            LogTemplate::Inline(s) => Ok(s.clone()),
            LogTemplate::File(filename) => {
                let path = self.claude_dir.join(filename);
                fs::read_to_string(&path)
                    .with_context(|| format!("reading template {}", path.display()))
            }
        }
    }

    // ---------------------------------------------------------------
    // Writer
    // ---------------------------------------------------------------

    /// Render the session log and write it to `<log-dir>/<session_id>.md`,
    /// creating the directory first. Overwrites any previous log for the
    /// same session id. Returns the written path.
    pub fn write_log(&self, summary: &str) -> Result<PathBuf> {
        let timestamp = local_timestamp();
        let template = self.load_log_template()?;
        let content = render_log(&template, &self.session_id, &timestamp, &self.cwd, summary)?;

        fs::create_dir_all(&self.log_dir)
            .with_context(|| format!("creating {}", self.log_dir.display()))?;
        let path = self.log_path();
        fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

/// Current local time, ISO-8601 with microseconds and no timezone suffix.
fn local_timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Render a session log template with the standard context fields.
/// Rendering strips at most one trailing newline from the template, so it
/// is restored; the log file always ends with a newline.
fn render_log(
    template: &str,
    session_id: &str,
    timestamp: &str,
    cwd: &str,
    summary: &str,
) -> Result<String> {
    let env = Environment::new();
    let tmpl = env
        .template_from_str(template)
        .context("parsing session log template")?;
    let mut rendered = tmpl
        .render(context! { session_id, timestamp, cwd, summary })
        .context("rendering session log template")?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}
