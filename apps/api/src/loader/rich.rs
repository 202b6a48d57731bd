//! Rich document conversion through an external converter (docling by default).
//!
//! The converter is invoked as `<command> <input> --to md --output <dir>` and
//! its markdown is read back from a scratch directory that is removed before
//! returning. Converters that print markdown to stdout are also accepted.
//! A converter still running at its deadline is killed.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_CONVERSION_TIMEOUT: Duration = Duration::from_secs(120);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("rich converter '{command}' is not installed")]
    Unavailable { command: String },

    #[error("rich conversion failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RichConverter {
    command: String,
    timeout: Duration,
}

impl RichConverter {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: DEFAULT_CONVERSION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn resolve(&self) -> Result<PathBuf, ConversionError> {
        which::which(&self.command).map_err(|_| ConversionError::Unavailable {
            command: self.command.clone(),
        })
    }

    /// Converts `path` to markdown.
    pub fn convert(&self, path: &Path) -> Result<String, ConversionError> {
        let program = self.resolve()?;
        let failed = |what: &str, e: io::Error| ConversionError::Failed(format!("{what}: {e}"));

        let scratch = tempfile::tempdir().map_err(|e| failed("cannot create scratch directory", e))?;
        let output_dir = scratch.path().join("out");
        fs::create_dir(&output_dir).map_err(|e| failed("cannot create output directory", e))?;
        let stdout_path = scratch.path().join("stdout.log");
        let stderr_path = scratch.path().join("stderr.log");
        let stdout = File::create(&stdout_path).map_err(|e| failed("cannot capture stdout", e))?;
        let stderr = File::create(&stderr_path).map_err(|e| failed("cannot capture stderr", e))?;

        debug!(converter = %program.display(), input = %path.display(), "running rich converter");

        let mut child = Command::new(&program)
            .arg(path)
            .args(["--to", "md", "--output"])
            .arg(&output_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(|e| failed(&format!("failed to execute {}", self.command), e))?;

        let status = wait_with_deadline(&mut child, self.timeout)
            .map_err(|e| failed(&format!("failed waiting for {}", self.command), e))?;

        let Some(status) = status else {
            warn!(command = %self.command, timeout_s = self.timeout.as_secs_f64(), "rich converter killed");
            return Err(ConversionError::Failed(format!(
                "{} timed out after {}s",
                self.command,
                self.timeout.as_secs_f64()
            )));
        };

        if !status.success() {
            let stderr = fs::read_to_string(&stderr_path).unwrap_or_default();
            return Err(ConversionError::Failed(format!(
                "{} exited with {}: {}",
                self.command,
                status,
                stderr.trim()
            )));
        }

        let markdown = match first_markdown_file(&output_dir)? {
            Some(file) => fs::read_to_string(&file)
                .map_err(|e| failed(&format!("cannot read {}", file.display()), e))?,
            None => fs::read_to_string(&stdout_path).map_err(|e| failed("cannot read stdout", e))?,
        };

        let markdown = markdown.trim();
        if markdown.is_empty() {
            return Err(ConversionError::Failed(format!("{} produced no text", self.command)));
        }
        Ok(markdown.to_string())
    }
}

/// Polls `child` until it exits or `timeout` elapses. `None` means the child
/// was killed at the deadline.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            child.wait()?;
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn first_markdown_file(dir: &Path) -> Result<Option<PathBuf>, ConversionError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ConversionError::Failed(format!("cannot list converter output: {e}")))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
        .collect();
    files.sort();
    Ok(files.into_iter().next())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Writes an executable shell script standing in for the converter.
    #[cfg(unix)]
    pub(crate) fn converter_script(dir: &Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("fake-converter");
        fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script.display().to_string()
    }

    #[test]
    fn test_missing_converter_is_unavailable() {
        let converter = RichConverter::new("cv-pipeline-no-such-converter");
        let err = converter.convert(Path::new("/tmp/cv.pdf")).unwrap_err();
        assert!(matches!(err, ConversionError::Unavailable { .. }));
        assert!(err.to_string().contains("not installed"));
    }

    #[test]
    fn test_first_markdown_file_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cv.json"), "{}").unwrap();
        fs::write(dir.path().join("cv.md"), "## Skills").unwrap();
        let found = first_markdown_file(dir.path()).unwrap().unwrap();
        assert_eq!(found.file_name().unwrap(), "cv.md");
    }

    #[cfg(unix)]
    #[test]
    fn test_hung_converter_is_killed_at_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let converter = RichConverter::new(converter_script(dir.path(), "sleep 20"))
            .with_timeout(Duration::from_millis(200));

        let started = Instant::now();
        let err = converter.convert(Path::new("/tmp/cv.pdf")).unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(matches!(err, ConversionError::Failed(_)));
        assert!(err.to_string().contains("timed out"));
    }

    #[cfg(unix)]
    #[test]
    fn test_markdown_from_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        // $5 is the --output directory.
        let script = converter_script(dir.path(), r#"printf '## Skills\nRust\n' > "$5/cv.md""#);
        let markdown = RichConverter::new(script)
            .convert(Path::new("/tmp/cv.pdf"))
            .unwrap();
        assert_eq!(markdown, "## Skills\nRust");
    }

    #[cfg(unix)]
    #[test]
    fn test_markdown_from_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let script = converter_script(dir.path(), "echo '# Summary'");
        let markdown = RichConverter::new(script)
            .convert(Path::new("/tmp/cv.pdf"))
            .unwrap();
        assert_eq!(markdown, "# Summary");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_converter_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let script = converter_script(dir.path(), "echo 'bad input' >&2; exit 3");
        let err = RichConverter::new(script)
            .convert(Path::new("/tmp/cv.pdf"))
            .unwrap_err();
        assert!(err.to_string().contains("bad input"));
    }
}
