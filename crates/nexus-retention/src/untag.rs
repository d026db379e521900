//! Image un-tag capability backed by nexus-cli
//!
//! The retention engine hands an image name and a keep count to an
//! [`UntagExecutor`] and does not look at the result; version counting for
//! docker repositories is left entirely to the external tool.

use crate::log::LogSink;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;

/// Default name of the external un-tag tool
pub const DEFAULT_UNTAG_TOOL: &str = "nexus-cli";

/// Removes all but the newest `keep` tags of an image
pub trait UntagExecutor: Send + Sync {
    /// Un-tag `name`, running inside `working_dir` (where `.credentials` lives)
    fn untag<'a>(
        &'a self,
        name: &'a str,
        keep: u32,
        working_dir: &'a Path,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Runs `<tool> image delete -name <name> -keep <N>` as a child process
pub struct ProcessUntagger {
    program: PathBuf,
    log: Arc<dyn LogSink>,
}

impl ProcessUntagger {
    /// Use `program` as given (resolved through PATH at spawn time)
    pub fn new(program: impl Into<PathBuf>, log: Arc<dyn LogSink>) -> Self {
        Self {
            program: program.into(),
            log,
        }
    }

    /// Resolve `tool` on PATH up front, falling back to the bare name
    pub fn from_tool(tool: &str, log: Arc<dyn LogSink>) -> Self {
        let program = match which::which(tool) {
            Ok(path) => {
                log.debug(&format!("Found {} at {}", tool, path.display()));
                path
            }
            Err(_) => {
                log.warn(&format!(
                    "{} not found in PATH; docker repositories cannot be un-tagged",
                    tool
                ));
                PathBuf::from(tool)
            }
        };
        Self::new(program, log)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed to the tool for one image
    pub fn arguments(name: &str, keep: u32) -> Vec<String> {
        vec![
            "image".to_string(),
            "delete".to_string(),
            "-name".to_string(),
            name.to_string(),
            "-keep".to_string(),
            keep.to_string(),
        ]
    }
}

impl UntagExecutor for ProcessUntagger {
    fn untag<'a>(
        &'a self,
        name: &'a str,
        keep: u32,
        working_dir: &'a Path,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            let mut cmd = Command::new(&self.program);
            cmd.args(Self::arguments(name, keep))
                .current_dir(working_dir)
                .stdin(Stdio::null());

            self.log.debug(&format!(
                "Running: {} image delete -name {} -keep {}",
                self.program.display(),
                name,
                keep
            ));

            // Outcome is reported, never propagated
            match cmd.output().await {
                Ok(output) if output.status.success() => {
                    self.log.info(&format!("Un-tagged '{}' keeping {}", name, keep));
                }
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    self.log.warn(&format!(
                        "{} exited with {} for '{}': {}",
                        self.program.display(),
                        output.status,
                        name,
                        stderr.trim()
                    ));
                }
                Err(e) => {
                    self.log.warn(&format!(
                        "Failed to run {} for '{}': {}",
                        self.program.display(),
                        name,
                        e
                    ));
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{Level, MemorySink};
    use serial_test::serial;

    #[test]
    fn test_arguments() {
        assert_eq!(
            ProcessUntagger::arguments("team/api", 3),
            vec!["image", "delete", "-name", "team/api", "-keep", "3"]
        );
    }

    #[test]
    fn test_from_tool_missing_falls_back() {
        let sink = Arc::new(MemorySink::new());
        let untagger = ProcessUntagger::from_tool("definitely-not-a-real-tool-4821", sink.clone());
        assert_eq!(
            untagger.program(),
            Path::new("definitely-not-a-real-tool-4821")
        );
        assert!(sink.contains(Level::Warn, "not found in PATH"));
    }

    #[tokio::test]
    #[serial]
    async fn test_spawn_failure_is_logged_not_raised() {
        let sink = Arc::new(MemorySink::new());
        let untagger = ProcessUntagger::new("/nonexistent/nexus-cli", sink.clone());
        let dir = tempfile::tempdir().unwrap();

        untagger.untag("team/api", 2, dir.path()).await;

        assert!(sink.contains(Level::Warn, "Failed to run"));
    }

    #[cfg(unix)]
    #[tokio::test]
    #[serial]
    async fn test_runs_in_working_dir() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-cli");
        std::fs::write(
            &script,
            "#!/bin/sh\necho \"$@\" > invoked.txt\nexit 0\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let sink = Arc::new(MemorySink::new());
        let untagger = ProcessUntagger::new(&script, sink.clone());
        untagger.untag("team/api", 4, dir.path()).await;

        let invoked = std::fs::read_to_string(dir.path().join("invoked.txt")).unwrap();
        assert_eq!(invoked.trim(), "image delete -name team/api -keep 4");
        assert!(sink.contains(Level::Info, "Un-tagged 'team/api'"));
    }

    #[cfg(unix)]
    #[tokio::test]
    #[serial]
    async fn test_non_zero_exit_is_logged_not_raised() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("failing-cli");
        std::fs::write(&script, "#!/bin/sh\necho boom >&2\nexit 3\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let sink = Arc::new(MemorySink::new());
        let untagger = ProcessUntagger::new(&script, sink.clone());
        untagger.untag("team/api", 1, dir.path()).await;

        assert!(sink.contains(Level::Warn, "boom"));
    }
}
