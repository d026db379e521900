//! Fakes for the capabilities the engine does not observe

use nexus_retention::UntagExecutor;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Mutex;

/// One recorded un-tag invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UntagCall {
    pub name: String,
    pub keep: u32,
    /// Contents of `.credentials` at call time, if present
    pub credentials: Option<String>,
    pub working_dir: std::path::PathBuf,
}

/// Records every un-tag request instead of running nexus-cli
#[derive(Debug, Default)]
pub struct RecordingUntagger {
    calls: Mutex<Vec<UntagCall>>,
}

impl RecordingUntagger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<UntagCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.name).collect()
    }
}

impl UntagExecutor for RecordingUntagger {
    fn untag<'a>(
        &'a self,
        name: &'a str,
        keep: u32,
        working_dir: &'a Path,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        let credentials = std::fs::read_to_string(working_dir.join(".credentials")).ok();
        self.calls.lock().unwrap().push(UntagCall {
            name: name.to_string(),
            keep,
            credentials,
            working_dir: working_dir.to_path_buf(),
        });
        Box::pin(async {})
    }
}
