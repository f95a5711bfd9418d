//! Test doubles shared by the docsave-core integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use docsave_core::{ErrorReporter, Notifier};
use docsave_model::{DocumentHandle, ResourcePath, StoreError, TargetState};
use docsave_workspace::{ManagedStore, RefreshDepth};

/// Notifier that remembers every dialog it was asked to show.
#[derive(Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, title: &str, message: &str) {
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

pub fn recording_reporter() -> (ErrorReporter, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    (ErrorReporter::new(notifier.clone()), notifier)
}

/// One call made against a [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    CreateFolder(String),
    Create {
        path: String,
        overwrite: bool,
    },
    SetContents {
        path: String,
        force: bool,
        keep_history: bool,
    },
    Refresh {
        path: String,
        depth: RefreshDepth,
    },
}

/// In-memory managed store that records every mutating call.
#[derive(Default)]
pub struct RecordingStore {
    files: Mutex<HashMap<ResourcePath, Vec<u8>>>,
    folders: Mutex<HashSet<ResourcePath>>,
    read_only: Mutex<HashSet<ResourcePath>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_create_folder: bool,
    fail_writes: bool,
    host_fault_on_refresh: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_create_folder(mut self) -> Self {
        self.fail_create_folder = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn host_fault_on_refresh(mut self) -> Self {
        self.host_fault_on_refresh = true;
        self
    }

    pub fn with_folder(self, raw: &str) -> Self {
        let path = resource(raw);
        {
            let mut folders = self.folders.lock().unwrap();
            for container in path.containers() {
                folders.insert(container);
            }
            folders.insert(path);
        }
        self
    }

    pub fn with_file(self, raw: &str, contents: &[u8]) -> Self {
        let path = resource(raw);
        let store = match path.parent() {
            Some(parent) if !parent.is_root() => self.with_folder(&parent.to_string()),
            _ => self,
        };
        store.files.lock().unwrap().insert(path, contents.to_vec());
        store
    }

    pub fn with_read_only_file(self, raw: &str, contents: &[u8]) -> Self {
        let store = self.with_file(raw, contents);
        store.read_only.lock().unwrap().insert(resource(raw));
        store
    }

    pub fn contents(&self, raw: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(&resource(raw)).cloned()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn refresh_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, StoreCall::Refresh { .. }))
            .count()
    }

    pub fn write_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, StoreCall::Create { .. } | StoreCall::SetContents { .. }))
            .count()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn folder_exists(&self, path: &ResourcePath) -> bool {
        path.is_root() || self.folders.lock().unwrap().contains(path)
    }
}

impl ManagedStore for RecordingStore {
    fn state(&self, path: &ResourcePath) -> Result<TargetState, StoreError> {
        Ok(TargetState {
            exists: self.files.lock().unwrap().contains_key(path),
            read_only: self.read_only.lock().unwrap().contains(path),
            parent_exists: path.parent().is_none_or(|parent| self.folder_exists(&parent)),
        })
    }

    fn create_folder(&self, path: &ResourcePath) -> Result<(), StoreError> {
        self.record(StoreCall::CreateFolder(path.to_string()));
        if self.fail_create_folder {
            return Err(StoreError::Io {
                operation: "create folder",
                path: path.clone(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
            });
        }
        let mut folders = self.folders.lock().unwrap();
        for container in path.containers() {
            folders.insert(container);
        }
        folders.insert(path.clone());
        Ok(())
    }

    fn create(&self, path: &ResourcePath, contents: &[u8], overwrite: bool) -> Result<(), StoreError> {
        self.record(StoreCall::Create {
            path: path.to_string(),
            overwrite,
        });
        if self.fail_writes {
            return Err(StoreError::Io {
                operation: "create",
                path: path.clone(),
                source: io::Error::other("device unavailable"),
            });
        }
        let mut files = self.files.lock().unwrap();
        if files.contains_key(path) && !overwrite {
            return Err(StoreError::AlreadyExists { path: path.clone() });
        }
        files.insert(path.clone(), contents.to_vec());
        Ok(())
    }

    fn set_contents(
        &self,
        path: &ResourcePath,
        contents: &[u8],
        force: bool,
        keep_history: bool,
    ) -> Result<(), StoreError> {
        self.record(StoreCall::SetContents {
            path: path.to_string(),
            force,
            keep_history,
        });
        let mut files = self.files.lock().unwrap();
        match files.get_mut(path) {
            Some(existing) => {
                *existing = contents.to_vec();
                Ok(())
            }
            None => Err(StoreError::NotFound { path: path.clone() }),
        }
    }

    fn refresh_local(&self, path: &ResourcePath, depth: RefreshDepth) -> Result<(), StoreError> {
        self.record(StoreCall::Refresh {
            path: path.to_string(),
            depth,
        });
        if self.host_fault_on_refresh {
            return Err(StoreError::Host {
                message: "index lost".to_string(),
            });
        }
        Ok(())
    }

    fn location(&self, path: &ResourcePath) -> PathBuf {
        PathBuf::from("/memory").join(path.to_relative_path())
    }

    fn project_location(&self, project: &str) -> Option<PathBuf> {
        let path = ResourcePath::root().join(project).ok()?;
        self.folder_exists(&path)
            .then(|| PathBuf::from("/memory").join(project))
    }
}

/// Document that writes `prefix` and then fails.
pub struct FailingDocument {
    pub prefix: Vec<u8>,
}

impl DocumentHandle for FailingDocument {
    fn serialize(&self, sink: &mut dyn Write) -> io::Result<()> {
        sink.write_all(&self.prefix)?;
        Err(io::Error::other("serializer failed"))
    }
}

/// Document that sleeps before writing, giving a UI time to cancel.
pub struct SlowDocument {
    pub bytes: Vec<u8>,
    pub delay: std::time::Duration,
}

impl DocumentHandle for SlowDocument {
    fn serialize(&self, sink: &mut dyn Write) -> io::Result<()> {
        std::thread::sleep(self.delay);
        sink.write_all(&self.bytes)
    }
}

pub fn resource(raw: &str) -> ResourcePath {
    ResourcePath::parse(raw).unwrap()
}

/// `len` bytes of printable content.
pub fn sample_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| b'a' + (i % 26) as u8).collect()
}
