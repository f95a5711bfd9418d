//! Integration tests for DocumentProvider.

mod common;

use std::cell::RefCell;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use docsave_core::{
    AppInfo, CreationProperties, DocumentLoader, DocumentProvider, DocumentSaver, ErrorReporter,
    NoProgress, SaverConfig,
};
use docsave_model::{
    DocumentOrigin, EditorInput, HostTaskFailure, ProjectRef, WorkspaceFileInput,
};
use docsave_workspace::{FsWorkspace, ManagedStore};

use common::{RecordingStore, StoreCall, recording_reporter, resource};

/// Loader that returns the file text and remembers what it was given.
#[derive(Default)]
struct TextLoader {
    seen: RefCell<Vec<(PathBuf, CreationProperties)>>,
}

impl DocumentLoader for TextLoader {
    type Document = String;

    fn load(
        &self,
        file_name: &Path,
        reader: &mut dyn Read,
        properties: &CreationProperties,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.seen
            .borrow_mut()
            .push((file_name.to_path_buf(), properties.clone()));
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        if text.starts_with("<invalid") {
            return Err("not a report design".into());
        }
        Ok(text)
    }
}

fn app() -> AppInfo {
    AppInfo::new("Report Designer", "4.2.0", "v20240101")
}

fn provider(saver: DocumentSaver) -> DocumentProvider<TextLoader> {
    DocumentProvider::new(saver, TextLoader::default(), app())
}

fn uri_of(path: &Path) -> EditorInput {
    EditorInput::uri(format!("file://{}", path.display()))
}

#[test]
fn test_document_loads_once_and_caches() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.rptdesign");
    fs::write(&path, "<report v1/>").unwrap();
    let mut provider = provider(DocumentSaver::new(SaverConfig::default(), ErrorReporter::headless()));
    let input = uri_of(&path);

    assert_eq!(provider.document(&input, false).map(String::as_str), Some("<report v1/>"));
    fs::write(&path, "<report v2/>").unwrap();
    assert_eq!(provider.document(&input, false).map(String::as_str), Some("<report v1/>"));
    assert_eq!(provider.document(&input, true).map(String::as_str), Some("<report v2/>"));
}

#[test]
fn test_loader_receives_creation_properties() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.rptdesign");
    fs::write(&path, "<report/>").unwrap();
    let mut provider = provider(DocumentSaver::new(SaverConfig::default(), ErrorReporter::headless()));

    provider.document(&uri_of(&path), false);

    let loaded = provider_seen(&provider);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].0, path);
    assert_eq!(loaded[0].1.created_by, "Report Designer 4.2.0 (Build v20240101)");
    assert_eq!(loaded[0].1.resource_folder.as_deref(), Some(dir.path()));
}

fn provider_seen(provider: &DocumentProvider<TextLoader>) -> Vec<(PathBuf, CreationProperties)> {
    provider.loader().seen.borrow().clone()
}

#[test]
fn test_connected_document_wins_until_reset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.rptdesign");
    fs::write(&path, "<from disk/>").unwrap();
    let mut provider = provider(DocumentSaver::new(SaverConfig::default(), ErrorReporter::headless()));
    let input = uri_of(&path);

    provider.connect("<attached/>".to_string());

    assert_eq!(provider.document(&input, false).map(String::as_str), Some("<attached/>"));
    assert!(provider_seen(&provider).is_empty());
    assert_eq!(provider.document(&input, true).map(String::as_str), Some("<from disk/>"));
}

#[test]
fn test_load_failure_is_logged_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.rptdesign");
    fs::write(&path, "<invalid").unwrap();
    let (reporter, notifier) = recording_reporter();
    let mut provider = provider(DocumentSaver::new(SaverConfig::default(), reporter));

    assert!(provider.document(&uri_of(&path), false).is_none());
    assert!(provider.document(&uri_of(&dir.path().join("missing")), false).is_none());
    assert!(notifier.shown().is_empty());
}

#[test]
fn test_failed_reload_keeps_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.rptdesign");
    fs::write(&path, "<report/>").unwrap();
    let mut provider = provider(DocumentSaver::new(SaverConfig::default(), ErrorReporter::headless()));
    let input = uri_of(&path);

    provider.document(&input, false);
    fs::write(&path, "<invalid").unwrap();

    assert_eq!(provider.document(&input, true).map(String::as_str), Some("<report/>"));
}

#[test]
fn test_save_dispatches_on_input_kind() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(RecordingStore::new().with_folder("/proj"));
    let saver = DocumentSaver::new(SaverConfig::default(), ErrorReporter::headless())
        .with_store(store.clone());
    let provider = provider(saver);

    let workspace_input = EditorInput::WorkspaceFile(WorkspaceFileInput {
        resource: resource("/proj/a.rptdesign"),
        location: PathBuf::from("/memory/proj/a.rptdesign"),
        project: None,
    });
    let outcome = provider
        .save("<managed/>", &workspace_input, &mut NoProgress)
        .unwrap()
        .unwrap();
    assert!(outcome.is_saved());
    assert_eq!(store.contents("/proj/a.rptdesign"), Some(b"<managed/>".to_vec()));

    let path = dir.path().join("b.rptdesign");
    let outcome = provider
        .save("<local/>", &uri_of(&path), &mut NoProgress)
        .unwrap()
        .unwrap();
    assert!(outcome.is_saved());
    assert_eq!(fs::read_to_string(&path).unwrap(), "<local/>");

    let calls_before = store.calls().len();
    let nothing = provider
        .save("<lost/>", &EditorInput::other("clipboard"), &mut NoProgress)
        .unwrap();
    assert!(nothing.is_none());
    assert_eq!(store.calls().len(), calls_before);
    assert!(matches!(store.calls()[0], StoreCall::Create { .. }));
}

#[test]
fn test_create_editor_input_from_workspace() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("proj/reports")).unwrap();
    let workspace = Arc::new(FsWorkspace::open(root.path()).unwrap());
    let saver = DocumentSaver::new(SaverConfig::default(), ErrorReporter::headless())
        .with_store(workspace.clone());
    let provider = provider(saver);

    let input = provider
        .create_editor_input(resource("/proj/reports/a.rptdesign"))
        .unwrap();

    let EditorInput::WorkspaceFile(file) = &input else {
        panic!("expected a workspace file input, got {input:?}");
    };
    assert_eq!(file.location, workspace.location(&resource("/proj/reports/a.rptdesign")));
    assert_eq!(
        file.project,
        Some(ProjectRef {
            name: "proj".into(),
            location: workspace.root().join("proj"),
        })
    );
    assert_eq!(provider.origin(&input), DocumentOrigin::Workspace);
    assert_eq!(
        provider.origin(&EditorInput::uri("file:///tmp/a")),
        DocumentOrigin::FileSystem
    );
}

#[test]
fn test_create_editor_input_without_workspace() {
    let provider = provider(DocumentSaver::new(SaverConfig::default(), ErrorReporter::headless()));
    let result = provider.create_editor_input(resource("/proj/a.rptdesign"));
    assert!(matches!(result, Err(HostTaskFailure::NoWorkspace { .. })));
}
