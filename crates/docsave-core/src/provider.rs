//! Document provider.
//!
//! Ties an editor frame to its document: loads the document an editor input
//! points at, keeps it attached, and routes saves to the right target kind.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use docsave_model::{
    DocumentHandle, DocumentOrigin, EditorInput, HostTaskFailure, LoadError, ProjectRef,
    ResourcePath, SaveOutcome, TargetLocation, WorkspaceFileInput,
};

use crate::progress::ProgressSink;
use crate::resolve::{resolve_path, resolve_project_folder};
use crate::saver::DocumentSaver;

/// Name, version and build of the application creating documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub build: String,
}

impl AppInfo {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        build: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            build: build.into(),
        }
    }

    /// This crate's own name and version. The build id comes from
    /// `DOCSAVE_BUILD` at compile time.
    pub fn current() -> Self {
        Self::new(
            "docsave",
            env!("CARGO_PKG_VERSION"),
            option_env!("DOCSAVE_BUILD").unwrap_or("dev"),
        )
    }

    /// Value recorded as the creator of loaded documents.
    pub fn created_by(&self) -> String {
        format!("{} {} (Build {})", self.name, self.version, self.build)
    }
}

impl Default for AppInfo {
    fn default() -> Self {
        Self::current()
    }
}

/// Properties handed to the loader along with the document bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationProperties {
    pub created_by: String,
    /// Folder relative resources of the document are looked up in.
    pub resource_folder: Option<PathBuf>,
}

/// Parses documents for a [`DocumentProvider`].
pub trait DocumentLoader {
    type Document;

    fn load(
        &self,
        file_name: &Path,
        reader: &mut dyn Read,
        properties: &CreationProperties,
    ) -> Result<Self::Document, Box<dyn std::error::Error + Send + Sync>>;
}

/// Holds the document of one editor and saves it back where it came from.
pub struct DocumentProvider<L: DocumentLoader> {
    saver: DocumentSaver,
    loader: L,
    app: AppInfo,
    document: Option<L::Document>,
}

impl<L: DocumentLoader> DocumentProvider<L> {
    pub fn new(saver: DocumentSaver, loader: L, app: AppInfo) -> Self {
        Self {
            saver,
            loader,
            app,
            document: None,
        }
    }

    pub fn saver(&self) -> &DocumentSaver {
        &self.saver
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Attach an already open document.
    pub fn connect(&mut self, document: L::Document) {
        self.document = Some(document);
    }

    /// The attached document, loading it from `input` when none is attached
    /// or `reset` is set.
    ///
    /// Load failures are logged, never shown, and leave any previously
    /// attached document in place.
    pub fn document(&mut self, input: &EditorInput, reset: bool) -> Option<&L::Document> {
        if self.document.is_none() || reset {
            if let Some(path) = resolve_path(input) {
                match self.load(input, &path) {
                    Ok(document) => self.document = Some(document),
                    Err(error) => self.saver.reporter().handle(&error, true),
                }
            } else {
                tracing::debug!(input = %input.describe(), "Input has no file to load");
            }
        }
        self.document.as_ref()
    }

    fn load(&self, input: &EditorInput, path: &Path) -> Result<L::Document, LoadError> {
        let properties = CreationProperties {
            created_by: self.app.created_by(),
            resource_folder: resolve_project_folder(input),
        };
        let file = File::open(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut reader = BufReader::new(file);

        tracing::debug!(path = %path.display(), "Loading document");
        self.loader
            .load(path, &mut reader, &properties)
            .map_err(|source| LoadError::Document {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Save `doc` to wherever `input` points.
    ///
    /// Returns `Ok(None)` without writing anything when the input has no
    /// resolvable location.
    pub fn save<D>(
        &self,
        doc: &D,
        input: &EditorInput,
        progress: &mut dyn ProgressSink,
    ) -> Result<Option<SaveOutcome>, HostTaskFailure>
    where
        D: DocumentHandle + Sync + ?Sized,
    {
        let Some(target) = target_for(input) else {
            tracing::warn!(input = %input.describe(), "Nowhere to save input");
            return Ok(None);
        };
        self.saver.save(doc, &target, progress).map(Some)
    }

    /// Editor input for a workspace resource.
    pub fn create_editor_input(&self, resource: ResourcePath) -> Result<EditorInput, HostTaskFailure> {
        let store = self
            .saver
            .store()
            .ok_or_else(|| HostTaskFailure::NoWorkspace {
                target: resource.to_string(),
            })?;
        let project = resource.project().and_then(|name| {
            store.project_location(name).map(|location| ProjectRef {
                name: name.to_string(),
                location,
            })
        });
        Ok(EditorInput::WorkspaceFile(WorkspaceFileInput {
            location: store.location(&resource),
            resource,
            project,
        }))
    }

    pub fn origin(&self, input: &EditorInput) -> DocumentOrigin {
        DocumentOrigin::of(input)
    }
}

/// Save target an editor input maps to.
pub fn target_for(input: &EditorInput) -> Option<TargetLocation> {
    match input {
        EditorInput::WorkspaceFile(file) => Some(TargetLocation::managed(file.resource.clone())),
        _ => resolve_path(input).map(TargetLocation::LocalPath),
    }
}
