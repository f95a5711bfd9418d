//! Mapping editor inputs to filesystem paths.

use std::path::PathBuf;

use url::{ParseError, Url};

use docsave_model::EditorInput;

/// Filesystem path of the document an editor input refers to.
///
/// Workspace files yield their stored location, URIs their path component.
/// Anything else has no path.
pub fn resolve_path(input: &EditorInput) -> Option<PathBuf> {
    match input {
        EditorInput::WorkspaceFile(file) => Some(file.location.clone()),
        EditorInput::Uri { uri } => uri_path(uri),
        EditorInput::Other { .. } => None,
    }
}

/// Root folder of the input's project, or the folder containing its file.
pub fn resolve_project_folder(input: &EditorInput) -> Option<PathBuf> {
    if let EditorInput::WorkspaceFile(file) = input {
        if let Some(project) = &file.project {
            return Some(project.location.clone());
        }
    }
    resolve_path(input)?.parent().map(PathBuf::from)
}

/// Path component of a URI, percent-decoded.
///
/// Any scheme and authority is accepted, so `http://host/a/b` yields `/a/b`.
/// Scheme-less absolute paths are taken as they are. Query and fragment are
/// dropped. URIs without an absolute path component have no path.
pub fn uri_path(uri: &str) -> Option<PathBuf> {
    let uri = uri.trim();
    let parsed = match Url::parse(uri) {
        Ok(parsed) => parsed,
        Err(ParseError::RelativeUrlWithoutBase) if uri.starts_with('/') => {
            file_root()?.join(uri).ok()?
        }
        Err(_) => return None,
    };
    if !parsed.path().starts_with('/') {
        return None;
    }

    // Rebase onto a local file URL so the path decodes the same way for
    // every scheme and host.
    let mut local = file_root()?;
    local.set_path(parsed.path());
    local.to_file_path().ok()
}

fn file_root() -> Option<Url> {
    Url::parse("file:///").ok()
}
