use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::{debug, info_span};

use docsave_core::{
    AppInfo, CreationProperties, DocumentLoader, DocumentProvider, DocumentSaver, ErrorReporter,
    LocalWriteStrategy, NoProgress, SaverConfig, resolve_path, resolve_project_folder,
};
use docsave_model::{
    DocumentHandle, DocumentOrigin, EditorInput, HostTaskFailure, ResourcePath, SaveOutcome,
    TargetLocation,
};
use docsave_workspace::FsWorkspace;

use crate::cli::{ResolveArgs, SaveArgs, StrategyArg};
use crate::notify::TerminalNotifier;
use crate::progress::SpinnerProgress;

const WORKSPACE_PREFIX: &str = "workspace:";

/// A document whose bytes are the contents of a file, streamed on save.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    path: PathBuf,
}

impl SourceDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentHandle for SourceDocument {
    fn serialize(&self, sink: &mut dyn Write) -> io::Result<()> {
        let mut file = File::open(&self.path)?;
        io::copy(&mut file, sink)?;
        Ok(())
    }
}

/// Loads any file as raw bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawLoader;

impl DocumentLoader for RawLoader {
    type Document = Vec<u8>;

    fn load(
        &self,
        file_name: &Path,
        reader: &mut dyn Read,
        properties: &CreationProperties,
    ) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        debug!(
            file = %file_name.display(),
            created_by = %properties.created_by,
            "Reading raw document"
        );
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// Where an editor input points.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub input: String,
    pub origin: DocumentOrigin,
    pub path: Option<PathBuf>,
    pub project_folder: Option<PathBuf>,
    /// Size of the document, if it could be loaded.
    pub document_bytes: Option<usize>,
}

/// Load the saver config from `path`, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<SaverConfig> {
    match path {
        Some(path) => SaverConfig::load_from(path)
            .with_context(|| format!("load config {}", path.display())),
        None => SaverConfig::load().context("load config"),
    }
}

pub fn run_save(args: &SaveArgs, mut config: SaverConfig, show_progress: bool) -> Result<SaveOutcome> {
    let span = info_span!("save", source = %args.source.display());
    let _guard = span.enter();

    if !args.source.is_file() {
        bail!("source {} is not a readable file", args.source.display());
    }
    if let Some(strategy) = args.strategy {
        config.local_strategy = match strategy {
            StrategyArg::AtomicReplace => LocalWriteStrategy::AtomicReplace,
            StrategyArg::InPlace => LocalWriteStrategy::InPlace,
        };
    }
    if args.no_history {
        config.keep_history = false;
    }

    let reporter = ErrorReporter::new(Arc::new(TerminalNotifier));
    let mut saver = DocumentSaver::new(config, reporter);
    let target = match (&args.to, &args.workspace, &args.resource) {
        (Some(path), _, _) => TargetLocation::local(path),
        (None, Some(root), Some(resource)) => {
            let workspace = FsWorkspace::open(root)
                .with_context(|| format!("open workspace {}", root.display()))?;
            saver = saver.with_store(Arc::new(workspace));
            let resource = ResourcePath::parse(resource)
                .with_context(|| format!("parse resource path {resource}"))?;
            TargetLocation::managed(resource)
        }
        _ => bail!("either --to or --workspace with --resource is required"),
    };

    let doc = SourceDocument::new(&args.source);
    let outcome = if show_progress {
        saver.save(&doc, &target, &mut SpinnerProgress::new())?
    } else {
        saver.save(&doc, &target, &mut NoProgress)?
    };
    Ok(outcome)
}

/// True when the saver already showed `error` through its notifier.
pub fn already_reported(error: &anyhow::Error) -> bool {
    error.downcast_ref::<HostTaskFailure>().is_some()
}

pub fn run_resolve(args: &ResolveArgs) -> Result<Resolution> {
    let (input, workspace) = parse_input(&args.input)?;

    let mut saver = DocumentSaver::new(SaverConfig::default(), ErrorReporter::headless());
    if let Some(workspace) = workspace {
        saver = saver.with_store(Arc::new(workspace));
    }
    let mut provider = DocumentProvider::new(saver, RawLoader, AppInfo::current());

    let input = match input {
        ParsedInput::Editor(input) => input,
        ParsedInput::Resource(resource) => provider.create_editor_input(resource)?,
    };

    Ok(Resolution {
        input: input.describe(),
        origin: provider.origin(&input),
        path: resolve_path(&input),
        project_folder: resolve_project_folder(&input),
        document_bytes: provider.document(&input, false).map(Vec::len),
    })
}

enum ParsedInput {
    Editor(EditorInput),
    Resource(ResourcePath),
}

/// `workspace:<DIR>:<RESOURCE>` opens a workspace; anything else is a URI.
fn parse_input(raw: &str) -> Result<(ParsedInput, Option<FsWorkspace>)> {
    let Some(rest) = raw.strip_prefix(WORKSPACE_PREFIX) else {
        return Ok((ParsedInput::Editor(EditorInput::uri(raw)), None));
    };
    let Some((root, resource)) = rest.rsplit_once(':') else {
        bail!("expected {WORKSPACE_PREFIX}<DIR>:<RESOURCE>, got {raw}");
    };
    let workspace =
        FsWorkspace::open(root).with_context(|| format!("open workspace {root}"))?;
    let resource =
        ResourcePath::parse(resource).with_context(|| format!("parse resource path {resource}"))?;
    Ok((ParsedInput::Resource(resource), Some(workspace)))
}
