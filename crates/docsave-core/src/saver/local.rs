//! Writing to a local filesystem path.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use docsave_model::{DocumentHandle, SaveError, TargetState};

use super::{CountingWriter, TaskError, WriteReport};
use crate::config::{LocalWriteStrategy, SaverConfig};
use crate::progress::{SaveStep, SaveUpdate, TaskContext};

pub(super) fn write<D>(
    ctx: &TaskContext,
    doc: &D,
    path: &Path,
    state: &TargetState,
    config: &SaverConfig,
) -> Result<WriteReport, TaskError>
where
    D: DocumentHandle + ?Sized,
{
    match config.local_strategy {
        LocalWriteStrategy::AtomicReplace => write_atomic(ctx, doc, path, state, config),
        LocalWriteStrategy::InPlace => write_in_place(ctx, doc, path, state, config),
    }
}

/// Stream into a sibling temp file, then rename it over the target.
///
/// Cancellation is honored up to the rename; until then the target is
/// untouched.
fn write_atomic<D>(
    ctx: &TaskContext,
    doc: &D,
    path: &Path,
    state: &TargetState,
    config: &SaverConfig,
) -> Result<WriteReport, TaskError>
where
    D: DocumentHandle + ?Sized,
{
    let shown = path.display().to_string();
    ctx.checkpoint(SaveStep::Serializing)?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::Builder::new()
        .prefix(".docsave-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| SaveError::io("create", &shown, e))?;

    // Dropping `temp` on an early return removes it.
    let bytes_written = stream(ctx, doc, temp.as_file_mut(), config.buffer_size, &shown)?;

    ctx.checkpoint(SaveStep::Writing)?;
    temp.as_file()
        .sync_all()
        .map_err(|e| SaveError::io("sync", &shown, e))?;

    if let Ok(metadata) = fs::metadata(path) {
        if let Err(e) = temp.as_file().set_permissions(metadata.permissions()) {
            tracing::warn!(path = %shown, error = %e, "Could not carry over file permissions");
        }
    }

    temp.persist(path)
        .map_err(|e| SaveError::io("commit", &shown, e.error))?;

    Ok(WriteReport {
        bytes_written,
        created: !state.exists,
    })
}

/// Truncate the target and stream straight into it.
///
/// Cancellation is only honored before the file is opened. A file this call
/// created is removed again if the write fails.
fn write_in_place<D>(
    ctx: &TaskContext,
    doc: &D,
    path: &Path,
    state: &TargetState,
    config: &SaverConfig,
) -> Result<WriteReport, TaskError>
where
    D: DocumentHandle + ?Sized,
{
    let shown = path.display().to_string();
    ctx.checkpoint(SaveStep::Serializing)?;

    let mut file = File::create(path).map_err(|e| SaveError::io("create", &shown, e))?;
    let created = !state.exists;

    let result = stream(ctx, doc, &mut file, config.buffer_size, &shown).and_then(|bytes| {
        ctx.report(SaveUpdate::Step(SaveStep::Writing));
        file.sync_all()
            .map_err(|e| SaveError::io("sync", &shown, e))?;
        Ok(bytes)
    });
    drop(file);

    match result {
        Ok(bytes_written) => Ok(WriteReport {
            bytes_written,
            created,
        }),
        Err(error) => {
            if created {
                if let Err(e) = fs::remove_file(path) {
                    tracing::warn!(path = %shown, error = %e, "Could not remove partial file");
                }
            }
            Err(error.into())
        }
    }
}

/// Serialize `doc` through a buffer of `buffer_size` bytes into `sink`.
///
/// Returns the byte count once the buffer is flushed.
fn stream<D, W>(
    ctx: &TaskContext,
    doc: &D,
    sink: W,
    buffer_size: usize,
    shown: &str,
) -> Result<u64, SaveError>
where
    D: DocumentHandle + ?Sized,
    W: Write,
{
    let mut writer = CountingWriter::new(BufWriter::with_capacity(buffer_size, sink));
    doc.serialize(&mut writer)
        .map_err(|e| SaveError::io("write", shown, e))?;

    let (mut buffered, bytes) = writer.into_parts();
    buffered
        .flush()
        .map_err(|e| SaveError::io("flush", shown, e))?;
    ctx.report(SaveUpdate::Serialized { bytes });
    Ok(bytes)
}
