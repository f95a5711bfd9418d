//! Writing to a managed workspace resource.

use docsave_model::{DocumentHandle, HostTaskFailure, ResourcePath, SaveError, TargetState};
use docsave_workspace::{ManagedStore, RefreshDepth};

use super::{CountingWriter, TaskError, WriteReport, store_failure};
use crate::config::SaverConfig;
use crate::progress::{SaveStep, SaveUpdate, TaskContext};

pub(super) fn write<D>(
    ctx: &TaskContext,
    doc: &D,
    store: &dyn ManagedStore,
    path: &ResourcePath,
    state: &TargetState,
    config: &SaverConfig,
) -> Result<WriteReport, TaskError>
where
    D: DocumentHandle + ?Sized,
{
    let shown = path.to_string();

    if !state.parent_exists {
        ctx.checkpoint(SaveStep::CreatingContainer)?;
        if let Some(parent) = path.parent() {
            create_container(store, &parent)?;
        }
    }

    ctx.checkpoint(SaveStep::Serializing)?;
    let mut writer = CountingWriter::new(Vec::with_capacity(config.buffer_size));
    doc.serialize(&mut writer)
        .map_err(|e| SaveError::io("write", &shown, e))?;
    let (contents, bytes_written) = writer.into_parts();
    ctx.report(SaveUpdate::Serialized {
        bytes: bytes_written,
    });

    ctx.checkpoint(SaveStep::Writing)?;
    let created = !state.exists;
    if created {
        store
            .create(path, &contents, false)
            .map_err(|e| store_failure(e, "create", &shown))?;
    } else {
        store
            .set_contents(path, &contents, true, config.keep_history)
            .map_err(|e| store_failure(e, "update", &shown))?;
    }

    // The bytes are committed; a failed refresh only leaves the workspace
    // out of sync until its next refresh.
    ctx.report(SaveUpdate::Step(SaveStep::Refreshing));
    if let Err(error) = store.refresh_local(path, RefreshDepth::Zero) {
        if error.is_host_fault() {
            return Err(TaskError::Host(HostTaskFailure::Store {
                target: shown,
                source: error,
            }));
        }
        tracing::warn!(resource = %shown, error = %error, "Workspace refresh failed");
    }

    Ok(WriteReport {
        bytes_written,
        created,
    })
}

fn create_container(store: &dyn ManagedStore, folder: &ResourcePath) -> Result<(), TaskError> {
    tracing::debug!(folder = %folder, "Creating missing container");
    store.create_folder(folder).map_err(|source| {
        if source.is_host_fault() {
            TaskError::Host(HostTaskFailure::Store {
                target: folder.to_string(),
                source,
            })
        } else {
            TaskError::Save(SaveError::ContainerCreateFailed {
                path: folder.to_string(),
                source,
            })
        }
    })
}
