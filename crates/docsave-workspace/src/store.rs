//! The managed storage contract.

use std::path::PathBuf;

use docsave_model::{ResourcePath, StoreError, TargetState};

/// How far `refresh_local` descends below the given resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshDepth {
    /// Only the resource itself.
    #[default]
    Zero,
    /// The resource and its direct children.
    One,
    /// The whole subtree.
    Infinite,
}

/// Storage API the saver writes managed resources through.
pub trait ManagedStore: Send + Sync {
    /// Existence, read-only and parent-existence flags of a resource.
    fn state(&self, path: &ResourcePath) -> Result<TargetState, StoreError>;

    fn exists(&self, path: &ResourcePath) -> bool {
        self.state(path).is_ok_and(|state| state.exists)
    }

    fn is_read_only(&self, path: &ResourcePath) -> bool {
        self.state(path).is_ok_and(|state| state.read_only)
    }

    /// Create a folder and any missing ancestors.
    fn create_folder(&self, path: &ResourcePath) -> Result<(), StoreError>;

    /// Create a new file with the given contents.
    ///
    /// Fails with `AlreadyExists` when the file exists and `overwrite` is false.
    fn create(&self, path: &ResourcePath, contents: &[u8], overwrite: bool)
    -> Result<(), StoreError>;

    /// Replace the contents of an existing file.
    ///
    /// Without `force` the write is refused when the file is out of sync with
    /// the workspace. With `keep_history` the previous contents are retained.
    fn set_contents(
        &self,
        path: &ResourcePath,
        contents: &[u8],
        force: bool,
        keep_history: bool,
    ) -> Result<(), StoreError>;

    /// Bring the workspace's view of `path` in line with the filesystem.
    fn refresh_local(&self, path: &ResourcePath, depth: RefreshDepth) -> Result<(), StoreError>;

    /// Filesystem location of a resource.
    fn location(&self, path: &ResourcePath) -> PathBuf;

    /// Root folder of a project, if the project exists.
    fn project_location(&self, project: &str) -> Option<PathBuf>;
}
