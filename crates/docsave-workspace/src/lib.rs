//! Managed workspace storage.
//!
//! A managed workspace is a tree of projects, folders and files with its own
//! existence and read-only metadata and an explicit refresh step that tells
//! the workspace what is currently on disk. The saver only talks to the
//! [`ManagedStore`] trait; [`FsWorkspace`] is the filesystem-backed
//! implementation.
//!
//! # Features
//!
//! - **Atomic writes**: `create` and `set_contents` replace a file in one rename
//! - **Sync tracking**: unforced writes fail when the file changed on disk
//!   since the last refresh
//! - **Local history**: previous contents can be kept before an overwrite

mod fs;
mod history;
mod store;

pub use fs::FsWorkspace;
pub use history::{HISTORY_DIR, HistoryEntry};
pub use store::{ManagedStore, RefreshDepth};
