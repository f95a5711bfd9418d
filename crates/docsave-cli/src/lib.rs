//! Library side of the `docsave` command line tool.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod notify;
pub mod progress;
pub mod summary;
