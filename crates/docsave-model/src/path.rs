//! Workspace resource paths.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::PathError;

/// Absolute, normalized path of a resource inside a managed workspace.
///
/// Rendered as `/project/folder/file`. The first segment names the project.
/// The empty path is the workspace root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    /// The workspace root.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parse a `/`-separated absolute path.
    ///
    /// Empty segments and `.` are dropped; `..` is rejected.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }
        if !trimmed.starts_with('/') {
            return Err(PathError::NotAbsolute(trimmed.to_string()));
        }

        let mut segments = Vec::new();
        for segment in trimmed.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(PathError::InvalidSegment(segment.to_string())),
                _ => {
                    validate_segment(segment)?;
                    segments.push(segment.to_string());
                }
            }
        }
        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Name of the owning project (first segment).
    pub fn project(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Containing folder. The root has no parent.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append a single child segment.
    pub fn join(&self, name: &str) -> Result<Self, PathError> {
        if name == "." || name == ".." || name.is_empty() {
            return Err(PathError::InvalidSegment(name.to_string()));
        }
        validate_segment(name)?;
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self { segments })
    }

    /// Chain of containers from the project down to the direct parent.
    pub fn containers(&self) -> Vec<Self> {
        (1..self.segments.len())
            .map(|len| Self {
                segments: self.segments[..len].to_vec(),
            })
            .collect()
    }

    /// Relative filesystem path under a workspace root.
    pub fn to_relative_path(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}

fn validate_segment(segment: &str) -> Result<(), PathError> {
    if segment.contains(['\\', '\0']) {
        return Err(PathError::InvalidSegment(segment.to_string()));
    }
    Ok(())
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for ResourcePath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ResourcePath> for String {
    fn from(value: ResourcePath) -> Self {
        value.to_string()
    }
}

impl std::str::FromStr for ResourcePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
