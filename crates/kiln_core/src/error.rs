//! Error types for kiln_core

use thiserror::Error;

use crate::obj::ObjId;

/// Errors reported by structural tree operations and configuration loading
#[derive(Error, Debug)]
pub enum ObjError {
    /// The handle refers to a node that was deleted
    #[error("object {0:?} does not exist (deleted or never created)")]
    Stale(ObjId),

    /// Reparenting would make a node its own ancestor
    #[error("cannot move {obj:?} under its own descendant {parent:?}")]
    Cycle { obj: ObjId, parent: ObjId },

    /// Screens have no parent and cannot be reparented
    #[error("object {0:?} is a screen and cannot be reparented")]
    Screen(ObjId),

    /// Failed to read a configuration file
    #[error("failed to read configuration: {0}")]
    ConfigRead(#[from] std::io::Error),

    /// Failed to parse a configuration document
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result type for kiln_core operations
pub type Result<T> = std::result::Result<T, ObjError>;
