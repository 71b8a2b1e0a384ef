//! Error types for the few operations that can genuinely fail.
//!
//! Malformed DOM input and invalid metadata never produce errors. They
//! degrade to "absent" instead.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised by the content model crate.
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum ContentModelError {
    /// A co-authoring update named a version newer than anything this host has seen.
    #[error("version {version} is unknown (latest is {latest})")]
    #[diagnostic(
        code(weaver::coauthoring::unknown_version),
        help("the client is ahead of this host; resync before sending updates")
    )]
    UnknownVersion { version: u64, latest: u64 },

    /// A co-authoring update was based on a version no longer in history.
    #[error("version {version} was evicted from history (oldest kept is {oldest})")]
    #[diagnostic(
        code(weaver::coauthoring::version_evicted),
        help("pull the latest document and reapply the change")
    )]
    VersionEvicted { version: u64, oldest: u64 },

    /// Metadata or options JSON could not be read or written.
    #[error("json error: {0}")]
    #[diagnostic(code(weaver::content_model::json))]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = ContentModelError> = std::result::Result<T, E>;
