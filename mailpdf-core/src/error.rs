//! Error types for every stage of the pipeline.
//!
//! Each collaborator boundary has its own enum so callers can tell a fetch
//! failure from a broken archive or a crashed rendering engine.
//! [`PipelineError`] aggregates them for the orchestrator.
//!
//! Note that a template name that does not resolve is *not* an error: the
//! orchestrator reports it as [`crate::pipeline::RenderOutcome::NotFound`].

use thiserror::Error;

/// Failure talking to the version source or the archive source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{path} not found at {reference}")]
    NotFound { path: String, reference: String },

    #[error("request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("missing credential: {0}")]
    Credential(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Failure unpacking an archive snapshot.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to open archive: {0}")]
    Open(#[source] zip::result::ZipError),

    #[error("failed to read archive entry #{index}: {source}")]
    Entry {
        index: usize,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("failed to read archive entry {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure producing the PDF.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch rendering engine {binary}: {source}")]
    Launch {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("rendering engine exited with {status}: {stderr}")]
    Engine { status: String, stderr: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Failure handing a PDF to the upload sink.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("missing credential: {0}")]
    Credential(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("unexpected upload response: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

/// Any hard failure of a pipeline operation. Multi-document operations fail
/// as a whole: no partial PDF is ever produced.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("source fetch failed: {0}")]
    Source(#[from] SourceError),

    #[error("archive extraction failed: {0}")]
    Archive(#[from] ArchiveError),

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
}
