//! # contract: collaborator interfaces and shared data types
//!
//! This module defines the traits the pipeline talks to and the plain data
//! types that flow between pipeline stages.
//!
//! ## Collaborators
//! - [`VersionSource`]: branch listing, file listing, file content and web links.
//! - [`ArchiveSource`]: a zip snapshot of the whole tree at a reference.
//! - [`RenderEngine`]: HTML in, PDF bytes out.
//! - [`UploadSink`]: hands a finished PDF to a chat destination.
//!
//! All methods are async and return the error enum of their concern (see
//! [`crate::error`]). Implementations live next to the transport they wrap:
//! [`crate::github::GithubSource`], [`crate::render::Wkhtmltopdf`], and the
//! Slack uploader in the `mailpdf` crate.
//!
//! ## Mocking & Testing
//! - Every trait is annotated for `mockall`, so consumers get `MockVersionSource`,
//!   `MockArchiveSource`, `MockRenderEngine` and `MockUploadSink` under the
//!   `test-export-mocks` feature (enabled by default).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::{RenderError, SourceError, UploadError};

/// Raw file text as fetched from a source. Consumed once by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub source_path: String,
    pub raw_text: String,
}

/// The semantic fields of one email template.
///
/// Every field is empty when its section is missing; `labels` is always a
/// list, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTemplate {
    pub from_email: String,
    pub from_name: String,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub labels: Vec<String>,
}

/// A logical template name together with the repository path it lives at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDescriptor {
    pub logical_name: String,
    pub source_path: String,
}

/// One file's content on one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSnapshot {
    pub branch_name: String,
    pub document: Document,
}

/// A qualifying markdown file extracted from an archive snapshot, with the
/// synthetic archive root already stripped from its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub relative_path: String,
    pub content: String,
}

/// Options handed to the rendering engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub disable_smart_shrinking: bool,
    pub dpi: u32,
}

/// Result of an upload as reported by the sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Read access to the version-controlled template repository.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// All branch names, in the order the source lists them.
    async fn list_branches(&self) -> Result<Vec<String>, SourceError>;

    /// Every file path in the repository, in the order the source lists them.
    async fn list_all_files(&self) -> Result<Vec<String>, SourceError>;

    /// Raw content of `path` on the default branch.
    async fn get_file_content(&self, path: &str) -> Result<String, SourceError>;

    /// Raw content of `path` at `reference` (branch, tag or commit).
    async fn get_file_content_at(
        &self,
        path: &str,
        reference: &str,
    ) -> Result<String, SourceError>;

    /// Browser URL of `path`.
    async fn get_file_web_link(&self, path: &str) -> Result<String, SourceError>;
}

/// Whole-tree zip snapshots.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    async fn get_archive_bytes(&self, reference: &str) -> Result<Vec<u8>, SourceError>;
}

/// HTML-to-PDF engine.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RenderEngine: Send + Sync {
    async fn render(&self, html: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError>;
}

/// Destination for finished PDFs (e.g. a chat channel).
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait UploadSink: Send + Sync {
    /// Upload `content` as `filename` to `destination`.
    ///
    /// A sink-side refusal is reported through [`UploadReceipt::error`]; the
    /// `Err` arm is reserved for transport failures.
    async fn upload(
        &self,
        destination: &str,
        filename: &str,
        content: &[u8],
    ) -> Result<UploadReceipt, UploadError>;
}
