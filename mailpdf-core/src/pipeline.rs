//! High-level pipeline: resolve → fetch → parse → compose → render.
//!
//! This module sequences the components of the crate into the three
//! operations offered to the chat front end:
//!   - single template ([`Pipeline::render_template`])
//!   - one template across every branch ([`Pipeline::render_compare`])
//!   - every template in an archive snapshot ([`Pipeline::render_all`])
//!
//! [`Pipeline::run`] maps a raw action identifier onto those operations.
//!
//! # Responsibilities
//! - Each stage is awaited before the next begins; branches and archive
//!   entries are processed one at a time, in source order.
//! - All-or-nothing: any fetch, extraction or rendering failure aborts the
//!   whole operation and no PDF is produced.
//! - Soft outcomes are values, not errors: an unresolvable template name is
//!   [`RenderOutcome::NotFound`], an unknown action is [`RenderOutcome::NoAction`].

use tracing::{error, info, warn};

use crate::archive;
use crate::branches::fetch_across_branches;
use crate::compose::{RenderEntry, RenderRequest};
use crate::config::PipelineConfig;
use crate::contract::{ArchiveSource, RenderEngine, VersionSource};
use crate::error::PipelineError;
use crate::parser::parse_template;
use crate::render::{PdfRenderer, RenderedPdf};
use crate::resolver::{derive_template_name, name_from_identifier, TemplateResolver};

pub const ALL_TEMPLATES_FILENAME: &str = "all-templates.pdf";

/// The operations a caller may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Template,
    Compare,
    All,
}

impl Action {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "template" => Some(Action::Template),
            "compare" => Some(Action::Compare),
            "all" => Some(Action::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Template => "template",
            Action::Compare => "compare",
            Action::All => "all",
        }
    }

    /// Filename the artifact of this action is published under.
    pub fn artifact_filename(&self, template_name: Option<&str>) -> String {
        let name = template_name.unwrap_or_default();
        match self {
            Action::Template => format!("{name}.pdf"),
            Action::Compare => format!("{name}-compare.pdf"),
            Action::All => ALL_TEMPLATES_FILENAME.to_string(),
        }
    }
}

/// A finished PDF plus what it was made from.
#[derive(Debug)]
pub struct RenderedArtifact {
    pub action: Action,
    pub template_name: Option<String>,
    pub filename: String,
    pub documents: usize,
    pub pdf: RenderedPdf,
}

#[derive(Debug)]
pub enum RenderOutcome {
    Rendered(RenderedArtifact),
    NotFound { name: String },
    NoAction { action: String },
}

pub struct Pipeline<'a, V: ?Sized, A: ?Sized, E> {
    source: &'a V,
    archive: &'a A,
    renderer: PdfRenderer<E>,
    config: PipelineConfig,
}

impl<'a, V, A, E> Pipeline<'a, V, A, E>
where
    V: VersionSource + ?Sized,
    A: ArchiveSource + ?Sized,
    E: RenderEngine,
{
    pub fn new(
        source: &'a V,
        archive: &'a A,
        renderer: PdfRenderer<E>,
        config: PipelineConfig,
    ) -> Self {
        config.trace_loaded();
        Self {
            source,
            archive,
            renderer,
            config,
        }
    }

    pub fn resolver(&self) -> TemplateResolver<'a, V> {
        TemplateResolver::new(self.source)
    }

    /// Dispatch a raw action identifier. Unknown actions are not an error.
    pub async fn run(
        &self,
        action: &str,
        template_name: Option<&str>,
    ) -> Result<RenderOutcome, PipelineError> {
        let name = template_name.unwrap_or_default();
        match Action::parse(action) {
            Some(Action::Template) => self.render_template(name).await,
            Some(Action::Compare) => self.render_compare(name).await,
            Some(Action::All) => self.render_all().await,
            None => {
                warn!(action, "[PIPELINE] No action requested");
                Ok(RenderOutcome::NoAction {
                    action: action.to_string(),
                })
            }
        }
    }

    /// One template, fetched from the default branch.
    pub async fn render_template(&self, name: &str) -> Result<RenderOutcome, PipelineError> {
        info!(name, "[PIPELINE] Rendering single template");
        let Some(descriptor) = self.resolver().resolve(name).await? else {
            return Ok(not_found(name));
        };

        let raw_text = self
            .source
            .get_file_content(&descriptor.source_path)
            .await
            .map_err(|e| {
                error!(error = %e, path = %descriptor.source_path, "[PIPELINE] Fetch failed");
                e
            })?;

        let mut request = RenderRequest::new();
        request.push(RenderEntry::new(
            descriptor.logical_name.clone(),
            descriptor.source_path,
            parse_template(&raw_text),
        ));
        self.finish(Action::Template, Some(descriptor.logical_name), request)
            .await
    }

    /// One template on every branch, each entry labelled with its branch.
    pub async fn render_compare(&self, name: &str) -> Result<RenderOutcome, PipelineError> {
        info!(name, "[PIPELINE] Rendering template across branches");
        let Some(descriptor) = self.resolver().resolve(name).await? else {
            return Ok(not_found(name));
        };

        let snapshots = fetch_across_branches(self.source, &descriptor.source_path).await?;
        let request: RenderRequest = snapshots
            .into_iter()
            .map(|snapshot| {
                RenderEntry::new(
                    descriptor.logical_name.clone(),
                    snapshot.document.source_path,
                    parse_template(&snapshot.document.raw_text),
                )
                .with_label(snapshot.branch_name)
            })
            .collect();
        self.finish(Action::Compare, Some(descriptor.logical_name), request)
            .await
    }

    /// Every template in the archive snapshot at the configured sync reference.
    pub async fn render_all(&self) -> Result<RenderOutcome, PipelineError> {
        let reference = self.config.sync_reference.as_str();
        info!(reference, "[PIPELINE] Rendering all templates");
        let bytes = self.archive.get_archive_bytes(reference).await.map_err(|e| {
            error!(error = %e, reference, "[PIPELINE] Archive download failed");
            e
        })?;
        self.render_archive(&bytes).await
    }

    /// Every template in an archive already in hand.
    pub async fn render_archive(&self, bytes: &[u8]) -> Result<RenderOutcome, PipelineError> {
        let entries = archive::extract_bytes(bytes)?;
        let request: RenderRequest = entries
            .into_iter()
            .map(|entry| {
                RenderEntry::new(
                    derive_template_name(&entry.relative_path),
                    entry.relative_path,
                    parse_template(&entry.content),
                )
            })
            .collect();
        self.finish(Action::All, None, request).await
    }

    async fn finish(
        &self,
        action: Action,
        template_name: Option<String>,
        request: RenderRequest,
    ) -> Result<RenderOutcome, PipelineError> {
        let documents = request.len();
        let html = request.compose();
        let pdf = self.renderer.render(&html).await?;
        let filename = action.artifact_filename(template_name.as_deref());
        info!(
            action = action.as_str(),
            documents,
            filename = %filename,
            size = pdf.len(),
            "[PIPELINE] Rendered PDF"
        );
        Ok(RenderOutcome::Rendered(RenderedArtifact {
            action,
            template_name,
            filename,
            documents,
            pdf,
        }))
    }
}

fn not_found(name: &str) -> RenderOutcome {
    warn!(name, "[PIPELINE] Template not found");
    RenderOutcome::NotFound {
        name: name_from_identifier(name.trim()),
    }
}
