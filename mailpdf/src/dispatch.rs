//! Chat dispatch: run one requested action, upload the PDF to the
//! requesting channel and build the reply text for the chat front end.

use anyhow::Result;
use mailpdf_core::contract::{ArchiveSource, RenderEngine, UploadSink, VersionSource};
use mailpdf_core::pipeline::{Action, Pipeline, RenderOutcome};
use tracing::{error, info, warn};

pub const NO_ACTION_REPLY: &str = "No action requested";

/// An incoming chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub action: String,
    pub template_name: Option<String>,
    pub channel_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReply {
    pub text: String,
    pub uploaded: bool,
}

impl DispatchReply {
    fn failed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            uploaded: false,
        }
    }
}

/// Reply shown after a successful upload.
pub fn success_message(action: Action, template_name: Option<&str>) -> String {
    let name = template_name.unwrap_or_default();
    match action {
        Action::Template => format!("Generating PDF for {name}"),
        Action::Compare => format!("Generating PDF for {name} across branches"),
        Action::All => "Generating PDF for all templates".to_string(),
    }
}

/// Handle one chat request end to end.
///
/// Pipeline failures are returned as errors. Upload failures are not: their
/// message becomes the reply text.
pub async fn dispatch<V, A, E, U>(
    pipeline: &Pipeline<'_, V, A, E>,
    uploader: &U,
    request: &DispatchRequest,
) -> Result<DispatchReply>
where
    V: VersionSource + ?Sized,
    A: ArchiveSource + ?Sized,
    E: RenderEngine,
    U: UploadSink + ?Sized,
{
    info!(
        action = %request.action,
        template_name = ?request.template_name,
        channel = %request.channel_id,
        "[DISPATCH] Handling chat request"
    );

    let outcome = pipeline
        .run(&request.action, request.template_name.as_deref())
        .await
        .map_err(|e| {
            error!(error = %e, action = %request.action, "[DISPATCH] Pipeline failed");
            e
        })?;

    let artifact = match outcome {
        RenderOutcome::Rendered(artifact) => artifact,
        RenderOutcome::NotFound { name } => {
            return Ok(DispatchReply::failed(format!("No template found for {name}")));
        }
        RenderOutcome::NoAction { .. } => return Ok(DispatchReply::failed(NO_ACTION_REPLY)),
    };

    let content = artifact.pdf.read().await?;
    let receipt = match uploader
        .upload(&request.channel_id, &artifact.filename, &content)
        .await
    {
        Ok(receipt) => receipt,
        Err(e) => {
            warn!(error = %e, filename = %artifact.filename, "[DISPATCH] Upload failed");
            return Ok(DispatchReply::failed(e.to_string()));
        }
    };

    if receipt.ok {
        info!(filename = %artifact.filename, "[DISPATCH] PDF delivered");
        Ok(DispatchReply {
            text: success_message(artifact.action, artifact.template_name.as_deref()),
            uploaded: true,
        })
    } else {
        let text = receipt
            .error
            .unwrap_or_else(|| NO_ACTION_REPLY.to_string());
        warn!(reason = %text, "[DISPATCH] Upload rejected");
        Ok(DispatchReply::failed(text))
    }
}
