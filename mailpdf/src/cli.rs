/// # mailpdf CLI Interface (Module)
///
/// Command parsing and orchestration for the `mailpdf` binary. Every
/// subcommand loads the YAML config, builds the GitHub source and the
/// `wkhtmltopdf` renderer, and runs one operation of the core
/// [`Pipeline`]. All rendering logic lives in `mailpdf-core`; this module is
/// strictly glue.
///
/// ## How To Use
/// - From the shell: `mailpdf --help`.
/// - Programmatically (integration tests): call [`run`] with a constructed [`Cli`].
use crate::dispatch::{dispatch, DispatchRequest};
use crate::load_config::{load_config, CliConfig};
use crate::upload::SlackUploader;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mailpdf_core::contract::{ArchiveSource, RenderEngine, UploadSink, VersionSource};
use mailpdf_core::github::GithubSource;
use mailpdf_core::pipeline::{Pipeline, RenderOutcome, RenderedArtifact};
use mailpdf_core::render::{PdfRenderer, Wkhtmltopdf};
use std::path::PathBuf;

/// CLI for mailpdf: render email templates kept in GitHub to PDF.
#[derive(Parser)]
#[clap(
    name = "mailpdf",
    version,
    about = "Render version-controlled email templates to PDF and share them in chat"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

/// Where a rendered PDF goes.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Path to the YAML config file
    #[clap(long)]
    pub config: PathBuf,
    /// Write the PDF here instead of `./{artifact filename}`
    #[clap(long)]
    pub out: Option<PathBuf>,
    /// Upload the PDF to this chat channel instead of writing it locally
    #[clap(long)]
    pub channel: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render one template from the default branch
    Template {
        /// Template name (e.g. `test-template`) or repository path
        name: String,
        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Render one template as it exists on every branch
    Compare {
        /// Template name or repository path
        name: String,
        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Render every template of the sync branch snapshot
    All {
        /// Use a local zip snapshot instead of downloading one
        #[clap(long)]
        archive: Option<PathBuf>,
        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Print the web link of a template
    Link {
        /// Template name or repository path
        name: String,
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Handle a chat request: render, upload and print the reply text
    Dispatch {
        /// `template`, `compare` or `all`
        #[clap(long)]
        action: String,
        #[clap(long)]
        template_name: Option<String>,
        /// Destination channel; defaults to `upload.channel` from the config
        #[clap(long)]
        channel: Option<String>,
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

fn renderer(config: &CliConfig) -> PdfRenderer<Wkhtmltopdf> {
    PdfRenderer::new(Wkhtmltopdf::new(config.render.binary.clone()))
        .with_temp_dir(config.render.temp_dir.clone())
}

fn github_source(config: &CliConfig) -> Result<GithubSource> {
    let source = GithubSource::new_from_env(config.github_repo())
        .context("Failed to construct GitHub source from env")?;
    Ok(source)
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Template { name, output } => {
            let config = load_config(&output.config)?;
            tracing::info!(command = "template", name = %name, "Rendering template");
            let source = github_source(&config)?;
            let pipeline = Pipeline::new(&source, &source, renderer(&config), config.pipeline_config());
            let outcome = pipeline.render_template(&name).await?;
            deliver(outcome, &output).await
        }
        Commands::Compare { name, output } => {
            let config = load_config(&output.config)?;
            tracing::info!(command = "compare", name = %name, "Rendering template across branches");
            let source = github_source(&config)?;
            let pipeline = Pipeline::new(&source, &source, renderer(&config), config.pipeline_config());
            let outcome = pipeline.render_compare(&name).await?;
            deliver(outcome, &output).await
        }
        Commands::All { archive, output } => {
            let config = load_config(&output.config)?;
            tracing::info!(command = "all", archive = ?archive, "Rendering all templates");
            let outcome = match archive {
                Some(path) => {
                    let bytes = tokio::fs::read(&path)
                        .await
                        .with_context(|| format!("Failed to read archive {}", path.display()))?;
                    // A local snapshot never contacts GitHub.
                    let source = GithubSource::new(config.github_repo(), String::new())?;
                    let pipeline = Pipeline::new(&source, &source, renderer(&config), config.pipeline_config());
                    pipeline.render_archive(&bytes).await?
                }
                None => {
                    let source = github_source(&config)?;
                    let pipeline = Pipeline::new(&source, &source, renderer(&config), config.pipeline_config());
                    pipeline.render_all().await?
                }
            };
            deliver(outcome, &output).await
        }
        Commands::Link { name, config } => {
            let config = load_config(&config)?;
            tracing::info!(command = "link", name = %name, "Looking up web link");
            let source = github_source(&config)?;
            let pipeline = Pipeline::new(&source, &source, renderer(&config), config.pipeline_config());
            match pipeline.resolver().web_link(&name).await? {
                Some(url) => {
                    println!("{url}");
                    Ok(())
                }
                None => Err(anyhow::anyhow!("No template found for {}", name.trim())),
            }
        }
        Commands::Dispatch {
            action,
            template_name,
            channel,
            config,
        } => {
            let config = load_config(&config)?;
            let channel_id = channel
                .or_else(|| config.upload.channel.clone())
                .ok_or_else(|| anyhow::anyhow!("No channel given and upload.channel is not configured"))?;
            tracing::info!(command = "dispatch", action = %action, "Dispatching chat request");
            let source = github_source(&config)?;
            let uploader = SlackUploader::new_from_env().context("Failed to construct uploader from env")?;
            let pipeline = Pipeline::new(&source, &source, renderer(&config), config.pipeline_config());
            let request = DispatchRequest {
                action,
                template_name,
                channel_id,
            };
            let reply = run_dispatch(&pipeline, &uploader, &request).await?;
            println!("{reply}");
            Ok(())
        }
    }
}

async fn run_dispatch<V, A, E, U>(
    pipeline: &Pipeline<'_, V, A, E>,
    uploader: &U,
    request: &DispatchRequest,
) -> Result<String>
where
    V: VersionSource + ?Sized,
    A: ArchiveSource + ?Sized,
    E: RenderEngine,
    U: UploadSink + ?Sized,
{
    match dispatch(pipeline, uploader, request).await {
        Ok(reply) => {
            tracing::info!(command = "dispatch", uploaded = reply.uploaded, "Dispatch complete");
            Ok(reply.text)
        }
        Err(e) => {
            tracing::error!(command = "dispatch", error = %e, "Dispatch failed");
            Err(e)
        }
    }
}

/// Save or upload a rendered artifact according to the output flags.
async fn deliver(outcome: RenderOutcome, output: &OutputArgs) -> Result<()> {
    let artifact = match outcome {
        RenderOutcome::Rendered(artifact) => artifact,
        RenderOutcome::NotFound { name } => {
            tracing::error!(name = %name, "Template not found");
            return Err(anyhow::anyhow!("No template found for {name}"));
        }
        RenderOutcome::NoAction { action } => {
            return Err(anyhow::anyhow!("No action requested: {action}"));
        }
    };

    if let Some(channel) = &output.channel {
        return upload_artifact(&artifact, channel).await;
    }

    let dest = output
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&artifact.filename));
    artifact
        .pdf
        .persist(&dest)
        .await
        .with_context(|| format!("Failed to write {}", dest.display()))?;
    println!("{}", dest.display());
    Ok(())
}

async fn upload_artifact(artifact: &RenderedArtifact, channel: &str) -> Result<()> {
    let uploader = SlackUploader::new_from_env().context("Failed to construct uploader from env")?;
    let content = artifact.pdf.read().await?;
    let receipt = uploader.upload(channel, &artifact.filename, &content).await?;
    if receipt.ok {
        tracing::info!(channel, filename = %artifact.filename, "Uploaded PDF");
        println!("Uploaded {} to {channel}", artifact.filename);
        Ok(())
    } else {
        let reason = receipt.error.unwrap_or_else(|| "unknown error".to_string());
        Err(anyhow::anyhow!("Upload of {} rejected: {reason}", artifact.filename))
    }
}
