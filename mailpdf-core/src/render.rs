//! PDF renderer: wraps a [`RenderEngine`] with the fixed house style and
//! options, and hands back an owned [`RenderedPdf`].
//!
//! The PDF is written to a uniquely named temporary file (a v4 UUID). The
//! handle owns that file and removes it when dropped, so no artifact
//! outlives the request unless the caller copies it out with
//! [`RenderedPdf::persist`].

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::contract::{RenderEngine, RenderOptions};
use crate::error::RenderError;

/// Style prepended to every document.
pub const STYLE_BLOCK: &str = r#"<style type="text/css">
  html {
    font-family: sans-serif;
  }
  br {
    content: "";
    margin: 2em;
    display: block;
    font-size: 24%;
  }
</style>
"#;

pub const RENDER_DPI: u32 = 196;

/// The only options the pipeline ever renders with.
pub const FIXED_OPTIONS: RenderOptions = RenderOptions {
    disable_smart_shrinking: true,
    dpi: RENDER_DPI,
};

/// Prefix `html` with [`STYLE_BLOCK`].
pub fn with_style(html: &str) -> String {
    let mut document = String::with_capacity(STYLE_BLOCK.len() + html.len());
    document.push_str(STYLE_BLOCK);
    document.push_str(html);
    document
}

/// A rendered PDF in temporary storage. The file is deleted on drop.
#[derive(Debug)]
pub struct RenderedPdf {
    file: NamedTempFile,
    len: u64,
}

impl RenderedPdf {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A fresh read handle positioned at the start of the PDF.
    pub fn open(&self) -> io::Result<File> {
        self.file.reopen()
    }

    pub async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.file.path()).await
    }

    /// Copy the PDF to `dest`. The temporary file is still removed on drop.
    pub async fn persist(&self, dest: &Path) -> io::Result<()> {
        tokio::fs::copy(self.file.path(), dest).await?;
        info!(path = %dest.display(), size = self.len, "Saved rendered PDF");
        Ok(())
    }
}

pub struct PdfRenderer<E> {
    engine: E,
    temp_dir: Option<PathBuf>,
}

impl<E: RenderEngine> PdfRenderer<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            temp_dir: None,
        }
    }

    /// Place rendered PDFs in `dir` instead of the system temp directory.
    pub fn with_temp_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.temp_dir = dir;
        self
    }

    pub async fn render(&self, html: &str) -> Result<RenderedPdf, RenderError> {
        let document = with_style(html);
        debug!(html_len = document.len(), "[RENDER] Invoking rendering engine");

        let bytes = self.engine.render(&document, &FIXED_OPTIONS).await.map_err(|e| {
            error!(error = %e, "[RENDER] Rendering engine failed");
            e
        })?;

        let stem = Uuid::new_v4().simple().to_string();
        let mut builder = tempfile::Builder::new();
        builder.prefix(&stem).suffix(".pdf").rand_bytes(0);
        let file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        tokio::fs::write(file.path(), &bytes).await?;

        info!(
            path = %file.path().display(),
            size = bytes.len(),
            "[RENDER] Wrote PDF to temporary storage"
        );
        Ok(RenderedPdf {
            file,
            len: bytes.len() as u64,
        })
    }
}

/// [`RenderEngine`] backed by the `wkhtmltopdf` executable. HTML goes in on
/// stdin and the PDF comes back on stdout.
#[derive(Debug, Clone)]
pub struct Wkhtmltopdf {
    binary: PathBuf,
}

impl Default for Wkhtmltopdf {
    fn default() -> Self {
        Self::new("wkhtmltopdf")
    }
}

impl Wkhtmltopdf {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn args(options: &RenderOptions) -> Vec<String> {
        let mut args = vec!["--quiet".to_string()];
        if options.disable_smart_shrinking {
            args.push("--disable-smart-shrinking".to_string());
        }
        args.push("--dpi".to_string());
        args.push(options.dpi.to_string());
        args.push("-".to_string());
        args.push("-".to_string());
        args
    }
}

#[async_trait]
impl RenderEngine for Wkhtmltopdf {
    async fn render(&self, html: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
        let mut child = Command::new(&self.binary)
            .args(Self::args(options))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Launch {
                binary: self.binary.display().to_string(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RenderError::Other("engine stdin unavailable".to_string()))?;
        let input = html.as_bytes();
        // stdin is dropped at the end of the block, closing the pipe.
        let feed = async move { stdin.write_all(input).await };

        let (written, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            return Err(RenderError::Engine {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;
        if output.stdout.is_empty() {
            return Err(RenderError::Other("engine produced no output".to_string()));
        }
        Ok(output.stdout)
    }
}
