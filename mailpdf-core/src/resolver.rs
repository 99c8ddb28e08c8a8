//! Template resolver: maps between logical template names and repository
//! paths.
//!
//! A logical name is the path with its file suffix dropped and directory
//! separators turned into dashes, so `test/template.md` is known as
//! `test-template`. Going from name to path needs the full file listing of
//! the version source; the first listed file whose derived name matches wins.

use tracing::{debug, info, warn};

use crate::contract::{TemplateDescriptor, VersionSource};
use crate::error::SourceError;

/// Logical name of a repository path.
pub fn derive_template_name(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if let Some(last) = segments.pop() {
        let stem = match last.rfind('.') {
            Some(dot) if dot > 0 => &last[..dot],
            _ => last,
        };
        segments.push(stem);
    }
    segments.join("-")
}

/// Logical name for either a path or a name. Names pass through unchanged.
pub fn name_from_identifier(identifier: &str) -> String {
    if identifier.contains('/') {
        derive_template_name(identifier)
    } else {
        identifier.to_string()
    }
}

pub struct TemplateResolver<'a, V: ?Sized> {
    source: &'a V,
}

impl<'a, V> TemplateResolver<'a, V>
where
    V: VersionSource + ?Sized,
{
    pub fn new(source: &'a V) -> Self {
        Self { source }
    }

    /// Repository path for a name, or the identifier itself when it already
    /// is a path. Lists every file on each call.
    pub async fn path_from_name(&self, name: &str) -> Result<Option<String>, SourceError> {
        if name.contains('/') {
            return Ok(Some(name.to_string()));
        }

        let files = self.source.list_all_files().await?;
        debug!(files = files.len(), name, "Searching file listing for template");
        let found = files
            .into_iter()
            .find(|path| derive_template_name(path) == name);

        match &found {
            Some(path) => info!(name, path = %path, "Resolved template name"),
            None => warn!(name, "No file matches template name"),
        }
        Ok(found)
    }

    /// Resolve a user-supplied identifier to a descriptor. Blank identifiers
    /// never resolve.
    pub async fn resolve(
        &self,
        identifier: &str,
    ) -> Result<Option<TemplateDescriptor>, SourceError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Ok(None);
        }
        let path = self.path_from_name(identifier).await?;
        Ok(path.map(|source_path| TemplateDescriptor {
            logical_name: name_from_identifier(identifier),
            source_path,
        }))
    }

    /// Browser URL of the template, if the identifier resolves.
    pub async fn web_link(&self, identifier: &str) -> Result<Option<String>, SourceError> {
        match self.resolve(identifier).await? {
            Some(descriptor) => {
                let url = self
                    .source
                    .get_file_web_link(&descriptor.source_path)
                    .await?;
                Ok(Some(url))
            }
            None => Ok(None),
        }
    }
}
