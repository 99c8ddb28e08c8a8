//! Branch aggregator: one file's content on every branch.

use tracing::{error, info};

use crate::contract::{BranchSnapshot, Document, VersionSource};
use crate::error::SourceError;

/// Fetch `path` at every branch, one branch at a time, in the order the
/// source lists the branches. The first failed fetch fails the whole call.
pub async fn fetch_across_branches<V>(
    source: &V,
    path: &str,
) -> Result<Vec<BranchSnapshot>, SourceError>
where
    V: VersionSource + ?Sized,
{
    let branches = source.list_branches().await.map_err(|e| {
        error!(error = %e, "Failed to list branches");
        e
    })?;
    info!(branches = branches.len(), path, "Fetching file across branches");

    let mut snapshots = Vec::with_capacity(branches.len());
    for branch in branches {
        let raw_text = source
            .get_file_content_at(path, &branch)
            .await
            .map_err(|e| {
                error!(error = %e, branch = %branch, path, "Failed to fetch file at branch");
                e
            })?;
        snapshots.push(BranchSnapshot {
            branch_name: branch,
            document: Document {
                source_path: path.to_string(),
                raw_text,
            },
        });
    }
    Ok(snapshots)
}
