//! Conflict resolution and batch orchestration.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::client::WorkDriveClient;
use crate::config::{ConflictPolicy, LinkPolicy, SharePolicy};
use crate::error::{ActionError, Result};
use crate::links::resolve_links;
use crate::models::{FileResult, LinkSet, ResourceDescriptor};

/// Options shared by every file in a batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub folder_id: String,
    /// Remote filename override; only valid for single-file batches.
    pub remote_name: Option<String>,
    pub conflict: ConflictPolicy,
    pub share: SharePolicy,
    pub link: LinkPolicy,
}

/// Append a UTC timestamp before the extension to sidestep a name
/// collision: `report.zip` becomes `report-20260829-142233.zip`.
///
/// Two renames within the same second can still collide; the new name is
/// not re-checked against the folder. Known limitation.
pub fn unique_name(desired: &str, now: DateTime<Utc>) -> String {
    let stamp = now.format("%Y%m%d-%H%M%S");
    match desired.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, stamp, ext),
        _ => format!("{}-{}", desired, stamp),
    }
}

/// Decide the remote name to upload under, running the conflict
/// pre-step if the folder already holds a file with the desired name.
pub async fn resolve_remote_name(
    client: &WorkDriveClient,
    folder_id: &str,
    desired: &str,
    policy: ConflictPolicy,
) -> Result<String> {
    let existing = client.find_file(folder_id, desired).await?;

    match existing {
        None => Ok(desired.to_string()),
        Some(item) => match policy {
            ConflictPolicy::Abort => Err(ActionError::Conflict(desired.to_string())),
            ConflictPolicy::Rename => Ok(unique_name(desired, Utc::now())),
            ConflictPolicy::Replace => {
                client.trash_file(&item.id).await?;
                Ok(desired.to_string())
            }
        },
    }
}

fn desired_remote_name(path: &Path, override_name: Option<&str>) -> Result<String> {
    if let Some(name) = override_name {
        return Ok(name.to_string());
    }
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| ActionError::NotFound(path.display().to_string()))
}

/// Upload one file end to end: conflict pre-step, upload, share, links.
async fn process_file(
    client: &WorkDriveClient,
    path: &Path,
    options: &BatchOptions,
) -> Result<(ResourceDescriptor, LinkSet)> {
    let desired = desired_remote_name(path, options.remote_name.as_deref())?;
    let remote_name =
        resolve_remote_name(client, &options.folder_id, &desired, options.conflict).await?;

    let mut resource = client
        .upload_file(path, &options.folder_id, &remote_name)
        .await?;

    let shared = match options.share {
        SharePolicy::Public => {
            if let Some(permalink) = client.share_public(&resource.id).await? {
                resource.permalink = Some(permalink);
            }
            true
        }
        SharePolicy::Skip => false,
    };

    let links = resolve_links(resource.permalink.as_deref(), shared, options.link);
    Ok((resource, links))
}

/// Run the whole batch, producing exactly one [`FileResult`] per input
/// path, in input order.
///
/// `Config` and `Auth` errors abort the run before or at the first
/// network call; per-file errors are recorded in that file's result and
/// the batch moves on. Files already uploaded are never rolled back.
pub async fn run_batch(
    client: &WorkDriveClient,
    paths: &[PathBuf],
    options: &BatchOptions,
) -> Result<Vec<FileResult>> {
    if options.remote_name.is_some() && paths.len() > 1 {
        return Err(ActionError::Config(
            "--remote-name is only valid with a single input file".to_string(),
        ));
    }

    // One identity call per run; a bad credential fails everything here.
    client.ensure_token().await?;

    let mut results = Vec::with_capacity(paths.len());
    for path in paths {
        let source = path.display().to_string();
        let result = match process_file(client, path, options).await {
            Ok((resource, links)) => FileResult::success(source, &resource, links),
            Err(err) => FileResult::failure(source, err.to_string()),
        };
        results.push(result);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn unique_name_inserts_stamp_before_extension() {
        let now = Utc.with_ymd_and_hms(2026, 8, 29, 14, 22, 33).unwrap();
        assert_eq!(unique_name("report.zip", now), "report-20260829-142233.zip");
    }

    #[test]
    fn unique_name_without_extension_appends_stamp() {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(unique_name("README", now), "README-20260102-030405");
    }

    #[test]
    fn unique_name_keeps_hidden_file_prefix() {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        // ".env" has no stem, so the stamp goes at the end.
        assert_eq!(unique_name(".env", now), ".env-20260102-030405");
    }

    #[test]
    fn unique_name_stamp_is_fourteen_digits() {
        let name = unique_name("report.zip", Utc::now());
        let digits: String = name
            .strip_prefix("report-")
            .unwrap()
            .strip_suffix(".zip")
            .unwrap()
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        assert_eq!(digits.len(), 14);
    }

    #[test]
    fn desired_name_defaults_to_basename() {
        let path = Path::new("/tmp/build/artifact.tar.gz");
        assert_eq!(desired_remote_name(path, None).unwrap(), "artifact.tar.gz");
        assert_eq!(
            desired_remote_name(path, Some("custom.bin")).unwrap(),
            "custom.bin"
        );
    }
}
