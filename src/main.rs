//! workdrive-upload CLI - Upload files to Zoho WorkDrive from CI.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glob::glob;

use workdrive_upload::{
    run_batch, BatchOptions, ConflictPolicy, Credentials, FileResult, LinkPolicy, Region,
    RetryPolicy, SharePolicy, TokenProvider, WorkDriveClient,
};

/// What the process prints to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StdoutMode {
    /// Human-readable report per file.
    Full,
    /// Direct URLs only, one per line.
    Direct,
    /// Machine-readable JSON summary.
    Json,
}

/// Upload files to a Zoho WorkDrive folder and emit shareable URLs.
#[derive(Parser)]
#[command(name = "workdrive-upload")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files to upload (glob patterns like dist/*.zip are expanded).
    #[arg(required = true)]
    patterns: Vec<String>,

    /// OAuth client id.
    #[arg(long, env = "ZOHO_CLIENT_ID", hide_env_values = true)]
    client_id: String,

    /// OAuth client secret.
    #[arg(long, env = "ZOHO_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// OAuth refresh token.
    #[arg(long, env = "ZOHO_REFRESH_TOKEN", hide_env_values = true)]
    refresh_token: String,

    /// Destination folder id.
    #[arg(long, env = "ZOHO_FOLDER_ID")]
    folder_id: String,

    /// Zoho data center.
    #[arg(long, env = "ZOHO_REGION", value_enum, default_value = "us")]
    region: Region,

    /// Remote filename override (single input file only).
    #[arg(long)]
    remote_name: Option<String>,

    /// Behavior when the folder already holds a file with the same name.
    #[arg(long, value_enum, default_value = "rename")]
    conflict_mode: ConflictPolicy,

    /// Visibility applied after upload.
    #[arg(long, value_enum, default_value = "public")]
    share_mode: SharePolicy,

    /// Which URL forms to report.
    #[arg(long, value_enum, default_value = "both")]
    link_mode: LinkPolicy,

    /// Controls what is printed to stdout.
    #[arg(long, value_enum, default_value = "full")]
    stdout_mode: StdoutMode,

    /// Total attempts per network call.
    #[arg(long, default_value_t = 3)]
    max_retries: u32,

    /// Seconds to wait between attempts.
    #[arg(long, default_value_t = 2)]
    retry_delay: u64,

    /// Path to append key=value outputs for GitHub Actions
    /// (defaults to $GITHUB_OUTPUT when set).
    #[arg(long)]
    github_output: Option<PathBuf>,

    /// Key used when writing the first file's direct URL.
    #[arg(long, default_value = "zoho_direct_url")]
    output_key: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let files = expand_patterns(&cli.patterns)?;

    let credentials = Credentials {
        client_id: cli.client_id.clone(),
        client_secret: cli.client_secret.clone(),
        refresh_token: cli.refresh_token.clone(),
    };
    let retry = RetryPolicy::new(cli.max_retries, Duration::from_secs(cli.retry_delay));
    let auth = TokenProvider::new(credentials, cli.region, retry);
    let client = WorkDriveClient::new(auth, cli.region, retry);

    let options = BatchOptions {
        folder_id: cli.folder_id.clone(),
        remote_name: cli.remote_name.clone(),
        conflict: cli.conflict_mode,
        share: cli.share_mode,
        link: cli.link_mode,
    };

    eprintln!(
        "Uploading {} file(s) to folder {}...",
        files.len(),
        cli.folder_id
    );

    let results = run_batch(&client, &files, &options)
        .await
        .context("Upload run aborted")?;

    for (idx, result) in results.iter().enumerate() {
        if result.is_ok() {
            eprintln!(
                "[{}/{}] {} OK ({})",
                idx + 1,
                results.len(),
                result.source_path,
                result.resource_id.as_deref().unwrap_or("-")
            );
        } else {
            eprintln!(
                "[{}/{}] {} FAILED: {}",
                idx + 1,
                results.len(),
                result.source_path,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    print_results(cli.stdout_mode, &results)?;

    let output_target = cli
        .github_output
        .clone()
        .or_else(|| std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from));
    if let Some(target) = output_target {
        write_github_outputs(&target, &cli.output_key, &results)
            .with_context(|| format!("Failed to write outputs to {:?}", target))?;
    }

    if results.iter().any(|r| !r.is_ok()) {
        std::process::exit(1);
    }

    Ok(())
}

/// Expand each argument as a glob pattern, falling back to a literal
/// path. A pattern with no matches (and no literal file) fails the run.
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let matches: Vec<PathBuf> = glob(pattern)
            .with_context(|| format!("Invalid glob pattern: {}", pattern))?
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect();

        if matches.is_empty() {
            let literal = PathBuf::from(pattern);
            if literal.is_file() {
                files.push(resolve_file_path(&literal)?);
            } else if looks_like_glob(pattern) {
                anyhow::bail!("No files matched pattern: {}", pattern);
            } else {
                files.push(resolve_file_path(&literal)?);
            }
        } else {
            for path in matches {
                files.push(resolve_file_path(&path)?);
            }
        }
    }

    // Overlapping arguments (a glob plus a literal it covers) must not
    // upload the same file twice. Paths are absolute by now, so
    // duplicates compare equal.
    files.sort();
    files.dedup();

    if files.is_empty() {
        anyhow::bail!("No files to upload");
    }

    Ok(files)
}

fn looks_like_glob(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

/// Resolve a path to absolute form, with actionable messages when the
/// file is missing in a GitHub Actions workspace.
fn resolve_file_path(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    if absolute.is_file() {
        return Ok(absolute);
    }

    if let Ok(workspace) = std::env::var("GITHUB_WORKSPACE") {
        let workspace = PathBuf::from(workspace);
        if absolute.starts_with(&workspace) {
            anyhow::bail!("File not found in workspace: {}", absolute.display());
        }
        anyhow::bail!(
            "File not found: {}. Docker-based GitHub Actions only see paths under the \
             workspace ({}); move the file there or pass a workspace-relative path.",
            absolute.display(),
            workspace.display()
        );
    }

    anyhow::bail!("File not found: {}", absolute.display());
}

fn print_results(mode: StdoutMode, results: &[FileResult]) -> Result<()> {
    match mode {
        StdoutMode::Full => {
            for result in results {
                if result.is_ok() {
                    println!(
                        "Uploaded {} as {} (resource_id = {})",
                        result.source_path,
                        result.remote_name.as_deref().unwrap_or("-"),
                        result.resource_id.as_deref().unwrap_or("-")
                    );
                    if let Some(url) = &result.direct_url {
                        println!("  direct:  {}", url);
                    }
                    if let Some(url) = &result.preview_url {
                        println!("  preview: {}", url);
                    }
                    if let Some(html) = &result.html {
                        println!("  html:    {}", html);
                    }
                } else {
                    println!(
                        "Failed {}: {}",
                        result.source_path,
                        result.error.as_deref().unwrap_or("unknown error")
                    );
                }
            }
        }
        StdoutMode::Direct => {
            for result in results {
                if let Some(url) = &result.direct_url {
                    println!("{}", url);
                }
            }
        }
        StdoutMode::Json => {
            // Single file keeps the original object shape for existing
            // consumers; batches print an array.
            let payload = if results.len() == 1 {
                serde_json::to_string(&results[0])?
            } else {
                serde_json::to_string(results)?
            };
            println!("{}", payload);
        }
    }

    Ok(())
}

/// Append `key=value` lines in the GitHub Actions output format.
///
/// The first file writes under the unsuffixed keys; later files get a
/// `_2`, `_3`, ... suffix. A compact JSON array of every result is
/// always written under `zoho_results_json`.
fn write_github_outputs(target: &Path, output_key: &str, results: &[FileResult]) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(target)?;

    for (idx, result) in results.iter().enumerate() {
        let key = if idx == 0 {
            output_key.to_string()
        } else {
            format!("{}_{}", output_key, idx + 1)
        };
        let value = result
            .direct_url
            .as_deref()
            .or(result.preview_url.as_deref())
            .unwrap_or_default();
        writeln!(file, "{}={}", key, value)?;
    }

    if let Some(first) = results.first() {
        writeln!(
            file,
            "zoho_resource_id={}",
            first.resource_id.as_deref().unwrap_or_default()
        )?;
        writeln!(
            file,
            "zoho_remote_name={}",
            first.remote_name.as_deref().unwrap_or_default()
        )?;
        writeln!(
            file,
            "zoho_preview_url={}",
            first.preview_url.as_deref().unwrap_or_default()
        )?;
    }

    writeln!(file, "zoho_results_json={}", serde_json::to_string(results)?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdrive_upload::models::{FileStatus, LinkSet, ResourceDescriptor};

    fn ok_result(source: &str, id: &str, direct: Option<&str>) -> FileResult {
        let resource = ResourceDescriptor {
            id: id.to_string(),
            name: format!("{}.remote", source),
            parent_id: "folder".to_string(),
            permalink: None,
        };
        let links = LinkSet {
            direct_url: direct.map(str::to_string),
            preview_url: Some(format!("https://workdrive.zoho.com/file/{}/preview", id)),
            html: None,
        };
        FileResult::success(source.to_string(), &resource, links)
    }

    #[test]
    fn github_outputs_suffix_after_first_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("outputs.txt");

        let results = vec![
            ok_result("a.txt", "resA", Some("https://d/a/download")),
            ok_result("b.txt", "resB", Some("https://d/b/download")),
        ];

        write_github_outputs(&target, "zoho_direct_url", &results).unwrap();
        let written = std::fs::read_to_string(&target).unwrap();
        let lines: Vec<&str> = written.lines().collect();

        assert!(lines.contains(&"zoho_direct_url=https://d/a/download"));
        assert!(lines.contains(&"zoho_direct_url_2=https://d/b/download"));
        assert!(lines.iter().any(|l| l.starts_with("zoho_results_json=")));
        assert!(lines.contains(&"zoho_resource_id=resA"));
    }

    #[test]
    fn github_outputs_fall_back_to_preview_url() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("outputs.txt");

        let results = vec![ok_result("a.txt", "resA", None)];
        write_github_outputs(&target, "zoho_direct_url", &results).unwrap();

        let written = std::fs::read_to_string(&target).unwrap();
        assert!(written
            .lines()
            .any(|l| l == "zoho_direct_url=https://workdrive.zoho.com/file/resA/preview"));
    }

    #[test]
    fn failed_result_has_error_status() {
        let result = FileResult::failure("x.txt".to_string(), "boom".to_string());
        assert_eq!(result.status, FileStatus::Error);
        assert!(!result.is_ok());
    }

    #[test]
    fn overlapping_glob_and_literal_expand_to_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "aaa").unwrap();

        let patterns = vec![
            format!("{}/*.txt", dir.path().display()),
            file.display().to_string(),
        ];

        let files = expand_patterns(&patterns).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.txt"));
    }

    #[test]
    fn expanded_files_are_sorted_and_unique() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "bbb").unwrap();
        std::fs::write(dir.path().join("a.txt"), "aaa").unwrap();

        let glob_pattern = format!("{}/*.txt", dir.path().display());
        let files = expand_patterns(&[glob_pattern.clone(), glob_pattern]).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.txt"));
        assert!(files[1].ends_with("b.txt"));
    }

    #[test]
    fn glob_detection() {
        assert!(looks_like_glob("dist/*.zip"));
        assert!(looks_like_glob("file?.txt"));
        assert!(!looks_like_glob("plain/path.txt"));
    }
}
