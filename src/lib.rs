//! workdrive_upload - Upload files to Zoho WorkDrive from CI.
//!
//! This library provides the pieces behind the `workdrive-upload` action:
//! - Exchange a refresh token for an access token (once per run)
//! - Resolve duplicate-filename conflicts (abort, rename, replace)
//! - Upload local files to a WorkDrive folder
//! - Apply a sharing policy and derive direct/preview URLs
//! - Drive a whole batch of files, collecting one result per input
//!
//! # Example
//!
//! ```no_run
//! use workdrive_upload::{
//!     BatchOptions, ConflictPolicy, Credentials, LinkPolicy, Region,
//!     RetryPolicy, SharePolicy, TokenProvider, WorkDriveClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let credentials = Credentials {
//!         client_id: "id".into(),
//!         client_secret: "secret".into(),
//!         refresh_token: "refresh".into(),
//!     };
//!     let retry = RetryPolicy::default();
//!     let auth = TokenProvider::new(credentials, Region::Us, retry);
//!     let client = WorkDriveClient::new(auth, Region::Us, retry);
//!
//!     let options = BatchOptions {
//!         folder_id: "folder-id".into(),
//!         remote_name: None,
//!         conflict: ConflictPolicy::Rename,
//!         share: SharePolicy::Public,
//!         link: LinkPolicy::Both,
//!     };
//!     let results =
//!         workdrive_upload::run_batch(&client, &["artifact.zip".into()], &options).await?;
//!     for result in results {
//!         println!("{}: {:?}", result.source_path, result.direct_url);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod links;
pub mod models;
pub mod retry;

// Re-exports for convenience
pub use auth::TokenProvider;
pub use batch::{run_batch, BatchOptions};
pub use client::WorkDriveClient;
pub use config::{ConflictPolicy, Credentials, LinkPolicy, Region, RetryPolicy, SharePolicy};
pub use error::{ActionError, Result};
pub use models::{FileResult, FileStatus, LinkSet, ResourceDescriptor};
