//! Run configuration: regions, policies, and credentials.

use clap::ValueEnum;
use std::time::Duration;

/// Zoho data center hosting the account.
///
/// Every endpoint (identity and WorkDrive API) is selected by the region;
/// mixing regions within a run is not possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Region {
    Us,
    Eu,
    In,
    Au,
    Jp,
}

impl Region {
    /// Identity host used for the refresh-token exchange.
    pub fn accounts_base(&self) -> &'static str {
        match self {
            Region::Us => "https://accounts.zoho.com",
            Region::Eu => "https://accounts.zoho.eu",
            Region::In => "https://accounts.zoho.in",
            Region::Au => "https://accounts.zoho.com.au",
            Region::Jp => "https://accounts.zoho.jp",
        }
    }

    /// WorkDrive API base for all file operations.
    pub fn api_base(&self) -> &'static str {
        match self {
            Region::Us => "https://www.zohoapis.com/workdrive/api/v1",
            Region::Eu => "https://www.zohoapis.eu/workdrive/api/v1",
            Region::In => "https://www.zohoapis.in/workdrive/api/v1",
            Region::Au => "https://www.zohoapis.com.au/workdrive/api/v1",
            Region::Jp => "https://www.zohoapis.jp/workdrive/api/v1",
        }
    }
}

/// What to do when the destination folder already holds a file with the
/// desired name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConflictPolicy {
    /// Fail that file without touching the remote folder.
    Abort,
    /// Upload under a timestamp-suffixed name.
    Rename,
    /// Trash the existing file, then upload under the original name.
    Replace,
}

/// Visibility applied to an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SharePolicy {
    /// Grant "everyone with the link" view access.
    Public,
    /// Leave the file visible to authenticated org members only.
    Skip,
}

/// Which URL forms to include in the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LinkPolicy {
    Direct,
    Preview,
    Both,
}

/// Long-lived OAuth credentials, immutable for the run.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

/// Bounded-retry settings shared by every network call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            // At least one attempt, whatever the flag said.
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}
