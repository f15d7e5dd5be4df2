//! Error taxonomy for platform resolution and asset fetching.
//!
//! Every failure the installer core can produce is an [`InstallError`]. The
//! core never prints or retries; callers decide how to render the error and
//! whether to try again (see [`InstallError::is_retryable`]).

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Alternate installation command suggested whenever the download path fails.
pub const CARGO_FALLBACK: &str = "cargo install qipi";

/// Page listing published releases, suggested when an asset is missing.
pub const RELEASES_PAGE: &str = "https://github.com/qipkg/qipi/releases";

/// Coarse classification of an [`InstallError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedPlatform,
    NotFound,
    Timeout,
    TransferError,
    FilesystemError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::UnsupportedPlatform => "unsupported platform",
            ErrorKind::NotFound => "not found",
            ErrorKind::Timeout => "timeout",
            ErrorKind::TransferError => "transfer error",
            ErrorKind::FilesystemError => "filesystem error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum InstallError {
    /// The (OS, arch) pair has no published asset.
    #[error("Unsupported platform/arch: {os} {arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// The release exists but carries no asset for this triple (HTTP 404).
    #[error("No binary available for platform: {triple} ({url})")]
    NotFound { triple: String, url: String },

    #[error("Request timed out after {}s: {url}", .after.as_secs_f64())]
    Timeout { url: String, after: Duration },

    #[error("Failed to download {url}: {reason}")]
    TransferError { url: String, reason: String },

    #[error("Failed to {action} {path:?}: {source}")]
    FilesystemError {
        path: PathBuf,
        action: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl InstallError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InstallError::UnsupportedPlatform { .. } => ErrorKind::UnsupportedPlatform,
            InstallError::NotFound { .. } => ErrorKind::NotFound,
            InstallError::Timeout { .. } => ErrorKind::Timeout,
            InstallError::TransferError { .. } => ErrorKind::TransferError,
            InstallError::FilesystemError { .. } => ErrorKind::FilesystemError,
        }
    }

    /// Only a stalled transfer may succeed on a second attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, InstallError::Timeout { .. })
    }

    /// Fallback guidance for front-ends to render next to the error message.
    pub fn hint(&self) -> String {
        match self {
            InstallError::NotFound { .. } => format!(
                "Please check {} or install via Cargo: {}",
                RELEASES_PAGE, CARGO_FALLBACK
            ),
            _ => format!("You can try installing via Cargo instead: {}", CARGO_FALLBACK),
        }
    }

    pub(crate) fn transfer(url: &str, reason: impl Into<String>) -> Self {
        InstallError::TransferError {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn filesystem(
        path: &std::path::Path,
        action: &'static str,
        source: anyhow::Error,
    ) -> Self {
        InstallError::FilesystemError {
            path: path.to_path_buf(),
            action,
            source: source.into(),
        }
    }
}
