//! Release asset naming and download URLs.

use std::path::{Path, PathBuf};

use crate::platform::TargetTriple;

pub const DEFAULT_BASE_URL: &str = "https://github.com";
pub const DEFAULT_ORG: &str = "qipkg";
pub const DEFAULT_PROJECT: &str = "qipi";

/// Name of the installed executable, without platform suffix.
pub const BINARY_NAME: &str = "qp";

/// Where release assets are published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSource {
    pub base_url: String,
    pub org: String,
    pub project: String,
}

impl Default for ReleaseSource {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            org: DEFAULT_ORG.to_string(),
            project: DEFAULT_PROJECT.to_string(),
        }
    }
}

impl ReleaseSource {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// `{base}/{org}/{project}/releases/download/v{version}/{asset}`
    pub fn download_url(&self, version: &str, triple: &TargetTriple) -> String {
        format!(
            "{}/{}/{}/releases/download/v{}/{}",
            self.base_url.trim_end_matches('/'),
            self.org,
            self.project,
            version.trim_start_matches('v'),
            asset_name(triple)
        )
    }
}

/// `qp-{triple}`, plus `.exe` for Windows triples.
pub fn asset_name(triple: &TargetTriple) -> String {
    format!("{}-{}{}", BINARY_NAME, triple, triple.exe_suffix())
}

/// `qp` or `qp.exe`
pub fn binary_file_name(triple: &TargetTriple) -> String {
    format!("{}{}", BINARY_NAME, triple.exe_suffix())
}

/// A single asset download, consumed by the fetcher.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    pub version: String,
    pub triple: TargetTriple,
    pub destination_dir: PathBuf,
}

impl DownloadRequest {
    pub fn new(
        version: impl Into<String>,
        triple: TargetTriple,
        destination_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            version: version.into(),
            triple,
            destination_dir: destination_dir.into(),
        }
    }

    pub fn url(&self, source: &ReleaseSource) -> String {
        source.download_url(&self.version, &self.triple)
    }

    /// Final location of the installed binary.
    pub fn destination_path(&self) -> PathBuf {
        self.destination_dir.join(binary_file_name(&self.triple))
    }

    /// In-progress download, renamed onto [`Self::destination_path`] when complete.
    pub fn partial_path(&self) -> PathBuf {
        partial_path_for(&self.destination_path())
    }
}

pub(crate) fn partial_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}
