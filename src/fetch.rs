//! Asset fetcher: downloads one release asset and installs it as an executable.
//!
//! A fetch attempt moves through `Requesting -> {Streaming | Redirecting} ->
//! Finalizing -> Done`, and may fail from any state. The body is written to a
//! sibling `.part` file which is only renamed onto the final path once the
//! transfer completed and the file was closed; on every failure the partial
//! file is removed.

use async_trait::async_trait;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cleanup::PartialFile;
use crate::error::InstallError;
use crate::http::{DEFAULT_IDLE_TIMEOUT, HttpClient, StreamError};
use crate::platform::TargetTriple;
use crate::release::{DownloadRequest, ReleaseSource};
use crate::runtime::Runtime;

/// Default time a transfer may sit idle before it is abandoned.
pub const DEFAULT_TIMEOUT: Duration = DEFAULT_IDLE_TIMEOUT;

/// Mode applied to the installed binary (rwxr-xr-x).
pub const EXECUTABLE_MODE: u32 = 0o755;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FetchAsset: Send + Sync {
    /// Download the asset described by `request` and return the installed path.
    async fn fetch(&self, request: DownloadRequest) -> Result<PathBuf, InstallError>;
}

pub struct AssetFetcher<R: Runtime> {
    runtime: R,
    http: HttpClient,
    source: ReleaseSource,
}

impl<R: Runtime> AssetFetcher<R> {
    /// `timeout` bounds each wait on the network (headers, then every body
    /// chunk), not the transfer as a whole.
    pub fn new(runtime: R, http: HttpClient, source: ReleaseSource, timeout: Duration) -> Self {
        Self {
            runtime,
            http: http.with_idle_timeout(timeout),
            source,
        }
    }

    /// Requests the asset and streams it into `path`. Nothing is created on
    /// disk unless the server answered `200 OK`.
    async fn transfer(
        &self,
        url: &str,
        triple: &TargetTriple,
        path: &Path,
    ) -> Result<u64, InstallError> {
        let mut response = self.http.get_asset(url, triple).await?;

        let mut file = self
            .runtime
            .create_file(path)
            .map_err(|e| InstallError::filesystem(path, "create", e))?;

        let bytes = self
            .http
            .stream_body(&mut response, &mut *file)
            .await
            .map_err(|e| match e {
                StreamError::Read(e) => InstallError::transfer(url, e.to_string()),
                StreamError::Write(e) => InstallError::filesystem(path, "write", e.into()),
                StreamError::Stalled(after) => {
                    warn!("Download of {} stalled for {:?}", url, after);
                    InstallError::Timeout {
                        url: url.to_string(),
                        after,
                    }
                }
            })?;

        drop(file);
        Ok(bytes)
    }

    fn finalize(&self, partial: &Path, destination: &Path) -> Result<(), InstallError> {
        self.runtime
            .set_permissions(partial, EXECUTABLE_MODE)
            .map_err(|e| InstallError::filesystem(partial, "set permissions on", e))?;

        self.runtime
            .rename(partial, destination)
            .map_err(|e| InstallError::filesystem(destination, "move download to", e))?;

        Ok(())
    }
}

#[async_trait]
impl<R: Runtime> FetchAsset for AssetFetcher<R> {
    #[tracing::instrument(skip(self, request), fields(triple = %request.triple))]
    async fn fetch(&self, request: DownloadRequest) -> Result<PathBuf, InstallError> {
        let url = request.url(&self.source);
        let destination = request.destination_path();

        info!("Downloading {} from {}", request.triple, url);

        debug!("Ensuring directory {:?} exists", request.destination_dir);
        self.runtime
            .create_dir_all(&request.destination_dir)
            .map_err(|e| {
                InstallError::filesystem(&request.destination_dir, "create directory", e)
            })?;

        let partial = PartialFile::new(&self.runtime, request.partial_path());

        let bytes = self
            .transfer(&url, &request.triple, partial.path())
            .await?;

        self.finalize(partial.path(), &destination)?;
        partial.success();

        info!("Installed {} bytes to {:?}", bytes, destination);
        Ok(destination)
    }
}
