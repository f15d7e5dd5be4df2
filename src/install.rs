//! Installation entry point: detect the host, resolve its target triple and
//! fetch the matching `qp` binary.

use anyhow::Result;
use log::info;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::InstallError;
use crate::fetch::{AssetFetcher, FetchAsset};
use crate::platform::{
    DefaultPlatformDetector, FixedPlatformDetector, Platform, PlatformDetector, TargetTriple,
    resolve,
};
use crate::release::DownloadRequest;
use crate::retry::with_retry;
use crate::runtime::Runtime;

pub struct Installer<F: FetchAsset, D: PlatformDetector> {
    fetcher: F,
    detector: D,
}

impl<F: FetchAsset, D: PlatformDetector> Installer<F, D> {
    pub fn new(fetcher: F, detector: D) -> Self {
        Self { fetcher, detector }
    }

    /// Target triple for the detected platform.
    pub fn target(&self) -> Result<TargetTriple, InstallError> {
        let platform = self.detector.detect();
        resolve(&platform.os, &platform.arch)
    }

    /// Resolves the target and downloads the binary into `config.install_dir`.
    ///
    /// Timeouts are retried according to `config.retry`; every other failure
    /// is returned immediately.
    #[tracing::instrument(skip(self, config))]
    pub async fn install(&self, config: &Config) -> Result<PathBuf, InstallError> {
        let triple = self.target()?;
        info!("Resolved target {} for version {}", triple, config.version);

        let request = DownloadRequest::new(&config.version, triple, &config.install_dir);

        with_retry("Downloading qp", config.retry, || {
            self.fetcher.fetch(request.clone())
        })
        .await
    }
}

fn host_platform(os: Option<&str>, arch: Option<&str>) -> Platform {
    DefaultPlatformDetector.detect().with_overrides(os, arch)
}

/// Detector for the host, with any `--os` / `--arch` overrides applied.
pub fn host_detector(config: &Config) -> FixedPlatformDetector {
    FixedPlatformDetector(host_platform(
        config.os.as_deref(),
        config.arch.as_deref(),
    ))
}

/// Target triple of the host with optional overrides. Needs no install
/// directory, home directory or network.
pub fn target_for(os: Option<&str>, arch: Option<&str>) -> Result<TargetTriple, InstallError> {
    let platform = host_platform(os, arch);
    resolve(&platform.os, &platform.arch)
}

/// Wires the real fetcher for `config` and performs the installation.
pub async fn install<R: Runtime>(runtime: R, config: &Config) -> Result<PathBuf> {
    let fetcher = AssetFetcher::new(
        runtime,
        config.http_client()?,
        config.source.clone(),
        config.timeout,
    );
    let installer = Installer::new(fetcher, host_detector(config));

    Ok(installer.install(config).await?)
}
