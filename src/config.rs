use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::DEFAULT_TIMEOUT;
use crate::http::HttpClient;
use crate::release::ReleaseSource;
use crate::retry::RetryPolicy;
use crate::runtime::Runtime;

/// Environment variable naming the Qipi home; binaries go to `$QIPI_HOME/bin`.
pub const QIPI_HOME_ENV: &str = "QIPI_HOME";

/// Release installed when no version is requested.
pub const DEFAULT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const USER_AGENT: &str = concat!("qipi-install/", env!("CARGO_PKG_VERSION"));

/// Raw settings as collected by a front-end; unset fields take defaults.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub version: Option<String>,
    pub install_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub retries: Option<usize>,
    pub os: Option<String>,
    pub arch: Option<String>,
}

/// Resolved settings for one installation.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub version: String,
    pub install_dir: PathBuf,
    pub source: ReleaseSource,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub os: Option<String>,
    pub arch: Option<String>,
}

impl Config {
    pub fn new<R: Runtime>(runtime: &R, options: Options) -> Result<Self> {
        let install_dir = match options.install_dir {
            Some(dir) => dir,
            None => default_install_dir(runtime)?,
        };
        debug!("Install directory: {:?}", install_dir);

        let source = options
            .base_url
            .map(ReleaseSource::with_base_url)
            .unwrap_or_default();

        // Accept both `0.4.0` and `v0.4.0`; the tag prefix is added later
        let version = options
            .version
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());
        let version = version
            .strip_prefix('v')
            .map(String::from)
            .unwrap_or(version);

        Ok(Self {
            version,
            install_dir,
            source,
            timeout: options
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            retry: RetryPolicy::new(options.retries.unwrap_or(0)),
            os: options.os,
            arch: options.arch,
        })
    }

    pub fn http_client(&self) -> Result<HttpClient> {
        HttpClient::new(USER_AGENT)
    }
}

/// `$QIPI_HOME/bin` when set, otherwise `~/.qipi/bin`.
pub fn default_install_dir<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    if let Ok(home) = runtime.env_var(QIPI_HOME_ENV) {
        if !home.is_empty() {
            return Ok(PathBuf::from(home).join("bin"));
        }
    }

    let home = runtime
        .home_dir()
        .context("Could not determine home directory; pass --dest explicitly")?;
    Ok(home.join(".qipi").join("bin"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    fn runtime_with(qipi_home: Option<&'static str>, home: Option<&'static str>) -> MockRuntime {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq(QIPI_HOME_ENV))
            .returning(move |_| {
                qipi_home
                    .map(String::from)
                    .ok_or(std::env::VarError::NotPresent)
            });
        runtime
            .expect_home_dir()
            .returning(move || home.map(PathBuf::from));
        runtime
    }

    #[test]
    fn test_defaults() {
        let runtime = runtime_with(None, Some("/home/user"));
        let config = Config::new(&runtime, Options::default()).unwrap();

        assert_eq!(config.version, DEFAULT_VERSION);
        assert_eq!(
            config.install_dir,
            PathBuf::from("/home/user").join(".qipi").join("bin")
        );
        assert_eq!(config.source, ReleaseSource::default());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry, RetryPolicy::none());
        assert_eq!(config.os, None);
    }

    #[test]
    fn test_qipi_home_overrides_home_dir() {
        let runtime = runtime_with(Some("/srv/qipi"), Some("/home/user"));
        let dir = default_install_dir(&runtime).unwrap();
        assert_eq!(dir, PathBuf::from("/srv/qipi").join("bin"));
    }

    #[test]
    fn test_missing_home_is_an_error() {
        let runtime = runtime_with(None, None);
        assert!(default_install_dir(&runtime).is_err());
    }

    #[test]
    fn test_explicit_options() {
        // No runtime lookups when the directory is given
        let runtime = MockRuntime::new();
        let options = Options {
            version: Some("0.9.1".into()),
            install_dir: Some(PathBuf::from("/opt/bin")),
            base_url: Some("http://mirror.local".into()),
            timeout_secs: Some(5),
            retries: Some(2),
            os: Some("linux".into()),
            arch: Some("arm64".into()),
        };

        let config = Config::new(&runtime, options).unwrap();

        assert_eq!(config.version, "0.9.1");
        assert_eq!(config.install_dir, PathBuf::from("/opt/bin"));
        assert_eq!(config.source.base_url, "http://mirror.local");
        assert_eq!(config.source.org, "qipkg");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.retries, 2);
        assert_eq!(config.arch.as_deref(), Some("arm64"));
    }

    #[test]
    fn test_version_tag_prefix_is_stripped() {
        let runtime = MockRuntime::new();
        let options = Options {
            version: Some("v0.4.0".into()),
            install_dir: Some(PathBuf::from("/opt/bin")),
            ..Options::default()
        };

        let config = Config::new(&runtime, options).unwrap();

        assert_eq!(config.version, "0.4.0");
        let triple = crate::platform::resolve("linux", "x64").unwrap();
        assert_eq!(
            config.source.download_url(&config.version, &triple),
            "https://github.com/qipkg/qipi/releases/download/v0.4.0/qp-x86_64-unknown-linux-gnu"
        );
    }

    #[test]
    fn test_user_agent_names_the_tool() {
        assert!(USER_AGENT.starts_with("qipi-install/"));
    }
}
