//! HTTP client for release assets, with explicit redirect handling.

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::header::LOCATION;
use reqwest::{Client, Response, StatusCode, redirect};
use std::io::Write;
use std::time::Duration;

use crate::error::InstallError;
use crate::platform::TargetTriple;

/// Number of redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 1;

/// Longest a request or body read may sit without progress.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client that resolves a release asset URL to a streaming response.
///
/// Automatic redirects are disabled on the underlying client so that the hop
/// limit is enforced here rather than by reqwest's default policy.
///
/// The idle timeout applies to each I/O step on its own: waiting for
/// response headers, then every body chunk. A transfer that keeps making
/// progress is never cut off, however long it takes in total.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    idle_timeout: Duration,
}

impl HttpClient {
    /// Builds a client with the given user agent and redirects disabled.
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(redirect::Policy::none())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        })
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Issues the GET for `url` and returns the `200 OK` response, following
    /// at most [`MAX_REDIRECTS`] 301/302 hops.
    #[tracing::instrument(skip(self, triple))]
    pub async fn get_asset(
        &self,
        url: &str,
        triple: &TargetTriple,
    ) -> Result<Response, InstallError> {
        let mut current = url.to_string();
        let mut redirects = 0;

        loop {
            debug!("GET {}...", current);
            let pending = self.client.get(&current).send();
            let response = match tokio::time::timeout(self.idle_timeout, pending).await {
                Ok(sent) => sent.map_err(|e| InstallError::transfer(&current, e.to_string()))?,
                Err(_) => {
                    warn!("No response from {} within {:?}", current, self.idle_timeout);
                    return Err(InstallError::Timeout {
                        url: current,
                        after: self.idle_timeout,
                    });
                }
            };

            let status = response.status();
            match status {
                StatusCode::OK => return Ok(response),
                StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => {
                    if redirects >= MAX_REDIRECTS {
                        warn!("Refusing redirect #{} from {}", redirects + 1, current);
                        return Err(InstallError::transfer(
                            &current,
                            format!("too many redirects (last status {})", status),
                        ));
                    }
                    let next = redirect_target(&response).ok_or_else(|| {
                        InstallError::transfer(
                            &current,
                            format!("{} without a usable Location header", status),
                        )
                    })?;
                    debug!("Redirected ({}) to {}", status, next);
                    redirects += 1;
                    current = next;
                }
                StatusCode::NOT_FOUND => {
                    return Err(InstallError::NotFound {
                        triple: triple.to_string(),
                        url: current,
                    });
                }
                other => return Err(InstallError::transfer(&current, other.to_string())),
            }
        }
    }

    /// Copies the response body into `writer` chunk by chunk.
    ///
    /// Read and write failures are reported separately so callers can attach
    /// the path they were writing to. A chunk that does not arrive within the
    /// idle timeout ends the copy with [`StreamError::Stalled`].
    pub async fn stream_body<W: Write + ?Sized>(
        &self,
        response: &mut Response,
        writer: &mut W,
    ) -> Result<u64, StreamError> {
        let mut downloaded_bytes: u64 = 0;

        loop {
            let chunk = match tokio::time::timeout(self.idle_timeout, response.chunk()).await {
                Ok(read) => read.map_err(StreamError::Read)?,
                Err(_) => return Err(StreamError::Stalled(self.idle_timeout)),
            };
            let Some(chunk) = chunk else { break };
            writer.write_all(&chunk).map_err(StreamError::Write)?;
            downloaded_bytes += chunk.len() as u64;
        }
        writer.flush().map_err(StreamError::Write)?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }
}

/// Resolves the `Location` header against the responding URL.
fn redirect_target(response: &Response) -> Option<String> {
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    if location.trim().is_empty() {
        return None;
    }
    response.url().join(location).ok().map(|u| u.to_string())
}

#[derive(Debug)]
pub enum StreamError {
    Read(reqwest::Error),
    Write(std::io::Error),
    /// No chunk arrived within the idle timeout.
    Stalled(Duration),
}
