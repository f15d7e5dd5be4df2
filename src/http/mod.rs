//! HTTP client module with redirect handling and body streaming.

mod client;

pub use client::{DEFAULT_IDLE_TIMEOUT, HttpClient, MAX_REDIRECTS, StreamError};
