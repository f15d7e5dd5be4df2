pub mod cleanup;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod install;
pub mod platform;
pub mod release;
pub mod retry;
pub mod runtime;

pub use error::{ErrorKind, InstallError};
pub use fetch::{AssetFetcher, FetchAsset};
pub use platform::{TargetTriple, resolve};
pub use release::DownloadRequest;
