//! Platform detection and target-triple resolution
//!
//! This module detects the host operating system and architecture and maps
//! the pair onto the target triple that names the matching release asset.

mod detection;
mod triple;

pub use detection::{DefaultPlatformDetector, FixedPlatformDetector, Platform, PlatformDetector};
pub use triple::{HostArch, HostOs, TargetTriple, resolve};
