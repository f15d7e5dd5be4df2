use std::fmt;

use crate::error::InstallError;

/// Operating systems with published release assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Linux,
    MacOs,
}

impl HostOs {
    /// Parse a raw OS identifier. Accepts Rust, Node and uname spellings.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "windows" | "windows_nt" | "win32" => Some(HostOs::Windows),
            "linux" => Some(HostOs::Linux),
            "macos" | "darwin" | "osx" => Some(HostOs::MacOs),
            _ => None,
        }
    }
}

/// CPU architectures with published release assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostArch {
    X64,
    Arm64,
    X86,
}

impl HostArch {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" => Some(HostArch::X64),
            "arm64" | "aarch64" => Some(HostArch::Arm64),
            "x86" | "ia32" | "i386" | "i686" => Some(HostArch::X86),
            _ => None,
        }
    }
}

/// Canonical `{arch}-{vendor}-{os}-{abi}` name of a release asset target.
///
/// Only [`resolve`] constructs values, so every `TargetTriple` is one of the
/// supported triples.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetTriple(&'static str);

impl TargetTriple {
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn is_windows(&self) -> bool {
        self.0.contains("windows")
    }

    /// Suffix carried by executables built for this triple.
    pub fn exe_suffix(&self) -> &'static str {
        if self.is_windows() { ".exe" } else { "" }
    }
}

impl fmt::Display for TargetTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Map a raw (OS, arch) pair to its release target triple.
///
/// The table is exhaustive; there is no fallback triple.
pub fn resolve(os_name: &str, arch_name: &str) -> Result<TargetTriple, InstallError> {
    let unsupported = || InstallError::UnsupportedPlatform {
        os: os_name.to_string(),
        arch: arch_name.to_string(),
    };

    let os = HostOs::parse(os_name).ok_or_else(unsupported)?;
    let arch = HostArch::parse(arch_name).ok_or_else(unsupported)?;

    let triple = match (os, arch) {
        (HostOs::Windows, HostArch::X64) => "x86_64-pc-windows-msvc",
        (HostOs::Windows, HostArch::Arm64) => "aarch64-pc-windows-msvc",
        (HostOs::Windows, HostArch::X86) => "i686-pc-windows-msvc",
        (HostOs::Linux, HostArch::X64) => "x86_64-unknown-linux-gnu",
        (HostOs::Linux, HostArch::Arm64) => "aarch64-unknown-linux-gnu",
        (HostOs::Linux, HostArch::X86) => "i686-unknown-linux-gnu",
        (HostOs::MacOs, HostArch::Arm64) => "aarch64-apple-darwin",
        (HostOs::MacOs, HostArch::X64) => "x86_64-apple-darwin",
        (HostOs::MacOs, HostArch::X86) => return Err(unsupported()),
    };

    Ok(TargetTriple(triple))
}
