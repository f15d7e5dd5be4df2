/// Raw platform identifiers as reported by the host
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Detect the current platform
    pub fn detect() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    /// Replace the detected values with explicit ones where given.
    pub fn with_overrides(self, os: Option<&str>, arch: Option<&str>) -> Self {
        Self {
            os: os.map(str::to_string).unwrap_or(self.os),
            arch: arch.map(str::to_string).unwrap_or(self.arch),
        }
    }
}

/// Trait for platform detection (useful for testing)
pub trait PlatformDetector: Send + Sync {
    fn detect(&self) -> Platform;
}

/// Default platform detector using compile-time detection
pub struct DefaultPlatformDetector;

impl PlatformDetector for DefaultPlatformDetector {
    fn detect(&self) -> Platform {
        Platform::detect()
    }
}

/// Detector that always reports the same platform
pub struct FixedPlatformDetector(pub Platform);

impl PlatformDetector for FixedPlatformDetector {
    fn detect(&self) -> Platform {
        self.0.clone()
    }
}
