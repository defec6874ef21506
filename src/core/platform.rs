// ─── Platform ───
// Host OS/architecture detection and the Mojang native classifier tags.

use std::fmt;

use crate::core::error::{LauncherError, LauncherResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Windows,
    Linux,
    MacOs,
}

/// Architecture families the native extraction rules know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X64,
    X86,
    Arm64,
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arch::X64 => write!(f, "x64"),
            Arch::X86 => write!(f, "x86"),
            Arch::Arm64 => write!(f, "arm64"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Detect the platform this binary runs on.
    pub fn current() -> LauncherResult<Self> {
        Self::detect(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map Rust's `target_os` / `target_arch` names onto a supported platform.
    pub fn detect(os: &str, arch: &str) -> LauncherResult<Self> {
        let unsupported = || LauncherError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        };

        let os_kind = match os {
            "windows" => Os::Windows,
            "linux" => Os::Linux,
            "macos" => Os::MacOs,
            _ => return Err(unsupported()),
        };
        let arch_kind = match arch {
            "x86_64" => Arch::X64,
            "x86" => Arch::X86,
            "aarch64" => Arch::Arm64,
            _ => return Err(unsupported()),
        };

        Ok(Self {
            os: os_kind,
            arch: arch_kind,
        })
    }

    /// OS tag used in native classifier names (`natives-<tag>`).
    ///
    /// Windows and macOS bundles are split per architecture; Linux bundles are not.
    pub fn os_tag(&self) -> &'static str {
        match (self.os, self.arch) {
            (Os::Windows, Arch::X64) => "windows",
            (Os::Windows, Arch::X86) => "windows-x86",
            (Os::Windows, Arch::Arm64) => "windows-arm64",
            (Os::Linux, _) => "linux",
            (Os::MacOs, Arch::Arm64) => "macos-arm64",
            (Os::MacOs, _) => "macos",
        }
    }

    /// Substring that marks a library path as this platform's native bundle,
    /// e.g. `natives-linux.`. The trailing dot keeps `natives-windows.`
    /// from matching `natives-windows-arm64.jar`.
    pub fn native_marker(&self) -> String {
        format!("natives-{}.", self.os_tag())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.os_tag(), self.arch)
    }
}
