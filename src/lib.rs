pub mod core;

pub use crate::core::config::Settings;
pub use crate::core::error::{LauncherError, LauncherResult};
pub use crate::core::pipeline::{InstallReport, Pipeline};
pub use crate::core::platform::{Arch, Os, Platform};
