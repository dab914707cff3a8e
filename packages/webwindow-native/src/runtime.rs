//! Engine SDK detection.
//!
//! The engine libraries are not linked at build time; they are
//! expected in an SDK directory that the embedding application
//! provisions (the reference embedder downloads them into its
//! per-user data directory on first run). `checkRuntime()` lets the
//! host probe for them before calling `init()`.

use std::path::PathBuf;

use napi_derive::napi;

use crate::engine_ffi::Api;
use crate::options::EngineOptions;

/// Base name of the engine's embedding library.
pub const ENGINE_LIBRARY: &str = "embedweb";

/// Platform file name of the engine library, e.g. `libembedweb.so`.
pub fn library_filename() -> String {
    format!(
        "{}{}{}",
        std::env::consts::DLL_PREFIX,
        ENGINE_LIBRARY,
        std::env::consts::DLL_SUFFIX
    )
}

/// SDK directory resolution: explicit option, then the
/// `WEBWINDOW_SDK_DIR` environment variable, then the per-user data
/// directory.
pub fn resolve_sdk_dir(explicit: Option<&str>) -> PathBuf {
    if let Some(dir) = explicit {
        return PathBuf::from(dir);
    }
    if let Ok(dir) = std::env::var("WEBWINDOW_SDK_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    directories::ProjectDirs::from("", "", "webwindow")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Information about the engine SDK installation.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    /// Whether the engine library was found and loads.
    pub available: bool,
    /// The engine's version string, if it loads.
    pub version: Option<String>,
    /// The SDK directory that was probed.
    pub sdk_dir: String,
    /// The current platform, as reported by the Rust target.
    pub platform: String,
}

/// Probe the SDK directory for a loadable engine library.
#[napi]
pub fn check_runtime(options: Option<EngineOptions>) -> RuntimeInfo {
    let options = options.unwrap_or_default();
    let dir = resolve_sdk_dir(options.sdk_dir.as_deref());
    let sdk_dir = dir.display().to_string();
    let platform = std::env::consts::OS.to_string();

    let path = dir.join(library_filename());
    if !path.exists() {
        return RuntimeInfo {
            available: false,
            version: None,
            sdk_dir,
            platform,
        };
    }

    match Api::load(&path) {
        Ok(api) => RuntimeInfo {
            available: true,
            version: api.version(),
            sdk_dir,
            platform,
        },
        Err(e) => {
            log::warn!("engine library at {} failed to load: {e}", path.display());
            RuntimeInfo {
                available: false,
                version: None,
                sdk_dir,
                platform,
            }
        }
    }
}
