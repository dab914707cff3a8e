use napi_derive::napi;

/// Options for engine initialization.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Directory holding the engine SDK libraries. Falls back to the
    /// `WEBWINDOW_SDK_DIR` environment variable, then to the
    /// per-user data directory.
    pub sdk_dir: Option<String>,
    /// Directory the engine loads its bundled resources (ICU data,
    /// certificate store) from. When unset the engine uses its
    /// built-in default relative to the SDK directory.
    pub resource_dir: Option<String>,
}
