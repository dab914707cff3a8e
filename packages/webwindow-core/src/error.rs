use thiserror::Error;

/// Failures reported by the engine backend.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine library not found at {0}")]
    NotFound(String),
    #[error("failed to load engine library: {0}")]
    Load(String),
    #[error("engine library is missing symbol {0}")]
    MissingSymbol(String),
    #[error("engine failed to create a window")]
    CreateWindow,
}

/// Failures reported by the bridge entry points.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("engine not initialized; call init() first")]
    NotInitialized,
    #[error("unknown or destroyed window handle: {0}")]
    BadHandle(u32),
    #[error("handle space exhausted")]
    HandleSpaceExhausted,
    #[error(transparent)]
    Engine(#[from] EngineError),
}
