//! Error types for the edges of the game (settings loading, GPU setup)
//!
//! Gameplay itself never fails: a collision is a phase change, not an error.

/// Settings loading/validation errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Settings file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings JSON is malformed
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Settings parsed but describe an unplayable game
    #[error("Invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Renderer setup errors
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("No suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// No browser window/document, or the canvas element is missing
    #[error("Drawing surface unavailable: {0}")]
    NoCanvas(&'static str),

    /// Surface reports no usable texture format
    #[error("Surface has no supported formats")]
    NoSurfaceFormat,
}
