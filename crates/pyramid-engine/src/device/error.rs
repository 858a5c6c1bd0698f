/// Failure to bring up the graphics context.
///
/// Every variant is fatal: the runtime logs it and stops before any frame is drawn.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("window has zero size ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },

    #[error("failed to create wgpu surface")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to find a suitable GPU adapter")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create wgpu device/queue")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}
