//! Errors raised by the graphics context.
//!
//! Every native-layer failure is unrecoverable: the context has no fallback
//! path (no software rendering, no retry). The error is handed back to the
//! caller instead of ending the process here, so the embedder decides
//! between aborting and reporting (see [`crate::platform::FatalPolicy`]).

use thiserror::Error;

/// Error text reported by the native graphics layer.
///
/// Kept as a string so that driver implementations (EGL, test doubles)
/// don't leak their own error types through the public API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError(pub String);

impl NativeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl std::fmt::Display for NativeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for NativeError {}

/// Unrecoverable failure of a graphics context operation.
///
/// One variant per native call that can fail, so the message always names
/// the failing operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// The native driver library could not be loaded.
    #[error("loading the native graphics library failed: {0}")]
    Load(NativeError),
    /// The native layer rejected the requested client API.
    #[error("binding the {api} API failed: {source}")]
    ApiBind {
        api: &'static str,
        source: NativeError,
    },
    /// No display connection is available.
    #[error("no native display available")]
    NoDisplay,
    /// Display initialization failed.
    #[error("initializing the display failed: {0}")]
    Initialize(NativeError),
    /// No native config matches the requested format.
    #[error("no native config matches the requested format ({0})")]
    NoMatchingConfig(String),
    /// Reading an attribute of the chosen config failed.
    #[error("querying config attribute {attribute} failed: {source}")]
    ConfigAttribute {
        attribute: &'static str,
        source: NativeError,
    },
    /// Rendering context creation failed.
    #[error("creating the rendering context failed: {0}")]
    CreateContext(NativeError),
    /// Destroying a window's previous presentation surface failed.
    #[error("destroying the presentation surface failed: {0}")]
    DestroySurface(NativeError),
    /// Creating a presentation surface for a window failed.
    #[error("creating the presentation surface ({width}x{height}) failed: {source}")]
    CreateSurface {
        width: i32,
        height: i32,
        source: NativeError,
    },
    /// Binding a surface to the rendering context failed.
    #[error("making the context current failed: {0}")]
    MakeCurrent(NativeError),
    /// Detaching the current surface and context failed.
    #[error("releasing the current context failed: {0}")]
    DoneCurrent(NativeError),
    /// Presenting the back buffer failed.
    #[error("swapping buffers failed: {0}")]
    SwapBuffers(NativeError),
    /// A window was presented without a prior make-current.
    #[error("window has no presentation surface, call make_current first")]
    NoSurface,
    /// A window size outside `0..=`[`MAX_DIMENSION`](crate::window::MAX_DIMENSION)
    /// on either axis.
    #[error("window geometry {width}x{height} is out of range")]
    InvalidGeometry { width: i32, height: i32 },
}

impl GraphicsError {
    /// Every native failure leaves the embedding toolkit without a usable
    /// context. Only a rejected window geometry can be retried, with
    /// another size.
    pub fn is_unrecoverable(&self) -> bool {
        !matches!(self, GraphicsError::InvalidGeometry { .. })
    }

    /// Short name of the operation that failed, for diagnostics.
    pub fn operation(&self) -> &'static str {
        match self {
            GraphicsError::Load(_) => "load",
            GraphicsError::ApiBind { .. } => "bind_api",
            GraphicsError::NoDisplay => "get_display",
            GraphicsError::Initialize(_) => "initialize",
            GraphicsError::NoMatchingConfig(_) => "choose_config",
            GraphicsError::ConfigAttribute { .. } => "get_config_attrib",
            GraphicsError::CreateContext(_) => "create_context",
            GraphicsError::DestroySurface(_) => "destroy_surface",
            GraphicsError::CreateSurface { .. } => "create_surface",
            GraphicsError::MakeCurrent(_) => "make_current",
            GraphicsError::DoneCurrent(_) => "done_current",
            GraphicsError::SwapBuffers(_) => "swap_buffers",
            GraphicsError::NoSurface => "swap_buffers",
            GraphicsError::InvalidGeometry { .. } => "resize_window",
        }
    }
}

/// Shorthand for [`Result<T, GraphicsError>`].
pub type GraphicsResult<T> = Result<T, GraphicsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failing_operation() {
        let err = GraphicsError::SwapBuffers(NativeError::new("EGL_BAD_SURFACE"));
        assert_eq!(err.to_string(), "swapping buffers failed: EGL_BAD_SURFACE");
        assert_eq!(err.operation(), "swap_buffers");

        let err = GraphicsError::CreateSurface {
            width: 800,
            height: 600,
            source: NativeError::new("EGL_BAD_NATIVE_PIXMAP"),
        };
        assert!(err.to_string().contains("800x600"));
        assert_eq!(err.operation(), "create_surface");
    }

    #[test]
    fn test_native_errors_are_unrecoverable() {
        assert!(GraphicsError::NoDisplay.is_unrecoverable());
        assert!(GraphicsError::NoSurface.is_unrecoverable());
        assert!(GraphicsError::Initialize(NativeError::new("x")).is_unrecoverable());
    }

    #[test]
    fn test_invalid_geometry_can_be_retried() {
        let err = GraphicsError::InvalidGeometry {
            width: 50_000,
            height: 50_000,
        };
        assert!(!err.is_unrecoverable());
        assert_eq!(err.operation(), "resize_window");
        assert!(err.to_string().contains("50000x50000"));
    }
}
