//! Seam between the context logic and the native graphics driver.
//!
//! [`NativeGraphics`] mirrors the handful of EGL entry points the context
//! needs. Handles are associated types so each driver keeps its own opaque
//! representation; [`crate::egl::EglDriver`] is the production
//! implementation.

use std::ffi::c_void;
use std::fmt::Debug;

use crate::error::NativeError;
use crate::format::{RenderableType, SurfaceType};

/// Entry point resolved by name through the driver.
pub type ProcAddress = extern "system" fn();

/// Config attributes the negotiation reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigAttribute {
    RedSize,
    GreenSize,
    BlueSize,
    AlphaSize,
    DepthSize,
    StencilSize,
    Samples,
    SampleBuffers,
    SurfaceType,
    RenderableType,
}

impl ConfigAttribute {
    pub fn name(self) -> &'static str {
        match self {
            ConfigAttribute::RedSize => "RED_SIZE",
            ConfigAttribute::GreenSize => "GREEN_SIZE",
            ConfigAttribute::BlueSize => "BLUE_SIZE",
            ConfigAttribute::AlphaSize => "ALPHA_SIZE",
            ConfigAttribute::DepthSize => "DEPTH_SIZE",
            ConfigAttribute::StencilSize => "STENCIL_SIZE",
            ConfigAttribute::Samples => "SAMPLES",
            ConfigAttribute::SampleBuffers => "SAMPLE_BUFFERS",
            ConfigAttribute::SurfaceType => "SURFACE_TYPE",
            ConfigAttribute::RenderableType => "RENDERABLE_TYPE",
        }
    }
}

// Bit values shared with EGL so drivers can pass them through unchanged.
pub const PBUFFER_BIT: i32 = 0x0001;
pub const PIXMAP_BIT: i32 = 0x0002;
pub const WINDOW_BIT: i32 = 0x0004;
pub const OPENGL_ES2_BIT: i32 = 0x0004;
pub const OPENGL_BIT: i32 = 0x0008;

impl SurfaceType {
    pub fn bit(self) -> i32 {
        match self {
            SurfaceType::Pbuffer => PBUFFER_BIT,
            SurfaceType::Pixmap => PIXMAP_BIT,
        }
    }
}

impl RenderableType {
    pub fn bit(self) -> i32 {
        match self {
            RenderableType::OpenGl => OPENGL_BIT,
            RenderableType::OpenGlEs => OPENGL_ES2_BIT,
        }
    }

    /// Maps a config's renderable bitmask back to an API, preferring
    /// desktop GL when both are supported.
    pub fn from_bits(bits: i32) -> Option<Self> {
        if bits & OPENGL_BIT != 0 {
            Some(RenderableType::OpenGl)
        } else if bits & OPENGL_ES2_BIT != 0 {
            Some(RenderableType::OpenGlEs)
        } else {
            None
        }
    }
}

/// Ordered `(attribute, value)` list handed to config selection.
pub type ConfigAttributes = Vec<(ConfigAttribute, i32)>;

/// Reference to a window's pixel storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackingStore(pub *mut c_void);

impl BackingStore {
    pub fn null() -> Self {
        Self(std::ptr::null_mut())
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

/// Pixmap descriptor passed to the driver when creating a presentation
/// surface. Layout matches the native window struct the EGL platform
/// expects: size in pixels followed by the buffer address.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativePixmap {
    pub width: i32,
    pub height: i32,
    pub addr: *mut c_void,
}

impl NativePixmap {
    pub fn new(width: i32, height: i32, store: BackingStore) -> Self {
        Self {
            width,
            height,
            addr: store.0,
        }
    }
}

/// Native graphics driver operations.
///
/// All calls are synchronous and happen on the rendering thread.
pub trait NativeGraphics {
    type Display: Copy + Debug;
    type Config: Copy + Debug;
    type Context: Copy + Debug;
    type Surface: Copy + Debug + PartialEq;

    fn bind_api(&self, api: RenderableType) -> Result<(), NativeError>;

    /// Default display connection, `None` when unavailable.
    fn display(&self) -> Option<Self::Display>;

    /// Returns the `(major, minor)` version of the native layer.
    fn initialize(&self, display: Self::Display) -> Result<(i32, i32), NativeError>;

    /// All configs matching `attributes`, best first.
    fn choose_configs(
        &self,
        display: Self::Display,
        attributes: &[(ConfigAttribute, i32)],
    ) -> Result<Vec<Self::Config>, NativeError>;

    fn config_attribute(
        &self,
        display: Self::Display,
        config: Self::Config,
        attribute: ConfigAttribute,
    ) -> Result<i32, NativeError>;

    /// Creates a context without a share context.
    fn create_context(
        &self,
        display: Self::Display,
        config: Self::Config,
        api: RenderableType,
    ) -> Result<Self::Context, NativeError>;

    fn create_pixmap_surface(
        &self,
        display: Self::Display,
        config: Self::Config,
        pixmap: &NativePixmap,
    ) -> Result<Self::Surface, NativeError>;

    fn destroy_surface(
        &self,
        display: Self::Display,
        surface: Self::Surface,
    ) -> Result<(), NativeError>;

    /// Binds `surface` for both drawing and reading. `(None, None)` detaches.
    fn make_current(
        &self,
        display: Self::Display,
        surface: Option<Self::Surface>,
        context: Option<Self::Context>,
    ) -> Result<(), NativeError>;

    fn swap_buffers(
        &self,
        display: Self::Display,
        surface: Self::Surface,
    ) -> Result<(), NativeError>;

    fn proc_address(&self, name: &str) -> Option<ProcAddress>;

    fn destroy_context(
        &self,
        display: Self::Display,
        context: Self::Context,
    ) -> Result<(), NativeError>;

    fn terminate(&self, display: Self::Display) -> Result<(), NativeError>;
}
