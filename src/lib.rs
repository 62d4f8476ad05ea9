//! # glcontext — platform OpenGL context over EGL
//!
//! Binds windows' pixel buffers to one hardware rendering context and runs
//! the make-current / draw / swap-buffers cycle on behalf of a UI toolkit.
//!
//! ## Modules
//!
//! - [`context`] : [`GraphicsContext`], the context itself. Creation,
//!   surface rebuild on every make-current, presentation, teardown on drop.
//!
//! - [`platform`] : [`PlatformContext`], the toolkit-facing contract
//!   (`make_current -> bool`) with the abort-or-report [`FatalPolicy`].
//!
//! - [`negotiate`] : matching a [`FormatRequest`] to a native config, with
//!   attribute relaxation, and reading back the achieved [`SurfaceFormat`].
//!
//! - [`native`] : the [`NativeGraphics`] driver trait and the pixmap
//!   descriptor handed to it. [`egl`] implements it over libEGL.
//!
//! - [`window`] : the [`PresentationTarget`] capabilities a window must
//!   offer, plus an in-memory [`FramebufferWindow`].
//!
//! - [`diagnostics`] : injected per-call trace sink, off by default.
//!
//! - [`config`] : TOML configuration (requested format, surface type,
//!   fatal policy).
//!
//! - [`rendering`] : one-call EGL context factory and `glow` loading.

pub mod config;
pub mod context;
pub mod diagnostics;
#[cfg(feature = "egl")]
pub mod egl;
pub mod error;
pub mod format;
pub mod native;
pub mod negotiate;
pub mod platform;
#[cfg(feature = "egl")]
pub mod rendering;
pub mod window;

#[cfg(test)]
pub(crate) mod mock;

pub use context::{ContextOptions, GraphicsContext};
pub use error::{GraphicsError, GraphicsResult, NativeError};
pub use format::{FormatRequest, RenderableType, SurfaceFormat, SurfaceType};
pub use native::{BackingStore, NativeGraphics, NativePixmap, ProcAddress};
pub use platform::{FatalPolicy, PlatformContext};
pub use window::{FramebufferWindow, PresentationTarget};
