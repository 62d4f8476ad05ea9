//! The graphics context: one native rendering context shared by every window
//! drawn through it.
//!
//! ## Frame cycle
//!
//! ```text
//! make_current(window)   detach, destroy old surface, create new one, bind
//!        │
//!  draw through get_proc_address() entry points
//!        │
//! swap_buffers(window)   present, then window.refresh(0, 0, w, h)
//! ```
//!
//! The surface is rebuilt from scratch on every make-current. There is no
//! separate resize notification: calling make-current again after a resize
//! is what picks up the new geometry and backing store.

use std::ffi::c_void;

use euclid::default::Rect;
use tracing::{debug, info, warn};

use crate::diagnostics::{DiagnosticsSink, TracingSink};
use crate::error::{GraphicsError, GraphicsResult};
use crate::format::{FormatRequest, SurfaceFormat, SurfaceType};
use crate::native::{NativeGraphics, NativePixmap, ProcAddress};
use crate::negotiate;
use crate::window::PresentationTarget;

/// Construction options besides the requested format.
pub struct ContextOptions {
    /// Surface capability the chosen config must have.
    pub surface_type: SurfaceType,
    /// Receives the per-call trace.
    pub diagnostics: Box<dyn DiagnosticsSink>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            surface_type: SurfaceType::default(),
            diagnostics: Box::new(TracingSink::default()),
        }
    }
}

impl std::fmt::Debug for ContextOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextOptions")
            .field("surface_type", &self.surface_type)
            .field("verbose", &self.diagnostics.enabled())
            .finish()
    }
}

/// Native rendering context bound on demand to window surfaces.
///
/// Owns the display connection, the chosen config and the context; all
/// three are released when the value is dropped. Surfaces belong to the
/// windows.
pub struct GraphicsContext<N: NativeGraphics> {
    native: N,
    display: N::Display,
    config: N::Config,
    context: N::Context,
    format: SurfaceFormat,
    version: (i32, i32),
    diagnostics: Box<dyn DiagnosticsSink>,
}

impl<N: NativeGraphics> GraphicsContext<N> {
    /// Connects to the display and creates the rendering context.
    ///
    /// The achieved format may differ from `request`; read it back with
    /// [`format`](Self::format).
    pub fn create(
        native: N,
        request: &FormatRequest,
        options: ContextOptions,
    ) -> GraphicsResult<Self> {
        let ContextOptions {
            surface_type,
            diagnostics,
        } = options;
        diagnostics.trace("create", format_args!("request {request}"));

        native
            .bind_api(request.renderable)
            .map_err(|source| GraphicsError::ApiBind {
                api: request.renderable.name(),
                source,
            })?;

        let display = native.display().ok_or(GraphicsError::NoDisplay)?;

        let version = native
            .initialize(display)
            .map_err(GraphicsError::Initialize)?;
        diagnostics.trace(
            "create",
            format_args!("initialize returned major {}, minor {}", version.0, version.1),
        );

        // From here on the display is initialized and must be terminated on
        // every early return.
        let terminate = |error: GraphicsError| {
            if let Err(e) = native.terminate(display) {
                warn!(error = %e, "Terminating the display failed");
            }
            error
        };

        let config = negotiate::config_from_format(&native, display, request, surface_type)
            .map_err(terminate)?
            .ok_or_else(|| terminate(GraphicsError::NoMatchingConfig(request.to_string())))?;

        let format =
            negotiate::format_from_config(&native, display, config).map_err(terminate)?;
        if !format.satisfies(request) {
            warn!(requested = %request, achieved = ?format, "Surface format downgraded");
            diagnostics.trace(
                "create",
                format_args!("format downgraded from {request} to {format:?}"),
            );
        }

        let context = native
            .create_context(display, config, request.renderable)
            .map_err(|e| terminate(GraphicsError::CreateContext(e)))?;

        info!(
            major = version.0,
            minor = version.1,
            ?format,
            "Graphics context created"
        );

        Ok(Self {
            native,
            display,
            config,
            context,
            format,
            version,
            diagnostics,
        })
    }

    /// Binds the context to a freshly built surface for `window`.
    ///
    /// Any bound surface is detached first and the window's previous
    /// surface is destroyed before its replacement is created, even when
    /// the window's size is unchanged.
    pub fn make_current<W>(&mut self, window: &mut W) -> GraphicsResult<()>
    where
        W: PresentationTarget<N::Surface> + ?Sized,
    {
        self.diagnostics.trace("make_current", format_args!(""));

        self.done_current()?;

        if let Some(old) = window.surface() {
            // The slot is cleared before destruction so a failed destroy
            // never leaves a half-dead handle on the window.
            window.set_surface(None);
            self.native
                .destroy_surface(self.display, old)
                .map_err(GraphicsError::DestroySurface)?;
            debug!(surface = ?old, "Destroyed previous surface");
        }

        let size = window.size();
        let store = window.backing_store();
        let pixmap = NativePixmap::new(size.width, size.height, store);
        if self.diagnostics.enabled() {
            self.diagnostics.trace(
                "make_current",
                format_args!("{}x{} backing store {:?}", size.width, size.height, store.0),
            );
        }

        let surface = self
            .native
            .create_pixmap_surface(self.display, self.config, &pixmap)
            .map_err(|source| GraphicsError::CreateSurface {
                width: size.width,
                height: size.height,
                source,
            })?;

        window.set_surface(Some(surface));

        self.native
            .make_current(self.display, Some(surface), Some(self.context))
            .map_err(GraphicsError::MakeCurrent)?;

        debug!(?surface, width = size.width, height = size.height, "Surface current");
        Ok(())
    }

    /// Detaches whatever surface and context are current.
    ///
    /// Accepted when nothing is current.
    pub fn done_current(&self) -> GraphicsResult<()> {
        self.diagnostics.trace("done_current", format_args!(""));
        self.native
            .make_current(self.display, None, None)
            .map_err(GraphicsError::DoneCurrent)
    }

    /// Presents the window's back buffer and asks the window to recomposite
    /// its whole area.
    pub fn swap_buffers<W>(&self, window: &mut W) -> GraphicsResult<()>
    where
        W: PresentationTarget<N::Surface> + ?Sized,
    {
        self.diagnostics.trace("swap_buffers", format_args!(""));

        let surface = window.surface().ok_or(GraphicsError::NoSurface)?;
        self.native
            .swap_buffers(self.display, surface)
            .map_err(GraphicsError::SwapBuffers)?;

        let size = window.size();
        window.refresh(Rect::from_size(size));
        Ok(())
    }

    /// Destroys the surface stored on `window`, if any. For windows that
    /// are about to go away; the next make-current on the window would
    /// replace it anyway.
    pub fn release_surface<W>(&mut self, window: &mut W) -> GraphicsResult<()>
    where
        W: PresentationTarget<N::Surface> + ?Sized,
    {
        let Some(surface) = window.surface() else {
            return Ok(());
        };
        self.diagnostics
            .trace("release_surface", format_args!("{surface:?}"));

        self.done_current()?;
        window.set_surface(None);
        self.native
            .destroy_surface(self.display, surface)
            .map_err(GraphicsError::DestroySurface)
    }

    /// Resolves an entry point by name. `None` when the driver doesn't know
    /// it; the signature of a resolved pointer is not checked.
    pub fn get_proc_address(&self, name: &str) -> Option<ProcAddress> {
        let address = self.native.proc_address(name);
        if self.diagnostics.enabled() {
            self.diagnostics.trace(
                "get_proc_address",
                format_args!("{name} -> {:?}", address.map(|f| f as *const c_void)),
            );
        }
        address
    }

    /// Format achieved at construction.
    pub fn format(&self) -> SurfaceFormat {
        self.format
    }

    /// `(major, minor)` version reported by the native layer.
    pub fn native_version(&self) -> (i32, i32) {
        self.version
    }
}

impl<N: NativeGraphics> Drop for GraphicsContext<N> {
    fn drop(&mut self) {
        if let Err(error) = self.native.make_current(self.display, None, None) {
            warn!(%error, "Detaching the context on drop failed");
        }
        if let Err(error) = self.native.destroy_context(self.display, self.context) {
            warn!(%error, "Destroying the rendering context failed");
        }
        if let Err(error) = self.native.terminate(self.display) {
            warn!(%error, "Terminating the display failed");
        }
    }
}
