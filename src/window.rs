//! Window capabilities the context relies on.
//!
//! The context never creates or owns windows. It only needs their current
//! size, their pixel storage, a slot to keep the presentation surface in,
//! and a way to tell them a region must be recomposited.

use euclid::default::{Rect, Size2D};
use tracing::trace;

use crate::error::{GraphicsError, GraphicsResult};
use crate::native::BackingStore;

/// Largest accepted width or height, in pixels.
pub const MAX_DIMENSION: i32 = 16384;

/// A window that can be drawn into by a [`crate::GraphicsContext`].
///
/// `S` is the driver's surface handle type.
pub trait PresentationTarget<S> {
    /// Current size in pixels.
    fn size(&self) -> Size2D<i32>;

    /// Pixel storage the presentation surface is built on.
    fn backing_store(&self) -> BackingStore;

    /// Surface currently stored on the window.
    fn surface(&self) -> Option<S>;

    fn set_surface(&mut self, surface: Option<S>);

    /// Requests a recomposite of `rect` (window coordinates).
    fn refresh(&mut self, rect: Rect<i32>);
}

/// In-memory ARGB8888 window.
///
/// Keeps the refresh requests it receives until they are drained with
/// [`take_refreshes`](Self::take_refreshes).
#[derive(Debug)]
pub struct FramebufferWindow<S> {
    size: Size2D<i32>,
    pixels: Vec<u32>,
    surface: Option<S>,
    refreshes: Vec<Rect<i32>>,
}

/// Pixel count of a `width` x `height` buffer, if both lie in
/// `0..=MAX_DIMENSION`.
fn pixel_count(width: i32, height: i32) -> GraphicsResult<usize> {
    let axis = |v: i32| usize::try_from(v).ok().filter(|_| v <= MAX_DIMENSION);
    axis(width)
        .zip(axis(height))
        .and_then(|(w, h)| w.checked_mul(h))
        .ok_or(GraphicsError::InvalidGeometry { width, height })
}

impl<S> FramebufferWindow<S> {
    /// Allocates a cleared window. Fails with
    /// [`GraphicsError::InvalidGeometry`] when either side is negative or
    /// larger than [`MAX_DIMENSION`].
    pub fn new(width: i32, height: i32) -> GraphicsResult<Self> {
        let len = pixel_count(width, height)?;
        Ok(Self {
            size: Size2D::new(width, height),
            pixels: vec![0; len],
            surface: None,
            refreshes: Vec::new(),
        })
    }

    /// Changes the window size. The pixel buffer is reallocated, so the
    /// backing store changes too; the next make-current picks both up.
    /// A rejected size leaves the window untouched.
    pub fn resize(&mut self, width: i32, height: i32) -> GraphicsResult<()> {
        let len = pixel_count(width, height)?;
        self.size = Size2D::new(width, height);
        self.pixels = vec![0; len];
        Ok(())
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Refresh requests received since the last call.
    pub fn take_refreshes(&mut self) -> Vec<Rect<i32>> {
        std::mem::take(&mut self.refreshes)
    }
}

impl<S: Copy> PresentationTarget<S> for FramebufferWindow<S> {
    fn size(&self) -> Size2D<i32> {
        self.size
    }

    fn backing_store(&self) -> BackingStore {
        if self.pixels.is_empty() {
            BackingStore::null()
        } else {
            BackingStore(self.pixels.as_ptr().cast_mut().cast())
        }
    }

    fn surface(&self) -> Option<S> {
        self.surface
    }

    fn set_surface(&mut self, surface: Option<S>) {
        self.surface = surface;
    }

    fn refresh(&mut self, rect: Rect<i32>) {
        trace!(?rect, "Refresh requested");
        self.refreshes.push(rect);
    }
}
