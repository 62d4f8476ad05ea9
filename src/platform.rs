//! Toolkit-facing boundary.
//!
//! UI toolkits expect the platform GL context to always succeed:
//! `make_current` returns a plain `bool`, the other calls return nothing.
//! [`PlatformContext`] adapts a [`GraphicsContext`] to that contract and
//! applies the embedder's [`FatalPolicy`] to every error on the way.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::context::{ContextOptions, GraphicsContext};
use crate::error::{GraphicsError, GraphicsResult};
use crate::format::{FormatRequest, SurfaceFormat};
use crate::native::{NativeGraphics, ProcAddress};
use crate::window::PresentationTarget;

/// What happens when a native call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FatalPolicy {
    /// Log the failing operation and abort the process.
    #[default]
    Abort,
    /// Log the failing operation and carry on; `make_current` reports
    /// `false`.
    Report,
}

impl FatalPolicy {
    /// Applies the policy to `result`. Returns the value on success and
    /// `None` on a reported failure. Never returns on an aborting one.
    pub fn handle<T>(self, result: GraphicsResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                error!(operation = err.operation(), error = %err, "Graphics context failure");
                match self {
                    FatalPolicy::Abort => std::process::abort(),
                    FatalPolicy::Report => None,
                }
            }
        }
    }
}

/// Graphics context as seen by the toolkit.
pub struct PlatformContext<N: NativeGraphics> {
    inner: GraphicsContext<N>,
    policy: FatalPolicy,
}

impl<N: NativeGraphics> PlatformContext<N> {
    /// Creates the context. Under [`FatalPolicy::Report`] a construction
    /// failure is handed back, since there is no context to degrade to.
    pub fn create(
        native: N,
        request: &FormatRequest,
        options: ContextOptions,
        policy: FatalPolicy,
    ) -> Result<Self, GraphicsError> {
        match GraphicsContext::create(native, request, options) {
            Ok(inner) => Ok(Self::new(inner, policy)),
            Err(err) => {
                error!(operation = err.operation(), error = %err, "Graphics context failure");
                match policy {
                    FatalPolicy::Abort => std::process::abort(),
                    FatalPolicy::Report => Err(err),
                }
            }
        }
    }

    pub fn new(inner: GraphicsContext<N>, policy: FatalPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn make_current<W>(&mut self, window: &mut W) -> bool
    where
        W: PresentationTarget<N::Surface> + ?Sized,
    {
        self.policy.handle(self.inner.make_current(window)).is_some()
    }

    pub fn done_current(&mut self) {
        self.policy.handle(self.inner.done_current());
    }

    pub fn swap_buffers<W>(&mut self, window: &mut W)
    where
        W: PresentationTarget<N::Surface> + ?Sized,
    {
        self.policy.handle(self.inner.swap_buffers(window));
    }

    pub fn get_proc_address(&self, name: &str) -> Option<ProcAddress> {
        self.inner.get_proc_address(name)
    }

    pub fn format(&self) -> SurfaceFormat {
        self.inner.format()
    }

    pub fn policy(&self) -> FatalPolicy {
        self.policy
    }

    /// Underlying context, for callers that want the errors themselves.
    pub fn context(&mut self) -> &mut GraphicsContext<N> {
        &mut self.inner
    }
}
