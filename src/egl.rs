//! EGL driver.
//!
//! libEGL is loaded at runtime, so a missing driver shows up as a
//! [`GraphicsError::Load`] at startup rather than a link failure.

use std::ffi::c_void;
use std::path::Path;

use khronos_egl as khr;
use tracing::info;

use crate::error::{GraphicsError, GraphicsResult, NativeError};
use crate::format::RenderableType;
use crate::native::{ConfigAttribute, NativeGraphics, NativePixmap, ProcAddress};

type Egl = khr::DynamicInstance<khr::EGL1_4>;

fn native_error(error: khr::Error) -> NativeError {
    NativeError::new(error.to_string())
}

fn attribute(attribute: ConfigAttribute) -> khr::Int {
    match attribute {
        ConfigAttribute::RedSize => khr::RED_SIZE,
        ConfigAttribute::GreenSize => khr::GREEN_SIZE,
        ConfigAttribute::BlueSize => khr::BLUE_SIZE,
        ConfigAttribute::AlphaSize => khr::ALPHA_SIZE,
        ConfigAttribute::DepthSize => khr::DEPTH_SIZE,
        ConfigAttribute::StencilSize => khr::STENCIL_SIZE,
        ConfigAttribute::Samples => khr::SAMPLES,
        ConfigAttribute::SampleBuffers => khr::SAMPLE_BUFFERS,
        ConfigAttribute::SurfaceType => khr::SURFACE_TYPE,
        ConfigAttribute::RenderableType => khr::RENDERABLE_TYPE,
    }
}

/// [`NativeGraphics`] over a dynamically loaded libEGL.
pub struct EglDriver {
    egl: Egl,
}

impl EglDriver {
    /// Loads libEGL from `library`, or the system default when `None`.
    pub fn load(library: Option<&Path>) -> GraphicsResult<Self> {
        // SAFETY: loading libEGL runs its initializers; nothing else in the
        // process depends on it being absent.
        let egl = unsafe {
            match library {
                Some(path) => Egl::load_required_from_filename(path),
                None => Egl::load_required(),
            }
        }
        .map_err(|e| GraphicsError::Load(NativeError::new(e.to_string())))?;

        info!(
            library = %library.map_or("default".into(), |p| p.display().to_string()),
            "libEGL loaded"
        );
        Ok(Self { egl })
    }
}

impl NativeGraphics for EglDriver {
    type Display = khr::Display;
    type Config = khr::Config;
    type Context = khr::Context;
    type Surface = khr::Surface;

    fn bind_api(&self, api: RenderableType) -> Result<(), NativeError> {
        let api = match api {
            RenderableType::OpenGl => khr::OPENGL_API,
            RenderableType::OpenGlEs => khr::OPENGL_ES_API,
        };
        self.egl.bind_api(api).map_err(native_error)
    }

    fn display(&self) -> Option<khr::Display> {
        // SAFETY: DEFAULT_DISPLAY is always a valid native display id.
        unsafe { self.egl.get_display(khr::DEFAULT_DISPLAY) }
    }

    fn initialize(&self, display: khr::Display) -> Result<(i32, i32), NativeError> {
        self.egl.initialize(display).map_err(native_error)
    }

    fn choose_configs(
        &self,
        display: khr::Display,
        attributes: &[(ConfigAttribute, i32)],
    ) -> Result<Vec<khr::Config>, NativeError> {
        let mut attrib_list: Vec<khr::Int> = attributes
            .iter()
            .flat_map(|&(a, value)| [attribute(a), value])
            .collect();
        attrib_list.push(khr::NONE);

        let count = self.egl.get_config_count(display).map_err(native_error)?;
        let mut configs = Vec::with_capacity(count);
        self.egl
            .choose_config(display, &attrib_list, &mut configs)
            .map_err(native_error)?;
        Ok(configs)
    }

    fn config_attribute(
        &self,
        display: khr::Display,
        config: khr::Config,
        attr: ConfigAttribute,
    ) -> Result<i32, NativeError> {
        self.egl
            .get_config_attrib(display, config, attribute(attr))
            .map_err(native_error)
    }

    fn create_context(
        &self,
        display: khr::Display,
        config: khr::Config,
        api: RenderableType,
    ) -> Result<khr::Context, NativeError> {
        let attributes: &[khr::Int] = match api {
            RenderableType::OpenGl => &[khr::NONE],
            RenderableType::OpenGlEs => &[khr::CONTEXT_CLIENT_VERSION, 2, khr::NONE],
        };
        self.egl
            .create_context(display, config, None, attributes)
            .map_err(native_error)
    }

    fn create_pixmap_surface(
        &self,
        display: khr::Display,
        config: khr::Config,
        pixmap: &NativePixmap,
    ) -> Result<khr::Surface, NativeError> {
        let native_pixmap: khr::NativePixmapType =
            (pixmap as *const NativePixmap).cast_mut().cast::<c_void>();
        // SAFETY: the descriptor outlives the call and the driver copies
        // what it needs from it; the buffer it points at belongs to the
        // window and outlives the surface.
        unsafe {
            self.egl
                .create_pixmap_surface(display, config, native_pixmap, &[khr::NONE])
        }
        .map_err(native_error)
    }

    fn destroy_surface(
        &self,
        display: khr::Display,
        surface: khr::Surface,
    ) -> Result<(), NativeError> {
        self.egl
            .destroy_surface(display, surface)
            .map_err(native_error)
    }

    fn make_current(
        &self,
        display: khr::Display,
        surface: Option<khr::Surface>,
        context: Option<khr::Context>,
    ) -> Result<(), NativeError> {
        self.egl
            .make_current(display, surface, surface, context)
            .map_err(native_error)
    }

    fn swap_buffers(
        &self,
        display: khr::Display,
        surface: khr::Surface,
    ) -> Result<(), NativeError> {
        self.egl.swap_buffers(display, surface).map_err(native_error)
    }

    fn proc_address(&self, name: &str) -> Option<ProcAddress> {
        if name.contains('\0') {
            return None;
        }
        self.egl.get_proc_address(name)
    }

    fn destroy_context(
        &self,
        display: khr::Display,
        context: khr::Context,
    ) -> Result<(), NativeError> {
        self.egl
            .destroy_context(display, context)
            .map_err(native_error)
    }

    fn terminate(&self, display: khr::Display) -> Result<(), NativeError> {
        self.egl.terminate(display).map_err(native_error)
    }
}
