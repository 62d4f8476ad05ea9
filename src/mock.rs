//! Recording driver used by the unit tests.
//!
//! Matches configs the way EGL does (sizes are minimums, bitmasks must be
//! contained), hands out increasing handle ids, records every call and can
//! be told to fail a specific operation.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::ffi::c_void;
use std::rc::Rc;

use crate::error::NativeError;
use crate::format::RenderableType;
use crate::native::{
    ConfigAttribute, NativeGraphics, NativePixmap, OPENGL_BIT, PBUFFER_BIT, PIXMAP_BIT,
    ProcAddress,
};

#[derive(Debug, Clone, Copy)]
pub struct MockConfig {
    pub red: i32,
    pub green: i32,
    pub blue: i32,
    pub alpha: i32,
    pub depth: i32,
    pub stencil: i32,
    pub samples: i32,
    pub surface_bits: i32,
    pub renderable_bits: i32,
}

impl MockConfig {
    pub fn rgba(red: i32, green: i32, blue: i32, alpha: i32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
            depth: 0,
            stencil: 0,
            samples: 0,
            surface_bits: PBUFFER_BIT | PIXMAP_BIT,
            renderable_bits: OPENGL_BIT,
        }
    }

    pub fn depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    pub fn stencil(mut self, stencil: i32) -> Self {
        self.stencil = stencil;
        self
    }

    pub fn samples(mut self, samples: i32) -> Self {
        self.samples = samples;
        self
    }

    pub fn surface_bits(mut self, bits: i32) -> Self {
        self.surface_bits = bits;
        self
    }

    pub fn renderable_bits(mut self, bits: i32) -> Self {
        self.renderable_bits = bits;
        self
    }

    fn get(&self, attribute: ConfigAttribute) -> i32 {
        match attribute {
            ConfigAttribute::RedSize => self.red,
            ConfigAttribute::GreenSize => self.green,
            ConfigAttribute::BlueSize => self.blue,
            ConfigAttribute::AlphaSize => self.alpha,
            ConfigAttribute::DepthSize => self.depth,
            ConfigAttribute::StencilSize => self.stencil,
            ConfigAttribute::Samples => self.samples,
            ConfigAttribute::SampleBuffers => i32::from(self.samples > 0),
            ConfigAttribute::SurfaceType => self.surface_bits,
            ConfigAttribute::RenderableType => self.renderable_bits,
        }
    }

    fn matches(&self, attributes: &[(ConfigAttribute, i32)]) -> bool {
        attributes.iter().all(|&(attribute, wanted)| {
            let have = self.get(attribute);
            match attribute {
                ConfigAttribute::SurfaceType | ConfigAttribute::RenderableType => {
                    have & wanted == wanted
                }
                _ => have >= wanted,
            }
        })
    }
}

/// Native call recorded by the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    BindApi(RenderableType),
    Display,
    Initialize,
    CreateContext(u32),
    CreateSurface {
        surface: u32,
        width: i32,
        height: i32,
        addr: *mut c_void,
    },
    DestroySurface(u32),
    MakeCurrent(Option<u32>, Option<u32>),
    SwapBuffers(u32),
    DestroyContext(u32),
    Terminate,
}

/// Operation the mock can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    BindApi,
    Display,
    Initialize,
    CreateContext,
    CreateSurface,
    DestroySurface,
    MakeCurrent,
    DoneCurrent,
    SwapBuffers,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub configs: Vec<MockConfig>,
    pub calls: Vec<Call>,
    pub live_surfaces: Vec<u32>,
    pub current: Option<(Option<u32>, Option<u32>)>,
    pub fail: HashSet<FailPoint>,
    pub procs: HashMap<String, ProcAddress>,
    next_id: u32,
}

extern "system" fn mock_entry_point() {}

/// Cloneable handle; clones share the same state so a test can keep one
/// while the context owns another.
#[derive(Debug, Clone, Default)]
pub struct MockDriver(Rc<RefCell<MockState>>);

impl MockDriver {
    pub fn with_configs(configs: Vec<MockConfig>) -> Self {
        let driver = Self::default();
        {
            let mut state = driver.0.borrow_mut();
            state.configs = configs;
            state
                .procs
                .insert("glClear".to_string(), mock_entry_point as ProcAddress);
        }
        driver
    }

    /// One RGBA8888 / D24S8 config usable for pbuffers and pixmaps.
    pub fn standard() -> Self {
        Self::with_configs(vec![
            MockConfig::rgba(5, 6, 5, 0).depth(16),
            MockConfig::rgba(8, 8, 8, 8).depth(24).stencil(8),
        ])
    }

    pub fn fail(&self, point: FailPoint) {
        self.0.borrow_mut().fail.insert(point);
    }

    pub fn recover(&self, point: FailPoint) {
        self.0.borrow_mut().fail.remove(&point);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }

    pub fn current(&self) -> Option<(Option<u32>, Option<u32>)> {
        self.0.borrow().current
    }

    pub fn live_surfaces(&self) -> Vec<u32> {
        self.0.borrow().live_surfaces.clone()
    }

    fn failing(&self, point: FailPoint) -> bool {
        self.0.borrow().fail.contains(&point)
    }

    fn record(&self, call: Call) {
        self.0.borrow_mut().calls.push(call);
    }

    fn next_id(&self) -> u32 {
        let mut state = self.0.borrow_mut();
        state.next_id += 1;
        state.next_id
    }
}

impl NativeGraphics for MockDriver {
    type Display = u32;
    type Config = usize;
    type Context = u32;
    type Surface = u32;

    fn bind_api(&self, api: RenderableType) -> Result<(), NativeError> {
        self.record(Call::BindApi(api));
        if self.failing(FailPoint::BindApi) {
            return Err(NativeError::new("EGL_BAD_PARAMETER"));
        }
        Ok(())
    }

    fn display(&self) -> Option<u32> {
        self.record(Call::Display);
        (!self.failing(FailPoint::Display)).then_some(1)
    }

    fn initialize(&self, _display: u32) -> Result<(i32, i32), NativeError> {
        self.record(Call::Initialize);
        if self.failing(FailPoint::Initialize) {
            return Err(NativeError::new("EGL_NOT_INITIALIZED"));
        }
        Ok((1, 4))
    }

    fn choose_configs(
        &self,
        _display: u32,
        attributes: &[(ConfigAttribute, i32)],
    ) -> Result<Vec<usize>, NativeError> {
        let state = self.0.borrow();
        Ok(state
            .configs
            .iter()
            .enumerate()
            .filter(|(_, config)| config.matches(attributes))
            .map(|(index, _)| index)
            .collect())
    }

    fn config_attribute(
        &self,
        _display: u32,
        config: usize,
        attribute: ConfigAttribute,
    ) -> Result<i32, NativeError> {
        self.0
            .borrow()
            .configs
            .get(config)
            .map(|c| c.get(attribute))
            .ok_or_else(|| NativeError::new("EGL_BAD_CONFIG"))
    }

    fn create_context(
        &self,
        _display: u32,
        _config: usize,
        _api: RenderableType,
    ) -> Result<u32, NativeError> {
        if self.failing(FailPoint::CreateContext) {
            return Err(NativeError::new("EGL_BAD_MATCH"));
        }
        let id = self.next_id();
        self.record(Call::CreateContext(id));
        Ok(id)
    }

    fn create_pixmap_surface(
        &self,
        _display: u32,
        _config: usize,
        pixmap: &NativePixmap,
    ) -> Result<u32, NativeError> {
        if self.failing(FailPoint::CreateSurface) {
            return Err(NativeError::new("EGL_BAD_NATIVE_PIXMAP"));
        }
        let id = self.next_id();
        self.record(Call::CreateSurface {
            surface: id,
            width: pixmap.width,
            height: pixmap.height,
            addr: pixmap.addr,
        });
        self.0.borrow_mut().live_surfaces.push(id);
        Ok(id)
    }

    fn destroy_surface(&self, _display: u32, surface: u32) -> Result<(), NativeError> {
        self.record(Call::DestroySurface(surface));
        if self.failing(FailPoint::DestroySurface) {
            return Err(NativeError::new("EGL_BAD_ACCESS"));
        }
        let mut state = self.0.borrow_mut();
        let Some(index) = state.live_surfaces.iter().position(|&s| s == surface) else {
            return Err(NativeError::new("EGL_BAD_SURFACE"));
        };
        state.live_surfaces.remove(index);
        Ok(())
    }

    fn make_current(
        &self,
        _display: u32,
        surface: Option<u32>,
        context: Option<u32>,
    ) -> Result<(), NativeError> {
        self.record(Call::MakeCurrent(surface, context));
        let point = if surface.is_none() && context.is_none() {
            FailPoint::DoneCurrent
        } else {
            FailPoint::MakeCurrent
        };
        if self.failing(point) {
            return Err(NativeError::new("EGL_BAD_MATCH"));
        }
        let mut state = self.0.borrow_mut();
        if let Some(surface) = surface
            && !state.live_surfaces.contains(&surface)
        {
            return Err(NativeError::new("EGL_BAD_SURFACE"));
        }
        state.current = match (surface, context) {
            (None, None) => None,
            pair => Some(pair),
        };
        Ok(())
    }

    fn swap_buffers(&self, _display: u32, surface: u32) -> Result<(), NativeError> {
        self.record(Call::SwapBuffers(surface));
        if self.failing(FailPoint::SwapBuffers) {
            return Err(NativeError::new("EGL_CONTEXT_LOST"));
        }
        if !self.0.borrow().live_surfaces.contains(&surface) {
            return Err(NativeError::new("EGL_BAD_SURFACE"));
        }
        Ok(())
    }

    fn proc_address(&self, name: &str) -> Option<ProcAddress> {
        self.0.borrow().procs.get(name).copied()
    }

    fn destroy_context(&self, _display: u32, context: u32) -> Result<(), NativeError> {
        self.record(Call::DestroyContext(context));
        Ok(())
    }

    fn terminate(&self, _display: u32) -> Result<(), NativeError> {
        self.record(Call::Terminate);
        Ok(())
    }
}
