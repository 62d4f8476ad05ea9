//! Surface formats: what the toolkit asks for and what the driver gives.
//!
//! A [`FormatRequest`] leaves every component optional ("don't care"). The
//! [`SurfaceFormat`] is read back from the native config after negotiation
//! and may differ from the request, so callers must re-read it through
//! [`crate::GraphicsContext::format`] instead of assuming their request was
//! honored exactly.

use serde::{Deserialize, Serialize};

/// Client API the rendering context is created for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderableType {
    /// Desktop OpenGL.
    #[default]
    #[serde(rename = "opengl")]
    OpenGl,
    /// OpenGL ES 2.x / 3.x.
    #[serde(rename = "opengl-es")]
    OpenGlEs,
}

impl RenderableType {
    pub fn name(self) -> &'static str {
        match self {
            RenderableType::OpenGl => "OpenGL",
            RenderableType::OpenGlEs => "OpenGL ES",
        }
    }
}

/// Surface capability the chosen config must support.
///
/// Presentation surfaces are pixmap-backed, but some drivers only advertise
/// off-screen (pbuffer) capable configs for in-memory targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceType {
    #[default]
    Pbuffer,
    Pixmap,
}

/// Requested color/depth/stencil/multisample layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatRequest {
    pub red: Option<u32>,
    pub green: Option<u32>,
    pub blue: Option<u32>,
    pub alpha: Option<u32>,
    pub depth: Option<u32>,
    pub stencil: Option<u32>,
    pub samples: Option<u32>,
    pub renderable: RenderableType,
}

impl FormatRequest {
    /// 8 bits per RGBA channel, 24-bit depth, 8-bit stencil.
    pub fn rgba8888_d24s8() -> Self {
        Self {
            red: Some(8),
            green: Some(8),
            blue: Some(8),
            alpha: Some(8),
            depth: Some(24),
            stencil: Some(8),
            samples: None,
            renderable: RenderableType::OpenGl,
        }
    }
}

impl std::fmt::Display for FormatRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn component(value: Option<u32>) -> String {
            value.map_or_else(|| "*".to_string(), |v| v.to_string())
        }
        write!(
            f,
            "{} rgba {}/{}/{}/{} depth {} stencil {} samples {}",
            self.renderable.name(),
            component(self.red),
            component(self.green),
            component(self.blue),
            component(self.alpha),
            component(self.depth),
            component(self.stencil),
            component(self.samples),
        )
    }
}

/// Attributes actually achieved by the negotiated config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceFormat {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    pub alpha: u32,
    pub depth: u32,
    pub stencil: u32,
    pub samples: u32,
    pub renderable: RenderableType,
}

impl SurfaceFormat {
    /// Sum of the color channel sizes.
    pub fn color_depth(&self) -> u32 {
        self.red + self.green + self.blue + self.alpha
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha > 0
    }

    /// True when every component named by `request` is at least as large
    /// as requested and the API matches.
    pub fn satisfies(&self, request: &FormatRequest) -> bool {
        let at_least = |achieved: u32, requested: Option<u32>| {
            requested.is_none_or(|requested| achieved >= requested)
        };
        self.renderable == request.renderable
            && at_least(self.red, request.red)
            && at_least(self.green, request.green)
            && at_least(self.blue, request.blue)
            && at_least(self.alpha, request.alpha)
            && at_least(self.depth, request.depth)
            && at_least(self.stencil, request.stencil)
            && at_least(self.samples, request.samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn achieved() -> SurfaceFormat {
        SurfaceFormat {
            red: 8,
            green: 8,
            blue: 8,
            alpha: 8,
            depth: 24,
            stencil: 8,
            samples: 0,
            renderable: RenderableType::OpenGl,
        }
    }

    #[test]
    fn test_satisfies_exact_request() {
        assert!(achieved().satisfies(&FormatRequest::rgba8888_d24s8()));
    }

    #[test]
    fn test_dont_care_components_always_satisfied() {
        assert!(achieved().satisfies(&FormatRequest::default()));
    }

    #[test]
    fn test_smaller_component_is_not_satisfying() {
        let mut format = achieved();
        format.depth = 16;
        assert!(!format.satisfies(&FormatRequest::rgba8888_d24s8()));
    }

    #[test]
    fn test_api_mismatch_is_not_satisfying() {
        let request = FormatRequest {
            renderable: RenderableType::OpenGlEs,
            ..FormatRequest::default()
        };
        assert!(!achieved().satisfies(&request));
    }

    #[test]
    fn test_color_depth() {
        assert_eq!(achieved().color_depth(), 32);
        assert!(achieved().has_alpha());
    }

    #[test]
    fn test_request_display() {
        let text = FormatRequest::rgba8888_d24s8().to_string();
        assert_eq!(text, "OpenGL rgba 8/8/8/8 depth 24 stencil 8 samples *");
    }

    #[test]
    fn test_renderable_type_toml_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            api: RenderableType,
        }
        let w: Wrapper = toml::from_str(r#"api = "opengl-es""#).unwrap();
        assert_eq!(w.api, RenderableType::OpenGlEs);
        let w: Wrapper = toml::from_str(r#"api = "opengl""#).unwrap();
        assert_eq!(w.api, RenderableType::OpenGl);
    }
}
