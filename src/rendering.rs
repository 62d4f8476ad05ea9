//! Factory pour le contexte EGL et le chargement des fonctions GL.
//!
//! Ce module isole la mise en place du driver du binaire de test, pour
//! qu'un toolkit qui embarque la crate construise le même contexte depuis
//! une [`Config`] en un seul appel.

use std::ffi::c_void;

use glow::HasContext;
use tracing::debug;

use crate::config::Config;
use crate::egl::EglDriver;
use crate::error::GraphicsError;
use crate::native::NativeGraphics;
use crate::platform::PlatformContext;

/// Charge libEGL et crée le contexte côté toolkit à partir de `config`.
///
/// Avec [`crate::FatalPolicy::Abort`], un échec termine le processus ici,
/// comme le toolkit l'attend d'un contexte plateforme.
pub fn create_egl_context(config: &Config) -> Result<PlatformContext<EglDriver>, GraphicsError> {
    let policy = config.diagnostics.on_fatal;
    let driver = match EglDriver::load(config.context.library.as_deref()) {
        Ok(driver) => driver,
        Err(err) => {
            // Pas encore de contexte : l'échec de chargement passe par la policy.
            policy.handle::<()>(Err(err.clone()));
            return Err(err);
        }
    };

    PlatformContext::create(driver, &config.format, config.context_options(), policy)
}

/// Construit un contexte `glow` dont les points d'entrée sont résolus via `ctx`.
///
/// Les noms inconnus sont chargés à null ; les appeler reste à la charge
/// de l'appelant, comme avec tout loader GL.
///
/// # Safety
/// Le contexte doit être courant sur ce thread tant que le `glow::Context`
/// retourné est utilisé.
pub unsafe fn load_gl<N: NativeGraphics>(ctx: &PlatformContext<N>) -> glow::Context {
    // SAFETY: reporté sur l'appelant.
    unsafe {
        glow::Context::from_loader_function(|name| {
            ctx.get_proc_address(name)
                .map_or(std::ptr::null(), |f| f as *const c_void)
        })
    }
}

/// Efface la surface courante avec `color` puis trace une bande plus
/// sombre au milieu, de quoi voir que la surface est vivante.
///
/// # Safety
/// Émet des appels GL ; un contexte doit être courant.
pub unsafe fn draw_test_frame(gl: &glow::Context, width: i32, height: i32, color: [f32; 4]) {
    unsafe {
        gl.viewport(0, 0, width, height);
        gl.disable(glow::SCISSOR_TEST);
        gl.clear_color(color[0], color[1], color[2], color[3]);
        gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT | glow::STENCIL_BUFFER_BIT);

        let band = height / 4;
        gl.enable(glow::SCISSOR_TEST);
        gl.scissor(0, (height - band) / 2, width, band);
        gl.clear_color(color[0] * 0.5, color[1] * 0.5, color[2] * 0.5, color[3]);
        gl.clear(glow::COLOR_BUFFER_BIT);
        gl.disable(glow::SCISSOR_TEST);
    }
    debug!(width, height, "Test frame drawn");
}
