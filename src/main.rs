//! Binaire de test : crée un contexte EGL, dessine une frame dans une
//! fenêtre en mémoire et la présente.
//!
//! Usage :
//!   glcontext [--verbose] [--report-errors] [--write-config]
//!
//! Exemples :
//!   cargo run                        → config.toml ou valeurs par défaut
//!   cargo run -- --verbose           → trace chaque appel du contexte
//!   cargo run -- --report-errors     → journalise les échecs natifs au lieu d'abandonner
//!   cargo run -- --write-config      → écrit la config effective puis quitte

use std::env;
use std::error::Error;

use tracing::info;

use glcontext::config::Config;
use glcontext::rendering;
use glcontext::{FatalPolicy, FramebufferWindow};

/// Couleur de fond de la frame de test.
const FRAME_COLOR: [f32; 4] = [0.2, 0.4, 0.8, 1.0];

fn main() -> Result<(), Box<dyn Error>> {
    // ── 1. Logging / Tracing ───────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // ── 2. Configuration + flags de ligne de commande ─────────────────
    let args: Vec<String> = env::args().skip(1).collect();
    let mut config = Config::load();
    if args.iter().any(|a| a == "--verbose") {
        config.diagnostics.verbose = true;
    }
    if args.iter().any(|a| a == "--report-errors") {
        config.diagnostics.on_fatal = FatalPolicy::Report;
    }

    if args.iter().any(|a| a == "--write-config") {
        let path = config.save()?;
        println!("{}", path.display());
        return Ok(());
    }

    // ── 3. Contexte ────────────────────────────────────────────────────
    let mut ctx = rendering::create_egl_context(&config)?;
    let format = ctx.format();
    info!(
        rgba = ?(format.red, format.green, format.blue, format.alpha),
        depth = format.depth,
        stencil = format.stencil,
        samples = format.samples,
        api = format.renderable.name(),
        requested = %config.format,
        "Surface format"
    );

    // ── 4. Une frame ───────────────────────────────────────────────────
    let mut window = FramebufferWindow::new(config.window.width, config.window.height)?;
    if !ctx.make_current(&mut window) {
        return Err("make_current failed".into());
    }

    // SAFETY: le contexte vient d'être rendu courant et le reste jusqu'à
    // swap_buffers.
    unsafe {
        let gl = rendering::load_gl(&ctx);
        rendering::draw_test_frame(&gl, config.window.width, config.window.height, FRAME_COLOR);
    }

    ctx.swap_buffers(&mut window);
    for rect in window.take_refreshes() {
        info!(
            x = rect.origin.x,
            y = rect.origin.y,
            width = rect.size.width,
            height = rect.size.height,
            "Refresh"
        );
    }

    // ── 5. Libération : la surface d'abord, le contexte au drop ───────
    let policy = ctx.policy();
    policy.handle(ctx.context().release_surface(&mut window));
    Ok(())
}
