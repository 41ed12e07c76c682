use anyhow::Result;
use log::{info, warn};
use std::{env, path::PathBuf};

use speedlines_sim::physic_engine::{EmitterSettings, SpeedlinesField};
use speedlines_sim::renderer_engine::RendererGraphics;
use speedlines_sim::utils::{show_rust_core_dependencies, spawn_stdin_reader};
use speedlines_sim::window_engine::{GlfwWindowEngine, WindowEngine};
use speedlines_sim::Simulator;

const DEFAULT_SETTINGS_PATH: &str = "assets/config/speedlines.toml";

/// Main entry point for the Speedlines application.
fn main() -> Result<()> {
    env_logger::init();

    info!("🚀 Starting Speedlines...");

    show_rust_core_dependencies();

    // --------------------------
    // Fichier de réglages : argument CLI, puis variable d'environnement
    // --------------------------
    let settings_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::var("SPEEDLINES_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));

    let settings = EmitterSettings::from_file(&settings_path).unwrap_or_else(|e| {
        warn!("⚠️ {:#}, using default settings", e);
        EmitterSettings::default()
    });
    info!("Speedlines settings loaded:\n{:#?}", settings);

    let window_width = 1024;
    let window_height = 800;

    // 1. Init Window & Context
    let window_engine = GlfwWindowEngine::init(window_width, window_height, "Speedlines")?;
    // le canvas suit le framebuffer (différent de la fenêtre en HiDPI)
    let (fb_width, fb_height) = window_engine.get_size();

    // 2. Init Renderer (now that GL context is ready)
    let renderer_engine = unsafe { RendererGraphics::new(fb_width, fb_height)? };

    // 3. Champ de speedlines, animé dès le départ
    let mut physic_engine = SpeedlinesField::new(settings, fb_width as f32, fb_height as f32);
    physic_engine.start();

    // 4. Init Simulator
    let console = spawn_stdin_reader()?;
    info!("⌨️ Settings console ready on stdin, type 'help'");
    let mut simulator =
        Simulator::new(renderer_engine, physic_engine, window_engine, settings_path)
            .with_console(console);

    simulator.run()?;
    simulator.close();

    Ok(())
}
