use anyhow::Result;
use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::physic_engine::config::{ApplyOutcome, EmitterSettings, SettingKey};
use crate::physic_engine::PhysicEngine;
use crate::renderer_engine::RendererEngine;
use crate::utils::settings_console::{ConsoleCommand, HELP};
use crate::window_engine::{WindowEngine, WindowEvent};
use crate::{log_metrics_and_fps, profiler::Profiler};

const LOG_INTERVAL: Duration = Duration::from_secs(5);

/// Orchestre la boucle : événements fenêtre, console, frame physique, présentation.
///
/// La cadence suit le rafraîchissement de l'écran (swap interval du
/// `WindowEngine`) : un `step` par frame affichée.
pub struct Simulator<R, P, W>
where
    R: RendererEngine,
    P: PhysicEngine,
    W: WindowEngine,
{
    renderer_engine: R,
    physic_engine: P,
    window_engine: W,

    console: Option<Receiver<String>>,
    settings_path: PathBuf,

    frames: u64,
    profiler: Profiler,
    last_log: Instant,
    first_frame: bool,
}

impl<R, P, W> Simulator<R, P, W>
where
    R: RendererEngine,
    P: PhysicEngine,
    W: WindowEngine,
{
    pub fn new(
        renderer_engine: R,
        physic_engine: P,
        window_engine: W,
        settings_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            renderer_engine,
            physic_engine,
            window_engine,
            console: None,
            settings_path: settings_path.into(),
            frames: 0,
            profiler: Profiler::new(200),
            last_log: Instant::now(),
            first_frame: true,
        }
    }

    /// Branche une source de commandes texte (voir `spawn_stdin_reader`).
    pub fn with_console(mut self, rx: Receiver<String>) -> Self {
        self.console = Some(rx);
        self
    }

    pub fn run(&mut self) -> Result<()> {
        info!("🚀 Speedlines loop running (settings: {})", self.settings_path.display());
        while self.step() {}
        Ok(())
    }

    /// Une itération de la boucle. Retourne `false` quand la fenêtre doit se fermer.
    pub fn step(&mut self) -> bool {
        if self.window_engine.should_close() {
            return false;
        }

        for event in self.window_engine.poll_events() {
            self.handle_window_event(event);
        }
        self.drain_console();

        if self.window_engine.should_close() {
            return false;
        }

        let _frame_guard = self.profiler.frame();

        if self.physic_engine.is_running() {
            let stats = self.profiler.profile_block("physic - frame_step", || {
                self.physic_engine.frame_step(&mut self.renderer_engine)
            });
            self.profiler.record_metric("lines", stats.lines as f32);
            self.profiler.record_metric("recycled lines", stats.recycled as f32);
            self.frames += 1;
        }

        // à l'arrêt, la dernière image est re-présentée telle quelle
        let triangles = self
            .profiler
            .profile_block("render - present", || self.renderer_engine.present());
        self.profiler.record_metric("triangles drawn", triangles as f32);

        self.window_engine.swap_buffers();

        if self.last_log.elapsed() >= LOG_INTERVAL {
            log_metrics_and_fps!(&self.profiler);
            self.last_log = Instant::now();
        }

        if self.first_frame {
            info!("🚀 First frame rendered");
            self.first_frame = false;
        }

        true
    }

    pub fn handle_window_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Resized(w, h) => {
                self.renderer_engine.set_window_size(w, h);
                self.physic_engine.resize(w as f32, h as f32);
            }
            WindowEvent::CloseRequested => self.window_engine.set_should_close(true),
            WindowEvent::ToggleAnimation => {
                self.physic_engine.toggle();
            }
            WindowEvent::ReloadSettings => {
                if let Err(e) = self.reload_config() {
                    warn!("⚠️ Settings reload failed: {:#}", e);
                }
            }
            WindowEvent::SaveSettings => {
                if let Err(e) = self.save_config(None) {
                    warn!("⚠️ Settings save failed: {:#}", e);
                }
            }
            WindowEvent::ToggleFullscreen => self.window_engine.toggle_fullscreen(),
        }
    }

    /// Exécute toutes les lignes de console en attente, sans bloquer.
    fn drain_console(&mut self) {
        let Some(rx) = self.console.clone() else {
            return;
        };
        loop {
            match rx.try_recv() {
                Ok(line) => {
                    let reply = self.handle_console_line(&line);
                    println!("{}", reply);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("Settings console disconnected");
                    self.console = None;
                    break;
                }
            }
        }
    }

    /// Interprète une ligne de console et retourne la réponse à afficher.
    pub fn handle_console_line(&mut self, line: &str) -> String {
        match line.parse::<ConsoleCommand>() {
            Ok(cmd) => {
                debug!("⌨️ Console command: {:?}", cmd);
                self.execute_command(cmd)
            }
            Err(e) => {
                warn!("⚠️ Console: {}", e);
                format!("❌ {}", e)
            }
        }
    }

    pub fn execute_command(&mut self, cmd: ConsoleCommand) -> String {
        match cmd {
            ConsoleCommand::Set(patch) => {
                let outcome = self.physic_engine.apply_settings(&patch);
                describe_outcome(&outcome)
            }
            ConsoleCommand::Get(key) => {
                format!("{} = {}", key, self.physic_engine.get_config().get(key))
            }
            ConsoleCommand::Show => {
                let settings = self.physic_engine.get_config();
                SettingKey::ALL
                    .iter()
                    .map(|&k| format!("{:<15} = {}", k, settings.get(k)))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            ConsoleCommand::Start => match self.physic_engine.start() {
                true => "▶️ started".into(),
                false => "already running".into(),
            },
            ConsoleCommand::Stop => match self.physic_engine.stop() {
                true => "⏸️ stopped".into(),
                false => "already stopped".into(),
            },
            ConsoleCommand::Toggle => match self.physic_engine.toggle() {
                true => "▶️ running".into(),
                false => "⏸️ stopped".into(),
            },
            ConsoleCommand::Reload => match self.reload_config() {
                Ok(outcome) => describe_outcome(&outcome),
                Err(e) => format!("❌ reload failed: {:#}", e),
            },
            ConsoleCommand::Save(path) => match self.save_config(path.as_deref()) {
                Ok(saved) => format!("✅ settings saved to {}", saved.display()),
                Err(e) => format!("❌ save failed: {:#}", e),
            },
            ConsoleCommand::Help => HELP.into(),
        }
    }

    /// Relit le fichier de réglages ; en cas d'erreur, les réglages courants restent en place.
    pub fn reload_config(&mut self) -> Result<ApplyOutcome> {
        let settings = EmitterSettings::from_file(&self.settings_path)?;
        info!("🔄 Settings reloaded from {}", self.settings_path.display());
        debug!("{:#?}", settings);
        Ok(self.physic_engine.reload_config(&settings))
    }

    /// Écrit les réglages courants dans `path`, ou dans le fichier de réglages.
    pub fn save_config(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = path.unwrap_or(&self.settings_path).to_path_buf();
        self.physic_engine.get_config().save_to_file(&path)?;
        info!("💾 Settings saved to {}", path.display());
        Ok(path)
    }

    pub fn close(&mut self) {
        self.renderer_engine.close();
        self.physic_engine.close();
        // la fenêtre est libérée au drop
    }

    pub fn physic_engine(&self) -> &P {
        &self.physic_engine
    }

    pub fn physic_engine_mut(&mut self) -> &mut P {
        &mut self.physic_engine
    }

    pub fn renderer_engine(&self) -> &R {
        &self.renderer_engine
    }

    pub fn window_engine(&self) -> &W {
        &self.window_engine
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Frames simulées (hors frames en pause).
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn profiler(&self) -> &Profiler {
        &self.profiler
    }
}

fn describe_outcome(outcome: &ApplyOutcome) -> String {
    if outcome.is_noop() {
        return "unchanged".into();
    }
    let keys: Vec<&str> = outcome.changed.iter().map(|k| k.name()).collect();
    format!(
        "✅ updated {} (respawn: {}, rebuild: {})",
        keys.join(", "),
        outcome.respawn,
        outcome.rebuild
    )
}
