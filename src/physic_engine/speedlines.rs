use log::{debug, info, warn};
use rand::rngs::ThreadRng;
use rand::Rng;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::physic_engine::{
    config::{ApplyOutcome, EmitterSettings, SettingsPatch, MAX_LINES},
    line::{EmitterContext, Line, SpawnMode},
    PhysicEngine,
};
use crate::renderer_engine::surface::DrawingSurface;

/// Compteur global des handles d'animation (0 est réservé à "aucun").
static FRAME_HANDLE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Handle de la boucle d'animation en cours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(NonZeroU64);

impl FrameHandle {
    fn next() -> Self {
        let id = FRAME_HANDLE_COUNTER.fetch_add(1, Ordering::Relaxed).max(1);
        Self(NonZeroU64::new(id).unwrap_or(NonZeroU64::MIN))
    }

    pub fn id(&self) -> u64 {
        self.0.get()
    }
}

/// Bilan d'un `frame_step`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub lines: usize,
    pub recycled: usize,
}

/// Champ d'émission : possède les lignes et les réglages partagés.
///
/// Seul propriétaire mutable de la collection de lignes.
/// Invariant : `lines.len() == settings.line_count()` après chaque mise à jour.
#[derive(Debug)]
pub struct SpeedlinesField<R: Rng = ThreadRng> {
    width: f32,
    height: f32,
    settings: EmitterSettings,
    lines: Vec<Line>,
    rng: R,
    animation: Option<FrameHandle>,
    frames: u64,
}

impl SpeedlinesField<ThreadRng> {
    pub fn new(settings: EmitterSettings, width: f32, height: f32) -> Self {
        Self::with_rng(settings, width, height, rand::rng())
    }
}

impl<R: Rng> SpeedlinesField<R> {
    pub fn with_rng(settings: EmitterSettings, width: f32, height: f32, rng: R) -> Self {
        let mut field = Self {
            width,
            height,
            settings,
            lines: Vec::new(),
            rng,
            animation: None,
            frames: 0,
        };
        field.build_lines();
        field
    }

    /// Remplace la collection par `count` lignes fraîchement créées (mode initial).
    pub fn build_lines(&mut self) {
        let count = self.settings.line_count();
        if count < self.settings.count.max(0) as usize {
            warn!(
                "⚠️ count {} exceeds the {} line cap, building {} lines",
                self.settings.count, MAX_LINES, count
            );
        }
        let ctx = EmitterContext::new(&self.settings, self.width, self.height);
        let rng = &mut self.rng;

        self.lines = (0..count)
            .map(|_| Line::spawn(&ctx, SpawnMode::Initial, &mut *rng))
            .collect();

        info!(
            "✨ Built {} {} speedlines on {}x{} canvas",
            count, self.settings.emitter_type, self.width, self.height
        );
    }

    /// Ré-initialise toutes les lignes existantes (mode recyclé), sans toucher au nombre.
    fn respawn_lines(&mut self) {
        let ctx = EmitterContext::new(&self.settings, self.width, self.height);
        for line in &mut self.lines {
            line.initialize(&ctx, SpawnMode::Recycled, &mut self.rng);
        }
        debug!("♻️ Respawned {} speedlines", self.lines.len());
    }

    /// Une frame : efface la surface puis, pour chaque ligne, update puis draw.
    pub fn frame_step<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> FrameStats {
        surface.clear_rect(0.0, 0.0, self.width, self.height);

        let ctx = EmitterContext::new(&self.settings, self.width, self.height);
        let mut recycled = 0;
        for line in &mut self.lines {
            recycled += line.update(&ctx, &mut self.rng) as usize;
            line.draw(&ctx, surface);
        }

        self.frames += 1;
        FrameStats {
            lines: self.lines.len(),
            recycled,
        }
    }

    /// Fusionne une mise à jour partielle des réglages.
    ///
    /// Les deux réactions sont indépendantes : ré-initialisation des lignes si
    /// un paramètre de mouvement/forme a changé, reconstruction complète si
    /// `count` a changé.
    pub fn apply_settings(&mut self, patch: &SettingsPatch) -> ApplyOutcome {
        let outcome = self.settings.merge(patch);

        if !outcome.is_noop() {
            debug!("⚙️ Settings changed: {:?}", outcome.changed);
        }
        if outcome.respawn {
            self.respawn_lines();
        }
        if outcome.rebuild {
            self.build_lines();
        }
        outcome
    }

    /// Met à jour l'étendue du canvas et reconstruit toujours la collection.
    pub fn resize(&mut self, width: f32, height: f32) {
        info!("🖥️ Canvas resized: {} x {}", width, height);
        self.width = width;
        self.height = height;
        self.build_lines();
    }

    /// Démarre la boucle d'animation si elle ne tourne pas déjà.
    pub fn start(&mut self) -> bool {
        if self.animation.is_some() {
            return false;
        }
        let handle = FrameHandle::next();
        info!("▶️ Speedlines animation started (handle {})", handle.id());
        self.animation = Some(handle);
        true
    }

    /// Arrête la boucle d'animation si elle tourne.
    pub fn stop(&mut self) -> bool {
        match self.animation.take() {
            Some(handle) => {
                info!("⏸️ Speedlines animation stopped (handle {})", handle.id());
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.animation.is_some()
    }

    pub fn animation_handle(&self) -> Option<FrameHandle> {
        self.animation
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Accès mutable aux lignes ; la taille de la collection reste fixe.
    pub fn lines_mut(&mut self) -> &mut [Line] {
        &mut self.lines
    }

    pub fn settings(&self) -> &EmitterSettings {
        &self.settings
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Vue en lecture seule utilisée par les lignes (utile pour inspecter un maillage).
    pub fn emitter_context(&self) -> EmitterContext<'_> {
        EmitterContext::new(&self.settings, self.width, self.height)
    }
}

// ==================================
// Trait PhysicEngine
// ==================================
impl<R: Rng> PhysicEngine for SpeedlinesField<R> {
    fn resize(&mut self, width: f32, height: f32) {
        SpeedlinesField::resize(self, width, height);
    }

    fn frame_step<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> FrameStats {
        SpeedlinesField::frame_step(self, surface)
    }

    fn apply_settings(&mut self, patch: &SettingsPatch) -> ApplyOutcome {
        SpeedlinesField::apply_settings(self, patch)
    }

    fn get_config(&self) -> &EmitterSettings {
        &self.settings
    }

    fn start(&mut self) -> bool {
        SpeedlinesField::start(self)
    }

    fn stop(&mut self) -> bool {
        SpeedlinesField::stop(self)
    }

    fn is_running(&self) -> bool {
        SpeedlinesField::is_running(self)
    }

    fn iter_lines<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Line> + 'a> {
        Box::new(self.lines.iter())
    }

    fn close(&mut self) {
        self.stop();
        self.lines.clear();
    }
}
