use crate::physic_engine::config::{ApplyOutcome, EmitterSettings, SettingsPatch};
use crate::physic_engine::line::Line;
use crate::physic_engine::speedlines::FrameStats;
use crate::renderer_engine::surface::DrawingSurface;

/// 🔧 Trait `PhysicEngine`
///
/// Interface pilotée par le `Simulator` : avance la simulation d'une frame,
/// reçoit les changements de réglages et de taille du canvas, et expose
/// l'état de la boucle d'animation.
///
/// `frame_step` est générique sur la surface de dessin, le trait n'est donc
/// pas "dyn compatible" : le simulateur est monomorphisé sur son moteur.
pub trait PhysicEngine {
    /// Nouvelle étendue du canvas ; la collection de lignes est reconstruite.
    fn resize(&mut self, width: f32, height: f32);

    /// Efface `surface`, met à jour puis dessine chaque ligne.
    fn frame_step<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> FrameStats;

    /// Fusionne une mise à jour partielle des réglages.
    fn apply_settings(&mut self, patch: &SettingsPatch) -> ApplyOutcome;

    /// Recharge un jeu complet de réglages (mêmes règles que `apply_settings`).
    fn reload_config(&mut self, settings: &EmitterSettings) -> ApplyOutcome {
        self.apply_settings(&SettingsPatch::from(settings))
    }

    fn get_config(&self) -> &EmitterSettings;

    /// Démarre l'animation ; `false` si elle tournait déjà.
    fn start(&mut self) -> bool;

    /// Arrête l'animation ; `false` si elle était déjà arrêtée.
    fn stop(&mut self) -> bool;

    fn is_running(&self) -> bool;

    /// Bascule start/stop, retourne le nouvel état.
    fn toggle(&mut self) -> bool {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
        self.is_running()
    }

    /// Itère sur les lignes simulées.
    fn iter_lines<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Line> + 'a>;

    /// Ferme / libère le moteur.
    fn close(&mut self) {} // Par défaut, ne fait rien.
}
