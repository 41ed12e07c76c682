use anyhow::Result;

/// Événements fenêtre, indépendants de la bibliothèque de fenêtrage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// Nouvelle taille du framebuffer, en pixels.
    Resized(i32, i32),
    CloseRequested,
    /// Bascule start/stop de l'animation.
    ToggleAnimation,
    /// Relit le fichier de réglages.
    ReloadSettings,
    /// Écrit les réglages courants dans le fichier.
    SaveSettings,
    ToggleFullscreen,
}

pub trait WindowEngine {
    fn init(width: i32, height: i32, title: &str) -> Result<Self>
    where
        Self: Sized;

    /// Traite les événements en attente et les traduit.
    fn poll_events(&mut self) -> Vec<WindowEvent>;
    fn swap_buffers(&mut self);
    fn should_close(&self) -> bool;
    fn set_should_close(&mut self, value: bool);
    /// Taille du framebuffer (= étendue du canvas).
    fn get_size(&self) -> (i32, i32);
    fn is_fullscreen(&self) -> bool;
    /// Passe en plein écran sur le moniteur principal ou revient en fenêtré.
    fn toggle_fullscreen(&mut self);
}
