use crate::renderer_engine::surface::DrawingSurface;

/// Moteur de rendu : une surface de dessin capable de présenter la frame
/// accumulée à l'écran.
pub trait RendererEngine: DrawingSurface {
    /// Dessine la géométrie accumulée depuis le dernier effacement complet.
    /// Retourne le nombre de triangles envoyés au GPU.
    fn present(&mut self) -> usize;

    /// Nouvelle taille du framebuffer.
    fn set_window_size(&mut self, width: i32, height: i32);

    fn close(&mut self);
}
