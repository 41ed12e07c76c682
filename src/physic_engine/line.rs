#[cfg(debug_assertions)]
use log::trace;
use rand::Rng;

use crate::physic_engine::{
    config::{EmitterSettings, EmitterType},
    mesh::LineMesh,
    types::{deg_to_rad, jitter_factor, Vector2, VectorExt},
};
use crate::renderer_engine::surface::DrawingSurface;

/// Mode d'initialisation d'une ligne.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnMode {
    /// Première apparition : en radial, la distance à l'émetteur est tirée
    /// uniformément dans tout le champ.
    Initial,
    /// Recyclage : en radial, la ligne repart du bord d'entrée de son flux
    /// (rayon émetteur si elle sort, bord lointain si elle rentre).
    Recycled,
}

/// Vue en lecture seule des réglages et de l'étendue du canvas,
/// passée à chaque appel sur une ligne.
#[derive(Debug, Clone, Copy)]
pub struct EmitterContext<'a> {
    pub settings: &'a EmitterSettings,
    pub width: f32,
    pub height: f32,
}

impl<'a> EmitterContext<'a> {
    pub fn new(settings: &'a EmitterSettings, width: f32, height: f32) -> Self {
        Self {
            settings,
            width,
            height,
        }
    }

    /// Position de l'émetteur en pixels.
    #[inline]
    pub fn emitter_pos(&self) -> Vector2 {
        Vector2::new(
            self.width * (self.settings.emitter_x / 100.0),
            self.height * (self.settings.emitter_y / 100.0),
        )
    }

    #[inline]
    pub fn max_extent(&self) -> f32 {
        self.width.max(self.height)
    }
}

/// Une speedline.
///
/// `pos`/`vel` évoluent à chaque frame ; `speed`, `length`,
/// `randomized_emitter_radius` et `sizes` sont des copies bruitées des
/// réglages, tirées au (re)spawn et figées jusqu'au suivant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub pos: Vector2,
    pub vel: Vector2,
    pub speed: f32,
    pub length: f32,
    pub randomized_emitter_radius: f32,
    pub sizes: [f32; 3],
}

impl Line {
    /// Crée une ligne et l'initialise selon `mode`.
    pub fn spawn(ctx: &EmitterContext, mode: SpawnMode, rng: &mut impl Rng) -> Self {
        let mut line = Self::default();
        line.initialize(ctx, mode, rng);
        line
    }

    /// (Ré)initialise la ligne en place : nouveau tirage aléatoire complet.
    pub fn initialize(&mut self, ctx: &EmitterContext, mode: SpawnMode, rng: &mut impl Rng) {
        let settings = ctx.settings;
        let emitter_pos = ctx.emitter_pos();

        self.randomized_emitter_radius = settings.emitter_radius * jitter_factor(rng);
        self.speed = settings.speed * jitter_factor(rng);
        self.length = settings.length * jitter_factor(rng);

        match settings.emitter_type {
            EmitterType::Radial => {
                let angle = rng.random::<f32>() * std::f32::consts::TAU;
                let max_extent = ctx.max_extent();
                let spread = match mode {
                    SpawnMode::Initial => rng.random::<f32>(),
                    SpawnMode::Recycled if self.speed >= 0.0 => 0.0,
                    SpawnMode::Recycled => 1.0,
                };
                let distance = self.randomized_emitter_radius + spread * max_extent;

                self.pos = emitter_pos + Vector2::from_angle(angle) * distance;
                self.vel = Vector2::from_angle(angle) * self.speed.abs();
            }
            EmitterType::Linear => {
                let angle = deg_to_rad(settings.angle);
                self.pos = Vector2::new(
                    rng.random::<f32>() * ctx.width,
                    rng.random::<f32>() * ctx.height,
                );
                self.vel = Vector2::from_angle(angle) * self.speed;
            }
        }

        self.sizes = settings.sizes().map(|size| size * jitter_factor(rng));
    }

    /// Avance la ligne d'un pas de simulation.
    ///
    /// Retourne `true` si la ligne a atteint sa frontière de recyclage et a
    /// été ré-initialisée.
    pub fn update(&mut self, ctx: &EmitterContext, rng: &mut impl Rng) -> bool {
        match ctx.settings.emitter_type {
            EmitterType::Linear => {
                self.pos += self.vel;
                self.wrap_position(ctx.width, ctx.height);
                false
            }
            EmitterType::Radial => {
                // distance mesurée avant le déplacement
                let distance = ctx.emitter_pos().distance(self.pos);

                let recycle = if self.speed >= 0.0 {
                    self.pos += self.vel;
                    distance > ctx.max_extent() / 2.0
                } else {
                    // vel ne porte que la norme : on recule pour converger
                    self.pos -= self.vel;
                    distance <= self.randomized_emitter_radius
                };

                if recycle {
                    #[cfg(debug_assertions)]
                    trace!("♻️ Line recycled at ({:.1}, {:.1})", self.pos.x, self.pos.y);
                    self.initialize(ctx, SpawnMode::Recycled, rng);
                }
                recycle
            }
        }
    }

    /// Bouclage torique, axe par axe : une coordonnée qui sort d'un côté
    /// repart du bord opposé.
    fn wrap_position(&mut self, width: f32, height: f32) {
        if self.pos.x < 0.0 {
            self.pos.x = width;
        }
        if self.pos.x > width {
            self.pos.x = 0.0;
        }
        if self.pos.y < 0.0 {
            self.pos.y = height;
        }
        if self.pos.y > height {
            self.pos.y = 0.0;
        }
    }

    /// Extrémité de la traînée.
    pub fn end_pos(&self, ctx: &EmitterContext) -> Vector2 {
        match ctx.settings.emitter_type {
            EmitterType::Radial => {
                self.pos + (self.pos - ctx.emitter_pos()).with_magnitude(self.length)
            }
            EmitterType::Linear => self.pos - self.vel.with_magnitude(self.length),
        }
    }

    /// Maillage effilé de la ligne dans son état courant.
    pub fn mesh(&self, ctx: &EmitterContext) -> LineMesh {
        LineMesh::build(self.pos, self.end_pos(ctx), self.sizes)
    }

    /// Remplit les deux demi-polygones sur `surface` avec la couleur courante.
    pub fn draw<S: DrawingSurface + ?Sized>(&self, ctx: &EmitterContext, surface: &mut S) {
        let mesh = self.mesh(ctx);
        for half in &mesh.halves {
            let [first, rest @ ..] = &half.points;
            surface.begin_path();
            surface.move_to(*first);
            for p in rest {
                surface.line_to(*p);
            }
            surface.close_path();
            surface.fill(ctx.settings.color);
        }
    }
}
