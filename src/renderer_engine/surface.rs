use itertools::Itertools;
#[cfg(debug_assertions)]
use log::debug;

use crate::physic_engine::types::{Color, Vector2};

/// Surface de dessin 2D minimale, sur le modèle d'un contexte canvas :
/// chemins fermés remplis d'une couleur unie, effacement rectangulaire.
pub trait DrawingSurface {
    /// Étendue courante (largeur, hauteur) en pixels.
    fn size(&self) -> (f32, f32);
    fn set_size(&mut self, width: f32, height: f32);

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Oublie le chemin courant.
    fn begin_path(&mut self);
    /// Commence un nouveau sous-chemin en `p`.
    fn move_to(&mut self, p: Vector2);
    /// Ajoute un segment droit jusqu'à `p`.
    fn line_to(&mut self, p: Vector2);
    fn close_path(&mut self);
    /// Remplit le chemin courant (chaque sous-chemin est implicitement fermé).
    fn fill(&mut self, color: Color);
}

/// Accumulateur de chemin partagé par les implémentations de `DrawingSurface`.
#[derive(Debug, Default, Clone)]
pub struct PathBuilder {
    subpaths: Vec<Vec<Vector2>>,
}

impl PathBuilder {
    pub fn begin(&mut self) {
        self.subpaths.clear();
    }

    pub fn move_to(&mut self, p: Vector2) {
        self.subpaths.push(vec![p]);
    }

    /// Sans sous-chemin ouvert, se comporte comme `move_to`.
    pub fn line_to(&mut self, p: Vector2) {
        match self.subpaths.last_mut() {
            Some(current) => current.push(p),
            None => self.move_to(p),
        }
    }

    /// Ferme le sous-chemin courant : le suivant repart de son premier point.
    pub fn close(&mut self) {
        if let Some(first) = self.subpaths.last().and_then(|s| s.first()).copied() {
            self.subpaths.push(vec![first]);
        }
    }

    /// Sous-chemins remplissables (au moins 3 points).
    pub fn fillable(&self) -> impl Iterator<Item = &[Vector2]> {
        self.subpaths
            .iter()
            .filter(|s| s.len() >= 3)
            .map(|s| s.as_slice())
    }
}

/// Triangulation en éventail depuis le premier point (chemins convexes ou
/// quasi-convexes, comme les demi-polygones des speedlines).
pub fn triangulate_fan(points: &[Vector2]) -> impl Iterator<Item = [Vector2; 3]> + '_ {
    let apex = points.first().copied().unwrap_or_default();
    points
        .iter()
        .skip(1)
        .tuple_windows()
        .map(move |(b, c)| [apex, *b, *c])
}

/// `true` si le rectangle recouvre toute la surface `(width, height)`.
pub fn covers_surface(x: f32, y: f32, w: f32, h: f32, width: f32, height: f32) -> bool {
    x <= 0.0 && y <= 0.0 && x + w >= width && y + h >= height
}

/// Polygone rempli enregistré par `RecordingSurface`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledPolygon {
    pub points: Vec<Vector2>,
    pub color: Color,
}

/// Surface en mémoire : enregistre les polygones remplis depuis le dernier
/// effacement complet.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub filled: Vec<FilledPolygon>,
    pub clears: usize,
    path: PathBuilder,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

impl DrawingSurface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.clears += 1;
        if covers_surface(x, y, width, height, self.width, self.height) {
            self.filled.clear();
        } else {
            #[cfg(debug_assertions)]
            debug!("Partial clear ignored by RecordingSurface");
        }
    }

    fn begin_path(&mut self) {
        self.path.begin();
    }

    fn move_to(&mut self, p: Vector2) {
        self.path.move_to(p);
    }

    fn line_to(&mut self, p: Vector2) {
        self.path.line_to(p);
    }

    fn close_path(&mut self) {
        self.path.close();
    }

    fn fill(&mut self, color: Color) {
        let polygons: Vec<FilledPolygon> = self
            .path
            .fillable()
            .map(|points| FilledPolygon {
                points: points.to_vec(),
                color,
            })
            .collect();
        self.filled.extend(polygons);
    }
}
