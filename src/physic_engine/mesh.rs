use crate::physic_engine::types::Vector2;

/// Décalage perpendiculaire appliqué à chaque demi-polygone pour refermer la
/// couture le long de l'axe de la ligne (valeur réglée à l'œil).
pub const SEAM_SHIFT: f32 = 0.5;

/// Chemin fermé de 5 points : bord extérieur (début, milieu, fin) puis retour
/// par l'axe central (fin, début).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPolygon {
    pub points: [Vector2; 5],
}

/// Forme effilée d'une speedline : deux demi-polygones symétriques.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMesh {
    pub start: Vector2,
    pub mid: Vector2,
    pub end: Vector2,
    /// Demi-polygone côté `+perp` puis côté `-perp`.
    pub halves: [HalfPolygon; 2],
}

impl LineMesh {
    /// Construit le maillage entre `start` et `end` avec le profil de largeur
    /// `sizes = [début, milieu, fin]`.
    pub fn build(start: Vector2, end: Vector2, sizes: [f32; 3]) -> Self {
        let mid = start.midpoint(end);
        let perp_angle = (end.y - start.y).atan2(end.x - start.x) + std::f32::consts::FRAC_PI_2;
        let perp = Vector2::from_angle(perp_angle);

        let half = |sign: f32| -> HalfPolygon {
            let shift = perp * (SEAM_SHIFT * sign);
            let edge = |p: Vector2, size: f32| p + perp * (size * sign / 2.0) - shift;
            HalfPolygon {
                points: [
                    edge(start, sizes[0]),
                    edge(mid, sizes[1]),
                    edge(end, sizes[2]),
                    end - shift,
                    start - shift,
                ],
            }
        };

        Self {
            start,
            mid,
            end,
            halves: [half(1.0), half(-1.0)],
        }
    }
}
