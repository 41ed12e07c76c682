use anyhow::{anyhow, Result};
use glam::{Vec2, Vec4};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ------------------------
// Vector2
// ------------------------

/// Vecteur 2D en coordonnées canvas (x vers la droite, y vers le bas).
///
/// Type valeur (`Copy`) : chaque opération retourne un nouveau vecteur.
pub type Vector2 = Vec2;

/// Opérations de speedline absentes de `glam`.
pub trait VectorExt {
    /// Normalise puis met à l'échelle `len`. Un vecteur nul reste nul.
    fn with_magnitude(self, len: f32) -> Self;
}

impl VectorExt for Vec2 {
    #[inline]
    fn with_magnitude(self, len: f32) -> Self {
        self.normalize_or_zero() * len
    }
}

// ------------------------
// Helpers numériques
// ------------------------

#[inline]
pub fn deg_to_rad(deg: f32) -> f32 {
    deg * std::f32::consts::PI / 180.0
}

/// Facteur de variation aléatoire dans `[0.5, 1.0)`.
#[inline]
pub fn jitter_factor(rng: &mut impl Rng) -> f32 {
    0.5 + rng.random::<f32>() * 0.5
}

// ------------------------
// Color
// ------------------------

lazy_static::lazy_static! {
    static ref HEX_COLOR: Regex =
        Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap();
}

/// Couleur de remplissage RGBA (composantes dans `[0, 1]`).
///
/// Se lit / s'écrit en hexadécimal : `#rgb`, `#rrggbb` ou `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub Vec4);

impl Color {
    pub const WHITE: Self = Self(Vec4::ONE);
    pub const BLACK: Self = Self(Vec4::new(0.0, 0.0, 0.0, 1.0));

    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self(Vec4::new(r, g, b, a))
    }

    pub fn to_array(self) -> [f32; 4] {
        self.0.to_array()
    }

    fn to_u8(c: f32) -> u8 {
        (c.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = HEX_COLOR
            .captures(s.trim())
            .ok_or_else(|| anyhow!("invalid color '{}' (expected #rgb, #rrggbb or #rrggbbaa)", s))?;
        let hex = &caps[1];

        // #rgb → #rrggbb
        let expanded: String = if hex.len() == 3 {
            hex.chars().flat_map(|c| [c, c]).collect()
        } else {
            hex.to_string()
        };

        let channel = |i: usize| -> Result<f32> {
            let byte = u8::from_str_radix(&expanded[i..i + 2], 16)?;
            Ok(byte as f32 / 255.0)
        };

        let a = if expanded.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for Color {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_array().map(Self::to_u8);
        if a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }
}
