use anyhow::{anyhow, bail, Context, Result};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::physic_engine::types::Color;

/// Plafond du nombre de lignes simulées, quelle que soit la valeur de `count`.
pub const MAX_LINES: usize = 100_000;

/// Topologie d'émission des speedlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmitterType {
    /// Flux directionnel : toutes les lignes suivent `angle`, bouclage torique aux bords.
    #[default]
    Linear,
    /// Flux radial : les lignes fuient (ou convergent vers) le point émetteur.
    Radial,
}

impl FromStr for EmitterType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "radial" => Ok(Self::Radial),
            other => Err(anyhow!("unknown emitter type '{}' (linear|radial)", other)),
        }
    }
}

impl fmt::Display for EmitterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Radial => write!(f, "radial"),
        }
    }
}

/// Paramètres partagés lus par toutes les lignes à chaque frame.
///
/// Seul le `SpeedlinesField` les modifie (via `apply_settings`).
/// Les clés toml sont en snake_case, l'orthographe camelCase historique
/// (`emitterRadius`, `initialSize`, ...) est acceptée en alias.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(pattern = "owned", default, build_fn(error = "anyhow::Error"))]
#[serde(default)]
pub struct EmitterSettings {
    #[serde(rename = "type")]
    pub emitter_type: EmitterType,
    /// Nombre de lignes. Une valeur négative donne un champ vide.
    pub count: i32,
    /// Vitesse signée, en pixels par frame.
    pub speed: f32,
    pub length: f32,
    pub color: Color,
    #[serde(alias = "initialSize")]
    pub initial_size: f32,
    #[serde(alias = "middleSize")]
    pub middle_size: f32,
    #[serde(alias = "endSize")]
    pub end_size: f32,
    #[serde(alias = "emitterRadius")]
    pub emitter_radius: f32,
    /// Direction du flux linéaire, en degrés.
    pub angle: f32,
    /// Position de l'émetteur en pourcentage (0–100) de la largeur du canvas.
    #[serde(alias = "emitterX")]
    pub emitter_x: f32,
    /// Position de l'émetteur en pourcentage (0–100) de la hauteur du canvas.
    #[serde(alias = "emitterY")]
    pub emitter_y: f32,
}

impl Default for EmitterSettings {
    fn default() -> Self {
        Self {
            emitter_type: EmitterType::Linear,
            count: 30,
            speed: -20.0,
            length: 1000.0,
            color: Color::WHITE,
            initial_size: 1.0,
            middle_size: 10.0,
            end_size: 1.0,
            emitter_radius: 250.0,
            angle: 45.0,
            emitter_x: 50.0,
            emitter_y: 50.0,
        }
    }
}

impl EmitterSettings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read settings file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text)
            .with_context(|| format!("cannot write settings file {}", path.display()))?;
        Ok(())
    }

    /// Nombre de lignes effectivement simulées (`count` négatif → 0, plafonné à `MAX_LINES`).
    pub fn line_count(&self) -> usize {
        (self.count.max(0) as usize).min(MAX_LINES)
    }

    /// Tailles de base `[début, milieu, fin]`.
    pub fn sizes(&self) -> [f32; 3] {
        [self.initial_size, self.middle_size, self.end_size]
    }

    /// Valeur courante d'un réglage, formatée pour l'affichage.
    pub fn get(&self, key: SettingKey) -> String {
        match key {
            SettingKey::Type => self.emitter_type.to_string(),
            SettingKey::Count => self.count.to_string(),
            SettingKey::Speed => self.speed.to_string(),
            SettingKey::Length => self.length.to_string(),
            SettingKey::Color => self.color.to_string(),
            SettingKey::InitialSize => self.initial_size.to_string(),
            SettingKey::MiddleSize => self.middle_size.to_string(),
            SettingKey::EndSize => self.end_size.to_string(),
            SettingKey::EmitterRadius => self.emitter_radius.to_string(),
            SettingKey::Angle => self.angle.to_string(),
            SettingKey::EmitterX => self.emitter_x.to_string(),
            SettingKey::EmitterY => self.emitter_y.to_string(),
        }
    }

    /// Fusionne `patch` dans les réglages et indique ce qui a changé.
    ///
    /// `respawn` est levé si un paramètre de mouvement ou de forme a changé,
    /// `rebuild` si `count` a changé. La couleur est relue à chaque dessin et
    /// ne déclenche ni l'un ni l'autre.
    pub fn merge(&mut self, patch: &SettingsPatch) -> ApplyOutcome {
        let old = self.clone();

        macro_rules! merge_fields {
            ($($field:ident),*) => {
                $( if let Some(v) = patch.$field { self.$field = v; } )*
            };
        }
        merge_fields!(
            emitter_type,
            count,
            speed,
            length,
            color,
            initial_size,
            middle_size,
            end_size,
            emitter_radius,
            angle,
            emitter_x,
            emitter_y
        );

        let changed: Vec<SettingKey> = SettingKey::ALL
            .iter()
            .copied()
            .filter(|&k| old.get(k) != self.get(k))
            .collect();

        ApplyOutcome {
            respawn: changed.iter().any(|k| k.affects_motion()),
            rebuild: changed.contains(&SettingKey::Count),
            changed,
        }
    }
}

/// Résultat d'une fusion de réglages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyOutcome {
    /// Toutes les lignes existantes doivent être ré-initialisées (mode recyclé).
    pub respawn: bool,
    /// La collection de lignes doit être reconstruite (`count` a changé).
    pub rebuild: bool,
    pub changed: Vec<SettingKey>,
}

impl ApplyOutcome {
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Mise à jour partielle des réglages : seuls les champs `Some` sont appliqués.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub emitter_type: Option<EmitterType>,
    pub count: Option<i32>,
    pub speed: Option<f32>,
    pub length: Option<f32>,
    pub color: Option<Color>,
    pub initial_size: Option<f32>,
    pub middle_size: Option<f32>,
    pub end_size: Option<f32>,
    pub emitter_radius: Option<f32>,
    pub angle: Option<f32>,
    pub emitter_x: Option<f32>,
    pub emitter_y: Option<f32>,
}

impl SettingsPatch {
    /// Renseigne un champ à partir de sa représentation texte.
    pub fn set(&mut self, key: SettingKey, raw: &str) -> Result<()> {
        let raw = raw.trim();
        let number = || -> Result<f32> {
            raw.parse::<f32>()
                .map_err(|_| anyhow!("'{}' expects a number, got '{}'", key, raw))
        };

        match key {
            SettingKey::Type => self.emitter_type = Some(raw.parse()?),
            SettingKey::Count => {
                let count = raw
                    .parse::<f64>()
                    .map_err(|_| anyhow!("'count' expects an integer, got '{}'", raw))?;
                if !count.is_finite() {
                    bail!("'count' must be finite");
                }
                self.count = Some(count.clamp(i32::MIN as f64, i32::MAX as f64) as i32);
            }
            SettingKey::Speed => self.speed = Some(number()?),
            SettingKey::Length => self.length = Some(number()?),
            SettingKey::Color => self.color = Some(raw.parse()?),
            SettingKey::InitialSize => self.initial_size = Some(number()?),
            SettingKey::MiddleSize => self.middle_size = Some(number()?),
            SettingKey::EndSize => self.end_size = Some(number()?),
            SettingKey::EmitterRadius => self.emitter_radius = Some(number()?),
            SettingKey::Angle => self.angle = Some(number()?),
            SettingKey::EmitterX => self.emitter_x = Some(number()?),
            SettingKey::EmitterY => self.emitter_y = Some(number()?),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&EmitterSettings> for SettingsPatch {
    fn from(s: &EmitterSettings) -> Self {
        Self {
            emitter_type: Some(s.emitter_type),
            count: Some(s.count),
            speed: Some(s.speed),
            length: Some(s.length),
            color: Some(s.color),
            initial_size: Some(s.initial_size),
            middle_size: Some(s.middle_size),
            end_size: Some(s.end_size),
            emitter_radius: Some(s.emitter_radius),
            angle: Some(s.angle),
            emitter_x: Some(s.emitter_x),
            emitter_y: Some(s.emitter_y),
        }
    }
}

/// Nom d'un réglage reconnu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Type,
    Count,
    Speed,
    Length,
    Color,
    InitialSize,
    MiddleSize,
    EndSize,
    EmitterRadius,
    Angle,
    EmitterX,
    EmitterY,
}

impl SettingKey {
    pub const ALL: [SettingKey; 12] = [
        Self::Type,
        Self::Count,
        Self::Speed,
        Self::Length,
        Self::Color,
        Self::InitialSize,
        Self::MiddleSize,
        Self::EndSize,
        Self::EmitterRadius,
        Self::Angle,
        Self::EmitterX,
        Self::EmitterY,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Count => "count",
            Self::Speed => "speed",
            Self::Length => "length",
            Self::Color => "color",
            Self::InitialSize => "initial_size",
            Self::MiddleSize => "middle_size",
            Self::EndSize => "end_size",
            Self::EmitterRadius => "emitter_radius",
            Self::Angle => "angle",
            Self::EmitterX => "emitter_x",
            Self::EmitterY => "emitter_y",
        }
    }

    /// Un changement de ce réglage impose de ré-initialiser les lignes.
    pub fn affects_motion(self) -> bool {
        !matches!(self, Self::Count | Self::Color)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for SettingKey {
    type Err = anyhow::Error;

    /// Accepte `emitter_radius`, `emitterRadius`, `emitter-radius`, ...
    fn from_str(s: &str) -> Result<Self> {
        let normalized = |name: &str| -> String {
            name.chars()
                .filter(|c| *c != '_' && *c != '-')
                .flat_map(char::to_lowercase)
                .collect()
        };
        let wanted = normalized(s.trim());
        Self::ALL
            .iter()
            .copied()
            .find(|k| normalized(k.name()) == wanted)
            .ok_or_else(|| anyhow!("unknown setting '{}'", s.trim()))
    }
}
