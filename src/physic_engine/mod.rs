pub mod r#trait;
pub use r#trait::PhysicEngine;

pub mod types;
pub use self::types::{Color, Vector2, VectorExt};

pub mod config;
pub use self::config::{ApplyOutcome, EmitterSettings, EmitterType, SettingKey, SettingsPatch};

pub mod line;
pub use self::line::{EmitterContext, Line, SpawnMode};

pub mod mesh;
pub use self::mesh::{HalfPolygon, LineMesh};

pub mod speedlines;
pub use self::speedlines::{FrameStats, SpeedlinesField};
