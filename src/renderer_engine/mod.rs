pub mod r#trait;
pub use r#trait::RendererEngine;

pub mod surface;
pub use self::surface::{DrawingSurface, RecordingSurface};

pub mod renderer_graphics;
pub use self::renderer_graphics::RendererGraphics;

pub mod tools;
pub use self::tools::show_opengl_context_info;

pub mod types;
pub use self::types::VertexGPU;
