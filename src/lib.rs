pub mod simulator;
pub use simulator::Simulator;
// Renderer engine
pub mod renderer_engine;
pub use renderer_engine::{DrawingSurface, RendererEngine};
// Physic engine
pub mod physic_engine;
pub use physic_engine::{EmitterSettings, PhysicEngine, SpeedlinesField};
// Window engine
pub mod window_engine;
pub use window_engine::{WindowEngine, WindowEvent};

// Profiler
pub mod profiler;
// Utilities
pub mod utils;
