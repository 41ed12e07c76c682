use speedlines_sim::physic_engine::{Color, Vector2};
use speedlines_sim::renderer_engine::{DrawingSurface, RecordingSurface, RendererEngine};
use speedlines_sim::window_engine::{WindowEngine, WindowEvent};
use std::collections::VecDeque;

/// Renderer en mémoire : délègue le dessin à un `RecordingSurface` et
/// compte les appels.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub surface: RecordingSurface,
    pub presents: usize,
    pub last_presented: usize,
    pub window_sizes: Vec<(i32, i32)>,
    pub closed: bool,
}

#[allow(dead_code)]
impl RecordingRenderer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            surface: RecordingSurface::new(width, height),
            ..Default::default()
        }
    }
}

impl DrawingSurface for RecordingRenderer {
    fn size(&self) -> (f32, f32) {
        self.surface.size()
    }
    fn set_size(&mut self, width: f32, height: f32) {
        self.surface.set_size(width, height);
    }
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.surface.clear_rect(x, y, width, height);
    }
    fn begin_path(&mut self) {
        self.surface.begin_path();
    }
    fn move_to(&mut self, p: Vector2) {
        self.surface.move_to(p);
    }
    fn line_to(&mut self, p: Vector2) {
        self.surface.line_to(p);
    }
    fn close_path(&mut self) {
        self.surface.close_path();
    }
    fn fill(&mut self, color: Color) {
        self.surface.fill(color);
    }
}

impl RendererEngine for RecordingRenderer {
    fn present(&mut self) -> usize {
        self.presents += 1;
        self.last_presented = self.surface.filled.len();
        // 5 points par demi-polygone → 3 triangles
        self.surface
            .filled
            .iter()
            .map(|p| p.points.len().saturating_sub(2))
            .sum()
    }

    fn set_window_size(&mut self, width: i32, height: i32) {
        self.window_sizes.push((width, height));
        self.set_size(width as f32, height as f32);
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

/// Fenêtre factice : rejoue une liste d'événements, une fournée par `poll_events`.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct DummyWindow {
    pub size: (i32, i32),
    pub scripted: VecDeque<Vec<WindowEvent>>,
    pub swaps: usize,
    pub fullscreen: bool,
    pub should_close: bool,
}

#[allow(dead_code)]
impl DummyWindow {
    pub fn with_events(mut self, batches: Vec<Vec<WindowEvent>>) -> Self {
        self.scripted = batches.into();
        self
    }
}

impl WindowEngine for DummyWindow {
    fn init(width: i32, height: i32, _title: &str) -> anyhow::Result<Self> {
        Ok(Self {
            size: (width, height),
            ..Default::default()
        })
    }

    fn poll_events(&mut self) -> Vec<WindowEvent> {
        self.scripted.pop_front().unwrap_or_default()
    }

    fn swap_buffers(&mut self) {
        self.swaps += 1;
    }

    fn should_close(&self) -> bool {
        self.should_close
    }

    fn set_should_close(&mut self, value: bool) {
        self.should_close = value;
    }

    fn get_size(&self) -> (i32, i32) {
        self.size
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }
}
