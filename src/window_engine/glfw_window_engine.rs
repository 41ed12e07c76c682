use anyhow::{anyhow, Result};
use glfw::{Action, Context, Key, WindowMode};
use log::info;

use super::r#trait::{WindowEngine, WindowEvent};
use crate::renderer_engine::tools::{setup_opengl_debug, show_opengl_context_info};

pub type WindowEvents = glfw::GlfwReceiver<(f64, glfw::WindowEvent)>;

pub struct GlfwWindowEngine {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: WindowEvents,

    // position/taille fenêtrée, restaurées en sortie de plein écran
    window_last_pos: (i32, i32),
    window_last_size: (i32, i32),
}

/// Plein écran exclusif sur `monitor`, dans son mode vidéo courant.
fn enter_fullscreen(window: &mut glfw::Window, monitor: &glfw::Monitor) -> Option<(u32, u32)> {
    let mode = monitor.get_video_mode()?;
    window.set_monitor(
        WindowMode::FullScreen(monitor),
        0,
        0,
        mode.width,
        mode.height,
        Some(mode.refresh_rate),
    );
    Some((mode.width, mode.height))
}

impl GlfwWindowEngine {
    fn translate(event: glfw::WindowEvent) -> Option<WindowEvent> {
        match event {
            glfw::WindowEvent::FramebufferSize(w, h) => Some(WindowEvent::Resized(w, h)),
            glfw::WindowEvent::Close => Some(WindowEvent::CloseRequested),
            glfw::WindowEvent::Key(key, _, Action::Press, _) => match key {
                Key::Escape => Some(WindowEvent::CloseRequested),
                Key::Space => Some(WindowEvent::ToggleAnimation),
                Key::R => Some(WindowEvent::ReloadSettings),
                Key::S => Some(WindowEvent::SaveSettings),
                Key::F11 => Some(WindowEvent::ToggleFullscreen),
                _ => None,
            },
            _ => None,
        }
    }
}

impl WindowEngine for GlfwWindowEngine {
    fn init(width: i32, height: i32, title: &str) -> Result<Self> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|_| anyhow!("Impossible d'initialiser GLFW"))?;

        glfw.window_hint(glfw::WindowHint::ContextVersionMajor(3));
        glfw.window_hint(glfw::WindowHint::ContextVersionMinor(3));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(
            glfw::OpenGlProfileHint::Core,
        ));

        let (mut window, events) = glfw
            .create_window(
                width as u32,
                height as u32,
                title,
                glfw::WindowMode::Windowed,
            )
            .ok_or_else(|| anyhow!("Erreur création fenêtre GLFW"))?;

        window.make_current();
        window.set_key_polling(true);
        window.set_close_polling(true);
        window.set_framebuffer_size_polling(true);

        // une frame par rafraîchissement d'écran
        glfw.set_swap_interval(glfw::SwapInterval::Sync(1));

        info!("✅ OpenGL context ready for '{}'", title);

        // load OpenGL function pointers
        gl::load_with(|s| window.get_proc_address(s) as *const _);

        unsafe {
            show_opengl_context_info();
            setup_opengl_debug();
            gl::Enable(gl::BLEND);
            gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
        }

        let window_last_pos = window.get_pos();
        let window_last_size = window.get_size();

        Ok(Self {
            glfw,
            window,
            events,
            window_last_pos,
            window_last_size,
        })
    }

    fn poll_events(&mut self) -> Vec<WindowEvent> {
        self.glfw.poll_events();
        glfw::flush_messages(&self.events)
            .filter_map(|(_, event)| Self::translate(event))
            .collect()
    }

    fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn set_should_close(&mut self, value: bool) {
        self.window.set_should_close(value);
    }

    fn get_size(&self) -> (i32, i32) {
        self.window.get_framebuffer_size()
    }

    fn is_fullscreen(&self) -> bool {
        self.window
            .with_window_mode(|mode| !matches!(mode, WindowMode::Windowed))
    }

    fn toggle_fullscreen(&mut self) {
        if self.is_fullscreen() {
            let (x, y) = self.window_last_pos;
            let (w, h) = self.window_last_size;
            self.window
                .set_monitor(WindowMode::Windowed, x, y, w as u32, h as u32, None);
            info!("🖥️ Windowed: {} x {}", w, h);
        } else {
            self.window_last_pos = self.window.get_pos();
            self.window_last_size = self.window.get_size();

            let mut glfw = self.glfw.clone();
            let window = &mut self.window;
            glfw.with_primary_monitor(|_, primary_monitor| match primary_monitor {
                Some(mon) => match enter_fullscreen(window, mon) {
                    Some((w, h)) => info!("🖥️ Fullscreen: {} x {}", w, h),
                    None => info!("⚠️ Could not get monitor video mode, staying windowed"),
                },
                None => info!("⚠️ No primary monitor, staying windowed"),
            });
        }
    }
}
