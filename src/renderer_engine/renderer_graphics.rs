use anyhow::Result;
#[cfg(debug_assertions)]
use log::debug;
use log::info;

use crate::physic_engine::types::{Color, Vector2};
use crate::renderer_engine::{
    surface::{covers_surface, triangulate_fan, DrawingSurface, PathBuilder},
    tools::compile_shader_program,
    types::VertexGPU,
    RendererEngine,
};

const INITIAL_VERTEX_CAPACITY: usize = 4096;

/// Rendu OpenGL des speedlines.
///
/// Chaque `fill` est triangulé en éventail côté CPU et ajouté à un lot de
/// sommets ; `present` envoie tout le lot en un seul `glDrawArrays`.
/// Le lot reste valide tant qu'aucun effacement complet n'a eu lieu : une
/// animation en pause se re-présente donc à l'identique.
pub struct RendererGraphics {
    vao: u32,
    vbo: u32,
    shader_program: u32,
    loc_size: i32,

    vbo_capacity: usize,
    vertices: Vec<VertexGPU>,
    path: PathBuilder,

    width: f32,
    height: f32,
    clear_color: Color,
}

impl RendererGraphics {
    /// # Safety
    /// Un contexte OpenGL 3.3 doit être courant (voir `GlfwWindowEngine::init`).
    pub unsafe fn new(width: i32, height: i32) -> Result<Self> {
        let (vertex_src, fragment_src) = Self::src_shaders_speedlines();
        let shader_program = compile_shader_program(vertex_src, fragment_src)?;
        let loc_size = gl::GetUniformLocation(shader_program, crate::cstr!("uSize"));

        let (vao, vbo) = Self::setup_gpu_buffers(INITIAL_VERTEX_CAPACITY);

        Ok(Self {
            vao,
            vbo,
            shader_program,
            loc_size,
            vbo_capacity: INITIAL_VERTEX_CAPACITY,
            vertices: Vec::with_capacity(INITIAL_VERTEX_CAPACITY),
            path: PathBuilder::default(),
            width: width as f32,
            height: height as f32,
            clear_color: Color::BLACK,
        })
    }

    pub fn src_shaders_speedlines() -> (&'static str, &'static str) {
        let vertex_src = r#"
        #version 330 core
        layout(location = 0) in vec2 aPos;
        layout(location = 1) in vec4 aColor;

        out vec4 vertexColor;

        uniform vec2 uSize;

        void main() {
            vertexColor = aColor;
            // canvas : origine en haut à gauche, y vers le bas
            float x = aPos.x / uSize.x * 2.0 - 1.0;
            float y = 1.0 - aPos.y / uSize.y * 2.0;
            gl_Position = vec4(x, y, 0.0, 1.0);
        }
        "#;

        let fragment_src = r#"
        #version 330 core
        in vec4 vertexColor;
        out vec4 FragColor;

        void main() {
            FragColor = vertexColor;
        }
        "#;
        (vertex_src, fragment_src)
    }

    unsafe fn setup_gpu_buffers(capacity: usize) -> (u32, u32) {
        let (mut vao, mut vbo) = (0u32, 0u32);

        gl::GenVertexArrays(1, &mut vao);
        gl::BindVertexArray(vao);

        gl::GenBuffers(1, &mut vbo);
        gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
        Self::allocate_vbo(capacity);

        VertexGPU::setup_vertex_attribs();
        gl::BindVertexArray(0);

        (vao, vbo)
    }

    /// Réserve `capacity` sommets dans le VBO actuellement lié.
    unsafe fn allocate_vbo(capacity: usize) {
        let buffer_size = (capacity * std::mem::size_of::<VertexGPU>()) as isize;
        info!(
            "🎮 Allocating speedline vertex buffer: {} vertices ({} bytes)",
            capacity, buffer_size
        );
        gl::BufferData(
            gl::ARRAY_BUFFER,
            buffer_size,
            std::ptr::null(),
            gl::STREAM_DRAW,
        );
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    /// Nombre de sommets en attente de présentation.
    pub fn pending_vertices(&self) -> usize {
        self.vertices.len()
    }
}

impl DrawingSurface for RendererGraphics {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if covers_surface(x, y, width, height, self.width, self.height) {
            self.vertices.clear();
        } else {
            #[cfg(debug_assertions)]
            debug!("Partial clear_rect ignored: the vertex batch is cleared as a whole");
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
        for subpath in self.path.fillable() {
            for tri in triangulate_fan(subpath) {
                self.vertices
                    .extend(tri.iter().map(|&p| VertexGPU::new(p, color)));
            }
        }
    }
}

impl RendererEngine for RendererGraphics {
    fn present(&mut self) -> usize {
        let count = self.vertices.len();

        unsafe {
            gl::Viewport(0, 0, self.width as i32, self.height as i32);
            let [r, g, b, a] = self.clear_color.to_array();
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT);

            if count == 0 {
                return 0;
            }

            gl::UseProgram(self.shader_program);
            gl::Uniform2f(self.loc_size, self.width.max(1.0), self.height.max(1.0));
            gl::BindVertexArray(self.vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vbo);

            if count > self.vbo_capacity {
                self.vbo_capacity = count.next_power_of_two();
                Self::allocate_vbo(self.vbo_capacity);
            }

            let bytes: &[u8] = bytemuck::cast_slice(&self.vertices);
            gl::BufferSubData(
                gl::ARRAY_BUFFER,
                0,
                bytes.len() as isize,
                bytes.as_ptr() as *const _,
            );
            gl::DrawArrays(gl::TRIANGLES, 0, count as i32);
            gl::BindVertexArray(0);
        }

        count / 3
    }

    fn set_window_size(&mut self, width: i32, height: i32) {
        self.set_size(width as f32, height as f32);
    }

    fn close(&mut self) {
        unsafe {
            if self.vbo != 0 {
                gl::DeleteBuffers(1, &self.vbo);
                self.vbo = 0;
            }
            if self.vao != 0 {
                gl::DeleteVertexArrays(1, &self.vao);
                self.vao = 0;
            }
            if self.shader_program != 0 {
                gl::DeleteProgram(self.shader_program);
                self.shader_program = 0;
            }
        }
    }
}
