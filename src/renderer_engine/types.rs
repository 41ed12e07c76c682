use bytemuck::{Pod, Zeroable};
use gl::types::*;
use memoffset::offset_of;
use std::mem;

use crate::physic_engine::types::{Color, Vector2};

/// Sommet envoyé au GPU : position canvas (pixels, y vers le bas) + couleur.
///
/// # Layout mémoire GPU
///
/// | Location | Type   | Champs    |
/// |:--------:|:-------|:----------|
/// | `0`      | `vec2` | `pos`     |
/// | `1`      | `vec4` | `color`   |
///
/// **Stride total** : `6 × f32 = 24 octets`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct VertexGPU {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

impl VertexGPU {
    #[inline]
    pub fn new(p: Vector2, color: Color) -> Self {
        Self {
            pos: [p.x, p.y],
            color: color.to_array(),
        }
    }

    /// Configure les attributs de sommets pour OpenGL.
    ///
    /// ⚠️ Pré-requis : le VAO et le VBO doivent être liés avant l'appel.
    ///
    /// # Safety
    /// L'appelant doit garantir un contexte OpenGL valide et courant.
    pub unsafe fn setup_vertex_attribs() {
        let stride = mem::size_of::<Self>() as GLsizei;

        // Attribut 0 : position (x, y)
        gl::VertexAttribPointer(
            0,
            2,
            gl::FLOAT,
            gl::FALSE,
            stride,
            offset_of!(Self, pos) as *const _,
        );
        gl::EnableVertexAttribArray(0);

        // Attribut 1 : couleur (r, g, b, a)
        gl::VertexAttribPointer(
            1,
            4,
            gl::FLOAT,
            gl::FALSE,
            stride,
            offset_of!(Self, color) as *const _,
        );
        gl::EnableVertexAttribArray(1);
    }
}
