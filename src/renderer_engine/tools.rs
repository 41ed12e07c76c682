use anyhow::{anyhow, Result};
use gl::types::*;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::ffi::{CStr, CString};
use std::os::raw::c_void;
use std::ptr;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref LOGGED_IDS: Mutex<HashSet<u32>> = Mutex::new(HashSet::new());
}

#[macro_export]
macro_rules! cstr {
    ($s:expr) => {
        concat!($s, "\0").as_ptr() as *const i8
    };
}

unsafe fn gl_string(name: GLenum) -> String {
    let raw = gl::GetString(name);
    if raw.is_null() {
        return "Unknown".into();
    }
    CStr::from_ptr(raw as *const i8)
        .to_string_lossy()
        .into_owned()
}

/// Affiche les informations OpenGL / GPU du contexte actuel
///
/// # Safety
/// L'appelant doit s'assurer que le contexte OpenGL est valide et actif.
pub unsafe fn show_opengl_context_info() {
    info!("🖥 OpenGL context info:");
    info!("  Vendor   : {}", gl_string(gl::VENDOR));
    info!("  Renderer : {}", gl_string(gl::RENDERER));
    info!("  OpenGL   : {}", gl_string(gl::VERSION));
    info!("  GLSL     : {}", gl_string(gl::SHADING_LANGUAGE_VERSION));

    let mut num_ext = 0;
    gl::GetIntegerv(gl::NUM_EXTENSIONS, &mut num_ext);
    debug!("  Extensions: {} extensions detected", num_ext);

    let err = gl::GetError();
    if err != gl::NO_ERROR {
        warn!("glerror consumed after getting context info: 0x{:X}", err);
    }
}

/// Callback OpenGL debug : ne logue chaque id qu'une fois.
extern "system" fn gl_debug_callback(
    _source: GLenum,
    type_: GLenum,
    id: GLuint,
    severity: GLenum,
    _length: GLsizei,
    message: *const i8,
    _user_param: *mut c_void,
) {
    if severity == gl::DEBUG_SEVERITY_NOTIFICATION {
        return;
    }

    let Ok(mut logged) = LOGGED_IDS.lock() else {
        return;
    };
    if !logged.insert(id) {
        return;
    }

    let msg = unsafe { CStr::from_ptr(message).to_string_lossy() };
    let type_str = match type_ {
        gl::DEBUG_TYPE_ERROR => "Error",
        gl::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "Deprecated Behavior",
        gl::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "Undefined Behavior",
        gl::DEBUG_TYPE_PERFORMANCE => "Performance",
        _ => "Other",
    };
    warn!("[OpenGL Debug] id: {:X}, type: {}, message: {}", id, type_str, msg);
}

/// Active le debug OpenGL si le driver expose `glDebugMessageCallback`
/// (cœur en 4.3, extension en 3.3).
///
/// # Safety
/// Le contexte OpenGL doit être actif.
pub unsafe fn setup_opengl_debug() {
    if !gl::DebugMessageCallback::is_loaded() {
        debug!("glDebugMessageCallback unavailable, OpenGL debug output disabled");
        return;
    }
    gl::Enable(gl::DEBUG_OUTPUT);
    gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
    gl::DebugMessageCallback(Some(gl_debug_callback), ptr::null_mut());
}

unsafe fn compile_shader(src: &str, ty: GLenum) -> Result<u32> {
    let shader = gl::CreateShader(ty);
    let c_str = CString::new(src)?;
    gl::ShaderSource(shader, 1, &c_str.as_ptr(), ptr::null());
    gl::CompileShader(shader);

    let mut success = gl::FALSE as GLint;
    gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
    if success != gl::TRUE as GLint {
        let log = info_log(shader, gl::GetShaderiv, gl::GetShaderInfoLog);
        gl::DeleteShader(shader);
        return Err(anyhow!("Shader compilation failed:\n{}", log));
    }
    Ok(shader)
}

type GetIv = unsafe fn(GLuint, GLenum, *mut GLint);
type GetLog = unsafe fn(GLuint, GLsizei, *mut GLsizei, *mut GLchar);

unsafe fn info_log(object: GLuint, get_iv: GetIv, get_log: GetLog) -> String {
    let mut len = 0;
    get_iv(object, gl::INFO_LOG_LENGTH, &mut len);
    let mut buf = vec![0u8; len.max(0) as usize];
    get_log(object, len, ptr::null_mut(), buf.as_mut_ptr() as *mut GLchar);
    String::from_utf8_lossy(&buf)
        .trim_matches(char::from(0))
        .to_string()
}

/// Compile et linke un programme shader à partir de sources GLSL.
///
/// # Safety
/// Le contexte OpenGL doit être actif.
pub unsafe fn compile_shader_program(vertex_src: &str, fragment_src: &str) -> Result<u32> {
    let vs = compile_shader(vertex_src, gl::VERTEX_SHADER)?;
    let fs = match compile_shader(fragment_src, gl::FRAGMENT_SHADER) {
        Ok(fs) => fs,
        Err(e) => {
            gl::DeleteShader(vs);
            return Err(e);
        }
    };

    let program = gl::CreateProgram();
    gl::AttachShader(program, vs);
    gl::AttachShader(program, fs);
    gl::LinkProgram(program);
    gl::DeleteShader(vs);
    gl::DeleteShader(fs);

    let mut success = gl::FALSE as GLint;
    gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
    if success != gl::TRUE as GLint {
        let log = info_log(program, gl::GetProgramiv, gl::GetProgramInfoLog);
        gl::DeleteProgram(program);
        return Err(anyhow!("Shader program link failed:\n{}", log));
    }
    Ok(program)
}
