// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! WebGL2 renderer for the hero scene.
//!
//! The mesh is tessellated once at construction and uploaded as an indexed
//! triangle list. Each draw clears to transparent, so the page background
//! shows through, and shades the mesh with the scene's ambient and two
//! directional lights plus the material's emissive and rim terms.

use alloc::format;
use alloc::string::{String, ToString};

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, HtmlCanvasElement, HtmlElement, WebGl2RenderingContext as Gl, WebGlBuffer,
    WebGlProgram, WebGlShader, WebGlUniformLocation, WebGlVertexArrayObject,
};

use parallax_core::config::{HeroConfig, Rgb};
use parallax_core::error::InitError;
use parallax_core::host::SceneRenderer;
use parallax_core::scene::SceneGraph;
use parallax_core::viewport::Viewport;

const VERTEX_SHADER: &str = r"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
out vec3 v_normal;
out vec3 v_world;
void main() {
    vec4 world = u_model * vec4(a_position, 1.0);
    v_world = world.xyz;
    v_normal = mat3(u_model) * a_normal;
    gl_Position = u_projection * u_view * world;
}
";

const FRAGMENT_SHADER: &str = r"#version 300 es
precision highp float;
in vec3 v_normal;
in vec3 v_world;
uniform vec3 u_eye;
uniform vec3 u_ambient;
uniform vec3 u_light_dir[2];
uniform vec3 u_light_color[2];
uniform vec3 u_base_color;
uniform vec3 u_emissive;
uniform vec3 u_sheen_color;
uniform float u_sheen;
uniform float u_roughness;
uniform float u_metalness;
out vec4 frag_color;
void main() {
    vec3 n = normalize(v_normal);
    vec3 v = normalize(u_eye - v_world);
    vec3 diffuse = u_base_color * (1.0 - u_metalness);
    vec3 f0 = mix(vec3(0.04), u_base_color, u_metalness);
    float shininess = mix(96.0, 4.0, u_roughness);
    vec3 color = u_ambient * diffuse;
    for (int i = 0; i < 2; i++) {
        vec3 l = normalize(u_light_dir[i]);
        float ndl = max(dot(n, l), 0.0);
        vec3 h = normalize(l + v);
        float spec = pow(max(dot(n, h), 0.0), shininess) * ndl;
        color += u_light_color[i] * (diffuse * ndl + f0 * spec);
    }
    float rim = pow(1.0 - max(dot(n, v), 0.0), 3.0);
    color += u_sheen_color * u_sheen * rim * 0.5;
    color += u_emissive;
    frag_color = vec4(color, 1.0);
}
";

/// Bytes per vertex: position + normal, three `f32` each.
const STRIDE: i32 = 6 * 4;
const NORMAL_OFFSET: i32 = 3 * 4;

fn unavailable(reason: impl Into<String>) -> InitError {
    InitError::RendererUnavailable(reason.into())
}

fn js_unavailable(context: &str, err: &JsValue) -> InitError {
    unavailable(format!("{context}: {err:?}"))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "GPU uniforms are single precision"
)]
fn f32_of(v: f64) -> f32 {
    v as f32
}

fn scaled(color: Rgb, intensity: f64) -> [f32; 3] {
    let k = f32_of(intensity);
    color.to_f32_array().map(|c| c * k)
}

#[derive(Debug)]
struct Uniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    eye: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    light_dir: Option<WebGlUniformLocation>,
    light_color: Option<WebGlUniformLocation>,
    base_color: Option<WebGlUniformLocation>,
    emissive: Option<WebGlUniformLocation>,
    sheen_color: Option<WebGlUniformLocation>,
    sheen: Option<WebGlUniformLocation>,
    roughness: Option<WebGlUniformLocation>,
    metalness: Option<WebGlUniformLocation>,
}

impl Uniforms {
    fn locate(gl: &Gl, program: &WebGlProgram) -> Self {
        let at = |name: &str| gl.get_uniform_location(program, name);
        Self {
            model: at("u_model"),
            view: at("u_view"),
            projection: at("u_projection"),
            eye: at("u_eye"),
            ambient: at("u_ambient"),
            light_dir: at("u_light_dir"),
            light_color: at("u_light_color"),
            base_color: at("u_base_color"),
            emissive: at("u_emissive"),
            sheen_color: at("u_sheen_color"),
            sheen: at("u_sheen"),
            roughness: at("u_roughness"),
            metalness: at("u_metalness"),
        }
    }
}

/// Draws the scene into a canvas appended to the hero container.
#[derive(Debug)]
pub struct WebGlRenderer {
    canvas: HtmlCanvasElement,
    gl: Gl,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    vertex_buffer: WebGlBuffer,
    index_buffer: WebGlBuffer,
    index_count: i32,
    uniforms: Uniforms,
}

impl WebGlRenderer {
    /// Creates the canvas, compiles the shaders and uploads the configured
    /// mesh.
    ///
    /// Any failure leaves the container untouched and reports
    /// [`InitError::RendererUnavailable`].
    pub fn new(
        document: &Document,
        container: &HtmlElement,
        config: &HeroConfig,
    ) -> Result<Self, InitError> {
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| js_unavailable("create canvas", &e))?
            .dyn_into()
            .map_err(|_| unavailable("created element is not a canvas"))?;

        let options = js_sys::Object::new();
        for flag in ["alpha", "antialias"] {
            js_sys::Reflect::set(&options, &JsValue::from_str(flag), &JsValue::TRUE)
                .map_err(|e| js_unavailable("context options", &e))?;
        }
        let gl: Gl = canvas
            .get_context_with_context_options("webgl2", &options)
            .map_err(|e| js_unavailable("get context", &e))?
            .ok_or_else(|| unavailable("WebGL2 is not supported"))?
            .dyn_into()
            .map_err(|_| unavailable("context is not WebGL2"))?;

        let program = link_program(&gl)?;
        let uniforms = Uniforms::locate(&gl, &program);

        let mut mesh = config.geometry.tessellate();
        if config.flat_shading {
            mesh = mesh.into_flat_shaded();
        }
        let index_count =
            i32::try_from(mesh.indices.len()).map_err(|_| unavailable("mesh is too large"))?;

        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| unavailable("create vertex array"))?;
        gl.bind_vertex_array(Some(&vao));
        let vertex_buffer = upload(
            &gl,
            Gl::ARRAY_BUFFER,
            bytemuck::cast_slice(&mesh.vertices),
        )?;
        let index_buffer = upload(
            &gl,
            Gl::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(&mesh.indices),
        )?;
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, Gl::FLOAT, false, STRIDE, 0);
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_with_i32(1, 3, Gl::FLOAT, false, STRIDE, NORMAL_OFFSET);
        gl.bind_vertex_array(None);

        gl.enable(Gl::DEPTH_TEST);

        let style = canvas.style();
        for (name, value) in [("display", "block"), ("width", "100%"), ("height", "100%")] {
            style
                .set_property(name, value)
                .map_err(|e| js_unavailable("style canvas", &e))?;
        }
        container
            .append_child(&canvas)
            .map_err(|e| js_unavailable("append canvas", &e))?;

        log::debug!(
            "webgl renderer ready: {} triangles",
            mesh.triangle_count()
        );

        Ok(Self {
            canvas,
            gl,
            program,
            vao,
            vertex_buffer,
            index_buffer,
            index_count,
            uniforms,
        })
    }

    /// The canvas being drawn into.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl SceneRenderer for WebGlRenderer {
    fn resize(&mut self, viewport: &Viewport) {
        let (width, height) = viewport.physical_size();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.gl.viewport(
            0,
            0,
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        );
    }

    fn render(&mut self, scene: &SceneGraph) {
        let gl = &self.gl;
        let u = &self.uniforms;

        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
        gl.use_program(Some(&self.program));

        gl.uniform_matrix4fv_with_f32_array(
            u.model.as_ref(),
            false,
            &scene.model_matrix().to_cols_array_f32(),
        );
        gl.uniform_matrix4fv_with_f32_array(
            u.view.as_ref(),
            false,
            &scene.view_matrix().to_cols_array_f32(),
        );
        gl.uniform_matrix4fv_with_f32_array(
            u.projection.as_ref(),
            false,
            &scene.projection_matrix().to_cols_array_f32(),
        );
        gl.uniform3fv_with_f32_array(u.eye.as_ref(), &scene.camera().position.map(f32_of));

        let lights = scene.lights();
        gl.uniform3fv_with_f32_array(
            u.ambient.as_ref(),
            &scaled(lights.ambient.color, lights.ambient.intensity),
        );
        let [rim, key] = lights.directional;
        let [kx, ky, kz] = key.position.map(f32_of);
        let [rx, ry, rz] = rim.position.map(f32_of);
        gl.uniform3fv_with_f32_array(u.light_dir.as_ref(), &[kx, ky, kz, rx, ry, rz]);
        let [kr, kg, kb] = scaled(key.color, key.intensity);
        let [rr, rg, rb] = scaled(rim.color, rim.intensity);
        gl.uniform3fv_with_f32_array(u.light_color.as_ref(), &[kr, kg, kb, rr, rg, rb]);

        let material = scene.mesh().material;
        gl.uniform3fv_with_f32_array(u.base_color.as_ref(), &material.color.to_f32_array());
        gl.uniform3fv_with_f32_array(
            u.emissive.as_ref(),
            &scaled(material.emissive, material.emissive_intensity),
        );
        gl.uniform3fv_with_f32_array(u.sheen_color.as_ref(), &material.sheen_color.to_f32_array());
        gl.uniform1f(u.sheen.as_ref(), f32_of(material.sheen));
        gl.uniform1f(u.roughness.as_ref(), f32_of(material.roughness));
        gl.uniform1f(u.metalness.as_ref(), f32_of(material.metalness));

        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_elements_with_i32(Gl::TRIANGLES, self.index_count, Gl::UNSIGNED_INT, 0);
        gl.bind_vertex_array(None);
    }
}

impl Drop for WebGlRenderer {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(Some(&self.vao));
        self.gl.delete_buffer(Some(&self.vertex_buffer));
        self.gl.delete_buffer(Some(&self.index_buffer));
        self.gl.delete_program(Some(&self.program));
        self.canvas.remove();
    }
}

fn upload(gl: &Gl, target: u32, bytes: &[u8]) -> Result<WebGlBuffer, InitError> {
    let buffer = gl
        .create_buffer()
        .ok_or_else(|| unavailable("create buffer"))?;
    gl.bind_buffer(target, Some(&buffer));
    gl.buffer_data_with_u8_array(target, bytes, Gl::STATIC_DRAW);
    Ok(buffer)
}

fn link_program(gl: &Gl) -> Result<WebGlProgram, InitError> {
    let vs = compile_shader(gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
    let fs = compile_shader(gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;

    let program = gl
        .create_program()
        .ok_or_else(|| unavailable("create program"))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));

    if !gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        return Err(unavailable(format!("program link failed: {log}")));
    }
    Ok(program)
}

fn compile_shader(gl: &Gl, shader_type: u32, source: &str) -> Result<WebGlShader, InitError> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| unavailable("create shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if !gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let log = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "no info log".to_string());
        gl.delete_shader(Some(&shader));
        return Err(unavailable(format!("shader compile failed: {log}")));
    }
    Ok(shader)
}
