// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The centerpiece scene: camera, lights, one mesh, and its motion.
//!
//! The mesh sits inside a group. Two independent motions compose:
//!
//! - **Idle rotation** spins the mesh by a fixed increment per tick. It is
//!   derived from a tick counter (`initial + increment * ticks`) rather than
//!   accumulated, so it is exact and unaffected by input.
//! - **Pointer response** eases the group's rotation toward an angle
//!   proportional to the smoothed pointer position.
//!
//! Under [`MotionMode::Reduced`] both are disabled and the mesh holds its
//! static pose. [`SceneGraph::advance`] only mutates state; drawing is the
//! renderer's job.

use kurbo::Point;

use crate::config::{CameraConfig, Geometry, HeroConfig, LightRig, MaterialConfig};
use crate::smoothing::advance;
use crate::transform::Transform3d;

/// A rotation about the X and Y axes, in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Angles {
    /// Rotation about the X axis.
    pub x: f64,
    /// Rotation about the Y axis.
    pub y: f64,
}

impl Angles {
    /// No rotation.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a rotation pair.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Whether the scene animates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MotionMode {
    /// Idle spin and pointer response are active.
    #[default]
    Animated,
    /// The user prefers reduced motion; the scene holds a static pose.
    Reduced,
}

/// Rotations the scene mutates while advancing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SceneState {
    /// Rotation of the mesh inside its group (idle spin).
    pub mesh_rotation: Angles,
    /// Rotation of the group (pointer response).
    pub group_rotation: Angles,
}

/// A perspective camera looking down `-Z`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov_degrees: f64,
    /// Width over height.
    pub aspect: f64,
    /// Near clipping plane.
    pub near: f64,
    /// Far clipping plane.
    pub far: f64,
    /// World-space position.
    pub position: [f64; 3],
}

impl Camera {
    /// Creates a camera from its configuration.
    #[must_use]
    pub const fn new(config: &CameraConfig, aspect: f64) -> Self {
        Self {
            fov_degrees: config.fov_degrees,
            aspect,
            near: config.near,
            far: config.far,
            position: config.position,
        }
    }

    /// Projection matrix for the current aspect.
    #[must_use]
    pub fn projection_matrix(&self) -> Transform3d {
        Transform3d::perspective(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    /// World-to-camera matrix.
    #[must_use]
    pub const fn view_matrix(&self) -> Transform3d {
        let [x, y, z] = self.position;
        Transform3d::from_translation(-x, -y, -z)
    }
}

/// The mesh's shape and surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mesh {
    /// Shape to tessellate.
    pub geometry: Geometry,
    /// Surface response to light.
    pub material: MaterialConfig,
    /// Use per-face normals.
    pub flat_shading: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Motion {
    idle_rotation: Angles,
    rotation_response: Angles,
    rotation_smoothing: f64,
    initial_pose: Angles,
}

/// Camera, lights, mesh and the rotation state that animates them.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneGraph {
    camera: Camera,
    lights: LightRig,
    mesh: Mesh,
    state: SceneState,
    idle_ticks: u64,
    motion: Motion,
    mode: MotionMode,
}

impl SceneGraph {
    /// Builds the scene described by `config`, in its initial pose.
    #[must_use]
    pub fn new(config: &HeroConfig, aspect: f64, mode: MotionMode) -> Self {
        Self {
            camera: Camera::new(&config.camera, aspect),
            lights: config.lights,
            mesh: Mesh {
                geometry: config.geometry,
                material: config.material,
                flat_shading: config.flat_shading,
            },
            state: SceneState {
                mesh_rotation: config.initial_pose,
                group_rotation: Angles::ZERO,
            },
            idle_ticks: 0,
            motion: Motion {
                idle_rotation: config.idle_rotation,
                rotation_response: config.rotation_response,
                rotation_smoothing: config.rotation_smoothing,
                initial_pose: config.initial_pose,
            },
            mode,
        }
    }

    /// Advances the scene by `elapsed_ticks` ticks.
    ///
    /// `pointer` is the smoothed pointer position in normalized coordinates.
    /// Does nothing under [`MotionMode::Reduced`].
    pub fn advance(&mut self, pointer: Point, elapsed_ticks: u32) {
        if self.mode == MotionMode::Reduced || elapsed_ticks == 0 {
            return;
        }
        let m = self.motion;

        self.idle_ticks = self.idle_ticks.saturating_add(u64::from(elapsed_ticks));
        let ticks = self.idle_ticks as f64;
        self.state.mesh_rotation = Angles::new(
            m.initial_pose.x + m.idle_rotation.x * ticks,
            m.initial_pose.y + m.idle_rotation.y * ticks,
        );

        let target = Angles::new(
            -pointer.y * m.rotation_response.x,
            pointer.x * m.rotation_response.y,
        );
        let group = &mut self.state.group_rotation;
        for _ in 0..elapsed_ticks {
            group.y = advance(group.y, target.y, m.rotation_smoothing);
            group.x = advance(group.x, target.x, m.rotation_smoothing);
        }
    }

    /// Resets the mesh and group to the static default pose.
    pub fn apply_static_pose(&mut self) {
        self.idle_ticks = 0;
        self.state = SceneState {
            mesh_rotation: self.motion.initial_pose,
            group_rotation: Angles::ZERO,
        };
    }

    /// Updates the camera's aspect ratio.
    pub fn set_aspect(&mut self, aspect: f64) {
        self.camera.aspect = aspect;
    }

    /// The camera.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The lighting rig.
    #[must_use]
    pub const fn lights(&self) -> &LightRig {
        &self.lights
    }

    /// The mesh description.
    #[must_use]
    pub const fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Current rotations.
    #[must_use]
    pub const fn state(&self) -> SceneState {
        self.state
    }

    /// Ticks advanced since construction or the last static-pose reset.
    #[must_use]
    pub const fn idle_ticks(&self) -> u64 {
        self.idle_ticks
    }

    /// Whether the scene animates.
    #[must_use]
    pub const fn mode(&self) -> MotionMode {
        self.mode
    }

    /// Object-to-world matrix: group rotation applied after mesh rotation.
    #[must_use]
    pub fn model_matrix(&self) -> Transform3d {
        let SceneState {
            mesh_rotation: mesh,
            group_rotation: group,
        } = self.state;
        Transform3d::from_euler_xy(group.x, group.y) * Transform3d::from_euler_xy(mesh.x, mesh.y)
    }

    /// World-to-camera matrix.
    #[must_use]
    pub const fn view_matrix(&self) -> Transform3d {
        self.camera.view_matrix()
    }

    /// Camera projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Transform3d {
        self.camera.projection_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(mode: MotionMode) -> SceneGraph {
        SceneGraph::new(&HeroConfig::torus_knot(), 4.0 / 3.0, mode)
    }

    #[test]
    fn idle_rotation_is_exact_after_many_ticks() {
        let mut s = scene(MotionMode::Animated);
        for _ in 0..100 {
            s.advance(Point::ZERO, 1);
        }
        let idle = HeroConfig::torus_knot().idle_rotation;
        assert_eq!(s.state().mesh_rotation.y, 100.0 * idle.y);
        assert_eq!(s.state().mesh_rotation.x, 100.0 * idle.x);
        assert_eq!(s.idle_ticks(), 100);
    }

    #[test]
    fn idle_rotation_ignores_pointer() {
        let mut a = scene(MotionMode::Animated);
        let mut b = scene(MotionMode::Animated);
        for _ in 0..10 {
            a.advance(Point::ZERO, 1);
            b.advance(Point::new(1.0, -1.0), 1);
        }
        assert_eq!(a.state().mesh_rotation, b.state().mesh_rotation);
        assert_ne!(a.state().group_rotation, b.state().group_rotation);
    }

    #[test]
    fn group_eases_toward_pointer_target() {
        let mut s = scene(MotionMode::Animated);
        s.advance(Point::new(1.0, -1.0), 1);
        let g = s.state().group_rotation;
        assert_eq!(g.y, 0.35 * 0.08);
        assert_eq!(g.x, 0.25 * 0.08);
    }

    #[test]
    fn multi_tick_advance_matches_single_steps() {
        let mut batched = scene(MotionMode::Animated);
        let mut stepped = scene(MotionMode::Animated);
        batched.advance(Point::new(0.5, 0.5), 3);
        for _ in 0..3 {
            stepped.advance(Point::new(0.5, 0.5), 1);
        }
        assert_eq!(batched.state(), stepped.state());
    }

    #[test]
    fn reduced_motion_holds_the_static_pose() {
        let mut s = scene(MotionMode::Reduced);
        s.advance(Point::new(1.0, 1.0), 10);
        assert_eq!(s.state(), SceneState::default());
        assert_eq!(s.idle_ticks(), 0);
    }

    #[test]
    fn static_pose_resets_rotation() {
        let mut s = SceneGraph::new(&HeroConfig::torus(), 1.0, MotionMode::Animated);
        s.advance(Point::new(1.0, 1.0), 5);
        s.apply_static_pose();
        assert_eq!(s.state().mesh_rotation, HeroConfig::torus().initial_pose);
        assert_eq!(s.state().group_rotation, Angles::ZERO);
    }

    #[test]
    fn aspect_feeds_the_projection() {
        let mut s = scene(MotionMode::Animated);
        let before = s.projection_matrix();
        s.set_aspect(2.0);
        let after = s.projection_matrix();
        assert_eq!(after.cols[1][1], before.cols[1][1]);
        assert!(after.cols[0][0] < before.cols[0][0]);
    }

    #[test]
    fn view_matrix_moves_world_opposite_the_camera() {
        let s = scene(MotionMode::Animated);
        assert_eq!(s.view_matrix().col(3), [0.0, -0.2, -4.2, 1.0]);
    }
}
