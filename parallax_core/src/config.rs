// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hero scene configuration and presets.
//!
//! [`HeroConfig`] gathers every tunable of the centerpiece: motion constants,
//! camera, lighting, material and geometry. The three page variants are
//! presets ([`HeroConfig::torus_knot`], [`HeroConfig::icosahedron`],
//! [`HeroConfig::torus`]) rather than separate code paths.
//!
//! With the `serde` feature every type here (de)serializes, and missing
//! fields fall back to the [`HeroConfig::torus_knot`] values, so a partial
//! JSON override only needs the keys it changes. The one exception is a
//! [`DirectionalLight`], which is always given whole.
//! [`HeroConfig::from_json`] and [`HeroConfig::resolve`] turn page attributes
//! into a validated config.

#[cfg(feature = "serde")]
use alloc::string::ToString;

use crate::error::ConfigError;
#[cfg(feature = "serde")]
use crate::error::OverrideError;
use crate::scene::Angles;

/// A packed `0xRRGGBB` color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Rgb(pub u32);

impl Rgb {
    /// Pure white.
    pub const WHITE: Self = Self(0xff_ff_ff);

    /// Returns the channels as `[r, g, b]` in `0.0..=1.0`.
    #[must_use]
    pub fn to_f32_array(self) -> [f32; 3] {
        let [_, r, g, b] = self.0.to_be_bytes();
        [
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        ]
    }
}

/// Parametric surface the mesh is tessellated from.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Geometry {
    /// A `(p, q)` torus knot.
    TorusKnot {
        /// Radius of the knot's centre line.
        radius: f64,
        /// Tube radius.
        tube: f64,
        /// Segments along the knot.
        tubular_segments: u32,
        /// Segments around the tube.
        radial_segments: u32,
        /// Winds around the axis of rotational symmetry.
        p: u32,
        /// Winds around the interior circle.
        q: u32,
    },
    /// A ring torus lying in the XY plane.
    Torus {
        /// Distance from the centre to the middle of the tube.
        radius: f64,
        /// Tube radius.
        tube: f64,
        /// Segments around the tube.
        radial_segments: u32,
        /// Segments around the ring.
        tubular_segments: u32,
    },
    /// A (subdivided) flat-shaded icosahedron.
    Icosahedron {
        /// Circumscribed radius.
        radius: f64,
        /// Subdivision passes. Each pass splits every face into four.
        detail: u32,
    },
}

/// Surface response to light.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MaterialConfig {
    /// Base color.
    pub color: Rgb,
    /// Self-illumination color.
    pub emissive: Rgb,
    /// Self-illumination strength.
    pub emissive_intensity: f64,
    /// `0.0` is mirror-like, `1.0` fully diffuse.
    pub roughness: f64,
    /// `0.0` is dielectric, `1.0` metallic.
    pub metalness: f64,
    /// Grazing-angle rim color.
    pub sheen_color: Rgb,
    /// Rim strength, `0.0` disables the rim term.
    pub sheen: f64,
}

/// Uniform light from every direction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AmbientLight {
    /// Light color.
    pub color: Rgb,
    /// Light intensity.
    pub intensity: f64,
}

/// Parallel light shining from `position` toward the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionalLight {
    /// Light color.
    pub color: Rgb,
    /// Light intensity.
    pub intensity: f64,
    /// Where the light sits; its direction is toward the origin.
    pub position: [f64; 3],
}

/// The fixed lighting rig: one ambient fill and two colored directional
/// lights.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LightRig {
    /// Fill light.
    pub ambient: AmbientLight,
    /// Rim and key lights, in that order.
    pub directional: [DirectionalLight; 2],
}

/// Perspective camera placement.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f64,
    /// Near clipping plane.
    pub near: f64,
    /// Far clipping plane.
    pub far: f64,
    /// Camera position; the camera looks down `-Z`.
    pub position: [f64; 3],
}

/// Everything the centerpiece needs to build and animate its scene.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeroConfig {
    /// Radians added to the mesh rotation per tick, independent of input.
    pub idle_rotation: Angles,
    /// Factor used to smooth the raw pointer target each tick.
    pub pointer_smoothing: f64,
    /// Factor used to ease the group rotation toward its pointer target.
    pub rotation_smoothing: f64,
    /// Group rotation (radians) at a fully deflected pointer.
    pub rotation_response: Angles,
    /// Mesh rotation before any tick, and the pose used under reduced motion.
    pub initial_pose: Angles,
    /// Camera placement.
    pub camera: CameraConfig,
    /// Upper bound for the device pixel ratio.
    pub max_pixel_ratio: f64,
    /// Return the pointer target to the centre when the pointer leaves.
    pub recenter_on_leave: bool,
    /// Mesh shape.
    pub geometry: Geometry,
    /// Mesh surface.
    pub material: MaterialConfig,
    /// Lighting.
    pub lights: LightRig,
    /// Use per-face normals instead of interpolated ones.
    pub flat_shading: bool,
}

impl HeroConfig {
    /// The page's default centerpiece: a purple `(2, 3)` torus knot.
    #[must_use]
    pub const fn torus_knot() -> Self {
        Self {
            idle_rotation: Angles::new(0.0015, 0.0035),
            pointer_smoothing: 0.08,
            rotation_smoothing: 0.08,
            rotation_response: Angles::new(0.25, 0.35),
            initial_pose: Angles::ZERO,
            camera: CameraConfig {
                fov_degrees: 45.0,
                near: 0.1,
                far: 100.0,
                position: [0.0, 0.2, 4.2],
            },
            max_pixel_ratio: 2.0,
            recenter_on_leave: false,
            geometry: Geometry::TorusKnot {
                radius: 1.05,
                tube: 0.32,
                tubular_segments: 220,
                radial_segments: 32,
                p: 2,
                q: 3,
            },
            material: MaterialConfig {
                color: Rgb(0x7b_61_ff),
                emissive: Rgb(0xa8_55_f7),
                emissive_intensity: 0.18,
                roughness: 0.35,
                metalness: 0.15,
                sheen_color: Rgb(0xec_48_99),
                sheen: 1.0,
            },
            lights: LightRig {
                ambient: AmbientLight {
                    color: Rgb::WHITE,
                    intensity: 0.6,
                },
                directional: [
                    DirectionalLight {
                        color: Rgb(0xec_48_99),
                        intensity: 1.0,
                        position: [-2.0, 3.0, 5.0],
                    },
                    DirectionalLight {
                        color: Rgb(0x7b_61_ff),
                        intensity: 0.9,
                        position: [2.0, -1.0, 3.0],
                    },
                ],
            },
            flat_shading: false,
        }
    }

    /// A faceted teal icosahedron with slower idle spin.
    #[must_use]
    pub const fn icosahedron() -> Self {
        let base = Self::torus_knot();
        Self {
            idle_rotation: Angles::new(0.002, 0.003),
            initial_pose: Angles::new(0.35, 0.0),
            geometry: Geometry::Icosahedron {
                radius: 1.35,
                detail: 1,
            },
            material: MaterialConfig {
                color: Rgb(0x14_b8_a6),
                emissive: Rgb(0x06_b6_d4),
                emissive_intensity: 0.12,
                roughness: 0.4,
                metalness: 0.2,
                sheen_color: Rgb(0x7b_61_ff),
                sheen: 0.4,
            },
            flat_shading: true,
            ..base
        }
    }

    /// A tilted torus ring that reacts more strongly to the pointer.
    #[must_use]
    pub const fn torus() -> Self {
        let base = Self::torus_knot();
        Self {
            idle_rotation: Angles::new(0.001, 0.004),
            rotation_response: Angles::new(0.35, 0.45),
            initial_pose: Angles::new(0.6, 0.0),
            camera: CameraConfig {
                fov_degrees: 40.0,
                ..base.camera
            },
            geometry: Geometry::Torus {
                radius: 1.1,
                tube: 0.38,
                radial_segments: 48,
                tubular_segments: 160,
            },
            ..base
        }
    }

    /// Looks up a preset by name (`"torus-knot"`, `"icosahedron"`, `"torus"`).
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "torus-knot" | "torus_knot" => Some(Self::torus_knot()),
            "icosahedron" => Some(Self::icosahedron()),
            "torus" => Some(Self::torus()),
            _ => None,
        }
    }

    /// Checks every field against its legal range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_range("pointer_smoothing", self.pointer_smoothing)?;
        unit_range("rotation_smoothing", self.rotation_smoothing)?;
        finite("idle_rotation.x", self.idle_rotation.x)?;
        finite("idle_rotation.y", self.idle_rotation.y)?;
        finite("rotation_response.x", self.rotation_response.x)?;
        finite("rotation_response.y", self.rotation_response.y)?;
        finite("initial_pose.x", self.initial_pose.x)?;
        finite("initial_pose.y", self.initial_pose.y)?;
        range("camera.fov_degrees", self.camera.fov_degrees, 1.0, 179.0)?;
        range("max_pixel_ratio", self.max_pixel_ratio, 1.0, 8.0)?;
        let (near, far) = (self.camera.near, self.camera.far);
        if !(near > 0.0 && far > near && far.is_finite()) {
            return Err(ConfigError::CameraPlanes { near, far });
        }
        unit_range("material.roughness", self.material.roughness)?;
        unit_range("material.metalness", self.material.metalness)?;
        self.validate_geometry()
    }

    fn validate_geometry(&self) -> Result<(), ConfigError> {
        match self.geometry {
            Geometry::TorusKnot {
                radius,
                tube,
                tubular_segments,
                radial_segments,
                p,
                q,
            } => {
                positive("geometry.radius", radius)?;
                positive("geometry.tube", tube)?;
                grid("geometry.tubular_segments", tubular_segments)?;
                grid("geometry.radial_segments", radial_segments)?;
                segments("geometry.p", p, 1)?;
                segments("geometry.q", q, 1)
            }
            Geometry::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => {
                positive("geometry.radius", radius)?;
                positive("geometry.tube", tube)?;
                grid("geometry.radial_segments", radial_segments)?;
                grid("geometry.tubular_segments", tubular_segments)
            }
            Geometry::Icosahedron { radius, detail } => {
                positive("geometry.radius", radius)?;
                if detail > MAX_ICOSAHEDRON_DETAIL {
                    return Err(ConfigError::OutOfRange {
                        field: "geometry.detail",
                        value: f64::from(detail),
                        min: 0.0,
                        max: f64::from(MAX_ICOSAHEDRON_DETAIL),
                    });
                }
                Ok(())
            }
        }
    }
}

#[cfg(feature = "serde")]
impl HeroConfig {
    /// Parses and validates a JSON override.
    ///
    /// Omitted fields take the [`torus_knot`](Self::torus_knot) values.
    pub fn from_json(json: &str) -> Result<Self, OverrideError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| OverrideError::Malformed(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Picks the config from a JSON override and a preset name.
    ///
    /// The override wins over the preset. A rejected override or an unknown
    /// preset is logged and skipped; with neither usable the default torus
    /// knot is returned.
    #[must_use]
    pub fn resolve(json: Option<&str>, preset: Option<&str>) -> Self {
        if let Some(json) = json {
            match Self::from_json(json) {
                Ok(config) => return config,
                Err(err) => log::warn!("ignoring hero config override: {err}"),
            }
        }
        if let Some(name) = preset {
            match Self::preset(name) {
                Some(config) => return config,
                None => log::warn!("unknown hero preset `{name}`"),
            }
        }
        Self::default()
    }
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self::torus_knot()
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        HeroConfig::torus_knot().camera
    }
}

impl Default for MaterialConfig {
    fn default() -> Self {
        HeroConfig::torus_knot().material
    }
}

impl Default for LightRig {
    fn default() -> Self {
        HeroConfig::torus_knot().lights
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        HeroConfig::torus_knot().lights.ambient
    }
}

/// Highest icosahedron subdivision accepted by [`HeroConfig::validate`].
pub const MAX_ICOSAHEDRON_DETAIL: u32 = 5;

/// Most tubular or radial segments accepted by [`HeroConfig::validate`].
pub const MAX_SEGMENTS: u32 = 1024;

fn range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn unit_range(field: &'static str, value: f64) -> Result<(), ConfigError> {
    range(field, value, 0.0, 1.0)
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    range(field, value, f64::MIN, f64::MAX)
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    range(field, value, f64::MIN_POSITIVE, f64::MAX)
}

fn segments(field: &'static str, value: u32, min: u32) -> Result<(), ConfigError> {
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::TooFewSegments { field, value, min })
    }
}

fn grid(field: &'static str, value: u32) -> Result<(), ConfigError> {
    segments(field, value, 3)?;
    if value <= MAX_SEGMENTS {
        Ok(())
    } else {
        Err(ConfigError::TooManySegments {
            field,
            value,
            max: MAX_SEGMENTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for config in [
            HeroConfig::torus_knot(),
            HeroConfig::icosahedron(),
            HeroConfig::torus(),
        ] {
            assert_eq!(config.validate(), Ok(()), "{config:?}");
        }
    }

    #[test]
    fn torus_knot_carries_page_constants() {
        let c = HeroConfig::torus_knot();
        assert_eq!(c.idle_rotation, Angles::new(0.0015, 0.0035));
        assert_eq!(c.pointer_smoothing, 0.08);
        assert_eq!(c.rotation_smoothing, 0.08);
        assert_eq!(c.rotation_response, Angles::new(0.25, 0.35));
        assert_eq!(c.camera.position, [0.0, 0.2, 4.2]);
        assert_eq!(c.max_pixel_ratio, 2.0);
        assert!(!c.recenter_on_leave);
        assert!(!c.flat_shading);

        assert_eq!(
            c.geometry,
            Geometry::TorusKnot {
                radius: 1.05,
                tube: 0.32,
                tubular_segments: 220,
                radial_segments: 32,
                p: 2,
                q: 3,
            }
        );
        assert_eq!(
            c.material,
            MaterialConfig {
                color: Rgb(0x7b_61_ff),
                emissive: Rgb(0xa8_55_f7),
                emissive_intensity: 0.18,
                roughness: 0.35,
                metalness: 0.15,
                sheen_color: Rgb(0xec_48_99),
                sheen: 1.0,
            }
        );

        let [rim, key] = c.lights.directional;
        assert_eq!(c.lights.ambient.color, Rgb::WHITE);
        assert_eq!(c.lights.ambient.intensity, 0.6);
        assert_eq!(
            rim,
            DirectionalLight {
                color: Rgb(0xec_48_99),
                intensity: 1.0,
                position: [-2.0, 3.0, 5.0],
            }
        );
        assert_eq!(
            key,
            DirectionalLight {
                color: Rgb(0x7b_61_ff),
                intensity: 0.9,
                position: [2.0, -1.0, 3.0],
            }
        );
    }

    #[test]
    fn preset_lookup_by_name() {
        assert_eq!(HeroConfig::preset("torus"), Some(HeroConfig::torus()));
        assert_eq!(
            HeroConfig::preset("torus-knot"),
            Some(HeroConfig::torus_knot())
        );
        assert_eq!(HeroConfig::preset("dodecahedron"), None);
    }

    #[test]
    fn smoothing_outside_unit_range_is_rejected() {
        let mut c = HeroConfig::default();
        c.rotation_smoothing = 1.5;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::OutOfRange {
                field: "rotation_smoothing",
                ..
            })
        ));
        c.rotation_smoothing = f64::NAN;
        assert!(c.validate().is_err());
    }

    #[test]
    fn inverted_camera_planes_are_rejected() {
        let mut c = HeroConfig::default();
        c.camera.near = 10.0;
        c.camera.far = 1.0;
        assert_eq!(
            c.validate(),
            Err(ConfigError::CameraPlanes {
                near: 10.0,
                far: 1.0
            })
        );
    }

    #[test]
    fn degenerate_geometry_is_rejected() {
        let mut c = HeroConfig::default();
        c.geometry = Geometry::Torus {
            radius: 1.0,
            tube: 0.3,
            radial_segments: 2,
            tubular_segments: 16,
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::TooFewSegments {
                field: "geometry.radial_segments",
                value: 2,
                min: 3
            })
        );
    }

    #[test]
    fn oversized_segment_counts_are_rejected() {
        let mut c = HeroConfig::default();
        c.geometry = Geometry::TorusKnot {
            radius: 1.0,
            tube: 0.3,
            tubular_segments: u32::MAX,
            radial_segments: 3,
            p: 2,
            q: 3,
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::TooManySegments {
                field: "geometry.tubular_segments",
                value: u32::MAX,
                max: MAX_SEGMENTS,
            })
        );

        c.geometry = Geometry::Torus {
            radius: 1.0,
            tube: 0.3,
            radial_segments: MAX_SEGMENTS + 1,
            tubular_segments: 16,
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::TooManySegments {
                field: "geometry.radial_segments",
                ..
            })
        ));

        c.geometry = Geometry::Torus {
            radius: 1.0,
            tube: 0.3,
            radial_segments: MAX_SEGMENTS,
            tubular_segments: MAX_SEGMENTS,
        };
        assert_eq!(c.validate(), Ok(()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_override_fills_nested_gaps_from_the_default() {
        let c = HeroConfig::from_json(r#"{"camera":{"fov_degrees":50}}"#).unwrap();
        assert_eq!(c.camera.fov_degrees, 50.0);
        assert_eq!(c.camera.position, [0.0, 0.2, 4.2]);
        assert_eq!(c.camera.near, 0.1);
        assert_eq!(c.camera.far, 100.0);
        assert_eq!(c.material, HeroConfig::torus_knot().material);

        let c = HeroConfig::from_json(r#"{"material":{"sheen":0.2}}"#).unwrap();
        assert_eq!(c.material.sheen, 0.2);
        assert_eq!(c.material.roughness, 0.35);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_override_is_validated() {
        assert!(matches!(
            HeroConfig::from_json(r#"{"pointer_smoothing":5}"#),
            Err(OverrideError::Invalid(ConfigError::OutOfRange {
                field: "pointer_smoothing",
                ..
            }))
        ));
        assert!(matches!(
            HeroConfig::from_json("{not json"),
            Err(OverrideError::Malformed(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rejected_override_falls_back_to_preset_then_default() {
        let bad = Some(r#"{"pointer_smoothing":5}"#);
        assert_eq!(HeroConfig::resolve(bad, None), HeroConfig::torus_knot());
        assert_eq!(HeroConfig::resolve(bad, Some("icosahedron")), HeroConfig::icosahedron());
        assert_eq!(HeroConfig::resolve(Some("{"), Some("dodecahedron")), HeroConfig::torus_knot());
        let overridden = HeroConfig::resolve(Some(r#"{"recenter_on_leave":true}"#), Some("torus"));
        assert!(overridden.recenter_on_leave);
        assert_eq!(overridden.geometry, HeroConfig::torus_knot().geometry);
        assert_eq!(HeroConfig::resolve(None, Some("torus")), HeroConfig::torus());
    }

    #[test]
    fn rgb_channels() {
        assert_eq!(Rgb(0xff_00_80).to_f32_array(), [1.0, 0.0, 128.0 / 255.0]);
    }
}
