// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Initialization failures.
//!
//! None of these ever reach the page. Backends produce them while wiring up
//! the centerpiece, log them, and fall back to a static frame or to no effect
//! at all.

use alloc::string::String;

/// Why the centerpiece could not be set up as requested.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InitError {
    /// The element the scene should mount into does not exist.
    #[error("hero container `{0}` not found")]
    NoContainer(String),
    /// The drawing context (or its shaders/buffers) could not be created.
    #[error("rendering capability unavailable: {0}")]
    RendererUnavailable(String),
    /// A configuration override was rejected.
    #[error("invalid hero configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// A [`HeroConfig`](crate::config::HeroConfig) value outside its legal range.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A scalar lies outside `[min, max]` or is not finite.
    #[error("`{field}` must lie within [{min}, {max}], got {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// Camera clipping planes must satisfy `0 < near < far`.
    #[error("camera planes must satisfy 0 < near < far (near {near}, far {far})")]
    CameraPlanes {
        /// Near plane distance.
        near: f64,
        /// Far plane distance.
        far: f64,
    },
    /// A parametric surface was given too few segments to close.
    #[error("`{field}` needs at least {min} segments, got {value}")]
    TooFewSegments {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected segment count.
        value: u32,
        /// Minimum legal count.
        min: u32,
    },
    /// A parametric surface was given more segments than a mesh may hold.
    #[error("`{field}` allows at most {max} segments, got {value}")]
    TooManySegments {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected segment count.
        value: u32,
        /// Maximum legal count.
        max: u32,
    },
}

/// Why a JSON configuration override was not used.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum OverrideError {
    /// The text is not JSON of the right shape.
    #[error("malformed override: {0}")]
    Malformed(String),
    /// The override parsed but holds an illegal value.
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn config_errors_convert_into_init_errors() {
        let err: InitError = ConfigError::CameraPlanes {
            near: 1.0,
            far: 0.5,
        }
        .into();
        assert!(matches!(err, InitError::InvalidConfig(_)));
        assert!(err.to_string().contains("0 < near < far"), "got: {err}");
    }

    #[test]
    fn missing_container_names_the_element() {
        let err = InitError::NoContainer("hero-3d".into());
        assert_eq!(err.to_string(), "hero container `hero-3d` not found");
    }

    #[test]
    fn override_errors_name_the_field() {
        let err: OverrideError = ConfigError::TooManySegments {
            field: "geometry.radial_segments",
            value: 5000,
            max: 1024,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "`geometry.radial_segments` allows at most 1024 segments, got 5000"
        );
    }
}
