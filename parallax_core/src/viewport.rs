// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing-surface size and pixel density.
//!
//! A [`Viewport`] is always drawable: both dimensions are at least one CSS
//! pixel and the pixel ratio lies in `[1, max]`. Zero, negative and
//! non-finite readings are repaired on construction instead of being reported
//! as errors, since a collapsed container is routine during page layout.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Size;

use crate::host::Container;

/// Smallest aspect ratio handed to the camera.
pub const MIN_ASPECT: f64 = 0.01;

/// Pixel-ratio ceiling used when the configuration does not set one.
pub const DEFAULT_MAX_PIXEL_RATIO: f64 = 2.0;

/// Logical size of the drawing surface plus its device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
    pixel_ratio: f64,
}

impl Viewport {
    /// A 1×1 surface at pixel ratio 1.
    pub const FALLBACK: Self = Self {
        width: 1.0,
        height: 1.0,
        pixel_ratio: 1.0,
    };

    /// Creates a viewport, repairing unusable values.
    ///
    /// Dimensions below one (including zero, negative and non-finite ones)
    /// become one. The pixel ratio is clamped to `[1, max_pixel_ratio]`.
    #[must_use]
    pub fn new(width: f64, height: f64, pixel_ratio: f64, max_pixel_ratio: f64) -> Self {
        let max = if max_pixel_ratio.is_finite() && max_pixel_ratio >= 1.0 {
            max_pixel_ratio
        } else {
            1.0
        };
        let pixel_ratio = if pixel_ratio.is_finite() {
            pixel_ratio.clamp(1.0, max)
        } else {
            1.0
        };
        Self {
            width: at_least_one(width),
            height: at_least_one(height),
            pixel_ratio,
        }
    }

    /// Width in CSS pixels.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Height in CSS pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Size in CSS pixels.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Device pixels per CSS pixel.
    #[inline]
    #[must_use]
    pub const fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Width over height, never below [`MIN_ASPECT`].
    #[must_use]
    pub fn aspect(&self) -> f64 {
        (self.width / self.height).max(MIN_ASPECT)
    }

    /// Backing-store size in device pixels, rounded up.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "both factors are positive and finite; `as` saturates"
    )]
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).ceil() as u32,
            (self.height * self.pixel_ratio).ceil() as u32,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::FALLBACK
    }
}

fn at_least_one(v: f64) -> f64 {
    if v.is_finite() && v >= 1.0 { v } else { 1.0 }
}

/// Measures containers into [`Viewport`]s.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMetrics {
    max_pixel_ratio: f64,
}

impl ViewportMetrics {
    /// Creates metrics that clamp the pixel ratio to `max_pixel_ratio`.
    #[must_use]
    pub const fn new(max_pixel_ratio: f64) -> Self {
        Self { max_pixel_ratio }
    }

    /// The configured pixel-ratio ceiling.
    #[must_use]
    pub const fn max_pixel_ratio(&self) -> f64 {
        self.max_pixel_ratio
    }

    /// Reads the container's client size and pixel ratio.
    pub fn measure<C: Container + ?Sized>(&self, container: &C) -> Viewport {
        let size = container.client_size();
        Viewport::new(
            size.width,
            size.height,
            container.device_pixel_ratio(),
            self.max_pixel_ratio,
        )
    }
}

impl Default for ViewportMetrics {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PIXEL_RATIO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    struct Fixed(Size, f64);

    impl Container for Fixed {
        fn client_size(&self) -> Size {
            self.0
        }
        fn bounding_rect(&self) -> Rect {
            Rect::from_origin_size((0.0, 0.0), self.0)
        }
        fn device_pixel_ratio(&self) -> f64 {
            self.1
        }
    }

    #[test]
    fn zero_height_keeps_aspect_finite_and_positive() {
        let v = Viewport::new(800.0, 0.0, 1.0, 2.0);
        assert_eq!(v.height(), 1.0);
        assert!(v.aspect().is_finite());
        assert!(v.aspect() > 0.0);
    }

    #[test]
    fn tall_surfaces_hit_the_aspect_floor() {
        let v = Viewport::new(1.0, 10_000.0, 1.0, 2.0);
        assert_eq!(v.aspect(), MIN_ASPECT);
    }

    #[test]
    fn zero_size_container_measures_as_one_by_one() {
        let metrics = ViewportMetrics::default();
        let v = metrics.measure(&Fixed(Size::ZERO, 1.0));
        assert_eq!(v.size(), Size::new(1.0, 1.0));
    }

    #[test]
    fn non_finite_dimensions_are_repaired() {
        let v = Viewport::new(f64::NAN, f64::INFINITY, f64::NAN, 2.0);
        assert_eq!(v, Viewport::FALLBACK);
    }

    #[test]
    fn pixel_ratio_is_clamped() {
        let metrics = ViewportMetrics::new(2.0);
        let dense = metrics.measure(&Fixed(Size::new(400.0, 300.0), 3.5));
        assert_eq!(dense.pixel_ratio(), 2.0);
        let sparse = metrics.measure(&Fixed(Size::new(400.0, 300.0), 0.5));
        assert_eq!(sparse.pixel_ratio(), 1.0);
    }

    #[test]
    fn physical_size_scales_by_pixel_ratio() {
        let v = Viewport::new(400.5, 300.0, 2.0, 2.0);
        assert_eq!(v.physical_size(), (801, 600));
    }
}
