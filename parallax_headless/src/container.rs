// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size};
use parallax_core::host::Container;

/// A container with a settable size, placed at a fixed origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedContainer {
    origin: Point,
    size: Size,
    pixel_ratio: f64,
}

impl FixedContainer {
    /// A container of `width × height` at the client origin, pixel ratio 1.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            origin: Point::ZERO,
            size: Size::new(width, height),
            pixel_ratio: 1.0,
        }
    }

    /// Places the container's top-left corner at `origin`.
    #[must_use]
    pub const fn at(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Sets the reported device pixel ratio.
    #[must_use]
    pub const fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// Changes the size, as a layout change would.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.size = Size::new(width, height);
    }
}

impl Container for FixedContainer {
    fn client_size(&self) -> Size {
        self.size
    }

    fn bounding_rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }
}
