// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Math behind the page's lighter decorative effects.
//!
//! Card tilt, card shine, the cursor glow and scroll reveal are wired to the
//! DOM by the web backend; the numbers they need live here so they can be
//! tested without a browser.

use alloc::format;
use alloc::string::String;

use kurbo::{Point, Rect};

use crate::smoothing::SmoothedPoint;

/// Pixels of pointer offset per degree of card tilt.
pub const TILT_DIVISOR: f64 = 25.0;

/// Smoothing factor of the cursor glow.
pub const GLOW_SMOOTHING: f64 = 0.12;

/// Fraction of a reveal target that must be visible before it is revealed.
pub const REVEAL_THRESHOLD: f64 = 0.12;

/// Root margin of the reveal observer: the bottom tenth of the viewport does
/// not count as visible.
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -10% 0px";

/// Class added to an element once it has been revealed.
pub const REVEALED_CLASS: &str = "revealed";

/// A 3D card tilt in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tilt {
    /// Rotation about the X axis (pointer below centre tilts the top away).
    pub rotate_x_deg: f64,
    /// Rotation about the Y axis.
    pub rotate_y_deg: f64,
}

impl Tilt {
    /// No tilt.
    pub const REST: Self = Self {
        rotate_x_deg: 0.0,
        rotate_y_deg: 0.0,
    };

    /// Tilt for a pointer at `client` over a card occupying `rect`.
    #[must_use]
    pub fn toward(client: Point, rect: Rect) -> Self {
        let offset = client - rect.center();
        Self {
            rotate_x_deg: -offset.y / TILT_DIVISOR,
            rotate_y_deg: offset.x / TILT_DIVISOR,
        }
    }

    /// CSS `transform` value.
    #[must_use]
    pub fn to_css(self) -> String {
        format!(
            "rotateY({}deg) rotateX({}deg)",
            self.rotate_y_deg, self.rotate_x_deg
        )
    }
}

/// Highlight position for a card's shine, relative to its top-left corner.
#[must_use]
pub fn shine_offset(client: Point, rect: Rect) -> Point {
    Point::new(client.x - rect.x0, client.y - rect.y0)
}

/// A glow that trails the cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorGlow {
    target: Point,
    position: SmoothedPoint,
    instant: bool,
}

impl CursorGlow {
    /// Creates a glow resting at `origin`.
    ///
    /// With `instant` set (reduced motion) the glow jumps to the cursor
    /// instead of trailing it.
    #[must_use]
    pub const fn new(origin: Point, instant: bool) -> Self {
        Self {
            target: origin,
            position: SmoothedPoint::new(origin, GLOW_SMOOTHING),
            instant,
        }
    }

    /// Records the latest cursor position.
    pub fn set_target(&mut self, p: Point) {
        self.target = p;
        if self.instant {
            self.position.snap(p);
        }
    }

    /// Advances one animation frame and returns where to draw the glow.
    pub fn step(&mut self) -> Point {
        if self.instant {
            self.position.current()
        } else {
            self.position.step(self.target)
        }
    }

    /// Whether the glow jumps instead of trailing.
    #[must_use]
    pub const fn is_instant(&self) -> bool {
        self.instant
    }

    /// Where the glow currently is.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position.current()
    }
}
