// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer position normalized against the tracked element.

use kurbo::{Point, Rect};

/// The raw pointer target in normalized coordinates.
///
/// `(-1, -1)` is the top-left corner of the reference rectangle and `(1, 1)`
/// the bottom-right. Positions outside the rectangle produce values beyond
/// that range; they are not clamped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    /// Horizontal target.
    pub target_x: f64,
    /// Vertical target.
    pub target_y: f64,
}

impl PointerState {
    /// The centre of the element.
    pub const CENTER: Self = Self {
        target_x: 0.0,
        target_y: 0.0,
    };

    /// Returns the target as a point.
    #[inline]
    #[must_use]
    pub const fn target(self) -> Point {
        Point::new(self.target_x, self.target_y)
    }
}

/// Maps a client-space position into normalized coordinates.
///
/// Returns `None` when `rect` has zero or non-finite extent.
#[must_use]
pub fn normalize(client: Point, rect: Rect) -> Option<Point> {
    let (w, h) = (rect.width(), rect.height());
    if !(w.is_finite() && h.is_finite()) || w == 0.0 || h == 0.0 {
        return None;
    }
    let nx = (client.x - rect.x0) / w * 2.0 - 1.0;
    let ny = (client.y - rect.y0) / h * 2.0 - 1.0;
    (nx.is_finite() && ny.is_finite()).then_some(Point::new(nx, ny))
}

/// Holds the latest pointer target. Later moves overwrite earlier ones.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    state: PointerState,
}

impl PointerTracker {
    /// Creates a tracker targeting the centre.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: PointerState::CENTER,
        }
    }

    /// Records a pointer move and returns the resulting state.
    ///
    /// A degenerate `rect` leaves the state unchanged.
    pub fn on_pointer_move(&mut self, client: Point, rect: Rect) -> PointerState {
        if let Some(p) = normalize(client, rect) {
            self.state = PointerState {
                target_x: p.x,
                target_y: p.y,
            };
        }
        self.state
    }

    /// Resets the target to the centre.
    pub fn recenter(&mut self) {
        self.state = PointerState::CENTER;
    }

    /// The current target.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> PointerState {
        self.state
    }
}
