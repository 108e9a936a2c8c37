// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use parallax_core::host::SceneRenderer;
use parallax_core::scene::{SceneGraph, SceneState};
use parallax_core::viewport::Viewport;

/// What the scene looked like when it was drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawRecord {
    /// Rotations at draw time.
    pub state: SceneState,
    /// Camera aspect at draw time.
    pub aspect: f64,
    /// Viewport the surface had at draw time.
    pub viewport: Viewport,
}

/// A [`SceneRenderer`] that draws nothing and remembers everything.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    viewport: Viewport,
    resizes: Vec<Viewport>,
    draws: Vec<DrawRecord>,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every viewport passed to `resize`, in order.
    #[must_use]
    pub fn resizes(&self) -> &[Viewport] {
        &self.resizes
    }

    /// Every draw, in order.
    #[must_use]
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// The most recent draw.
    #[must_use]
    pub fn last_draw(&self) -> Option<&DrawRecord> {
        self.draws.last()
    }
}

impl SceneRenderer for RecordingRenderer {
    fn resize(&mut self, viewport: &Viewport) {
        self.viewport = *viewport;
        self.resizes.push(*viewport);
    }

    fn render(&mut self, scene: &SceneGraph) {
        self.draws.push(DrawRecord {
            state: scene.state(),
            aspect: scene.camera().aspect,
            viewport: self.viewport,
        });
    }
}
