// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene lifecycle and animation-loop controller for a pointer-reactive 3D
//! page centerpiece.
//!
//! `parallax_core` holds everything about the centerpiece that does not need
//! a browser: the scene and its motion, pointer and viewport handling, and
//! the state machine that starts, pauses and stops the render loop. It is
//! `no_std` compatible (with `alloc`); the page, the drawing context and the
//! frame-scheduling primitive are reached through the traits in [`host`].
//!
//! # Architecture
//!
//! ```text
//!   Host signals (resize, pointer, visibility, teardown)
//!       │
//!       ▼
//!   LifecycleBinder::handle() ──► RenderLoopController
//!                                      │          ▲
//!                     schedule_frame() │          │ on_frame(now)
//!                                      ▼          │
//!                                FrameScheduler ──┘
//!
//!   on_frame: PointerTracker ──► SmoothedPoint ──► SceneGraph::advance()
//!                                                        │
//!                                            SceneRenderer::render()
//! ```
//!
//! **[`controller`]** is the state machine. It keeps at most one tick
//! pending and cancels exactly that tick on every stop path.
//!
//! **[`binder`]** maps [`LifecycleEvent`](binder::LifecycleEvent)s to
//! controller operations.
//!
//! **[`scene`]** owns camera, lights, mesh and rotation state;
//! **[`mesh`]** tessellates the mesh's geometry.
//!
//! **[`pointer`]**, **[`smoothing`]** and **[`viewport`]** turn raw host
//! readings into normalized, smoothed, always-drawable values.
//!
//! **[`config`]** holds [`HeroConfig`](config::HeroConfig) and its presets;
//! **[`error`]** the initialization failures backends may hit.
//!
//! **[`effects`]** is the math behind card tilt, shine, reveal and the
//! cursor glow.
//!
//! **[`trace`]** defines the [`TraceSink`](trace::TraceSink) trait and
//! event types for render-loop instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `serde` (disabled by default): `Serialize`/`Deserialize` for the
//!   configuration types, and JSON overrides via `HeroConfig::from_json`.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod binder;
pub mod config;
pub mod controller;
pub mod effects;
pub mod error;
pub mod host;
pub mod mesh;
pub mod pointer;
pub mod scene;
pub mod smoothing;
pub mod time;
pub mod trace;
pub mod transform;
pub mod viewport;
