// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame layout and damage tracking for a compositing window manager.
//!
//! `strata_core` turns the window stack of each frame into an ordered list
//! of *layers*, remembers the last few frames' layouts, and answers the
//! questions a renderer asks when it reuses stale back buffers: which
//! windows need painting, and which screen area changed since a buffer of a
//! given age was last current. It is `no_std` compatible (with `alloc`) and
//! allocation-free in steady state.
//!
//! # Architecture
//!
//! ```text
//!   window stack (topmost first)
//!       │
//!       ▼
//!   LayoutManager::append() ──► Layout (bottom to top) ──► AppendSummary
//!       │        identity index links each layer to the previous frame
//!       ▼
//!   LayoutManager::mark_visible(dirty) ──► paint flags ──► OcclusionSummary
//!       │
//!       ▼
//!   LayoutManager::frame_damage(age, blur) ──► Region ──► FrameDamageSummary
//! ```
//!
//! **[`window`]**: The [`StackWindow`](window::StackWindow) trait through
//! which the window-management layer exposes its windows.
//!
//! **[`layer`]**: The per-frame [`Layer`](layer::Layer) record and its
//! extraction from a window.
//!
//! **[`layout`]**: [`Layout`](layout::Layout) and the ring-buffered
//! [`LayoutManager`](layout::LayoutManager) with occlusion marking and
//! history queries.
//!
//! **[`region`]**: Rectangle-set [`Region`](region::Region) used for all
//! damage and dirty areas.
//!
//! **[`config`]**: [`LayoutConfig`](config::LayoutConfig).
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! pipeline instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Example
//!
//! ```
//! use kurbo::{Point, Size};
//! use strata_core::config::LayoutConfig;
//! use strata_core::layer::LayerKey;
//! use strata_core::layout::LayoutManager;
//! use strata_core::region::Region;
//! use strata_core::window::{StackWindow, WindowState};
//!
//! struct Window {
//!     id: u32,
//!     state: WindowState,
//!     damage: Region,
//!     to_paint: bool,
//! }
//!
//! impl StackWindow for Window {
//!     fn key(&self) -> LayerKey {
//!         LayerKey(self.id)
//!     }
//!     fn state(&self) -> WindowState {
//!         self.state
//!     }
//!     fn damage(&self) -> &Region {
//!         &self.damage
//!     }
//!     fn clear_damage(&mut self) {
//!         self.damage.clear();
//!     }
//!     fn set_to_paint(&mut self, to_paint: bool) {
//!         self.to_paint = to_paint;
//!     }
//! }
//!
//! let frame = Size::new(640.0, 480.0);
//! let mut stack = vec![Window {
//!     id: 1,
//!     state: WindowState {
//!         origin: Point::ZERO,
//!         size: frame,
//!         ..WindowState::default()
//!     },
//!     damage: Region::new(),
//!     to_paint: false,
//! }];
//!
//! let mut manager = LayoutManager::new(LayoutConfig::default());
//! let summary = manager.append(&mut stack, 0, frame);
//! assert_eq!(summary.layers, 1);
//!
//! let dirty = Region::from_rect(manager.layout(0).bounds());
//! let _ = manager.mark_visible(&mut stack, &dirty);
//!
//! let mut damage = Region::new();
//! let damage_summary = manager.frame_damage(1, Size::ZERO, &mut damage);
//! assert!(damage_summary.full, "no earlier frame to compare against");
//! ```
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-layer
//!   link and damage-rect events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod layer;
pub mod layout;
pub mod region;
pub mod trace;
pub mod window;

#[cfg(test)]
mod testing;
