// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window-management boundary.
//!
//! Window objects are owned by the window-management layer, which tracks
//! their lifecycle, geometry and damage. This crate only needs a snapshot of
//! their state once per frame, plus two side effects:
//!
//! - pending damage is cleared on every processed window, whether or not it
//!   becomes a layer, so hidden windows never accumulate stale damage;
//! - occlusion marking writes each visited window's paint flag.
//!
//! The window stack is handed to
//! [`LayoutManager::append`](crate::layout::LayoutManager::append) as a
//! mutable slice ordered **topmost first**, the way stacking lists are
//! usually kept.

use kurbo::{Point, Size, Vec2};

use crate::layer::LayerKey;
use crate::region::Region;

/// Shadow geometry of a window, relative to the window origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    /// Offset of the shadow's top-left corner from the window origin.
    pub offset: Vec2,
    /// Size of the shadow.
    pub size: Size,
}

/// Per-frame snapshot of the window fields layer extraction reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowState {
    /// Whether the window is managed and therefore a layout candidate.
    pub managed: bool,
    /// Whether the window has ever received damage (has content).
    pub ever_damaged: bool,
    /// Whether painting is excluded for this window.
    pub paint_excluded: bool,
    /// Top-left corner of the window, border included, in screen space.
    pub origin: Point,
    /// Size of the window, border included.
    pub size: Size,
    /// Shadow geometry, if the window draws a shadow.
    pub shadow: Option<Shadow>,
    /// Current opacity (0.0–1.0).
    pub opacity: f32,
    /// The opacity target the window was fading from. Background blur fades
    /// proportionally to `opacity / opacity_target_old`.
    pub opacity_target_old: f32,
    /// Whether the window has a non-rectangular bounding shape.
    pub bounding_shaped: bool,
    /// Whether the window content carries an alpha channel.
    pub has_alpha: bool,
    /// Whether the window clips the windows beneath it even where it is
    /// transparent.
    pub transparent_clipping: bool,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            managed: true,
            ever_damaged: true,
            paint_excluded: false,
            origin: Point::ZERO,
            size: Size::ZERO,
            shadow: None,
            opacity: 1.0,
            opacity_target_old: 1.0,
            bounding_shaped: false,
            has_alpha: false,
            transparent_clipping: false,
        }
    }
}

/// A window in the stack handed to the layout manager.
///
/// Implemented by the window-management layer. The manager never retains a
/// reference to a window; it records the window's position in the stack
/// slice for the current frame only.
pub trait StackWindow {
    /// Stable identity of the window.
    fn key(&self) -> LayerKey;

    /// Snapshot of the fields needed for layer extraction.
    fn state(&self) -> WindowState;

    /// Pending damage accumulated since the last frame, in window-local
    /// coordinates.
    fn damage(&self) -> &Region;

    /// Clears the pending damage.
    fn clear_damage(&mut self);

    /// Records whether the window needs to be painted this frame.
    fn set_to_paint(&mut self, to_paint: bool);
}
