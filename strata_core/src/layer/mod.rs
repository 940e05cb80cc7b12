// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame layer data model.
//!
//! Windows form a stack, so the final screen can be thought of as a series
//! of *layers* stacked on top of each other. Each layer holds one window's
//! renderable state for one frame: its bounding box and shadow in screen
//! space, its opacities, its damage, and how it is linked to the same window
//! in the adjacent frames.
//!
//! Layers are produced by [extraction](Layer::update_from_window) and stored
//! in a [`Layout`](crate::layout::Layout), ordered bottom to top by *rank*.
//!
//! # Identity links
//!
//! [`prev_rank`](Layer::prev_rank) and [`next_rank`](Layer::next_rank) link a
//! layer to the same window's layer in the layout one frame older and one
//! frame newer. `None` means the window was absent in that frame. Links are
//! plain ranks rather than references, so they stay valid as long as both
//! layouts are retained by the ring buffer.

mod extract;
mod key;

pub use key::{LayerKey, RankDirection};

use kurbo::{Point, Rect, Size};

use crate::region::Region;

/// One window's renderable state for a single frame.
#[derive(Clone, Debug, Default)]
pub struct Layer {
    /// Stable identity of the window.
    pub key: LayerKey,
    /// Position of the window in the stack slice passed to the `append` call
    /// that produced this layer.
    ///
    /// Only meaningful for the newest layout; in older layouts the stack it
    /// referred to is gone and the value must not be used.
    pub window: usize,
    /// Damage accumulated by the window for this frame, in screen space.
    pub damaged: Region,
    /// Top-left corner of the window, border included, in screen space.
    pub origin: Point,
    /// Size of the window, border included.
    pub size: Size,
    /// Top-left corner of the shadow in screen space.
    pub shadow_origin: Point,
    /// Size of the shadow; zero if the window has none.
    pub shadow_size: Size,
    /// Window opacity.
    pub opacity: f32,
    /// Opacity of the background blur behind the window.
    pub blur_opacity: f32,
    /// Whether the layer fully hides everything beneath its bounding box.
    pub is_opaque: bool,
    /// Whether the layer clips the layers beneath it.
    pub is_clipping: bool,
    /// Rank of this window in the layout one frame older.
    pub prev_rank: Option<u32>,
    /// Rank of this window in the layout one frame newer.
    pub next_rank: Option<u32>,
    /// Whether the layer needs painting, as decided by occlusion marking.
    pub to_paint: bool,
}

impl Layer {
    /// Bounding box of the window in screen space.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }

    /// Bounding box of the shadow in screen space.
    ///
    /// Zero-sized if the window has no shadow.
    #[must_use]
    pub fn shadow_bounds(&self) -> Rect {
        Rect::from_origin_size(self.shadow_origin, self.shadow_size)
    }

    /// Returns `true` if the window's appearance, apart from its content,
    /// differs between `self` and `other`.
    ///
    /// Compares geometry, shadow, opacities, and opacity class.
    #[must_use]
    pub fn appearance_differs(&self, other: &Self) -> bool {
        self.origin != other.origin
            || self.size != other.size
            || self.shadow_origin != other.shadow_origin
            || self.shadow_size != other.shadow_size
            || self.opacity != other.opacity
            || self.blur_opacity != other.blur_opacity
            || self.is_opaque != other.is_opaque
            || self.is_clipping != other.is_clipping
    }
}
