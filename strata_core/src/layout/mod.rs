// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame layouts and their bounded history.
//!
//! A [`Layout`] is one frame's ordered layer sequence, bottom to top. The
//! [`LayoutManager`] keeps the last `max_buffer_age + 1` layouts in a ring
//! buffer and drives the per-frame pipeline:
//!
//! ```text
//!   window stack ──► LayoutManager::append() ──► AppendSummary
//!                          │  (extraction, identity linking)
//!                          ▼
//!   dirty region ──► LayoutManager::mark_visible() ──► OcclusionSummary
//!                          │  (top-down opaque culling)
//!                          ▼
//!   backend reads layout(0); for a stale back buffer it queries
//!   frame_damage() / collect_window_damage() / rank_at()
//! ```
//!
//! # Ranks and links
//!
//! Within a layout, rank 0 is the bottommost layer and `len - 1` the
//! topmost. Each layer links to the same window in the adjacent-age layouts
//! through [`prev_rank`](crate::layer::Layer::prev_rank) and
//! [`next_rank`](crate::layer::Layer::next_rank); for every pair of
//! consecutive ages the links are mutual.
//!
//! # Slot reuse
//!
//! Layout storage is owned by the manager for its whole lifetime. Appending
//! overwrites the oldest slot in place, reusing its layer array and damage
//! regions. References into a layout must not be held across an `append`;
//! callers that need a stable handle keep `(age, rank)` pairs and resolve
//! them again each frame.

mod damage;
mod history;
mod index;
mod manager;
mod occlusion;

pub use manager::LayoutManager;

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

use crate::layer::{Layer, LayerKey};

/// One frame's layers, bottom to top.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub(crate) size: Size,
    pub(crate) generation: u64,
    /// Layer storage. Grows on demand and never shrinks; only the first
    /// `len` entries belong to this frame.
    pub(crate) layers: Vec<Layer>,
    pub(crate) len: u32,
}

impl Layout {
    /// Size of the frame.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// The frame rectangle, anchored at the origin.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size)
    }

    /// Generation tag of the backing surface this frame was laid out for.
    ///
    /// A change between two layouts means the background was replaced and
    /// nothing from the older frame can be reused.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of layers in this frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns `true` if no window was laid out in this frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of layer slots allocated for this layout.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.layers.len()
    }

    /// The layers of this frame, bottom to top.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers[..self.len as usize]
    }

    /// Returns the layer at `rank`.
    ///
    /// # Panics
    ///
    /// Panics if `rank >= self.len()`.
    #[must_use]
    pub fn layer(&self, rank: u32) -> &Layer {
        assert!(
            rank < self.len,
            "rank {rank} out of range (len {})",
            self.len
        );
        &self.layers[rank as usize]
    }

    /// Finds the rank of the window with `key` by scanning the layout.
    ///
    /// For the newest layout, [`LayoutManager::rank_of`] answers the same
    /// question without scanning.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "positions are bounded by len, which is a u32"
    )]
    pub fn find(&self, key: LayerKey) -> Option<u32> {
        self.layers()
            .iter()
            .position(|layer| layer.key == key)
            .map(|rank| rank as u32)
    }

    /// Grows layer storage to at least `slots` entries.
    pub(crate) fn reserve_layers(&mut self, slots: usize) {
        if slots > self.layers.len() {
            self.layers.resize_with(slots, Layer::default);
        }
    }
}

/// What a single [`LayoutManager::append`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppendSummary {
    /// Number of appends so far, including this one.
    pub frame_index: u64,
    /// Generation tag recorded for the new layout.
    pub generation: u64,
    /// Managed windows in the stack.
    pub candidates: u32,
    /// Windows accepted as layers.
    pub layers: u32,
    /// Layers whose window was absent from the previous frame.
    pub new_layers: u32,
    /// Windows from the previous frame that disappeared.
    pub removed: u32,
    /// Layer slots allocated for the new layout after growth.
    pub capacity: u32,
}

/// What a single [`LayoutManager::mark_visible`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OcclusionSummary {
    /// Frame the marking applied to.
    pub frame_index: u64,
    /// Layers examined (every layer except the bottommost).
    pub visited: u32,
    /// Visited layers found to need no painting.
    pub culled: u32,
    /// Opaque layers whose area was removed from the dirty area.
    pub opaque: u32,
}

/// What a single [`LayoutManager::frame_damage`] call produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameDamageSummary {
    /// Frame the damage was computed for.
    pub frame_index: u64,
    /// Age of the back buffer being brought up to date.
    pub buffer_age: u32,
    /// Whether the whole frame has to be repainted.
    pub full: bool,
    /// Number of rectangles in the resulting region.
    pub rects: u32,
}
