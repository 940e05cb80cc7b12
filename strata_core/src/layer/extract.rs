// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer extraction from a window snapshot.

use kurbo::{Point, Size};

use super::Layer;
use crate::window::{StackWindow, WindowState};

impl Layer {
    /// Fills `self` from `window` for a frame of `frame_size`, returning
    /// whether the window should be painted.
    ///
    /// A window is skipped (returns `false`) if it was never damaged, is
    /// excluded from painting, has an empty bounding box, lies entirely
    /// outside the frame, or is fully transparent with no background blur.
    /// `self` may be partially overwritten even when skipped.
    ///
    /// The window's pending damage is copied into
    /// [`damaged`](Self::damaged), moved into screen space, and then cleared
    /// on the window. The clear happens on every path, including skips, so a
    /// hidden window never carries stale damage into a later frame.
    ///
    /// `stack_index` is recorded as the layer's transient
    /// [`window`](Self::window) back-reference.
    pub fn update_from_window<W: StackWindow>(
        &mut self,
        window: &mut W,
        stack_index: usize,
        frame_size: Size,
    ) -> bool {
        let to_paint = self.fill(window, stack_index, frame_size);
        window.clear_damage();
        to_paint
    }

    fn fill<W: StackWindow>(&mut self, window: &W, stack_index: usize, frame_size: Size) -> bool {
        let state = window.state();
        if !state.ever_damaged || state.paint_excluded {
            return false;
        }

        self.origin = state.origin;
        self.size = state.size;
        // Written so that NaN sizes are rejected as well.
        if !(self.size.width > 0.0 && self.size.height > 0.0) {
            return false;
        }
        if self.origin.x + self.size.width <= 0.0
            || self.origin.y + self.size.height <= 0.0
            || self.origin.x >= frame_size.width
            || self.origin.y >= frame_size.height
        {
            return false;
        }

        match state.shadow {
            Some(shadow) => {
                self.shadow_origin = self.origin + shadow.offset;
                self.shadow_size = shadow.size;
            }
            None => {
                self.shadow_origin = Point::ZERO;
                self.shadow_size = Size::ZERO;
            }
        }

        self.opacity = finite_or_zero(state.opacity);
        self.blur_opacity = blur_opacity(self.opacity, state.opacity_target_old);
        if self.opacity == 0.0 && self.blur_opacity == 0.0 {
            return false;
        }

        self.damaged.copy_from(window.damage());
        self.damaged.translate(self.origin.to_vec2());

        // Shaped windows count as transparent; only their extent is tracked.
        self.is_opaque = is_opaque(&state, self.opacity);
        self.is_clipping = state.transparent_clipping;
        self.prev_rank = None;
        self.next_rank = None;
        self.key = window.key();
        self.window = stack_index;
        self.to_paint = true;
        true
    }
}

/// Background blur opacity for a window fading towards `opacity` from
/// `target_old`.
///
/// A zero target yields zero rather than `0/0`, and any other non-finite
/// quotient is also flushed to zero.
fn blur_opacity(opacity: f32, target_old: f32) -> f32 {
    if target_old == 0.0 {
        return 0.0;
    }
    finite_or_zero(opacity / target_old)
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

fn is_opaque(state: &WindowState, opacity: f32) -> bool {
    !state.has_alpha && opacity == 1.0 && !state.bounding_shaped
}
