// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout ring buffer and per-frame append.

use alloc::vec::Vec;

use kurbo::Size;

use super::index::IdentityIndex;
use super::{AppendSummary, Layout};
use crate::config::LayoutConfig;
use crate::layer::LayerKey;
use crate::region::Region;
use crate::window::StackWindow;

/// Owns the last `max_buffer_age + 1` frame layouts.
///
/// Each [`append`](Self::append) turns the current window stack into a new
/// [`Layout`], overwriting the oldest one, and links every layer to the same
/// window's layer in the previous frame.
#[derive(Debug)]
pub struct LayoutManager {
    /// Ring buffer of layouts; `current` is the newest.
    pub(crate) layouts: Vec<Layout>,
    pub(crate) current: usize,
    pub(crate) index: IdentityIndex,
    /// Reused by occlusion marking.
    pub(crate) scratch: Region,
    pub(crate) frame_count: u64,
    max_buffer_age: u32,
}

impl LayoutManager {
    /// Creates a manager with an empty history.
    ///
    /// Before the first [`append`](Self::append) every retained layout is
    /// empty, with zero size and generation 0.
    ///
    /// # Panics
    ///
    /// Panics if `config.max_buffer_age` is 0.
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        assert!(
            config.max_buffer_age >= 1,
            "max_buffer_age must be at least 1"
        );
        let layouts = (0..config.ring_capacity())
            .map(|_| {
                let mut layout = Layout::default();
                layout.reserve_layers(config.initial_layer_capacity as usize);
                layout
            })
            .collect();
        Self {
            layouts,
            current: 0,
            index: IdentityIndex::new(),
            scratch: Region::new(),
            frame_count: 0,
            max_buffer_age: config.max_buffer_age,
        }
    }

    /// The oldest buffer age whose layout is retained.
    #[must_use]
    pub fn max_buffer_age(&self) -> u32 {
        self.max_buffer_age
    }

    /// Number of layouts in the ring buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.layouts.len()
    }

    /// Number of frames appended so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Returns the layout `age` frames behind the newest one.
    ///
    /// # Panics
    ///
    /// Panics if `age > self.max_buffer_age()`.
    #[must_use]
    pub fn layout(&self, age: u32) -> &Layout {
        &self.layouts[self.slot(age)]
    }

    /// Rank of the window with `key` in the newest layout.
    #[must_use]
    pub fn rank_of(&self, key: LayerKey) -> Option<u32> {
        self.index.get(key)
    }

    /// The dirty area left over by the last
    /// [`mark_visible`](Self::mark_visible) call: the input dirty region
    /// minus the bounds of every visited opaque layer.
    #[must_use]
    pub fn scratch_region(&self) -> &Region {
        &self.scratch
    }

    /// Ring slot of the layout `age` frames back.
    pub(crate) fn slot(&self, age: u32) -> usize {
        assert!(
            age <= self.max_buffer_age,
            "buffer age {age} out of range (max {})",
            self.max_buffer_age
        );
        let capacity = self.layouts.len();
        (self.current + capacity - age as usize) % capacity
    }

    /// Lays out a new frame from `stack`, ordered topmost window first.
    ///
    /// Every managed window is run through
    /// [extraction](crate::layer::Layer::update_from_window), which clears its
    /// pending damage. Accepted windows become layers ranked bottom to top and
    /// are linked to their layer in the previous frame through the identity
    /// index. The oldest layout is overwritten.
    ///
    /// Unmanaged windows are ignored entirely.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "window counts fit in u32"
    )]
    pub fn append<W: StackWindow>(
        &mut self,
        stack: &mut [W],
        generation: u64,
        size: Size,
    ) -> AppendSummary {
        let capacity = self.layouts.len();
        let next = (self.current + 1) % capacity;
        let (prev, layout) = pair_mut(&mut self.layouts, self.current, next);

        let candidates = stack.iter().filter(|w| w.state().managed).count();
        layout.reserve_layers(candidates);
        layout.size = size;
        layout.generation = generation;

        let mut len = 0_usize;
        for (stack_index, window) in stack.iter_mut().enumerate().rev() {
            if !window.state().managed {
                continue;
            }
            if layout.layers[len].update_from_window(window, stack_index, size) {
                len += 1;
            }
        }
        layout.len = len as u32;

        // Links from the previous frame pointed into the slot just overwritten.
        for layer in &mut prev.layers[..prev.len as usize] {
            layer.next_rank = None;
        }

        for (rank, layer) in layout.layers[..len].iter_mut().enumerate() {
            if let Some(prev_rank) = self.index.get(layer.key) {
                layer.prev_rank = Some(prev_rank);
                prev.layers[prev_rank as usize].next_rank = Some(rank as u32);
            }
        }

        let removed = self.index.advance(prev);
        let mut new_layers = 0;
        for (rank, layer) in layout.layers().iter().enumerate() {
            if layer.prev_rank.is_none() {
                self.index.insert(layer.key, rank as u32);
                new_layers += 1;
            }
        }

        self.current = next;
        self.frame_count += 1;

        let layout = &self.layouts[next];
        AppendSummary {
            frame_index: self.frame_count,
            generation,
            candidates: candidates as u32,
            layers: layout.len,
            new_layers,
            removed,
            capacity: layout.capacity() as u32,
        }
    }
}

impl Default for LayoutManager {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

/// Borrows two distinct ring slots mutably.
fn pair_mut(layouts: &mut [Layout], a: usize, b: usize) -> (&mut Layout, &mut Layout) {
    debug_assert_ne!(a, b, "ring slots must differ");
    if a < b {
        let (lo, hi) = layouts.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = layouts.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}
