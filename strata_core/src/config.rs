// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout manager configuration.

/// Default maximum buffer age, matching the deepest swap chains commonly
/// reported by GL and EGL drivers.
pub const DEFAULT_MAX_BUFFER_AGE: u32 = 5;

/// Configuration for the [`LayoutManager`](crate::layout::LayoutManager).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayoutConfig {
    /// The oldest back buffer age whose damage can be reconstructed.
    ///
    /// The ring buffer retains `max_buffer_age + 1` layouts. Must be at
    /// least 1 so the previous layout survives for identity linking.
    pub max_buffer_age: u32,
    /// Number of layer slots reserved in every layout up front.
    ///
    /// Layouts grow on demand and never shrink; reserving avoids growth in
    /// the first frames.
    pub initial_layer_capacity: u32,
}

impl LayoutConfig {
    /// Creates a configuration with the given maximum buffer age and no
    /// reserved layer slots.
    #[must_use]
    pub const fn new(max_buffer_age: u32) -> Self {
        Self {
            max_buffer_age,
            initial_layer_capacity: 0,
        }
    }

    /// Sets the maximum buffer age.
    #[must_use]
    pub const fn with_max_buffer_age(mut self, max_buffer_age: u32) -> Self {
        self.max_buffer_age = max_buffer_age;
        self
    }

    /// Sets the number of layer slots reserved in every layout.
    #[must_use]
    pub const fn with_initial_layer_capacity(mut self, capacity: u32) -> Self {
        self.initial_layer_capacity = capacity;
        self
    }

    /// Number of layouts retained by the ring buffer.
    #[must_use]
    pub const fn ring_capacity(&self) -> usize {
        self.max_buffer_age as usize + 1
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BUFFER_AGE)
    }
}
