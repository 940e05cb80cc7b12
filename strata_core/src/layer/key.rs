// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer identity types.

use core::fmt;

/// Stable identity of a window across frames.
///
/// Keys are assigned by the window-management layer (typically the native
/// window handle) and are unique within a layout. They are the only part of
/// a layer that stays meaningful once its frame has passed.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerKey(pub u32);

impl fmt::Debug for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerKey({:#x})", self.0)
    }
}

/// Direction for walking identity links between layouts of different ages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RankDirection {
    /// From the newest layout towards older ones, following `prev_rank`.
    Older,
    /// From an older layout towards the newest one, following `next_rank`.
    Newer,
}
