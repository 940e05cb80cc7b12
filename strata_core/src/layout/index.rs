// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity index: window key to rank in the newest layout.
//!
//! Index entries live in a node pool. Entries for vanished windows are
//! returned to a free list and handed out again for newly appearing
//! windows, so a steady stream of windows coming and going does not
//! allocate once the pool has grown to the peak window count.

use alloc::vec::Vec;

use hashbrown::HashMap;

use super::Layout;
use crate::layer::LayerKey;

/// One index entry.
#[derive(Clone, Copy, Debug)]
struct IndexNode {
    key: LayerKey,
    rank: u32,
}

/// Maps each window present in the newest layout to its rank there.
#[derive(Debug, Default)]
pub(crate) struct IdentityIndex {
    /// Key to node slot.
    slots: HashMap<LayerKey, u32>,
    nodes: Vec<IndexNode>,
    free_list: Vec<u32>,
}

impl IdentityIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the rank of `key` in the newest layout.
    pub(crate) fn get(&self, key: LayerKey) -> Option<u32> {
        self.slots
            .get(&key)
            .map(|&slot| self.nodes[slot as usize].rank)
    }

    /// Number of indexed windows.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Number of nodes waiting in the free list.
    #[cfg(test)]
    pub(crate) fn pooled(&self) -> usize {
        self.free_list.len()
    }

    /// Iterates over `(key, rank)` entries in no particular order.
    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (LayerKey, u32)> + '_ {
        self.slots.values().map(|&slot| {
            let node = self.nodes[slot as usize];
            (node.key, node.rank)
        })
    }

    /// Moves every entry from its rank in `prev` to the rank its layer links
    /// to in the next layout, dropping windows whose layer has no successor.
    ///
    /// Returns the number of dropped entries.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "index size is bounded by a layout length, which is a u32"
    )]
    pub(crate) fn advance(&mut self, prev: &Layout) -> u32 {
        let Self {
            slots,
            nodes,
            free_list,
        } = self;
        let before = slots.len();
        slots.retain(|_, slot| {
            let node = &mut nodes[*slot as usize];
            match prev.layer(node.rank).next_rank {
                Some(next) => {
                    node.rank = next;
                    true
                }
                None => {
                    free_list.push(*slot);
                    false
                }
            }
        });
        (before - slots.len()) as u32
    }

    /// Indexes a window that just appeared at `rank`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "node count is bounded by a layout length, which is a u32"
    )]
    pub(crate) fn insert(&mut self, key: LayerKey, rank: u32) {
        let node = IndexNode { key, rank };
        let slot = if let Some(slot) = self.free_list.pop() {
            self.nodes[slot as usize] = node;
            slot
        } else {
            let slot = self.nodes.len() as u32;
            self.nodes.push(node);
            slot
        };
        let previous = self.slots.insert(key, slot);
        debug_assert!(
            previous.is_none(),
            "duplicate layer key {key:?} in one layout"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_with_links(next: &[Option<u32>]) -> Layout {
        let mut layout = Layout::default();
        layout.reserve_layers(next.len());
        for (rank, link) in next.iter().enumerate() {
            layout.layers[rank].key = LayerKey(rank as u32);
            layout.layers[rank].next_rank = *link;
        }
        layout.len = next.len() as u32;
        layout
    }

    #[test]
    fn advance_follows_links_and_recycles_nodes() {
        let mut index = IdentityIndex::new();
        index.insert(LayerKey(0), 0);
        index.insert(LayerKey(1), 1);
        index.insert(LayerKey(2), 2);

        // Window 1 vanished; windows 0 and 2 swapped places.
        let prev = layout_with_links(&[Some(1), None, Some(0)]);
        let removed = index.advance(&prev);

        assert_eq!(removed, 1);
        assert_eq!(index.len(), 2);
        assert_eq!(index.pooled(), 1);
        assert_eq!(index.get(LayerKey(0)), Some(1));
        assert_eq!(index.get(LayerKey(2)), Some(0));
        assert_eq!(index.get(LayerKey(1)), None);
    }

    #[test]
    fn insert_reuses_pooled_nodes() {
        let mut index = IdentityIndex::new();
        index.insert(LayerKey(5), 0);
        let _ = index.advance(&layout_with_links(&[None]));
        assert_eq!(index.pooled(), 1);

        index.insert(LayerKey(9), 0);
        assert_eq!(index.pooled(), 0);
        assert_eq!(index.nodes.len(), 1, "no new node allocated");
        assert_eq!(index.get(LayerKey(9)), Some(0));
    }
}
