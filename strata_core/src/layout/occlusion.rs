// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-down occlusion marking for the newest layout.

use super::{LayoutManager, OcclusionSummary};
use crate::region::Region;
use crate::window::StackWindow;

impl LayoutManager {
    /// Decides which layers of the newest layout need painting this frame.
    ///
    /// Walks the layers from the top down to rank 1, tracking the part of
    /// `dirty` not yet hidden by an opaque layer. A layer whose bounds miss
    /// that area is marked as not needing paint; an opaque layer removes its
    /// bounds from the area. The bottommost layer is never examined and
    /// always paints.
    ///
    /// The decision is written both to [`Layer::to_paint`] and, through
    /// [`StackWindow::set_to_paint`], to the window. `stack` must be the slice
    /// passed to the latest [`append`](Self::append).
    ///
    /// The remaining dirty area is available afterwards through
    /// [`scratch_region`](Self::scratch_region).
    ///
    /// [`Layer::to_paint`]: crate::layer::Layer::to_paint
    #[expect(
        clippy::cast_possible_truncation,
        reason = "rank counts fit in u32"
    )]
    pub fn mark_visible<W: StackWindow>(
        &mut self,
        stack: &mut [W],
        dirty: &Region,
    ) -> OcclusionSummary {
        let mut summary = OcclusionSummary {
            frame_index: self.frame_count,
            ..OcclusionSummary::default()
        };
        let slot = self.slot(0);
        let Self {
            layouts, scratch, ..
        } = self;
        let layout = &mut layouts[slot];
        scratch.copy_from(dirty);

        let len = layout.len as usize;
        if len == 0 {
            return summary;
        }
        layout.layers[0].to_paint = true;

        for layer in layout.layers[1..len].iter_mut().rev() {
            let bounds = layer.bounds();
            let to_paint = scratch.intersects_rect(bounds);
            layer.to_paint = to_paint;
            stack[layer.window].set_to_paint(to_paint);
            if !to_paint {
                summary.culled += 1;
            }
            if layer.is_opaque {
                scratch.subtract_rect(bounds);
                summary.opaque += 1;
            }
        }
        summary.visited = (len - 1) as u32;
        summary
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::*;
    use crate::config::LayoutConfig;
    use crate::testing::{TestWindow, rect, stack};

    const FRAME: Size = Size::new(100.0, 100.0);

    fn full_screen() -> Region {
        Region::from_rect(rect(0.0, 0.0, 100.0, 100.0))
    }

    #[test]
    fn opaque_layer_hides_what_is_beneath() {
        let mut m = LayoutManager::new(LayoutConfig::new(1));
        let mut windows = alloc::vec![
            TestWindow::new(3, rect(0.0, 0.0, 10.0, 10.0)).transparent(),
            TestWindow::new(2, rect(0.0, 0.0, 50.0, 100.0)),
            TestWindow::new(1, rect(0.0, 0.0, 100.0, 100.0)),
        ];
        let _ = m.append(&mut windows, 0, FRAME);
        let summary = m.mark_visible(&mut windows, &full_screen());

        assert_eq!(windows[0].to_paint, Some(true), "top");
        assert_eq!(windows[1].to_paint, Some(true), "middle");
        assert_eq!(windows[2].to_paint, None, "bottom is never visited");
        assert!(m.layout(0).layer(0).to_paint);

        let remaining = m.scratch_region();
        assert!(!remaining.intersects_rect(rect(0.0, 0.0, 50.0, 100.0)));
        assert!(remaining.contains_rect(rect(50.0, 0.0, 50.0, 100.0)));
        assert_eq!(remaining.area(), 5000.0);

        assert_eq!(
            summary,
            OcclusionSummary {
                frame_index: 1,
                visited: 2,
                culled: 0,
                opaque: 1,
            }
        );
    }

    #[test]
    fn covered_layer_is_culled() {
        let mut m = LayoutManager::new(LayoutConfig::new(1));
        let mut windows = stack(&[
            (3, rect(0.0, 0.0, 60.0, 60.0)),
            (2, rect(10.0, 10.0, 20.0, 20.0)),
            (1, rect(0.0, 0.0, 100.0, 100.0)),
        ]);
        let _ = m.append(&mut windows, 0, FRAME);
        let summary = m.mark_visible(&mut windows, &full_screen());

        assert_eq!(windows[0].to_paint, Some(true));
        assert_eq!(windows[1].to_paint, Some(false), "hidden under the top window");
        assert!(!m.layout(0).layer(1).to_paint);
        assert_eq!(summary.culled, 1);
    }

    #[test]
    fn layers_outside_dirty_area_are_culled() {
        let mut m = LayoutManager::new(LayoutConfig::new(1));
        let mut windows = stack(&[
            (3, rect(80.0, 80.0, 10.0, 10.0)),
            (2, rect(0.0, 0.0, 10.0, 10.0)),
            (1, rect(0.0, 0.0, 100.0, 100.0)),
        ]);
        let _ = m.append(&mut windows, 0, FRAME);
        let dirty = Region::from_rect(rect(0.0, 0.0, 20.0, 20.0));
        let _ = m.mark_visible(&mut windows, &dirty);

        assert_eq!(windows[0].to_paint, Some(false));
        assert_eq!(windows[1].to_paint, Some(true));
    }

    #[test]
    fn paint_flags_are_rewritten_every_frame() {
        let mut m = LayoutManager::new(LayoutConfig::new(1));
        let mut windows = stack(&[
            (2, rect(0.0, 0.0, 10.0, 10.0)),
            (1, rect(0.0, 0.0, 100.0, 100.0)),
        ]);
        let _ = m.append(&mut windows, 0, FRAME);
        let _ = m.mark_visible(&mut windows, &Region::new());
        assert_eq!(windows[0].to_paint, Some(false));

        let _ = m.append(&mut windows, 0, FRAME);
        let _ = m.mark_visible(&mut windows, &full_screen());
        assert_eq!(windows[0].to_paint, Some(true));
    }

    #[test]
    fn empty_layout_is_a_no_op() {
        let mut m = LayoutManager::new(LayoutConfig::new(1));
        let mut windows: alloc::vec::Vec<TestWindow> = alloc::vec::Vec::new();
        let _ = m.append(&mut windows, 0, FRAME);
        let summary = m.mark_visible(&mut windows, &full_screen());
        assert_eq!(summary.visited, 0);
        assert_eq!(m.scratch_region(), &full_screen());
    }
}
