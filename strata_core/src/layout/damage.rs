// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen damage for back buffers of a given age.

use kurbo::Size;

use super::{FrameDamageSummary, Layout, LayoutManager};
use crate::layer::Layer;
use crate::region::Region;

impl LayoutManager {
    /// Computes the screen area that must be redrawn to bring a back buffer
    /// last painted `buffer_age` frames ago up to date with the newest
    /// layout.
    ///
    /// `out` is cleared first. A `buffer_age` of 0 means the buffer contents
    /// are unknown and yields the whole frame, as does any change of frame
    /// size or generation within the span. Otherwise, for each frame in the
    /// span:
    ///
    /// - windows that appeared contribute their bounds and shadow;
    /// - windows that vanished contribute their old bounds and shadow;
    /// - windows that moved, resized, changed opacity or opacity class, or
    ///   were raised past a window they used to sit beneath contribute both
    ///   their old and new bounds and shadows;
    /// - all other windows contribute their accumulated content damage.
    ///
    /// A translucent layer of the newest layout with a background blur
    /// samples up to `blur_size` beyond each pixel it covers. Damage within
    /// that reach of such a layer is widened by `blur_size` inside the
    /// layer's bounds, bottom to top, so blurs stacked above pick it up too.
    /// Pass [`Size::ZERO`] when no blur is in use.
    ///
    /// The result is clipped to the frame.
    ///
    /// # Panics
    ///
    /// Panics if `buffer_age > self.max_buffer_age()`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "rectangle counts fit in u32"
    )]
    pub fn frame_damage(
        &self,
        buffer_age: u32,
        blur_size: Size,
        out: &mut Region,
    ) -> FrameDamageSummary {
        let _ = self.slot(buffer_age);
        out.clear();
        let newest = self.layout(0);
        let frame = newest.bounds();

        let full = buffer_age == 0
            || (0..buffer_age).any(|age| {
                let (newer, older) = (self.layout(age), self.layout(age + 1));
                newer.size != older.size || newer.generation != older.generation
            });
        if full {
            out.union_rect(frame);
        } else {
            for age in 0..buffer_age {
                step_damage(self.layout(age), self.layout(age + 1), out);
            }
            widen_for_blur(newest, blur_size, out);
            out.intersect_rect(frame);
        }

        FrameDamageSummary {
            frame_index: self.frame_count,
            buffer_age,
            full,
            rects: out.rects().len() as u32,
        }
    }
}

/// Adds the damage between two consecutive layouts of equal size.
fn step_damage(newer: &Layout, older: &Layout, out: &mut Region) {
    // Highest older rank among the linked layers seen so far, bottom up. A
    // linked layer with a lower older rank was raised past one of them.
    let mut highest: Option<u32> = None;
    for layer in newer.layers() {
        let Some(prev) = layer.prev_rank else {
            union_extent(layer, out);
            continue;
        };
        let old = older.layer(prev);
        let raised = highest.is_some_and(|h| prev < h);
        highest = Some(highest.map_or(prev, |h| h.max(prev)));
        if raised || layer.appearance_differs(old) {
            union_extent(old, out);
            union_extent(layer, out);
        } else {
            out.union(&layer.damaged);
        }
    }
    for old in older.layers() {
        if old.next_rank.is_none() {
            union_extent(old, out);
        }
    }
}

/// Spreads damage into the blurred translucent layers of `layout` that can
/// see it.
fn widen_for_blur(layout: &Layout, blur_size: Size, out: &mut Region) {
    let (dx, dy) = (blur_size.width.max(0.0), blur_size.height.max(0.0));
    if dx == 0.0 && dy == 0.0 {
        return;
    }
    let mut near = Region::new();
    for layer in layout.layers() {
        if layer.is_opaque || layer.blur_opacity <= 0.0 {
            continue;
        }
        let bounds = layer.bounds();
        let reach = bounds.inflate(dx, dy);
        if !out.intersects_rect(reach) {
            continue;
        }
        near.copy_from(out);
        near.intersect_rect(reach);
        for &rect in near.rects() {
            out.union_rect(rect.inflate(dx, dy).intersect(bounds));
        }
    }
}

fn union_extent(layer: &Layer, out: &mut Region) {
    out.union_rect(layer.bounds());
    out.union_rect(layer.shadow_bounds());
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::{Size, Vec2};

    use super::*;
    use crate::config::LayoutConfig;
    use crate::testing::{TestWindow, rect, stack};
    use crate::window::Shadow;

    const FRAME: Size = Size::new(100.0, 100.0);

    fn background() -> TestWindow {
        TestWindow::new(1, rect(0.0, 0.0, 100.0, 100.0))
    }

    fn over_background(key: u32, bounds: kurbo::Rect) -> Vec<TestWindow> {
        alloc::vec![TestWindow::new(key, bounds), background()]
    }

    fn manager() -> LayoutManager {
        LayoutManager::new(LayoutConfig::new(3))
    }

    fn damage(m: &LayoutManager, age: u32) -> (Region, FrameDamageSummary) {
        blurred_damage(m, age, Size::ZERO)
    }

    fn blurred_damage(
        m: &LayoutManager,
        age: u32,
        blur_size: Size,
    ) -> (Region, FrameDamageSummary) {
        let mut out = Region::from_rect(rect(0.0, 0.0, 1.0, 1.0));
        let summary = m.frame_damage(age, blur_size, &mut out);
        (out, summary)
    }

    /// A translucent, blurred window over a background damaged at `spot`
    /// in the second of two frames.
    fn blur_over_damaged_background(spot: kurbo::Rect) -> LayoutManager {
        let mut m = manager();
        let mut glass = TestWindow::new(3, rect(20.0, 20.0, 40.0, 40.0)).transparent();
        glass.state.opacity = 0.5;
        glass.state.opacity_target_old = 0.5;
        let _ = m.append(&mut alloc::vec![glass.clone(), background()], 0, FRAME);
        let mut windows = alloc::vec![glass, background().with_damage(spot)];
        let _ = m.append(&mut windows, 0, FRAME);
        m
    }

    #[test]
    fn unknown_buffer_contents_repaint_everything() {
        let mut m = manager();
        let _ = m.append(&mut alloc::vec![background()], 0, FRAME);
        let (out, summary) = damage(&m, 0);
        assert_eq!(out, Region::from_rect(rect(0.0, 0.0, 100.0, 100.0)));
        assert!(summary.full);
        assert_eq!(summary.rects, 1);
    }

    #[test]
    fn unchanged_windows_contribute_content_damage() {
        let mut m = manager();
        let _ = m.append(&mut alloc::vec![background()], 0, FRAME);
        let mut windows = alloc::vec![background().with_damage(rect(40.0, 40.0, 5.0, 5.0))];
        let _ = m.append(&mut windows, 0, FRAME);

        let (out, summary) = damage(&m, 1);
        assert_eq!(out, Region::from_rect(rect(40.0, 40.0, 5.0, 5.0)));
        assert!(!summary.full);
        assert_eq!(summary.buffer_age, 1);
        assert_eq!(summary.frame_index, 2);
    }

    #[test]
    fn older_buffers_replay_more_frames() {
        let mut m = manager();
        let _ = m.append(&mut alloc::vec![background()], 0, FRAME);
        let mut windows = alloc::vec![background().with_damage(rect(0.0, 0.0, 5.0, 5.0))];
        let _ = m.append(&mut windows, 0, FRAME);
        let mut windows = alloc::vec![background().with_damage(rect(50.0, 50.0, 5.0, 5.0))];
        let _ = m.append(&mut windows, 0, FRAME);

        let (out, _) = damage(&m, 1);
        assert_eq!(out, Region::from_rect(rect(50.0, 50.0, 5.0, 5.0)));
        let (out, _) = damage(&m, 2);
        assert_eq!(
            out,
            Region::from_rects(&[rect(0.0, 0.0, 5.0, 5.0), rect(50.0, 50.0, 5.0, 5.0)])
        );
    }

    #[test]
    fn moved_window_damages_old_and_new_bounds() {
        let mut m = manager();
        let mut windows = over_background(2, rect(10.0, 10.0, 10.0, 10.0));
        let _ = m.append(&mut windows, 0, FRAME);
        windows[0].move_to(30.0, 10.0);
        let _ = m.append(&mut windows, 0, FRAME);

        let (out, _) = damage(&m, 1);
        assert_eq!(
            out,
            Region::from_rects(&[rect(10.0, 10.0, 10.0, 10.0), rect(30.0, 10.0, 10.0, 10.0)])
        );
    }

    #[test]
    fn appearing_and_vanishing_windows_damage_their_extent() {
        let mut m = manager();
        let _ = m.append(&mut over_background(2, rect(10.0, 10.0, 10.0, 10.0)), 0, FRAME);
        let mut appearing = TestWindow::new(3, rect(60.0, 60.0, 10.0, 10.0));
        appearing.state.shadow = Some(Shadow {
            offset: Vec2::new(-2.0, -2.0),
            size: Size::new(14.0, 14.0),
        });
        let _ = m.append(&mut alloc::vec![appearing, background()], 0, FRAME);

        let (out, _) = damage(&m, 1);
        assert_eq!(
            out,
            Region::from_rects(&[rect(10.0, 10.0, 10.0, 10.0), rect(58.0, 58.0, 14.0, 14.0)])
        );
    }

    #[test]
    fn raised_window_damages_its_bounds() {
        let mut m = manager();
        let a = rect(10.0, 10.0, 30.0, 30.0);
        let b = rect(20.0, 20.0, 30.0, 30.0);
        let bg = rect(0.0, 0.0, 100.0, 100.0);
        let _ = m.append(&mut stack(&[(3, b), (2, a), (1, bg)]), 0, FRAME);
        let _ = m.append(&mut stack(&[(2, a), (3, b), (1, bg)]), 0, FRAME);

        let (out, _) = damage(&m, 1);
        assert_eq!(out, Region::from_rect(a));
    }

    #[test]
    fn opacity_change_damages_bounds() {
        let mut m = manager();
        let mut windows = over_background(2, rect(10.0, 10.0, 10.0, 10.0));
        let _ = m.append(&mut windows, 0, FRAME);
        windows[0].state.opacity = 0.5;
        let _ = m.append(&mut windows, 0, FRAME);

        let (out, _) = damage(&m, 1);
        assert_eq!(out, Region::from_rect(rect(10.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn generation_or_size_change_repaints_everything() {
        let mut m = manager();
        let _ = m.append(&mut alloc::vec![background()], 0, FRAME);
        let _ = m.append(&mut alloc::vec![background()], 1, FRAME);
        let (out, summary) = damage(&m, 1);
        assert!(summary.full);
        assert_eq!(out, Region::from_rect(rect(0.0, 0.0, 100.0, 100.0)));

        let big = Size::new(200.0, 100.0);
        let _ = m.append(&mut alloc::vec![background()], 1, big);
        let (out, summary) = damage(&m, 1);
        assert!(summary.full);
        assert_eq!(out, Region::from_rect(rect(0.0, 0.0, 200.0, 100.0)));
    }

    #[test]
    fn missing_history_repaints_everything() {
        let mut m = manager();
        let _ = m.append(&mut alloc::vec![background()], 0, FRAME);
        let (_, summary) = damage(&m, 3);
        assert!(summary.full, "older layouts were never filled");
    }

    #[test]
    fn damage_is_clipped_to_the_frame() {
        let mut m = manager();
        let mut windows = over_background(2, rect(90.0, 90.0, 20.0, 20.0));
        let _ = m.append(&mut windows, 0, FRAME);
        windows[0].move_to(-10.0, -10.0);
        let _ = m.append(&mut windows, 0, FRAME);

        let (out, _) = damage(&m, 1);
        assert_eq!(
            out,
            Region::from_rects(&[rect(90.0, 90.0, 10.0, 10.0), rect(0.0, 0.0, 10.0, 10.0)])
        );
    }

    #[test]
    fn blurred_window_widens_damage_it_can_see() {
        let spot = rect(14.0, 30.0, 4.0, 4.0);
        let m = blur_over_damaged_background(spot);

        let (out, _) = damage(&m, 1);
        assert_eq!(out, Region::from_rect(spot), "no blur, no widening");

        let (out, _) = blurred_damage(&m, 1, Size::new(4.0, 4.0));
        // The part of the spot within reach is (16..18, 30..34). Grown by
        // the blur size and kept inside the window it becomes (20..22, 26..38).
        let expected = Region::from_rects(&[spot, rect(20.0, 26.0, 2.0, 12.0)]);
        assert_eq!(out, expected);
    }

    #[test]
    fn damage_out_of_blur_reach_is_not_widened() {
        let spot = rect(80.0, 80.0, 4.0, 4.0);
        let m = blur_over_damaged_background(spot);
        let (out, _) = blurred_damage(&m, 1, Size::new(4.0, 4.0));
        assert_eq!(out, Region::from_rect(spot));
    }

    #[test]
    fn opaque_windows_do_not_widen_damage() {
        let mut m = manager();
        let mut windows = over_background(2, rect(20.0, 20.0, 40.0, 40.0));
        let _ = m.append(&mut windows, 0, FRAME);
        windows[1] = background().with_damage(rect(14.0, 30.0, 4.0, 4.0));
        let _ = m.append(&mut windows, 0, FRAME);
        let (out, _) = blurred_damage(&m, 1, Size::new(4.0, 4.0));
        assert_eq!(out, Region::from_rect(rect(14.0, 30.0, 4.0, 4.0)));
    }

    #[test]
    #[should_panic(expected = "buffer age 4 out of range")]
    fn age_beyond_capacity_panics() {
        let _ = damage(&manager(), 4);
    }
}
