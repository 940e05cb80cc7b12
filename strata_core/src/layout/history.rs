// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Queries that follow a window back and forth through the history.

use super::LayoutManager;
use crate::layer::RankDirection;
use crate::region::Region;

impl LayoutManager {
    /// Adds to `out` the damage a window accumulated over the last `age + 1`
    /// frames.
    ///
    /// Starts at `rank` in the newest layout and follows
    /// [`prev_rank`](crate::layer::Layer::prev_rank) `age` times. With
    /// `age == 0` this is exactly the newest layer's damage.
    ///
    /// # Panics
    ///
    /// Panics if `age > self.max_buffer_age()`, if `rank` is out of range,
    /// or if the window is missing from any of the visited frames.
    pub fn collect_window_damage(&self, rank: u32, age: u32, out: &mut Region) {
        let _ = self.slot(age);
        let mut layer = self.layout(0).layer(rank);
        out.union(&layer.damaged);
        for step in 1..=age {
            let Some(prev) = layer.prev_rank else {
                panic!(
                    "window {:?} has no layer {step} frames back (wanted {age})",
                    layer.key
                );
            };
            layer = self.layout(step).layer(prev);
            out.union(&layer.damaged);
        }
    }

    /// Follows a window's links `age` frames in `direction`.
    ///
    /// With [`RankDirection::Older`], `rank` is a rank in the newest layout
    /// and the result is the window's rank in `layout(age)`. With
    /// [`RankDirection::Newer`], `rank` is a rank in `layout(age)` and the
    /// result is the window's rank in the newest layout.
    ///
    /// Returns `None` as soon as the window is missing from a frame on the
    /// way.
    ///
    /// # Panics
    ///
    /// Panics if `age > self.max_buffer_age()` or if `rank` is out of range
    /// for its starting layout.
    #[must_use]
    pub fn rank_at(&self, age: u32, rank: u32, direction: RankDirection) -> Option<u32> {
        let _ = self.slot(age);
        let start = match direction {
            RankDirection::Older => 0,
            RankDirection::Newer => age,
        };
        let _ = self.layout(start).layer(rank);
        let mut rank = rank;
        match direction {
            RankDirection::Older => {
                for step in 0..age {
                    rank = self.layout(step).layer(rank).prev_rank?;
                }
            }
            RankDirection::Newer => {
                for step in (1..=age).rev() {
                    rank = self.layout(step).layer(rank).next_rank?;
                }
            }
        }
        Some(rank)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::*;
    use crate::config::LayoutConfig;
    use crate::testing::{TestWindow, rect};

    const FRAME: Size = Size::new(100.0, 100.0);

    fn background() -> TestWindow {
        TestWindow::new(1, rect(0.0, 0.0, 100.0, 100.0))
    }

    /// Three frames in which window 2 is damaged at a different spot each
    /// time and moves from above window 3 to below it.
    fn history() -> LayoutManager {
        let mut m = LayoutManager::new(LayoutConfig::new(3));
        let a = rect(10.0, 10.0, 20.0, 20.0);
        let b = rect(50.0, 50.0, 20.0, 20.0);

        let mut frame = alloc::vec![
            TestWindow::new(2, a).with_damage(rect(0.0, 0.0, 2.0, 2.0)),
            TestWindow::new(3, b),
            background(),
        ];
        let _ = m.append(&mut frame, 0, FRAME);

        let mut frame = alloc::vec![
            TestWindow::new(2, a).with_damage(rect(5.0, 5.0, 2.0, 2.0)),
            TestWindow::new(3, b),
            background(),
        ];
        let _ = m.append(&mut frame, 0, FRAME);

        let mut frame = alloc::vec![
            TestWindow::new(3, b),
            TestWindow::new(2, a).with_damage(rect(10.0, 10.0, 2.0, 2.0)),
            background(),
        ];
        let _ = m.append(&mut frame, 0, FRAME);
        m
    }

    #[test]
    fn age_zero_is_the_current_damage() {
        let m = history();
        let rank = m.rank_of(crate::layer::LayerKey(2)).unwrap();
        let mut out = Region::new();
        m.collect_window_damage(rank, 0, &mut out);
        assert_eq!(out, m.layout(0).layer(rank).damaged);
        assert_eq!(out, Region::from_rect(rect(20.0, 20.0, 2.0, 2.0)));
    }

    #[test]
    fn damage_accumulates_over_age() {
        let m = history();
        let rank = m.rank_of(crate::layer::LayerKey(2)).unwrap();
        let mut out = Region::new();
        m.collect_window_damage(rank, 2, &mut out);
        let expected = Region::from_rects(&[
            rect(10.0, 10.0, 2.0, 2.0),
            rect(15.0, 15.0, 2.0, 2.0),
            rect(20.0, 20.0, 2.0, 2.0),
        ]);
        assert_eq!(out, expected);
    }

    #[test]
    fn output_is_added_to_not_replaced() {
        let m = history();
        let mut out = Region::from_rect(rect(90.0, 90.0, 5.0, 5.0));
        m.collect_window_damage(1, 0, &mut out);
        assert!(out.contains_rect(rect(90.0, 90.0, 5.0, 5.0)));
    }

    #[test]
    #[should_panic(expected = "has no layer 3 frames back")]
    fn broken_chain_panics() {
        let m = history();
        // Only three frames exist; the fourth-newest layout is empty.
        m.collect_window_damage(0, 3, &mut Region::new());
    }

    #[test]
    #[should_panic(expected = "buffer age 4 out of range")]
    fn collect_beyond_capacity_panics() {
        let m = history();
        m.collect_window_damage(0, 4, &mut Region::new());
    }

    #[test]
    fn rank_at_walks_both_directions() {
        let m = history();
        // Newest frame: [1, 2, 3]; two frames back: [1, 3, 2].
        assert_eq!(m.rank_at(2, 1, RankDirection::Older), Some(2));
        assert_eq!(m.rank_at(2, 2, RankDirection::Newer), Some(1));
        assert_eq!(m.rank_at(0, 1, RankDirection::Older), Some(1));
    }

    #[test]
    fn rank_at_stops_at_missing_frames() {
        let mut m = history();
        let _ = m.append(&mut alloc::vec![background()], 0, FRAME);
        // Window 2 (rank 1 one frame back) is gone from the newest frame.
        assert_eq!(m.rank_at(1, 1, RankDirection::Newer), None);
        assert_eq!(m.rank_at(1, 0, RankDirection::Newer), Some(0));
        assert_eq!(m.rank_at(3, 0, RankDirection::Older), Some(0));
    }

    #[test]
    #[should_panic(expected = "buffer age 4 out of range")]
    fn rank_at_beyond_capacity_panics() {
        let _ = history().rank_at(4, 0, RankDirection::Older);
    }

    #[test]
    #[should_panic(expected = "buffer age 7 out of range")]
    fn rank_at_beyond_capacity_panics_with_short_history() {
        let mut m = LayoutManager::new(LayoutConfig::new(2));
        let _ = m.append(&mut alloc::vec![background()], 0, FRAME);
        // The chain breaks after one step, which must not hide the bad age.
        let _ = m.rank_at(7, 0, RankDirection::Older);
    }
}
