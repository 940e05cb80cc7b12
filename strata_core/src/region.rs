// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle-set regions in screen space.
//!
//! A [`Region`] is a set of pairwise disjoint, non-degenerate axis-aligned
//! rectangles. It is the currency for damage and dirty areas throughout the
//! crate: per-window pending damage, per-layer damage, the caller's frame
//! dirty area, and the occlusion scratch area.
//!
//! Coordinates are `f64` as in [`kurbo`], but all producers in this crate
//! use integer-valued pixel coordinates, so the set operations are exact.
//!
//! Unions merge fragments that share a full edge back into one rectangle,
//! so repeatedly adding neighbouring areas does not grow the rectangle
//! count. The merge is quadratic in the rectangle count.
//!
//! Storage is never shrunk. Regions that are reused every frame (the
//! occlusion scratch region, the per-layer damage regions) reach a steady
//! state in which no operation allocates.

use alloc::vec::Vec;

use kurbo::{Rect, Vec2};

/// A set of disjoint axis-aligned rectangles.
///
/// Equality compares covered area, not decomposition: two regions built
/// from different rectangle lists are equal if they cover the same points.
#[derive(Clone, Debug, Default)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    /// Creates an empty region.
    #[must_use]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Creates a region covering a single rectangle.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        let mut region = Self::new();
        region.union_rect(rect);
        region
    }

    /// Creates a region covering the union of the given rectangles.
    #[must_use]
    pub fn from_rects(rects: &[Rect]) -> Self {
        let mut region = Self::new();
        for &rect in rects {
            region.union_rect(rect);
        }
        region
    }

    /// Removes every rectangle, keeping the allocation.
    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Replaces the contents of `self` with a copy of `other`.
    pub fn copy_from(&mut self, other: &Self) {
        self.rects.clear();
        self.rects.extend_from_slice(&other.rects);
    }

    /// Returns `true` if the region covers no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Returns the disjoint rectangles making up the region.
    #[must_use]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Returns the bounding box of the region, or [`Rect::ZERO`] if empty.
    #[must_use]
    pub fn extents(&self) -> Rect {
        let mut it = self.rects.iter().copied();
        match it.next() {
            Some(first) => it.fold(first, |acc, r| acc.union(r)),
            None => Rect::ZERO,
        }
    }

    /// Returns the covered area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.rects.iter().map(Rect::area).sum()
    }

    /// Moves every rectangle by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        if offset == Vec2::ZERO {
            return;
        }
        for rect in &mut self.rects {
            *rect = *rect + offset;
        }
    }

    /// Adds `rect` to the region.
    pub fn union_rect(&mut self, rect: Rect) {
        let rect = rect.abs();
        if is_degenerate(rect) {
            return;
        }
        let existing = self.rects.len();
        self.rects.push(rect);
        // Clip the incoming pieces against every rectangle already present.
        for i in 0..existing {
            let old = self.rects[i];
            let end = self.rects.len();
            for j in existing..end {
                let piece = self.rects[j];
                if overlaps(piece, old) {
                    self.rects[j] = Rect::ZERO;
                    push_difference(piece, old, &mut self.rects);
                }
            }
        }
        self.rects.retain(|r| !is_degenerate(*r));
        self.coalesce();
    }

    /// Merges rectangles sharing a full edge until no pair is left.
    fn coalesce(&mut self) {
        let mut merged = true;
        while merged {
            merged = false;
            let mut i = 0;
            while i < self.rects.len() {
                let mut j = i + 1;
                while j < self.rects.len() {
                    if let Some(joined) = join(self.rects[i], self.rects[j]) {
                        self.rects[i] = joined;
                        self.rects.swap_remove(j);
                        merged = true;
                    } else {
                        j += 1;
                    }
                }
                i += 1;
            }
        }
    }

    /// Adds every rectangle of `other` to the region.
    pub fn union(&mut self, other: &Self) {
        for &rect in &other.rects {
            self.union_rect(rect);
        }
    }

    /// Adds `other`, moved by `offset`, to the region.
    pub fn union_with_offset(&mut self, other: &Self, offset: Vec2) {
        for &rect in &other.rects {
            self.union_rect(rect + offset);
        }
    }

    /// Removes `rect` from the region.
    pub fn subtract_rect(&mut self, rect: Rect) {
        let rect = rect.abs();
        if is_degenerate(rect) {
            return;
        }
        let end = self.rects.len();
        for i in 0..end {
            let existing = self.rects[i];
            if overlaps(existing, rect) {
                self.rects[i] = Rect::ZERO;
                push_difference(existing, rect, &mut self.rects);
            }
        }
        self.rects.retain(|r| !is_degenerate(*r));
    }

    /// Removes every rectangle of `other` from the region.
    pub fn subtract(&mut self, other: &Self) {
        for &rect in &other.rects {
            if self.is_empty() {
                return;
            }
            self.subtract_rect(rect);
        }
    }

    /// Removes `other`, moved by `offset`, from the region.
    pub fn subtract_with_offset(&mut self, other: &Self, offset: Vec2) {
        for &rect in &other.rects {
            if self.is_empty() {
                return;
            }
            self.subtract_rect(rect + offset);
        }
    }

    /// Restricts the region to `rect`.
    pub fn intersect_rect(&mut self, rect: Rect) {
        let rect = rect.abs();
        for r in &mut self.rects {
            *r = r.intersect(rect);
        }
        self.rects.retain(|r| !is_degenerate(*r));
    }

    /// Restricts the region to the area it shares with `other`.
    pub fn intersect(&mut self, other: &Self) {
        let end = self.rects.len();
        for i in 0..end {
            let a = self.rects[i];
            for &b in &other.rects {
                let shared = a.intersect(b);
                if !is_degenerate(shared) {
                    self.rects.push(shared);
                }
            }
        }
        self.drop_front(end);
    }

    /// Restricts the region to the area it shares with `other` moved by
    /// `offset`.
    pub fn intersect_with_offset(&mut self, other: &Self, offset: Vec2) {
        let end = self.rects.len();
        for i in 0..end {
            let a = self.rects[i];
            for &b in &other.rects {
                let shared = a.intersect(b + offset);
                if !is_degenerate(shared) {
                    self.rects.push(shared);
                }
            }
        }
        self.drop_front(end);
    }

    /// Discards the first `n` rectangles, keeping the allocation.
    fn drop_front(&mut self, n: usize) {
        let len = self.rects.len();
        self.rects.copy_within(n.., 0);
        self.rects.truncate(len - n);
    }

    /// Returns `true` if any part of `rect` lies inside the region.
    ///
    /// Equivalent to intersecting a copy and testing for emptiness, without
    /// touching storage.
    #[must_use]
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        let rect = rect.abs();
        !is_degenerate(rect) && self.rects.iter().any(|r| overlaps(*r, rect))
    }

    /// Returns `true` if `rect` lies entirely inside the region.
    #[must_use]
    pub fn contains_rect(&self, rect: Rect) -> bool {
        let mut rest = Self::from_rect(rect);
        rest.subtract(self);
        rest.is_empty()
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        if self.area() != other.area() {
            return false;
        }
        let mut rest = self.clone();
        rest.subtract(other);
        rest.is_empty()
    }
}

/// Returns `true` if `r` covers no area.
fn is_degenerate(r: Rect) -> bool {
    !(r.x1 > r.x0 && r.y1 > r.y0)
}

/// Returns `true` if the interiors of `a` and `b` overlap.
fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0.max(b.x0) < a.x1.min(b.x1) && a.y0.max(b.y0) < a.y1.min(b.y1)
}

/// Returns the union of `a` and `b` if it is itself a rectangle, that is if
/// they share a full edge.
fn join(a: Rect, b: Rect) -> Option<Rect> {
    let same_rows = a.y0 == b.y0 && a.y1 == b.y1;
    if same_rows && (a.x1 == b.x0 || b.x1 == a.x0) {
        return Some(Rect::new(a.x0.min(b.x0), a.y0, a.x1.max(b.x1), a.y1));
    }
    let same_columns = a.x0 == b.x0 && a.x1 == b.x1;
    if same_columns && (a.y1 == b.y0 || b.y1 == a.y0) {
        return Some(Rect::new(a.x0, a.y0.min(b.y0), a.x1, a.y1.max(b.y1)));
    }
    None
}

/// Pushes up to four disjoint rectangles covering `a - b`.
///
/// Bands above and below `b` span the full width of `a`; the side pieces
/// only span the rows `a` and `b` share.
fn push_difference(a: Rect, b: Rect, out: &mut Vec<Rect>) {
    if b.y0 > a.y0 {
        out.push(Rect::new(a.x0, a.y0, a.x1, b.y0.min(a.y1)));
    }
    if b.y1 < a.y1 {
        out.push(Rect::new(a.x0, b.y1.max(a.y0), a.x1, a.y1));
    }
    let y0 = a.y0.max(b.y0);
    let y1 = a.y1.min(b.y1);
    if y0 < y1 {
        if b.x0 > a.x0 {
            out.push(Rect::new(a.x0, y0, b.x0.min(a.x1), y1));
        }
        if b.x1 < a.x1 {
            out.push(Rect::new(b.x1.max(a.x0), y0, a.x1, y1));
        }
    }
}
