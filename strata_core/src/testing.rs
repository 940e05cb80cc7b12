// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window test double shared by the unit tests.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

use crate::layer::LayerKey;
use crate::region::Region;
use crate::window::{StackWindow, WindowState};

#[derive(Clone, Debug)]
pub(crate) struct TestWindow {
    pub(crate) key: LayerKey,
    pub(crate) state: WindowState,
    pub(crate) damage: Region,
    pub(crate) to_paint: Option<bool>,
}

impl TestWindow {
    /// An opaque, managed, previously damaged window covering `bounds`.
    pub(crate) fn new(key: u32, bounds: Rect) -> Self {
        Self {
            key: LayerKey(key),
            state: WindowState {
                origin: Point::new(bounds.x0, bounds.y0),
                size: Size::new(bounds.width(), bounds.height()),
                ..WindowState::default()
            },
            damage: Region::new(),
            to_paint: None,
        }
    }

    pub(crate) fn transparent(mut self) -> Self {
        self.state.has_alpha = true;
        self
    }

    pub(crate) fn with_damage(mut self, local: Rect) -> Self {
        self.damage.union_rect(local);
        self
    }

    pub(crate) fn move_to(&mut self, x: f64, y: f64) {
        self.state.origin = Point::new(x, y);
    }
}

impl StackWindow for TestWindow {
    fn key(&self) -> LayerKey {
        self.key
    }

    fn state(&self) -> WindowState {
        self.state
    }

    fn damage(&self) -> &Region {
        &self.damage
    }

    fn clear_damage(&mut self) {
        self.damage.clear();
    }

    fn set_to_paint(&mut self, to_paint: bool) {
        self.to_paint = Some(to_paint);
    }
}

/// Builds a stack, topmost first, of opaque windows with the given keys and
/// bounds.
pub(crate) fn stack(windows: &[(u32, Rect)]) -> Vec<TestWindow> {
    windows
        .iter()
        .map(|&(key, bounds)| TestWindow::new(key, bounds))
        .collect()
}

pub(crate) fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x, y, x + w, y + h)
}
