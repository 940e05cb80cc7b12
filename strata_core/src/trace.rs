// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the per-frame layout pipeline.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! the caller driving the pipeline invokes after each stage. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! The [`LayoutManager`](crate::layout::LayoutManager) operations return
//! summaries rather than emitting events themselves; the events here are
//! built from those summaries with `From`.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`FrameSummaryBuilder`] collects the stage events and phase timestamps of
//! one frame and produces a [`FrameSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`LayerLink`] and [`DamageRect`]
//!   events plus the corresponding `TraceSink` methods.

#[cfg(feature = "trace-rich")]
use kurbo::Rect;

#[cfg(feature = "trace-rich")]
use crate::layer::Layer;
use crate::layout::{AppendSummary, FrameDamageSummary, OcclusionSummary};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which stage of the per-frame pipeline is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Layer extraction and identity linking.
    Append,
    /// Top-down occlusion marking.
    Occlusion,
    /// Frame damage computation for the back buffer.
    Damage,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a new layout was appended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutAppendEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Generation tag of the backing surface.
    pub generation: u64,
    /// Managed windows in the stack.
    pub candidates: u32,
    /// Windows accepted as layers.
    pub layers: u32,
    /// Layers without a predecessor in the previous frame.
    pub new_layers: u32,
    /// Windows of the previous frame that disappeared.
    pub removed: u32,
    /// Layer slots allocated for the new layout.
    pub capacity: u32,
}

impl From<&AppendSummary> for LayoutAppendEvent {
    fn from(summary: &AppendSummary) -> Self {
        Self {
            frame_index: summary.frame_index,
            generation: summary.generation,
            candidates: summary.candidates,
            layers: summary.layers,
            new_layers: summary.new_layers,
            removed: summary.removed,
            capacity: summary.capacity,
        }
    }
}

/// Emitted after occlusion marking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OcclusionEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Layers examined.
    pub visited: u32,
    /// Layers that need no painting.
    pub culled: u32,
    /// Opaque layers subtracted from the dirty area.
    pub opaque: u32,
}

impl From<&OcclusionSummary> for OcclusionEvent {
    fn from(summary: &OcclusionSummary) -> Self {
        Self {
            frame_index: summary.frame_index,
            visited: summary.visited,
            culled: summary.culled,
            opaque: summary.opaque,
        }
    }
}

/// Emitted after the damage for a back buffer was computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameDamageEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Age of the back buffer.
    pub buffer_age: u32,
    /// Whether the whole frame is repainted.
    pub full: bool,
    /// Rectangles in the damage region.
    pub rects: u32,
}

impl From<&FrameDamageSummary> for FrameDamageEvent {
    fn from(summary: &FrameDamageSummary) -> Self {
        Self {
            frame_index: summary.frame_index,
            buffer_age: summary.buffer_age,
            full: summary.full,
            rects: summary.rects,
        }
    }
}

/// Marks the beginning of a pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which stage is starting.
    pub phase: PhaseKind,
    /// Caller-supplied monotonic time in nanoseconds.
    pub timestamp: u64,
}

/// Marks the end of a pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which stage is ending.
    pub phase: PhaseKind,
    /// Caller-supplied monotonic time in nanoseconds.
    pub timestamp: u64,
}

/// Per-frame summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Generation tag of the backing surface.
    pub generation: u64,
    /// Layers in the frame.
    pub layers: u32,
    /// Layers without a predecessor in the previous frame.
    pub new_layers: u32,
    /// Windows of the previous frame that disappeared.
    pub removed: u32,
    /// Layers that need no painting (0 if occlusion was not recorded).
    pub culled: u32,
    /// Whether the back buffer is repainted in full.
    pub damage_full: bool,
    /// Rectangles in the damage region (0 if damage was not recorded).
    pub damage_rects: u32,
    /// Append stage duration in nanoseconds (0 if not measured).
    pub append_ns: u64,
    /// Occlusion stage duration in nanoseconds (0 if not measured).
    pub occlusion_ns: u64,
    /// Damage stage duration in nanoseconds (0 if not measured).
    pub damage_ns: u64,
}

/// How one layer of the newest layout links to its neighbours in time.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerLink {
    /// Rank in the newest layout.
    pub rank: u32,
    /// Raw window key.
    pub key: u32,
    /// Rank in the previous frame, if the window was present.
    pub prev_rank: Option<u32>,
    /// Whether the layer needs painting.
    pub to_paint: bool,
}

#[cfg(feature = "trace-rich")]
impl LayerLink {
    /// Describes `layer` found at `rank`.
    #[must_use]
    pub fn new(rank: u32, layer: &Layer) -> Self {
        Self {
            rank,
            key: layer.key.0,
            prev_rank: layer.prev_rank,
            to_paint: layer.to_paint,
        }
    }
}

/// An axis-aligned damage rectangle in whole pixels.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

#[cfg(feature = "trace-rich")]
impl From<Rect> for DamageRect {
    /// Rounds `rect` outwards to whole pixels.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "screen coordinates fit in i32"
    )]
    fn from(rect: Rect) -> Self {
        let rect = rect.abs().expand();
        Self {
            x: rect.x0 as i32,
            y: rect.y0 as i32,
            width: rect.width() as u32,
            height: rect.height() as u32,
        }
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the layout pipeline.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a layout was appended.
    fn on_layout_append(&mut self, e: &LayoutAppendEvent) {
        _ = e;
    }

    /// Called after occlusion marking.
    fn on_occlusion(&mut self, e: &OcclusionEvent) {
        _ = e;
    }

    /// Called after frame damage was computed.
    fn on_frame_damage(&mut self, e: &FrameDamageEvent) {
        _ = e;
    }

    /// Called at the beginning of a pipeline stage.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a pipeline stage.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called with a per-frame summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Called with the per-layer links of the newest layout (requires
    /// `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_layer_links(&mut self, frame_index: u64, links: &[LayerLink]) {
        _ = (frame_index, links);
    }

    /// Called with per-frame damage rectangles (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        _ = (frame_index, rects);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`LayoutAppendEvent`].
    #[inline]
    pub fn layout_append(&mut self, e: &LayoutAppendEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layout_append(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`OcclusionEvent`].
    #[inline]
    pub fn occlusion(&mut self, e: &OcclusionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_occlusion(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameDamageEvent`].
    #[inline]
    pub fn frame_damage(&mut self, e: &FrameDamageEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_damage(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits layer links (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn layer_links(&mut self, frame_index: u64, links: &[LayerLink]) {
        if let Some(s) = &mut self.sink {
            s.on_layer_links(frame_index, links);
        }
    }

    /// Emits damage rectangles (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        if let Some(s) = &mut self.sink {
            s.on_damage_rects(frame_index, rects);
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects stage events and phase timestamps during a frame and produces a
/// [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    append: LayoutAppendEvent,
    occlusion: Option<OcclusionEvent>,
    damage: Option<FrameDamageEvent>,
    phase_starts: [Option<u64>; 3],
    phase_ends: [Option<u64>; 3],
}

impl FrameSummaryBuilder {
    /// Starts building a summary for the frame produced by `append`.
    #[must_use]
    pub fn new(append: &LayoutAppendEvent) -> Self {
        Self {
            append: *append,
            occlusion: None,
            damage: None,
            phase_starts: [None; 3],
            phase_ends: [None; 3],
        }
    }

    /// Records the occlusion outcome.
    pub fn record_occlusion(&mut self, e: &OcclusionEvent) {
        self.occlusion = Some(*e);
    }

    /// Records the damage outcome.
    pub fn record_damage(&mut self, e: &FrameDamageEvent) {
        self.damage = Some(*e);
    }

    /// Records the start of a phase.
    pub fn phase_begin(&mut self, phase: PhaseKind, t: u64) {
        self.phase_starts[phase_index(phase)] = Some(t);
    }

    /// Records the end of a phase.
    pub fn phase_end(&mut self, phase: PhaseKind, t: u64) {
        self.phase_ends[phase_index(phase)] = Some(t);
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        FrameSummary {
            frame_index: self.append.frame_index,
            generation: self.append.generation,
            layers: self.append.layers,
            new_layers: self.append.new_layers,
            removed: self.append.removed,
            culled: self.occlusion.map_or(0, |o| o.culled),
            damage_full: self.damage.is_some_and(|d| d.full),
            damage_rects: self.damage.map_or(0, |d| d.rects),
            append_ns: self.phase_duration(PhaseKind::Append),
            occlusion_ns: self.phase_duration(PhaseKind::Occlusion),
            damage_ns: self.phase_duration(PhaseKind::Damage),
        }
    }

    fn phase_duration(&self, phase: PhaseKind) -> u64 {
        let idx = phase_index(phase);
        match (self.phase_starts[idx], self.phase_ends[idx]) {
            (Some(start), Some(end)) => end.saturating_sub(start),
            _ => 0,
        }
    }
}

/// Maps a [`PhaseKind`] to an array index.
const fn phase_index(phase: PhaseKind) -> usize {
    match phase {
        PhaseKind::Append => 0,
        PhaseKind::Occlusion => 1,
        PhaseKind::Damage => 2,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
