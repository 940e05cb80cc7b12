// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Nanosecond
//! timestamps are printed in microseconds.

use std::io::Write;

use strata_core::trace::{
    DamageRect, FrameDamageEvent, FrameSummary, LayerLink, LayoutAppendEvent, OcclusionEvent,
    PhaseBeginEvent, PhaseEndEvent, PhaseKind, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ns_to_us(ns: u64) -> f64 {
    ns as f64 / 1000.0
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Append => "append",
        PhaseKind::Occlusion => "occlusion",
        PhaseKind::Damage => "damage",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_layout_append(&mut self, e: &LayoutAppendEvent) {
        let _ = writeln!(
            self.writer,
            "[append] frame={} gen={} layers={}/{} new={} removed={} capacity={}",
            e.frame_index,
            e.generation,
            e.layers,
            e.candidates,
            e.new_layers,
            e.removed,
            e.capacity,
        );
    }

    fn on_occlusion(&mut self, e: &OcclusionEvent) {
        let _ = writeln!(
            self.writer,
            "[occlusion] frame={} visited={} culled={} opaque={}",
            e.frame_index, e.visited, e.culled, e.opaque,
        );
    }

    fn on_frame_damage(&mut self, e: &FrameDamageEvent) {
        let extent = if e.full { "FULL" } else { "partial" };
        let _ = writeln!(
            self.writer,
            "[damage] frame={} age={} {extent} rects={}",
            e.frame_index, e.buffer_age, e.rects,
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} at {:.1}µs",
            e.frame_index,
            phase_name(e.phase),
            ns_to_us(e.timestamp),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} at {:.1}µs",
            e.frame_index,
            phase_name(e.phase),
            ns_to_us(e.timestamp),
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let extent = if s.damage_full { "FULL" } else { "partial" };
        let _ = writeln!(
            self.writer,
            "[summary] frame={} layers={} new={} removed={} culled={} damage={extent}/{} \
             append={:.1}µs occlusion={:.1}µs damage={:.1}µs",
            s.frame_index,
            s.layers,
            s.new_layers,
            s.removed,
            s.culled,
            s.damage_rects,
            ns_to_us(s.append_ns),
            ns_to_us(s.occlusion_ns),
            ns_to_us(s.damage_ns),
        );
    }

    fn on_layer_links(&mut self, frame_index: u64, links: &[LayerLink]) {
        let linked = links.iter().filter(|l| l.prev_rank.is_some()).count();
        let _ = writeln!(
            self.writer,
            "[links] frame={frame_index} layers={} linked={linked}",
            links.len(),
        );
    }

    fn on_damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        let _ = writeln!(
            self.writer,
            "[damage:rects] frame={frame_index} rects={}",
            rects.len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_print_append() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_layout_append(&LayoutAppendEvent {
            frame_index: 1,
            generation: 0,
            candidates: 4,
            layers: 3,
            new_layers: 3,
            removed: 0,
            capacity: 4,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[append]"), "got: {output}");
        assert!(output.contains("frame=1"), "got: {output}");
        assert!(output.contains("layers=3/4"), "got: {output}");
    }

    #[test]
    fn pretty_print_phase_in_microseconds() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_phase_end(&PhaseEndEvent {
            frame_index: 2,
            phase: PhaseKind::Occlusion,
            timestamp: 1_500,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "[phase:end] frame=2 occlusion at 1.5µs\n");
    }

    #[test]
    fn pretty_print_links_counts_linked_layers() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        let links = [
            LayerLink {
                rank: 0,
                key: 1,
                prev_rank: Some(0),
                to_paint: true,
            },
            LayerLink {
                rank: 1,
                key: 2,
                prev_rank: None,
                to_paint: true,
            },
        ];
        sink.on_layer_links(5, &links);
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("layers=2 linked=1"), "got: {output}");
    }
}
