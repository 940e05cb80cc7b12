// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Rich events ([`on_layer_links`](TraceSink::on_layer_links),
//! [`on_damage_rects`](TraceSink::on_damage_rects)) store only the count.

use strata_core::trace::{
    DamageRect, FrameDamageEvent, FrameSummary, LayerLink, LayoutAppendEvent, OcclusionEvent,
    PhaseBeginEvent, PhaseEndEvent, PhaseKind, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_LAYOUT_APPEND: u8 = 1;
const TAG_OCCLUSION: u8 = 2;
const TAG_FRAME_DAMAGE: u8 = 3;
const TAG_PHASE_BEGIN: u8 = 4;
const TAG_PHASE_END: u8 = 5;
const TAG_FRAME_SUMMARY: u8 = 6;
const TAG_LAYER_LINKS_COUNT: u8 = 7;
const TAG_DAMAGE_RECTS_COUNT: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Append => 0,
            PhaseKind::Occlusion => 1,
            PhaseKind::Damage => 2,
        });
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "slice length capped at u32::MAX for recording"
    )]
    fn write_count(&mut self, len: usize) {
        self.write_u32(len.min(u32::MAX as usize) as u32);
    }
}

impl TraceSink for RecorderSink {
    fn on_layout_append(&mut self, e: &LayoutAppendEvent) {
        self.write_u8(TAG_LAYOUT_APPEND);
        self.write_u64(e.frame_index);
        self.write_u64(e.generation);
        self.write_u32(e.candidates);
        self.write_u32(e.layers);
        self.write_u32(e.new_layers);
        self.write_u32(e.removed);
        self.write_u32(e.capacity);
    }

    fn on_occlusion(&mut self, e: &OcclusionEvent) {
        self.write_u8(TAG_OCCLUSION);
        self.write_u64(e.frame_index);
        self.write_u32(e.visited);
        self.write_u32(e.culled);
        self.write_u32(e.opaque);
    }

    fn on_frame_damage(&mut self, e: &FrameDamageEvent) {
        self.write_u8(TAG_FRAME_DAMAGE);
        self.write_u64(e.frame_index);
        self.write_u32(e.buffer_age);
        self.write_bool(e.full);
        self.write_u32(e.rects);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u64(s.generation);
        self.write_u32(s.layers);
        self.write_u32(s.new_layers);
        self.write_u32(s.removed);
        self.write_u32(s.culled);
        self.write_bool(s.damage_full);
        self.write_u32(s.damage_rects);
        self.write_u64(s.append_ns);
        self.write_u64(s.occlusion_ns);
        self.write_u64(s.damage_ns);
    }

    fn on_layer_links(&mut self, frame_index: u64, links: &[LayerLink]) {
        self.write_u8(TAG_LAYER_LINKS_COUNT);
        self.write_u64(frame_index);
        self.write_count(links.len());
    }

    fn on_damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        self.write_u8(TAG_DAMAGE_RECTS_COUNT);
        self.write_u64(frame_index);
        self.write_count(rects.len());
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`LayoutAppendEvent`].
    LayoutAppend(LayoutAppendEvent),
    /// An [`OcclusionEvent`].
    Occlusion(OcclusionEvent),
    /// A [`FrameDamageEvent`].
    FrameDamage(FrameDamageEvent),
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
    /// Layer-link count for a frame.
    LayerLinksCount {
        /// Frame counter.
        frame_index: u64,
        /// Number of layers described.
        count: u32,
    },
    /// Damage-rect count for a frame.
    DamageRectsCount {
        /// Frame counter.
        frame_index: u64,
        /// Number of damage rects.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Append,
            1 => PhaseKind::Occlusion,
            _ => PhaseKind::Damage,
        })
    }

    fn decode_layout_append(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LayoutAppend(LayoutAppendEvent {
            frame_index: self.read_u64()?,
            generation: self.read_u64()?,
            candidates: self.read_u32()?,
            layers: self.read_u32()?,
            new_layers: self.read_u32()?,
            removed: self.read_u32()?,
            capacity: self.read_u32()?,
        }))
    }

    fn decode_occlusion(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Occlusion(OcclusionEvent {
            frame_index: self.read_u64()?,
            visited: self.read_u32()?,
            culled: self.read_u32()?,
            opaque: self.read_u32()?,
        }))
    }

    fn decode_frame_damage(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameDamage(FrameDamageEvent {
            frame_index: self.read_u64()?,
            buffer_age: self.read_u32()?,
            full: self.read_bool()?,
            rects: self.read_u32()?,
        }))
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: self.read_u64()?,
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: self.read_u64()?,
        }))
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index: self.read_u64()?,
            generation: self.read_u64()?,
            layers: self.read_u32()?,
            new_layers: self.read_u32()?,
            removed: self.read_u32()?,
            culled: self.read_u32()?,
            damage_full: self.read_bool()?,
            damage_rects: self.read_u32()?,
            append_ns: self.read_u64()?,
            occlusion_ns: self.read_u64()?,
            damage_ns: self.read_u64()?,
        }))
    }

    fn decode_layer_links_count(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::LayerLinksCount { frame_index, count })
    }

    fn decode_damage_rects_count(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::DamageRectsCount { frame_index, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_LAYOUT_APPEND => self.decode_layout_append(),
            TAG_OCCLUSION => self.decode_occlusion(),
            TAG_FRAME_DAMAGE => self.decode_frame_damage(),
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            TAG_LAYER_LINKS_COUNT => self.decode_layer_links_count(),
            TAG_DAMAGE_RECTS_COUNT => self.decode_damage_rects_count(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
