// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Pipeline phases become duration events. Stage outcomes carry no
//! timestamp of their own; they are placed at the most recent phase
//! timestamp seen in the recording.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut last_ts = 0.0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::LayoutAppend(e) => {
                events.push(instant(
                    "LayoutAppend",
                    "Layout",
                    last_ts,
                    json!({
                        "frame_index": e.frame_index,
                        "generation": e.generation,
                        "candidates": e.candidates,
                        "layers": e.layers,
                        "new_layers": e.new_layers,
                        "removed": e.removed,
                        "capacity": e.capacity,
                    }),
                ));
            }
            RecordedEvent::Occlusion(e) => {
                events.push(instant(
                    "Occlusion",
                    "Layout",
                    last_ts,
                    json!({
                        "frame_index": e.frame_index,
                        "visited": e.visited,
                        "culled": e.culled,
                        "opaque": e.opaque,
                    }),
                ));
            }
            RecordedEvent::FrameDamage(e) => {
                events.push(instant(
                    "FrameDamage",
                    "Damage",
                    last_ts,
                    json!({
                        "frame_index": e.frame_index,
                        "buffer_age": e.buffer_age,
                        "full": e.full,
                        "rects": e.rects,
                    }),
                ));
            }
            RecordedEvent::PhaseBegin(e) => {
                last_ts = ns_to_us(e.timestamp);
                events.push(json!({
                    "ph": "B",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                last_ts = ns_to_us(e.timestamp);
                events.push(json!({
                    "ph": "E",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                events.push(instant(
                    "FrameSummary",
                    "Summary",
                    last_ts,
                    json!({
                        "frame_index": s.frame_index,
                        "generation": s.generation,
                        "layers": s.layers,
                        "new_layers": s.new_layers,
                        "removed": s.removed,
                        "culled": s.culled,
                        "damage_full": s.damage_full,
                        "damage_rects": s.damage_rects,
                        "append_us": ns_to_us(s.append_ns),
                        "occlusion_us": ns_to_us(s.occlusion_ns),
                        "damage_us": ns_to_us(s.damage_ns),
                    }),
                ));
            }
            RecordedEvent::LayerLinksCount { frame_index, count } => {
                events.push(instant(
                    "LayerLinks",
                    "Rich",
                    last_ts,
                    json!({
                        "frame_index": frame_index,
                        "count": count,
                    }),
                ));
            }
            RecordedEvent::DamageRectsCount { frame_index, count } => {
                events.push(instant(
                    "DamageRects",
                    "Rich",
                    last_ts,
                    json!({
                        "frame_index": frame_index,
                        "count": count,
                    }),
                ));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

/// A thread-scoped instant event.
fn instant(name: &str, cat: &str, ts: f64, args: Value) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": cat,
        "ts": ts,
        "pid": 0,
        "tid": 0,
        "s": "t",
        "args": args,
    })
}

fn ns_to_us(ns: u64) -> f64 {
    ns as f64 / 1000.0
}
