//! Per-slot rendering of a batch result.

use std::fmt::Write as _;

use serde::Serialize;

use crate::decode::{BatchResult, DecodeErrorKind, DecodeOutcome};
use crate::slot::SlotId;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotReport {
    Ok {
        slot: SlotId,
        sample_rate: u32,
        channels: u16,
        samples: usize,
        duration_secs: f64,
        preview: Vec<i16>,
    },
    Error {
        slot: SlotId,
        kind: DecodeErrorKind,
        message: String,
    },
}

impl SlotReport {
    pub fn from_outcome(slot: SlotId, outcome: &DecodeOutcome, preview: usize) -> Self {
        match outcome {
            DecodeOutcome::Success(decoded) => {
                let track = &decoded.track;
                SlotReport::Ok {
                    slot,
                    sample_rate: track.format.sample_rate,
                    channels: track.format.channels,
                    samples: track.samples.len(),
                    duration_secs: track.duration_secs(),
                    preview: track.preview(preview).to_vec(),
                }
            }
            DecodeOutcome::Failure(failure) => SlotReport::Error {
                slot,
                kind: failure.error.kind(),
                message: failure.error.to_string(),
            },
        }
    }
}

pub fn build(results: &BatchResult, preview: usize) -> Vec<SlotReport> {
    results
        .iter()
        .map(|(slot, outcome)| SlotReport::from_outcome(*slot, outcome, preview))
        .collect()
}

pub fn render_text(reports: &[SlotReport]) -> String {
    let mut out = String::new();
    for report in reports {
        match report {
            SlotReport::Ok {
                slot,
                sample_rate,
                channels,
                samples,
                duration_secs,
                preview,
            } => {
                let _ = writeln!(out, "== {}", slot);
                let _ = writeln!(out, "Sample Rate: {} Hz", sample_rate);
                let _ = writeln!(out, "Channels: {}", channels);
                let _ = writeln!(out, "Samples: {} ({:.3}s)", samples, duration_secs);
                let _ = writeln!(out, "PCM data (first {} samples): {:?}", preview.len(), preview);
            }
            SlotReport::Error { slot, message, .. } => {
                let _ = writeln!(out, "== {}", slot);
                let _ = writeln!(out, "Error: {}", message);
            }
        }
    }
    out
}

pub fn render_json(reports: &[SlotReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}
