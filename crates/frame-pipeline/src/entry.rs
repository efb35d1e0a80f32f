//! Sequence entries: well-formed frames or malformed inputs.
//!
//! Heterogeneous inputs (for example a JSON list mixing arrays and other
//! values) are normalized into [`FrameEntry`] values before they reach the
//! driver, so the driver never sees an untyped element.

use frame_common::{Frame, FrameError, FrameResult};
use serde_json::Value;

/// One element of a frame sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEntry {
    Frame(Frame),
    /// Input that could not be read as a 2D integer array.
    Malformed { reason: String },
}

impl FrameEntry {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            FrameEntry::Frame(frame) => Some(frame),
            FrameEntry::Malformed { .. } => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, FrameEntry::Malformed { .. })
    }

    /// Classify a JSON value. A frame is a non-empty array of equally long,
    /// non-empty arrays of 32-bit integers; anything else is malformed.
    pub fn from_json(value: &Value) -> Self {
        match parse_rows(value) {
            Ok(rows) => match Frame::from_rows(rows) {
                Ok(frame) => FrameEntry::Frame(frame),
                Err(e) => FrameEntry::malformed(e.to_string()),
            },
            Err(reason) => FrameEntry::Malformed { reason },
        }
    }
}

impl From<Frame> for FrameEntry {
    fn from(frame: Frame) -> Self {
        FrameEntry::Frame(frame)
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse_rows(value: &Value) -> Result<Vec<Vec<i32>>, String> {
    let rows = value
        .as_array()
        .ok_or_else(|| format!("expected a 2D array, found {}", describe(value)))?;
    if rows.is_empty() {
        return Err("empty array".to_string());
    }

    rows.iter()
        .enumerate()
        .map(|(r, row)| {
            let cells = row
                .as_array()
                .ok_or_else(|| format!("row {} is a {}, not an array", r, describe(row)))?;
            if cells.is_empty() {
                return Err(format!("row {} is empty", r));
            }
            cells
                .iter()
                .enumerate()
                .map(|(c, cell)| {
                    cell.as_i64()
                        .and_then(|v| i32::try_from(v).ok())
                        .ok_or_else(|| format!("element [{}][{}] is not a 32-bit integer", r, c))
                })
                .collect::<Result<Vec<i32>, String>>()
        })
        .collect()
}

/// Normalize a JSON document holding a list of frames.
///
/// The document itself must be a JSON array; each element becomes one
/// entry, malformed elements included, in input order.
pub fn normalize_json_sequence(json: &str) -> FrameResult<Vec<FrameEntry>> {
    let value: Value = serde_json::from_str(json)?;
    match value {
        Value::Array(items) => Ok(items.iter().map(FrameEntry::from_json).collect()),
        other => Err(FrameError::GridFormat(format!(
            "frame sequence must be a JSON array, found {}",
            describe(&other)
        ))),
    }
}

/// Wrap already-loaded frames.
pub fn frames_to_entries(frames: Vec<Frame>) -> Vec<FrameEntry> {
    frames.into_iter().map(FrameEntry::from).collect()
}
