//! Wire record for a single console line.
//!
//! Each record is a compact JSON object stored as one member of the
//! session's ordered set. Field names are single letters to keep records
//! under the value field limit:
//!
//! ```text
//! {"t":1.25,"s":"[JobAgent]hello","c":"#ff0000"}
//! {"t":1.3,"r":true,"s":"3f2a...e1"}
//! {"t":2.0,"s":"1","p":50.0,"n":"build"}
//! ```

use serde::{Deserialize, Serialize};

/// Smallest step used to separate lines that land on the same offset.
pub const OFFSET_STEP: f64 = 0.0001;

/// A single console record as stored in the ordered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleLine {
    /// Seconds since the session start time
    #[serde(rename = "t")]
    pub time_offset: f64,

    /// True if the spilled text field holds a hash reference instead of the
    /// text. On a named progress record that field is `n`, not `s`: `s`
    /// always keeps the plain bar id. Use [`ConsoleLine::reference`] to find
    /// the hash field.
    #[serde(rename = "r", default, skip_serializing_if = "is_false")]
    pub is_reference: bool,

    /// Message text, message reference, or progress bar id
    #[serde(rename = "s")]
    pub message: String,

    /// Text color
    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,

    /// Value update for a progress bar
    #[serde(rename = "p", default, skip_serializing_if = "Option::is_none")]
    pub progress_value: Option<f64>,

    /// Progress bar name, or its reference when `is_reference` is set
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub progress_name: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ConsoleLine {
    /// A plain text line. The offset is assigned by the writer.
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            time_offset: 0.0,
            is_reference: false,
            message: message.into(),
            text_color: None,
            progress_value: None,
            progress_name: None,
        }
    }

    /// A progress update for the bar with the given id.
    pub fn progress(id: impl Into<String>, value: f64) -> Self {
        Self {
            progress_value: Some(value),
            ..Self::text(id)
        }
    }

    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.text_color = color;
        self
    }

    pub fn with_progress_name(mut self, name: impl Into<String>) -> Self {
        self.progress_name = Some(name.into());
        self
    }

    pub fn is_progress(&self) -> bool {
        self.progress_value.is_some()
    }

    /// The free-form text that moves to the hash when the record is too big.
    ///
    /// For a named progress update that is the name; `s` must keep the bar id.
    /// Otherwise it is the message.
    pub fn spillable_text(&self) -> &str {
        match &self.progress_name {
            Some(name) => name,
            None => &self.message,
        }
    }

    /// Replace the spillable text with `reference` and return the original.
    pub fn spill(&mut self, reference: String) -> String {
        self.is_reference = true;
        match self.progress_name.as_mut() {
            Some(name) => std::mem::replace(name, reference),
            None => std::mem::replace(&mut self.message, reference),
        }
    }

    /// The hash field this record points at, if it is a reference record.
    pub fn reference(&self) -> Option<&str> {
        if self.is_reference {
            Some(self.spillable_text())
        } else {
            None
        }
    }

    /// Serialize to the compact JSON stored in the ordered set.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a stored record.
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Round elapsed seconds to millisecond precision.
pub fn round_offset(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

/// The offset that follows `last` when the clock has not moved past it.
pub fn bump_offset(last: f64) -> f64 {
    let next = ((last + OFFSET_STEP) * 10_000.0).round() / 10_000.0;
    if next > last {
        next
    } else {
        // rounding swallowed the step at this magnitude
        last + OFFSET_STEP
    }
}
