//! Session descriptor: where a job's console lives and when it started.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies the store keys of one job's console and its time origin.
///
/// A descriptor is handed to [`JobConsole::init`](crate::JobConsole::init).
/// Hosts that resume a job after a restart pass the descriptor they saved
/// earlier, so `start_time` and the progress bar counter carry over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    /// Key of the ordered set holding encoded lines
    pub set_key: String,

    /// Key of the hash holding spilled line bodies
    pub hash_key: String,

    /// Offset zero for every line. `None` until the first init fills it in.
    pub start_time: Option<DateTime<Utc>>,

    /// Last progress bar id handed out for this session
    pub progress_bar_id: u32,
}

impl SessionDescriptor {
    /// Create a descriptor with explicit keys and an unset start time.
    pub fn new(set_key: impl Into<String>, hash_key: impl Into<String>) -> Self {
        Self {
            set_key: set_key.into(),
            hash_key: hash_key.into(),
            start_time: None,
            progress_bar_id: 0,
        }
    }

    /// Create a descriptor using the conventional keys for a job id:
    /// `console:<job>` for lines and `console:refs:<job>` for spilled bodies.
    pub fn for_job(job_id: &str) -> Self {
        Self::new(
            format!("console:{}", job_id),
            format!("console:refs:{}", job_id),
        )
    }

    /// Set an explicit start time (e.g. when resuming).
    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Seed the progress bar counter.
    pub fn with_progress_bar_id(mut self, id: u32) -> Self {
        self.progress_bar_id = id;
        self
    }

    /// Both store keys are set, so writes can go through.
    pub fn is_writable(&self) -> bool {
        !self.set_key.is_empty() && !self.hash_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_job_keys() {
        let info = SessionDescriptor::for_job("42");
        assert_eq!(info.set_key, "console:42");
        assert_eq!(info.hash_key, "console:refs:42");
        assert!(info.start_time.is_none());
        assert_eq!(info.progress_bar_id, 0);
        assert!(info.is_writable());
    }

    #[test]
    fn test_empty_keys_are_not_writable() {
        assert!(!SessionDescriptor::new("", "refs").is_writable());
        assert!(!SessionDescriptor::new("lines", "").is_writable());
    }

    #[test]
    fn test_descriptor_json_roundtrip() {
        let start = Utc::now();
        let info = SessionDescriptor::for_job("7")
            .with_start_time(start)
            .with_progress_bar_id(3);

        let json = serde_json::to_string(&info).unwrap();
        let parsed: SessionDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, info);
    }
}
