//! The console line writer.
//!
//! A [`JobConsole`] turns calls into an ordered, size-bounded stream of
//! encoded [`ConsoleLine`] records in the session's ordered set:
//!
//! 1. the offset since the session start is rounded to milliseconds and
//!    bumped past the previous offset if the clock has not moved
//! 2. the record is encoded; if it is over the value field limit its text is
//!    spilled into the session hash under a random reference key
//! 3. the record is added to the ordered set, scored by its offset
//!
//! All three steps, storage calls included, run under one lock, so offsets
//! are strictly increasing in the order the writes reach the store.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rand::RngCore;
use tracing::{debug, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::color::ConsoleColor;
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, ConsoleResult};
use crate::line::{bump_offset, round_offset, ConsoleLine};
use crate::progress::ProgressBar;
use crate::session::SessionDescriptor;
use crate::storage::ConsoleStorage;

/// Mutable writer state, guarded by the writer lock.
#[derive(Debug, Default)]
struct ConsoleState {
    info: Option<SessionDescriptor>,
    /// Offset of the last emitted record
    last_time_offset: Option<f64>,
}

struct ConsoleInner {
    storage: Arc<dyn ConsoleStorage>,
    clock: Arc<dyn Clock>,
    config: ConsoleConfig,
    state: Mutex<ConsoleState>,
    /// Last allocated progress bar id
    next_progress_bar_id: AtomicU32,
}

/// Writes a job's console lines and progress updates to a store.
///
/// Cheap to clone; clones share the same session, lock and offsets.
/// Until [`init`](Self::init) is called every write is silently dropped.
#[derive(Clone)]
pub struct JobConsole {
    inner: Arc<ConsoleInner>,
}

impl std::fmt::Debug for JobConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobConsole")
            .field("config", &self.inner.config)
            .field("state", &*self.inner.state.lock())
            .finish()
    }
}

/// A fresh 128-bit random key, hex encoded.
fn new_reference_key() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

impl JobConsole {
    /// Create a writer over the given store, using the system clock and
    /// default limits.
    pub fn new(storage: Arc<dyn ConsoleStorage>) -> Self {
        Self::with_options(storage, Arc::new(SystemClock), ConsoleConfig::default())
    }

    /// Create a writer with an explicit clock and configuration.
    pub fn with_options(
        storage: Arc<dyn ConsoleStorage>,
        clock: Arc<dyn Clock>,
        config: ConsoleConfig,
    ) -> Self {
        Self {
            inner: Arc::new(ConsoleInner {
                storage,
                clock,
                config,
                state: Mutex::new(ConsoleState::default()),
                next_progress_bar_id: AtomicU32::new(0),
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    /// Attach the writer to a session.
    ///
    /// Seeds the progress bar counter from the descriptor. An unset start
    /// time becomes the current instant; a start time carried over from an
    /// earlier run is kept so offsets stay comparable across restarts.
    pub fn init(&self, mut info: SessionDescriptor) {
        if info.start_time.is_none() {
            info.start_time = Some(self.inner.clock.now());
        }

        debug!(
            set_key = %info.set_key,
            hash_key = %info.hash_key,
            progress_bar_id = info.progress_bar_id,
            "Console session initialized"
        );

        let mut state = self.inner.state.lock();
        self.inner
            .next_progress_bar_id
            .store(info.progress_bar_id, Ordering::SeqCst);
        state.info = Some(info);
    }

    /// The current session descriptor, with the progress bar counter at its
    /// latest value. Persist this to resume the console later.
    pub fn descriptor(&self) -> Option<SessionDescriptor> {
        let state = self.inner.state.lock();
        state.info.clone().map(|mut info| {
            info.progress_bar_id = self.inner.next_progress_bar_id.load(Ordering::SeqCst);
            info
        })
    }

    /// Write one line of text.
    ///
    /// The line is prefixed with the configured marker. Nothing is written if
    /// the session is not initialized, the message is empty, or a store key is
    /// empty. Storage errors are returned as-is.
    pub fn write_line(&self, message: &str, color: Option<ConsoleColor>) -> ConsoleResult<()> {
        if message.is_empty() {
            return Ok(());
        }

        let text = format!("{}{}", self.inner.config.marker, message);
        let line = ConsoleLine::text(text).with_color(color.map(|c| c.as_hex().to_string()));
        self.write_record(line).map(|_| ())
    }

    /// Like [`write_line`](Self::write_line), but storage failures are logged
    /// instead of returned, so a failing store never aborts the job.
    pub fn log_line(&self, message: &str, color: Option<ConsoleColor>) {
        if let Err(e) = self.write_line(message, color) {
            warn!(error = %e, "Failed to write console line");
        }
    }

    /// Create a progress bar and emit its initial value.
    ///
    /// The bar id comes from the session counter and is never reused within
    /// the session, including after a resume.
    pub fn create_progress_bar(
        &self,
        name: &str,
        value: f64,
        color: Option<ConsoleColor>,
    ) -> ConsoleResult<ProgressBar> {
        let id = self
            .inner
            .next_progress_bar_id
            .fetch_add(1, Ordering::SeqCst)
            .wrapping_add(1);

        let bar = ProgressBar::new(self.clone(), id.to_string(), name.to_string(), color);
        bar.set_value(value)?;
        Ok(bar)
    }

    /// Assign an offset to `line`, encode it within the size limit and add
    /// it to the ordered set.
    ///
    /// Returns `false` if the record was dropped because the session is not
    /// ready for writes.
    pub(crate) fn write_record(&self, mut line: ConsoleLine) -> ConsoleResult<bool> {
        let inner = &*self.inner;
        let mut guard = inner.state.lock();
        let ConsoleState {
            info,
            last_time_offset,
        } = &mut *guard;

        let info = match info {
            Some(info) if info.is_writable() => info,
            _ => {
                trace!("Console session not ready, dropping line");
                return Ok(false);
            }
        };

        let now = inner.clock.now();
        let start = info.start_time.unwrap_or(now);
        let elapsed = now - start;
        let seconds = elapsed
            .num_microseconds()
            .map(|us| us as f64 / 1_000_000.0)
            .unwrap_or_else(|| elapsed.num_milliseconds() as f64 / 1_000.0);

        line.time_offset = round_offset(seconds);
        if let Some(last) = *last_time_offset {
            if line.time_offset <= last {
                // keep equal timestamps from collapsing in the ordered set
                line.time_offset = bump_offset(last);
            }
        }
        *last_time_offset = Some(line.time_offset);

        let limit = inner.config.value_field_limit;
        let mut value = None;
        if line.spillable_text().len() <= inner.config.inline_text_limit() {
            let encoded = line.to_json_line()?;
            if encoded.len() <= limit {
                value = Some(encoded);
            }
        }

        let value = match value {
            Some(value) => value,
            None => {
                let reference = new_reference_key();
                let body = line.spill(reference.clone());
                let encoded = line.to_json_line()?;
                if encoded.len() > limit {
                    return Err(ConsoleError::RecordTooLarge(encoded.len()));
                }

                trace!(
                    reference = %reference,
                    bytes = body.len(),
                    "Spilling console text to hash"
                );
                inner
                    .storage
                    .set_range_in_hash(&info.hash_key, &[(reference, body)])?;
                encoded
            }
        };

        inner
            .storage
            .add_to_set(&info.set_key, &value, line.time_offset)?;
        Ok(true)
    }
}
