//! Job Console Core Library
//!
//! Streams a background job's log lines and progress updates into a
//! key-ordered store for a monitoring dashboard.
//!
//! ## Overview
//!
//! Each job session owns two store keys: an ordered set of compact JSON
//! records scored by their time offset, and a hash that receives any line
//! body too large to fit the 256-byte record limit. The [`JobConsole`]
//! writer keeps offsets strictly increasing across every thread writing to
//! the same session and never truncates text.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use jobconsole_core::{ConsoleColor, JobConsole, MemoryStorage, SessionDescriptor};
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let console = JobConsole::new(storage.clone());
//! console.init(SessionDescriptor::for_job("42"));
//!
//! console.write_line("Fetching sources", None)?;
//! let bar = console.create_progress_bar("download", 0.0, Some(ConsoleColor::Green))?;
//! bar.set_value(50.0)?;
//! bar.set_value(100.0)?;
//!
//! for line in jobconsole_core::read_console(&*storage, &console.descriptor().unwrap())? {
//!     println!("+{:.3}s {}", line.time_offset, line.message);
//! }
//! ```

pub mod clock;
pub mod color;
pub mod config;
pub mod console;
pub mod error;
pub mod line;
pub mod progress;
pub mod reader;
pub mod session;
pub mod storage;

// Re-exports
pub use clock::{Clock, MockClock, SystemClock};
pub use color::ConsoleColor;
pub use config::{ConsoleConfig, AGENT_MARKER};
pub use console::JobConsole;
pub use error::{ConsoleError, ConsoleResult};
pub use line::ConsoleLine;
pub use progress::ProgressBar;
pub use reader::{read_console, resolve_line};
pub use session::SessionDescriptor;
pub use storage::{ConsoleSource, ConsoleStorage, MemoryStorage, RedbStorage};
