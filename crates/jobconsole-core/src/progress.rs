//! Progress bars multiplexed onto the console stream.

use parking_lot::Mutex;

use crate::color::ConsoleColor;
use crate::console::JobConsole;
use crate::error::{ConsoleError, ConsoleResult};
use crate::line::ConsoleLine;

/// Round a progress value to one decimal place.
pub fn round_progress(value: f64) -> f64 {
    // adding zero turns -0.0 into 0.0
    (value * 10.0).round() / 10.0 + 0.0
}

/// Handle to a progress bar created by [`JobConsole::create_progress_bar`].
///
/// Every value change is written as a progress record carrying the bar id.
/// The name and color go out with the first record only; the dashboard keeps
/// them for later updates of the same id. Setting the value it already has
/// writes nothing.
#[derive(Debug)]
pub struct ProgressBar {
    console: JobConsole,
    id: String,
    name: String,
    color: Option<ConsoleColor>,
    /// Last value written, `None` before the first write
    value: Mutex<Option<f64>>,
}

impl ProgressBar {
    pub(crate) fn new(
        console: JobConsole,
        id: String,
        name: String,
        color: Option<ConsoleColor>,
    ) -> Self {
        Self {
            console,
            id,
            name,
            color,
            value: Mutex::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The last value written.
    pub fn value(&self) -> Option<f64> {
        *self.value.lock()
    }

    /// Update the bar. `value` is a percentage in `0..=100`, rounded to one
    /// decimal place.
    pub fn set_value(&self, value: f64) -> ConsoleResult<()> {
        let rounded = round_progress(value);
        if !(0.0..=100.0).contains(&rounded) {
            return Err(ConsoleError::InvalidProgressValue(value));
        }
        let value = rounded;

        let mut last = self.value.lock();
        if *last == Some(value) {
            return Ok(());
        }

        let mut line = ConsoleLine::progress(self.id.clone(), value);
        if last.is_none() {
            line = line
                .with_progress_name(self.name.clone())
                .with_color(self.color.map(|c| c.as_hex().to_string()));
        }

        // a dropped record leaves the bar unsent, so the name goes out later
        if self.console.write_record(line)? {
            *last = Some(value);
        }
        Ok(())
    }
}
