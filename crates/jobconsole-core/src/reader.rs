//! Read a console back out of the store.
//!
//! Records are returned in score order with hash references resolved, so
//! callers see the original text of spilled lines and progress names.

use tracing::warn;

use crate::error::{ConsoleError, ConsoleResult};
use crate::line::ConsoleLine;
use crate::session::SessionDescriptor;
use crate::storage::ConsoleSource;

/// Replace a reference record's key with the text stored in the hash.
pub fn resolve_line(
    source: &dyn ConsoleSource,
    info: &SessionDescriptor,
    mut line: ConsoleLine,
) -> ConsoleResult<ConsoleLine> {
    let Some(reference) = line.reference().map(str::to_string) else {
        return Ok(line);
    };

    let text = source
        .get_value_from_hash(&info.hash_key, &reference)?
        .ok_or(ConsoleError::MissingReference(reference))?;

    line.spill(text);
    line.is_reference = false;
    Ok(line)
}

/// All lines of a session, oldest first.
///
/// Members that do not decode as console records are skipped.
pub fn read_console(
    source: &dyn ConsoleSource,
    info: &SessionDescriptor,
) -> ConsoleResult<Vec<ConsoleLine>> {
    let mut lines = Vec::new();

    for (value, score) in source.range_from_set(&info.set_key)? {
        let line = match ConsoleLine::from_json_line(&value) {
            Ok(line) => line,
            Err(e) => {
                warn!(score, error = %e, "Skipping undecodable console record");
                continue;
            }
        };
        lines.push(resolve_line(source, info, line)?);
    }

    Ok(lines)
}
