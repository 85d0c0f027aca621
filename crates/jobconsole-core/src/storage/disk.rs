//! Persistent storage using redb.
//!
//! One database file holds every console:
//! - ordered set members and a score-ordered index over them
//! - hash fields holding spilled line bodies
//! - saved session descriptors, so a job can resume its console

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use redb::{Database, ReadableTable, TableDefinition};

use super::{ConsoleSource, ConsoleStorage};
use crate::error::ConsoleResult;
use crate::session::SessionDescriptor;

// Table definitions
/// (set key, member) -> sortable score
const SET_MEMBERS_TABLE: TableDefinition<(&str, &str), u64> = TableDefinition::new("set_members");
/// (set key, sortable score, member) -> ()
const SET_INDEX_TABLE: TableDefinition<(&str, u64, &str), ()> = TableDefinition::new("set_index");
/// (hash key, field) -> value
const HASH_FIELDS_TABLE: TableDefinition<(&str, &str), &str> = TableDefinition::new("hash_fields");
/// job id -> JSON-encoded SessionDescriptor
const SESSIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// Map a score onto a u64 whose unsigned order matches the float order.
fn score_to_key(score: f64) -> u64 {
    let bits = score.to_bits();
    if bits >> 63 == 1 {
        !bits
    } else {
        bits | (1 << 63)
    }
}

fn key_to_score(key: u64) -> f64 {
    if key >> 63 == 1 {
        f64::from_bits(key & !(1 << 63))
    } else {
        f64::from_bits(!key)
    }
}

/// Console storage backed by a redb database file.
#[derive(Clone)]
pub struct RedbStorage {
    db: Arc<RwLock<Database>>,
}

impl RedbStorage {
    /// Open (or create) the database at the given path.
    ///
    /// Creates the parent directory and all tables if needed.
    pub fn new(path: impl AsRef<Path>) -> ConsoleResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SET_MEMBERS_TABLE)?;
            let _ = write_txn.open_table(SET_INDEX_TABLE)?;
            let _ = write_txn.open_table(HASH_FIELDS_TABLE)?;
            let _ = write_txn.open_table(SESSIONS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Session Operations
    // ═══════════════════════════════════════════════════════════════════════

    /// Save a session descriptor under a job id, overwriting any previous one.
    pub fn save_session(&self, job_id: &str, info: &SessionDescriptor) -> ConsoleResult<()> {
        let db = self.db.read();
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSIONS_TABLE)?;
            let data = serde_json::to_vec(info)?;
            table.insert(job_id, data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Load the descriptor saved for a job id.
    ///
    /// Returns `None` if the job has never been saved.
    pub fn load_session(&self, job_id: &str) -> ConsoleResult<Option<SessionDescriptor>> {
        let db = self.db.read();
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(SESSIONS_TABLE)?;

        match table.get(job_id)? {
            Some(v) => {
                let info: SessionDescriptor = serde_json::from_slice(v.value())?;
                Ok(Some(info))
            }
            None => Ok(None),
        }
    }

    /// All saved job ids, in key order.
    pub fn list_sessions(&self) -> ConsoleResult<Vec<String>> {
        let db = self.db.read();
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(SESSIONS_TABLE)?;

        let mut jobs = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            jobs.push(key.value().to_string());
        }
        Ok(jobs)
    }
}

impl ConsoleStorage for RedbStorage {
    fn add_to_set(&self, key: &str, value: &str, score: f64) -> ConsoleResult<()> {
        let encoded = score_to_key(score);
        let db = self.db.read();
        let write_txn = db.begin_write()?;
        {
            let mut members = write_txn.open_table(SET_MEMBERS_TABLE)?;
            let mut index = write_txn.open_table(SET_INDEX_TABLE)?;

            let previous = members.insert((key, value), encoded)?.map(|old| old.value());
            if let Some(old) = previous {
                index.remove((key, old, value))?;
            }
            index.insert((key, encoded, value), ())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn set_range_in_hash(&self, key: &str, fields: &[(String, String)]) -> ConsoleResult<()> {
        let db = self.db.read();
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(HASH_FIELDS_TABLE)?;
            for (field, value) in fields {
                table.insert((key, field.as_str()), value.as_str())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}

impl ConsoleSource for RedbStorage {
    fn range_from_set(&self, key: &str) -> ConsoleResult<Vec<(String, f64)>> {
        let db = self.db.read();
        let read_txn = db.begin_read()?;
        let index = read_txn.open_table(SET_INDEX_TABLE)?;

        let mut members = Vec::new();
        for entry in index.range((key, 0u64, "")..)? {
            let (k, _) = entry?;
            let (set, encoded, member) = k.value();
            if set != key {
                break;
            }
            members.push((member.to_string(), key_to_score(encoded)));
        }
        Ok(members)
    }

    fn get_value_from_hash(&self, key: &str, field: &str) -> ConsoleResult<Option<String>> {
        let db = self.db.read();
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(HASH_FIELDS_TABLE)?;

        Ok(table.get((key, field))?.map(|v| v.value().to_string()))
    }
}
