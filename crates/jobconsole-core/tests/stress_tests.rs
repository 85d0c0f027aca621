//! Stress tests for concurrent writers
//!
//! These tests verify a single JobConsole shared by many threads produces
//! exactly one intact record per call with pairwise distinct scores.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use jobconsole_core::{
    read_console, ConsoleLine, ConsoleSource, JobConsole, MemoryStorage, RedbStorage,
    SessionDescriptor,
};
use tempfile::TempDir;

const THREADS: usize = 8;
const WRITES_PER_THREAD: usize = 250;
/// Every redb write commits a transaction, so keep that run smaller
const REDB_WRITES_PER_THREAD: usize = 40;

/// Spawn THREADS writers, each issuing `writes` lines. Every fifth line is
/// long enough to be spilled.
fn hammer(console: &JobConsole, writes: usize) {
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let console = console.clone();
            thread::spawn(move || {
                for i in 0..writes {
                    let message = if i % 5 == 0 {
                        format!("thread {} line {} {}", t, i, "z".repeat(300))
                    } else {
                        format!("thread {} line {}", t, i)
                    };
                    console.write_line(&message, None).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

fn assert_stream_intact(source: &dyn ConsoleSource, info: &SessionDescriptor, writes: usize) {
    let members = source.range_from_set(&info.set_key).unwrap();
    assert_eq!(members.len(), THREADS * writes);

    let scores: HashSet<u64> = members.iter().map(|(_, s)| s.to_bits()).collect();
    assert_eq!(scores.len(), members.len(), "scores must be pairwise distinct");

    for (value, _) in &members {
        assert!(value.len() <= 256);
        ConsoleLine::from_json_line(value).expect("record must decode");
    }

    // every message arrives exactly once, and each thread's lines keep their order
    let lines = read_console(source, info).unwrap();
    let mut seen = HashSet::new();
    let mut next_per_thread = vec![0usize; THREADS];
    for line in &lines {
        assert!(seen.insert(line.message.clone()), "duplicate line");

        let mut parts = line.message.trim_start_matches("[JobAgent]").split(' ');
        assert_eq!(parts.next(), Some("thread"));
        let t: usize = parts.next().unwrap().parse().unwrap();
        assert_eq!(parts.next(), Some("line"));
        let i: usize = parts.next().unwrap().parse().unwrap();

        assert_eq!(i, next_per_thread[t]);
        next_per_thread[t] += 1;
    }
    assert!(next_per_thread.iter().all(|&n| n == writes));
}

#[test]
fn test_concurrent_writers_memory() {
    let storage = Arc::new(MemoryStorage::new());
    let console = JobConsole::new(storage.clone());
    console.init(SessionDescriptor::for_job("stress"));
    let info = console.descriptor().unwrap();

    let start = Instant::now();
    hammer(&console, WRITES_PER_THREAD);
    let duration = start.elapsed();

    assert_stream_intact(&*storage, &info, WRITES_PER_THREAD);
    assert_eq!(
        storage.hash_len(&info.hash_key),
        THREADS * WRITES_PER_THREAD / 5
    );

    println!(
        "{} concurrent writes (memory) in {:?}",
        THREADS * WRITES_PER_THREAD,
        duration
    );
}

#[test]
fn test_concurrent_writers_redb() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Arc::new(RedbStorage::new(temp_dir.path().join("stress.redb")).unwrap());
    let console = JobConsole::new(storage.clone());
    console.init(SessionDescriptor::for_job("stress"));
    let info = console.descriptor().unwrap();

    let start = Instant::now();
    hammer(&console, REDB_WRITES_PER_THREAD);
    let duration = start.elapsed();

    assert_stream_intact(&*storage, &info, REDB_WRITES_PER_THREAD);

    println!(
        "{} concurrent writes (redb) in {:?}",
        THREADS * REDB_WRITES_PER_THREAD,
        duration
    );
}

#[test]
fn test_concurrent_progress_bar_ids_are_unique() {
    let storage = Arc::new(MemoryStorage::new());
    let console = JobConsole::new(storage.clone());
    console.init(SessionDescriptor::for_job("bars"));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let console = console.clone();
            thread::spawn(move || {
                (0..20)
                    .map(|i| {
                        let bar = console
                            .create_progress_bar(&format!("bar {}-{}", t, i), 0.0, None)
                            .unwrap();
                        bar.set_value(100.0).unwrap();
                        bar.id().to_string()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "progress bar id reused");
        }
    }

    assert_eq!(ids.len(), THREADS * 20);
    assert_eq!(
        console.descriptor().unwrap().progress_bar_id as usize,
        THREADS * 20
    );

    let info = console.descriptor().unwrap();
    assert_eq!(storage.set_len(&info.set_key), THREADS * 20 * 2);
}
