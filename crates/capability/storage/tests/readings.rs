use domain::{Reading, SudType};
use seneye_storage::{InMemoryReadingStore, ReadingStore};
use std::sync::{Arc, Barrier};
use std::thread;

fn sample_reading(id: &str, seq: i64) -> Reading {
    let mut reading = Reading::default();
    reading.version = "1.0.0".to_string();
    reading.sud.id = id.to_string();
    reading.sud.name = format!("tank-{seq}");
    reading.sud.sud_type = SudType::Home;
    reading.sud.timestamp = 1_600_000_000 + seq;
    reading.sud.data.temperature = seq as f64;
    reading.sud.data.ph = seq as f64;
    reading.sud.data.nh3 = seq as f64;
    reading.sud.data.status.temperature = seq;
    reading
}

/// 所有字段都由同一个 seq 推导，任一字段不一致即为撕裂写入。
fn assert_consistent(reading: &Reading) {
    let seq = reading.sud.data.status.temperature;
    assert_eq!(reading.sud.name, format!("tank-{seq}"));
    assert_eq!(reading.sud.timestamp, 1_600_000_000 + seq);
    assert_eq!(reading.sud.data.temperature, seq as f64);
    assert_eq!(reading.sud.data.ph, seq as f64);
    assert_eq!(reading.sud.data.nh3, seq as f64);
}

#[test]
fn put_and_snapshot() {
    let store = InMemoryReadingStore::new();
    assert!(store.is_empty());

    store.put(sample_reading("sud-1", 1));
    store.put(sample_reading("sud-2", 2));

    let snapshot = store.snapshot();
    assert_eq!(store.len(), 2);
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot["sud-1"].sud.name, "tank-1");
    assert_eq!(snapshot["sud-2"].sud.name, "tank-2");
}

#[test]
fn last_put_wins_even_if_older() {
    let store = InMemoryReadingStore::new();
    store.put(sample_reading("sud-1", 10));
    store.put(sample_reading("sud-1", 3));

    let snapshot = store.snapshot();
    assert_eq!(store.len(), 1);
    assert_eq!(snapshot["sud-1"].sud.timestamp, 1_600_000_003);
}

#[test]
fn snapshot_is_independent_copy() {
    let store = InMemoryReadingStore::new();
    store.put(sample_reading("sud-1", 1));

    let mut snapshot = store.snapshot();
    snapshot.get_mut("sud-1").expect("entry").sud.name = "changed".to_string();
    snapshot.clear();
    store.put(sample_reading("sud-2", 2));

    let fresh = store.snapshot();
    assert_eq!(fresh.len(), 2);
    assert_eq!(fresh["sud-1"].sud.name, "tank-1");
}

#[test]
fn concurrent_puts_leave_one_submitted_reading() {
    const WRITERS: i64 = 16;
    let store = Arc::new(InMemoryReadingStore::new());
    let barrier = Arc::new(Barrier::new(WRITERS as usize));

    let handles: Vec<_> = (0..WRITERS)
        .map(|seq| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.put(sample_reading("shared", seq));
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer");
    }

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 1);
    let stored = &snapshot["shared"];
    assert_consistent(stored);
    let seq = stored.sud.data.status.temperature;
    assert!((0..WRITERS).contains(&seq));
    assert_eq!(stored, &sample_reading("shared", seq));
}

#[test]
fn snapshot_during_puts_is_never_torn() {
    let store = Arc::new(InMemoryReadingStore::new());
    store.put(sample_reading("shared", 0));

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for seq in 1..2_000 {
                store.put(sample_reading("shared", seq));
            }
        })
    };

    for _ in 0..2_000 {
        let snapshot = store.snapshot();
        assert_consistent(&snapshot["shared"]);
    }
    writer.join().expect("writer");
    assert_eq!(store.snapshot()["shared"].sud.data.status.temperature, 1_999);
}

#[test]
fn store_is_usable_as_trait_object() {
    let store: Arc<dyn ReadingStore> = Arc::new(InMemoryReadingStore::new());
    store.put(sample_reading("sud-9", 9));
    assert_eq!(store.len(), 1);
    assert!(!store.is_empty());
}
