//! Several instance processes saving into one geometry file at once.
//!
//! The test binary re-runs itself: `writer_process` does nothing unless the
//! environment names a store file, in which case it saves a batch of records
//! the way an instance process would.

use simple_ai::geometry::{GeometryStore, JsonGeometryStore, WindowGeometry, WindowKey};
use std::process::{Command, Stdio};

const STORE_ENV: &str = "SIMPLEAI_TEST_STORE";
const WRITER_ENV: &str = "SIMPLEAI_TEST_WRITER";
const WRITERS: i32 = 3;
const RECORDS: i32 = 50;

fn record_key(writer: i32, index: i32) -> WindowKey {
    WindowKey::service(&format!("w{}-{}", writer, index))
}

#[test]
fn writer_process() {
    let (Ok(path), Ok(writer)) = (std::env::var(STORE_ENV), std::env::var(WRITER_ENV)) else {
        return;
    };
    let writer: i32 = writer.parse().unwrap();

    let store = JsonGeometryStore::new(path);
    for index in 0..RECORDS {
        store
            .save(&record_key(writer, index), WindowGeometry::new(index, writer, 800, 600))
            .unwrap();
    }
}

#[test]
fn concurrent_instances_keep_every_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("windows.json");
    let exe = std::env::current_exe().unwrap();

    let children: Vec<_> = (0..WRITERS)
        .map(|writer| {
            Command::new(&exe)
                .args(["writer_process", "--exact", "--test-threads=1"])
                .env(STORE_ENV, &path)
                .env(WRITER_ENV, writer.to_string())
                .stdout(Stdio::null())
                .spawn()
                .unwrap()
        })
        .collect();
    for mut child in children {
        assert!(child.wait().unwrap().success());
    }

    let store = JsonGeometryStore::new(&path);
    let mut missing = Vec::new();
    for writer in 0..WRITERS {
        for index in 0..RECORDS {
            let key = record_key(writer, index);
            if store.load(&key) != Some(WindowGeometry::new(index, writer, 800, 600)) {
                missing.push(key);
            }
        }
    }
    assert!(missing.is_empty(), "lost {} of {} records", missing.len(), WRITERS * RECORDS);
}
