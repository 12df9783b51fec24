use std::{fs, thread::sleep, time::Duration};

use serial_test::serial;
use tempfile::tempdir;

// The global subscriber can only be installed once per process, so the
// whole sequence lives in a single test.
#[test]
#[serial]
fn writes_log_file_and_installs_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.txt");

    assert!(start_page::logging::init(true, Some(&path)));
    tracing::info!("dashboard log line");

    sleep(Duration::from_millis(100));

    assert!(path.exists(), "log file was not created");
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("dashboard log line"));

    let other = dir.path().join("other.txt");
    assert!(!start_page::logging::init(false, Some(&other)));
    sleep(Duration::from_millis(50));
    assert!(!other.exists(), "second init must not open a new file");
}
