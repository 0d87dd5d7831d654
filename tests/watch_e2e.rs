use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tailwatch::{
    MatchRecord, RecordSink, SessionId, ValidationError, WatchConfig, WatchError, WatchService,
};

fn fast_service() -> WatchService {
    WatchService::with_config(WatchConfig {
        poll_interval: Duration::from_millis(25),
        ..WatchConfig::default()
    })
}

fn touch(path: &Path) {
    std::fs::write(path, "").unwrap();
}

fn append(path: &Path, bytes: &[u8]) {
    let mut file = std::fs::OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(bytes).unwrap();
}

fn sink_lines(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => contents.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}

// Polls until `predicate` holds or the deadline passes; returns whether it held.
fn wait_until(timeout: Duration, predicate: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if predicate() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    predicate()
}

#[test]
fn start_append_match_stop_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("a.log");
    let central = dir.path().join("central.log");
    touch(&source);

    let service = fast_service();
    let id = service.start(&[&source], &central, "ERROR").unwrap();
    assert_eq!(id, SessionId::from_raw(1));

    append(&source, b"line ERROR here\n");

    assert!(wait_until(Duration::from_secs(4), || !sink_lines(&central).is_empty()));
    let lines = sink_lines(&central);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(source.to_str().unwrap()));
    assert!(lines[0].contains("ERROR"));

    service.stop(id).unwrap();

    // Appends after stop must never reach the sink.
    append(&source, b"another ERROR line\n");
    std::thread::sleep(Duration::from_millis(200));
    assert_eq!(sink_lines(&central).len(), 1);
}

#[test]
fn record_line_uses_the_matched_window() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("a.log");
    let central = dir.path().join("central.log");
    touch(&source);

    let service = fast_service();
    let id = service.start(&[&source], &central, "ERROR").unwrap();

    append(&source, b"line ERROR here\n");
    assert!(wait_until(Duration::from_secs(4), || !sink_lines(&central).is_empty()));
    service.stop(id).unwrap();

    let expected = format!(
        "{} - keyword 'ERROR' found in log 'line ERROR here",
        source.display()
    );
    assert!(sink_lines(&central)[0].starts_with(&expected));
}

#[test]
fn content_before_start_produces_no_records() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("a.log");
    let central = dir.path().join("central.log");
    std::fs::write(&source, "old ERROR content\n").unwrap();

    let service = fast_service();
    let id = service.start(&[&source], &central, "ERROR").unwrap();

    std::thread::sleep(Duration::from_millis(200));
    assert!(sink_lines(&central).is_empty());

    service.stop(id).unwrap();
}

#[test]
fn appends_without_keyword_produce_no_records() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("a.log");
    let central = dir.path().join("central.log");
    touch(&source);

    let service = fast_service();
    let id = service.start(&[&source], &central, "ERROR").unwrap();

    append(&source, b"all quiet\n");
    append(&source, b"still quiet\n");
    std::thread::sleep(Duration::from_millis(200));
    assert!(sink_lines(&central).is_empty());

    service.stop(id).unwrap();
}

#[test]
fn multiple_sources_are_scanned_in_one_session() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.log");
    let b = dir.path().join("b.log");
    let central = dir.path().join("central.log");
    touch(&a);
    touch(&b);

    let service = fast_service();
    let id = service.start(&[&a, &b], &central, "WARN").unwrap();

    append(&a, b"a WARN\n");
    append(&b, b"b WARN\n");

    assert!(wait_until(Duration::from_secs(4), || sink_lines(&central).len() >= 2));
    let lines = sink_lines(&central).join("\n");
    assert!(lines.contains(a.to_str().unwrap()));
    assert!(lines.contains(b.to_str().unwrap()));

    service.stop(id).unwrap();
}

#[test]
fn ids_are_monotonic_and_never_reused() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("a.log");
    touch(&source);

    let service = fast_service();
    let first = service
        .start(&[&source], dir.path().join("s1.log"), "k")
        .unwrap();
    let second = service
        .start(&[&source], dir.path().join("s2.log"), "k")
        .unwrap();
    assert!(second > first);

    service.stop(first).unwrap();
    service.stop(second).unwrap();

    // Ids from stopped sessions stay burned.
    let third = service
        .start(&[&source], dir.path().join("s3.log"), "k")
        .unwrap();
    assert!(third > second);
    service.stop(third).unwrap();
}

#[test]
fn stop_succeeds_at_most_once_per_id() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("a.log");
    touch(&source);

    let service = fast_service();
    let id = service
        .start(&[&source], dir.path().join("central.log"), "k")
        .unwrap();

    service.stop(id).unwrap();
    let err = service.stop(id).unwrap_err();
    assert!(matches!(err, WatchError::SessionNotFound { .. }));
}

#[test]
fn invalid_arguments_leave_the_registry_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let service = fast_service();

    let empty: &[PathBuf] = &[];
    let err = service
        .start(empty, dir.path().join("central.log"), "k")
        .unwrap_err();
    assert!(matches!(
        err,
        WatchError::Validation(ValidationError::NoSources)
    ));

    let err = service
        .start(&[dir.path().join("a.log")], dir.path().join("central.log"), "")
        .unwrap_err();
    assert!(matches!(
        err,
        WatchError::Validation(ValidationError::EmptyKeyword)
    ));

    assert_eq!(service.session_count(), 0);
}

#[test]
fn sessions_run_independently() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.log");
    let b = dir.path().join("b.log");
    let sink_a = dir.path().join("sink_a.log");
    let sink_b = dir.path().join("sink_b.log");
    touch(&a);
    touch(&b);

    let service = fast_service();
    let id_a = service.start(&[&a], &sink_a, "ERROR").unwrap();
    let id_b = service.start(&[&b], &sink_b, "ERROR").unwrap();
    assert_ne!(id_a, id_b);
    assert_eq!(service.session_ids(), vec![id_a, id_b]);

    // Stop A; B must keep matching as if A never existed.
    service.stop(id_a).unwrap();
    assert!(service.is_running(id_b));

    append(&a, b"a ERROR\n");
    append(&b, b"b ERROR\n");

    assert!(wait_until(Duration::from_secs(4), || !sink_lines(&sink_b).is_empty()));
    assert!(sink_lines(&sink_a).is_empty());

    service.stop(id_b).unwrap();
}

#[test]
fn records_keep_flowing_after_one_source_disappears() {
    let dir = tempfile::tempdir().unwrap();
    let doomed = dir.path().join("doomed.log");
    let healthy = dir.path().join("healthy.log");
    let central = dir.path().join("central.log");
    touch(&doomed);
    touch(&healthy);

    let service = fast_service();
    let id = service.start(&[&doomed, &healthy], &central, "ERROR").unwrap();

    // Unlinking the first source makes its metadata polls keep answering from
    // the open handle; either way the session must survive and the healthy
    // source must still produce records.
    std::fs::remove_file(&doomed).unwrap();
    append(&healthy, b"healthy ERROR\n");

    assert!(wait_until(Duration::from_secs(4), || !sink_lines(&central).is_empty()));
    assert!(sink_lines(&central)[0].contains(healthy.to_str().unwrap()));

    service.stop(id).unwrap();
}

struct SharedSink {
    records: Arc<Mutex<Vec<MatchRecord>>>,
}

impl RecordSink for SharedSink {
    fn append(&mut self, record: &MatchRecord) -> std::io::Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[test]
fn caller_supplied_sink_receives_records() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("a.log");
    touch(&source);

    let records = Arc::new(Mutex::new(Vec::new()));
    let sink = Box::new(SharedSink {
        records: Arc::clone(&records),
    });

    let service = fast_service();
    let id = service.start_with_sink(&[&source], sink, "ERROR").unwrap();

    append(&source, b"shared ERROR\n");
    assert!(wait_until(Duration::from_secs(4), || {
        !records.lock().unwrap().is_empty()
    }));

    let got = records.lock().unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].keyword, "ERROR");
    assert_eq!(got[0].source_path, source);
    assert_eq!(got[0].matched_window, b"shared ERROR\n");
    drop(got);

    service.stop(id).unwrap();
}
