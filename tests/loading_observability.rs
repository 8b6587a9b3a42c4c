use std::sync::{Arc, Mutex};

use mwdata::ingestion::{
    load, CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadSeverity,
    LoadStats, LoadOptions, LoadRequest, LoadSource,
};
use mwdata::LoadError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(LoadSource, LoadStats)>>,
    failures: Mutex<Vec<LoadSeverity>>,
    alerts: Mutex<Vec<LoadSeverity>>,
}

impl LoadObserver for RecordingObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        self.successes.lock().unwrap().push((ctx.source, stats));
    }

    fn on_failure(&self, _ctx: &LoadContext, severity: LoadSeverity, _error: &LoadError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &LoadContext, severity: LoadSeverity, _error: &LoadError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

#[test]
fn observer_receives_failure_and_alert_on_missing_path() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: LoadSeverity::Critical,
        ..Default::default()
    };

    let _ = load("tests/fixtures/does_not_exist.csv", false, &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![LoadSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![LoadSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_format_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        observer: Some(obs.clone()),
        lines: true,
        ..Default::default()
    };

    // An array document read as JSON lines -> Json error -> Error severity, below the threshold.
    let _ = load("tests/fixtures/people_array.json", false, &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![LoadSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_success_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let request = LoadRequest {
        path: "tests/fixtures/people.csv".to_string(),
        recurse_into_subfolders: false,
        options: LoadOptions {
            observer: Some(obs.clone()),
            ..Default::default()
        },
    };

    let table = request.run().unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(successes.len(), 1);
    assert!(matches!(successes[0].0, LoadSource::File(_)));
    assert_eq!(successes[0].1.rows, table.row_count());
    assert_eq!(successes[0].1.columns, 4);
}

#[test]
fn composite_and_file_observers_fan_out() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("load.log");
    let recording = Arc::new(RecordingObserver::default());
    let observers: Vec<Arc<dyn LoadObserver>> =
        vec![recording.clone(), Arc::new(FileObserver::new(&log))];
    let composite = CompositeObserver::new(observers);

    let opts = LoadOptions {
        observer: Some(Arc::new(composite)),
        ..Default::default()
    };
    load(dir.path().to_str().unwrap(), false, &opts).unwrap();
    let _ = load("tests/fixtures/nope", false, &opts).unwrap_err();

    let contents = std::fs::read_to_string(&log).unwrap();
    assert!(contents.contains(" ok source=Directory"));
    assert!(contents.contains(" ALERT source=Unresolved path=tests/fixtures/nope severity=Critical"));
    assert_eq!(recording.successes.lock().unwrap().len(), 1);
    assert_eq!(recording.alerts.lock().unwrap().len(), 1);
}
