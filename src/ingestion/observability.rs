//! Load outcome hooks.
//!
//! [`super::load`] reports every attempt to the [`LoadObserver`] set in
//! [`super::LoadOptions::observer`]: one `on_success` or `on_failure` call, plus `on_alert` when
//! the failure's [`LoadSeverity`] reaches [`super::LoadOptions::alert_at_or_above`].

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::LoadError;

use super::unified::FileFormat;

/// How bad a failed load is. Ordered, so thresholds can be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadSeverity {
    /// The input was reached but could not be read (bad format, bad options, decode failure).
    Error,
    /// The input could not be reached at all (missing path, I/O, object store).
    Critical,
}

/// Which loader branch handled a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// A local file, read by the reader for its format.
    File(FileFormat),
    /// A remote URI, staged locally and read by the reader for its format.
    Remote(FileFormat),
    /// A local directory of `.txt` files.
    Directory { recursive: bool },
    /// The path did not resolve to anything.
    Unresolved,
}

/// The path passed to the loader and the branch that handled it.
#[derive(Debug, Clone)]
pub struct LoadContext {
    pub path: String,
    pub source: LoadSource,
}

impl fmt::Display for LoadContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source={:?} path={}", self.source, self.path)
    }
}

/// Shape of a successfully loaded table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub rows: usize,
    pub columns: usize,
}

/// Receives load outcomes. Every method has a no-op default.
pub trait LoadObserver: Send + Sync {
    fn on_success(&self, _ctx: &LoadContext, _stats: LoadStats) {}

    fn on_failure(&self, _ctx: &LoadContext, _severity: LoadSeverity, _error: &LoadError) {}

    /// Called after `on_failure` when the severity meets the alert threshold. Forwards to
    /// `on_failure` unless overridden.
    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Forwards every callback to each inner observer, in order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn LoadObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl LoadObserver for CompositeObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        self.observers.iter().for_each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.observers.iter().for_each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.observers.iter().for_each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Emits load outcomes as `tracing` events: `info` on success, `warn`/`error` on failure by
/// severity, `error` on alert.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        tracing::info!("Loaded {} rows={} columns={}", ctx, stats.rows, stats.columns);
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        match severity {
            LoadSeverity::Error => tracing::warn!("Load failed {}: {}", ctx, error),
            LoadSeverity::Critical => tracing::error!("Load failed {}: {}", ctx, error),
        }
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        tracing::error!("ALERT {:?} {}: {}", severity, ctx, error);
    }
}

/// Appends one line per load outcome to a log file.
///
/// Lines start with a unix timestamp. Failures to open or write the file are ignored.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, kind: &str, ctx: &LoadContext, detail: fmt::Arguments<'_>) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {kind} {ctx} {detail}", unix_ts());
        }
    }
}

impl LoadObserver for FileObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        self.append("ok", ctx, format_args!("rows={} columns={}", stats.rows, stats.columns));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.append("fail", ctx, format_args!("severity={severity:?} err={error}"));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.append("ALERT", ctx, format_args!("severity={severity:?} err={error}"));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_outranks_error() {
        assert!(LoadSeverity::Critical > LoadSeverity::Error);
    }

    #[test]
    fn context_renders_source_then_path() {
        let ctx = LoadContext {
            path: "gs://b/x.csv".to_string(),
            source: LoadSource::Remote(FileFormat::Csv),
        };
        assert_eq!(ctx.to_string(), "source=Remote(Csv) path=gs://b/x.csv");
    }
}
