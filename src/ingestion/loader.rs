//! Path-level entry point.
//!
//! [`load`] accepts a local file, a remote URI or a local directory:
//!
//! - files and `gs://` URIs go to [`super::read_by_extension`]
//! - directories are scanned for `.txt` files, each becoming one row of a single column
//! - anything else is [`LoadError::PathNotFound`]

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{LoadError, LoadResult};
use crate::types::{Table, TableBuilder, Value};

use super::observability::{LoadContext, LoadSeverity, LoadStats, LoadSource};
use super::remote::is_remote_uri;
use super::text::read_text_file;
use super::unified::{read_by_extension, FileFormat, LoadOptions};

/// Column name used for directory text aggregation.
pub const TEXT_COLUMN: &str = "0";

/// Load a file, remote URI or directory into a [`Table`].
///
/// - An existing local file, or any path containing `gs://`, is read by extension
///   (see [`read_by_extension`]).
/// - An existing directory yields one row per `.txt` file in column [`TEXT_COLUMN`], in the
///   order the files are discovered. With `recurse_into_subfolders`, nested directories are
///   walked too.
/// - Anything else fails with [`LoadError::PathNotFound`].
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column counts
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ## CSV (auto-detect by extension)
///
/// ```no_run
/// use mwdata::ingestion::{load, LoadOptions};
///
/// # fn main() -> Result<(), mwdata::LoadError> {
/// let table = load("people.csv", false, &LoadOptions::default())?;
/// println!("rows={} columns={:?}", table.row_count(), table.column_names());
/// # Ok(())
/// # }
/// ```
///
/// ## Directory of text files, including subfolders, in Latin-1
///
/// ```no_run
/// use mwdata::ingestion::{load, LoadOptions};
///
/// # fn main() -> Result<(), mwdata::LoadError> {
/// let opts = LoadOptions {
///     encoding: Some("latin1".to_string()),
///     ..Default::default()
/// };
/// let table = load("corpus/", true, &opts)?;
/// println!("documents={}", table.row_count());
/// # Ok(())
/// # }
/// ```
///
/// ## Observability (tracing events + alert threshold)
///
/// ```no_run
/// use std::sync::Arc;
///
/// use mwdata::ingestion::{load, LoadSeverity, LoadOptions, TracingObserver};
///
/// let opts = LoadOptions {
///     observer: Some(Arc::new(TracingObserver::default())),
///     alert_at_or_above: LoadSeverity::Critical,
///     ..Default::default()
/// };
///
/// // Missing paths are treated as Critical and will trigger `on_alert` at this threshold.
/// let _err = load("does_not_exist", false, &opts).unwrap_err();
/// ```
pub fn load(
    path: impl AsRef<str>,
    recurse_into_subfolders: bool,
    options: &LoadOptions,
) -> LoadResult<Table> {
    let path = path.as_ref();
    let local = Path::new(path);

    let (source, result) = if is_remote_uri(path) {
        let format = options.format.unwrap_or_else(|| FileFormat::from_path(path));
        (LoadSource::Remote(format), read_by_extension(path, options))
    } else if local.is_file() {
        let format = options.format.unwrap_or_else(|| FileFormat::from_path(path));
        (LoadSource::File(format), read_by_extension(path, options))
    } else if local.is_dir() {
        let source = LoadSource::Directory {
            recursive: recurse_into_subfolders,
        };
        (source, load_text_directory(local, recurse_into_subfolders, options))
    } else {
        let err = LoadError::PathNotFound {
            path: path.to_string(),
        };
        (LoadSource::Unresolved, Err(err))
    };
    tracing::debug!("Loaded {} via {:?}", path, source);

    if let Some(obs) = options.observer.as_ref() {
        let ctx = LoadContext {
            path: path.to_string(),
            source,
        };
        match &result {
            Ok(table) => obs.on_success(
                &ctx,
                LoadStats {
                    rows: table.row_count(),
                    columns: table.column_count(),
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

/// Read every `.txt` file in `dir` (optionally recursing) into a single-column [`Table`].
pub fn load_text_directory(
    dir: impl AsRef<Path>,
    recurse_into_subfolders: bool,
    options: &LoadOptions,
) -> LoadResult<Table> {
    let files = if recurse_into_subfolders {
        walk_text_files(dir.as_ref())?
    } else {
        list_text_files(dir.as_ref())?
    };
    tracing::debug!("Found {} text files under {}", files.len(), dir.as_ref().display());

    let mut builder = TableBuilder::with_columns(vec![TEXT_COLUMN.to_string()]);
    for file in files {
        let text = read_text_file(&file, options.encoding.as_deref())?;
        builder.push_row(vec![Value::Utf8(text)]);
    }
    Ok(builder.finish())
}

/// Immediate `.txt` files of `dir`, in directory listing order.
fn list_text_files(dir: &Path) -> LoadResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if is_text_file_name(&path) && path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// `.txt` files anywhere below `dir`, in walk order.
fn walk_text_files(dir: &Path) -> LoadResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry.map_err(walk_error)?;
        let path = entry.path();
        if is_text_file_name(path) && path.is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_text_file_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".txt"))
}

fn walk_error(err: walkdir::Error) -> LoadError {
    let message = err.to_string();
    match err.into_io_error() {
        Some(io) => LoadError::Io(io),
        None => LoadError::Io(std::io::Error::other(message)),
    }
}

fn severity_for_error(e: &LoadError) -> LoadSeverity {
    match e {
        LoadError::PathNotFound { .. }
        | LoadError::Io(_)
        | LoadError::ObjectNotFound { .. }
        | LoadError::RemoteStoreNotConfigured { .. } => LoadSeverity::Critical,
        #[cfg(feature = "gcs")]
        LoadError::ObjectStore(_) => LoadSeverity::Critical,
        LoadError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => LoadSeverity::Critical,
            _ => LoadSeverity::Error,
        },
        LoadError::Shapefile(err) => {
            // Missing sidecar files surface as wrapped io errors.
            if error_chain_contains_io(err) {
                LoadSeverity::Critical
            } else {
                LoadSeverity::Error
            }
        }
        LoadError::Json(_)
        | LoadError::Geometry { .. }
        | LoadError::SchemaMismatch { .. }
        | LoadError::Decode { .. }
        | LoadError::UnknownEncoding { .. }
        | LoadError::InvalidOption { .. }
        | LoadError::InvalidRemoteUri { .. } => LoadSeverity::Error,
        #[cfg(feature = "excel")]
        LoadError::Excel(_) => LoadSeverity::Error,
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

/// Convenience helper for callers that want an owned request object.
///
/// This can be useful if you want to enqueue load work in a job system.
#[derive(Clone)]
pub struct LoadRequest {
    /// File, directory or remote URI to load.
    pub path: String,
    /// Walk nested directories when `path` is a directory.
    pub recurse_into_subfolders: bool,
    /// Options controlling the load.
    pub options: LoadOptions,
}

impl fmt::Debug for LoadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadRequest")
            .field("path", &self.path)
            .field("recurse_into_subfolders", &self.recurse_into_subfolders)
            .field("options", &self.options)
            .finish()
    }
}

impl LoadRequest {
    /// Execute the request by calling [`load`].
    pub fn run(&self) -> LoadResult<Table> {
        load(&self.path, self.recurse_into_subfolders, &self.options)
    }
}
