//! Remote object staging.
//!
//! Remote files are never read in place: matching objects are listed, downloaded into a local
//! staging directory under their base name, and the local copy is handed to a reader.
//!
//! The object store is an explicit dependency ([`ObjectStoreClient`]) so callers choose the
//! client (e.g. `GcsClient` behind the `gcs` feature) and tests can substitute a fake.

use std::path::{Path, PathBuf};

use crate::error::{LoadError, LoadResult};

use super::unified::LoadOptions;

/// Scheme marker identifying a Google Cloud Storage path.
pub const REMOTE_SCHEME: &str = "gs://";

/// Files that make up a shapefile; all three are staged before a remote shapefile is read.
pub const GEO_EXTENSIONS: [&str; 3] = [".dbf", ".shp", ".shx"];

/// Returns `true` if `path` contains the remote scheme marker.
pub fn is_remote_uri(path: &str) -> bool {
    path.contains(REMOTE_SCHEME)
}

/// Minimal object-store surface needed for staging.
pub trait ObjectStoreClient: Send + Sync {
    /// List object names in `bucket` that start with `prefix`, returning at most `max_results`.
    fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        max_results: Option<usize>,
    ) -> LoadResult<Vec<String>>;

    /// Download the full contents of `object` to `dest`, replacing any existing file.
    fn download_to_file(&self, bucket: &str, object: &str, dest: &Path) -> LoadResult<()>;
}

/// A remote path split into bucket and object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUri {
    /// Bucket name (text between the scheme marker and the next `/`).
    pub bucket: String,
    /// Object key within the bucket.
    pub key: String,
}

impl RemoteUri {
    /// Parse `gs://bucket/path/to/object`. The scheme marker may appear anywhere in `uri`.
    pub fn parse(uri: &str) -> LoadResult<Self> {
        let start = uri.find(REMOTE_SCHEME).ok_or_else(|| LoadError::InvalidRemoteUri {
            uri: uri.to_string(),
            message: format!("missing '{REMOTE_SCHEME}' scheme"),
        })?;
        let rest = &uri[start + REMOTE_SCHEME.len()..];
        let (bucket, key) = rest.split_once('/').ok_or_else(|| LoadError::InvalidRemoteUri {
            uri: uri.to_string(),
            message: "expected gs://bucket/object".to_string(),
        })?;
        if bucket.is_empty() || key.is_empty() {
            return Err(LoadError::InvalidRemoteUri {
                uri: uri.to_string(),
                message: "bucket and object name must be non-empty".to_string(),
            });
        }
        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    /// Final path segment of the key (`region.shp`).
    pub fn file_name(&self) -> &str {
        base_name(&self.key)
    }

    /// File name without its extension (`region`).
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        }
    }

    /// Listing prefix: every key segment before the file name, with a trailing `/`
    /// (`data/` for `gs://bucket/data/region.shp`; empty at the bucket root).
    pub fn prefix(&self) -> &str {
        match self.key.rfind('/') {
            Some(idx) => &self.key[..=idx],
            None => "",
        }
    }
}

/// What one [`fetch`] call put on local disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Local paths of every downloaded object, in listing order.
    pub staged: Vec<PathBuf>,
    /// Local path of the last downloaded object whose name contains `.shp`.
    pub shapefile: Option<PathBuf>,
}

/// Stage every object under `bucket`/`prefix` whose base name is contained in
/// `target_filename`.
///
/// Objects are written to the staging directory (`options.staging_dir`, defaulting to the
/// system temp dir) under their base name, overwriting existing files. Empty base names
/// (folder markers) are skipped. Listing is capped by `options.max_results`.
///
/// Fails with [`LoadError::ObjectNotFound`] when nothing matched. Any list or download error
/// aborts the remaining downloads and is returned as-is.
pub fn fetch(
    store: &dyn ObjectStoreClient,
    target_filename: &str,
    bucket: &str,
    prefix: &str,
    options: &LoadOptions,
) -> LoadResult<FetchOutcome> {
    let staging_dir = options.staging_dir();
    let objects = store.list_objects(bucket, prefix, options.max_results)?;
    tracing::debug!(
        "Listed {} objects in gs://{}/{} while looking for {}",
        objects.len(),
        bucket,
        prefix,
        target_filename
    );

    let mut outcome = FetchOutcome::default();
    for object in &objects {
        let name = base_name(object);
        if name.is_empty() || !target_filename.contains(name) {
            continue;
        }

        let dest = staging_dir.join(name);
        store.download_to_file(bucket, object, &dest)?;
        tracing::debug!("Staged gs://{}/{} at {}", bucket, object, dest.display());

        if name.contains(".shp") {
            outcome.shapefile = Some(dest.clone());
        }
        outcome.staged.push(dest);
    }

    if outcome.staged.is_empty() {
        return Err(LoadError::ObjectNotFound {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
            target: target_filename.to_string(),
        });
    }
    Ok(outcome)
}

/// Stage the `.dbf`, `.shp` and `.shx` files of a remote shapefile and return the local `.shp`.
///
/// Only the staged file named exactly `<stem>.shp` is returned; other `.shp` objects that matched
/// the substring rule are downloaded but never read.
pub fn stage_remote_shapefile(
    uri: &RemoteUri,
    store: &dyn ObjectStoreClient,
    options: &LoadOptions,
) -> LoadResult<PathBuf> {
    let mut shapefile = None;
    for ext in GEO_EXTENSIONS {
        let target = format!("{}{ext}", uri.stem());
        let outcome = fetch(store, &target, &uri.bucket, uri.prefix(), options)?;
        if ext == ".shp" {
            shapefile = exact_match(&outcome, &target);
        }
    }

    shapefile.ok_or_else(|| LoadError::ObjectNotFound {
        bucket: uri.bucket.clone(),
        prefix: uri.prefix().to_string(),
        target: format!("{}.shp", uri.stem()),
    })
}

/// Stage a single remote file and return its local path.
pub fn stage_remote_file(
    uri: &RemoteUri,
    store: &dyn ObjectStoreClient,
    options: &LoadOptions,
) -> LoadResult<PathBuf> {
    let target = uri.file_name();
    let outcome = fetch(store, target, &uri.bucket, uri.prefix(), options)?;
    exact_match(&outcome, target).ok_or_else(|| LoadError::ObjectNotFound {
        bucket: uri.bucket.clone(),
        prefix: uri.prefix().to_string(),
        target: target.to_string(),
    })
}

// Substring matches (e.g. `a.csv` for `data.csv`) are staged too; only the exact name is read.
fn exact_match(outcome: &FetchOutcome, target: &str) -> Option<PathBuf> {
    outcome
        .staged
        .iter()
        .find(|p| p.file_name().and_then(|n| n.to_str()) == Some(target))
        .cloned()
}

fn base_name(object: &str) -> &str {
    object.rsplit('/').next().unwrap_or(object)
}
