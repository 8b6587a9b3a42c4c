//! Loading entrypoints and implementations.
//!
//! Most callers should use [`load`] (from [`loader`]) which:
//!
//! - reads single files by extension (or a forced [`FileFormat`]) via [`read_by_extension`]
//! - stages `gs://` URIs locally through an [`ObjectStoreClient`]
//! - aggregates `.txt` files of a directory into one column
//! - optionally reports success/failure/alerts to an [`LoadObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - [`shapefile`]
//! - `excel` (feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
#[cfg(feature = "gcs")]
pub mod gcs;
pub mod json;
pub mod loader;
pub mod observability;
pub mod remote;
pub mod shapefile;
pub mod text;
pub mod unified;

#[cfg(feature = "gcs")]
pub use gcs::GcsClient;
pub use loader::{load, load_text_directory, LoadRequest, TEXT_COLUMN};
pub use observability::{
    CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadSeverity, LoadStats,
    LoadSource, TracingObserver,
};
pub use remote::{fetch, FetchOutcome, ObjectStoreClient, RemoteUri, GEO_EXTENSIONS, REMOTE_SCHEME};
pub use unified::{read_by_extension, ExcelSheetSelection, FileFormat, LoadOptions};
