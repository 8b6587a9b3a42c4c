use thiserror::Error;

/// Convenience result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Error type returned by loading functions.
///
/// Reader and object-store errors are carried through unchanged (via `#[from]`); the loader
/// itself only raises [`LoadError::PathNotFound`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The path is neither an existing file, an existing directory, nor a remote URI.
    #[error("{path} not a valid path")]
    PathNotFound { path: String },

    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV (or delimited text) reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON reader error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "excel")]
    /// Excel reader error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// Shapefile reader error (`.shp`/`.dbf`/`.shx`).
    #[error("shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    /// A shape could not be converted into a geometry value.
    #[error("geometry error: {message}")]
    Geometry { message: String },

    #[cfg(feature = "gcs")]
    /// Object-store client error while listing or downloading (feature-gated behind `gcs`).
    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// No remote object matched the requested file name.
    #[error("no object matching '{target}' found in bucket '{bucket}' under prefix '{prefix}'")]
    ObjectNotFound {
        bucket: String,
        prefix: String,
        target: String,
    },

    /// A remote URI was given but no object-store client was configured.
    #[error("remote path '{path}' requires an object store client (LoadOptions::object_store)")]
    RemoteStoreNotConfigured { path: String },

    /// A remote URI could not be split into bucket and object name.
    #[error("invalid remote uri '{uri}': {message}")]
    InvalidRemoteUri { uri: String, message: String },

    /// The input does not have the shape a reader expects (e.g. a JSON row that is not an object).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// File bytes are not valid in the requested text encoding.
    #[error("failed to decode '{path}' as {encoding}")]
    Decode { path: String, encoding: String },

    /// The requested text encoding label is not recognised.
    #[error("unknown encoding '{label}'")]
    UnknownEncoding { label: String },

    /// An option value cannot be used by the selected reader.
    #[error("invalid option: {message}")]
    InvalidOption { message: String },
}
