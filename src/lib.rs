//! `mwdata` loads tabular, text and geospatial data from a local path or Google Cloud Storage
//! into one in-memory [`types::Table`], whatever the source format.
//!
//! The primary entrypoint is [`ingestion::load`]. It accepts a file, a directory or a `gs://`
//! URI and picks the reader from the file extension (or you can force a format via
//! [`ingestion::LoadOptions`]).
//!
//! ## What you can load
//!
//! **Single files (dispatched by extension, case-sensitive):**
//!
//! - **CSV**: `.csv`
//! - **JSON**: `.json`, newline-delimited by default (`lines = true`) or a single document
//! - **Shapefile**: `.shp` (with its `.dbf`/`.shx` siblings); rows carry a `geometry` column
//! - **Excel** (Cargo feature `excel`, on by default): `.xlsx`
//! - **Anything else**: plain text, one single-column row per line (or split by `sep`)
//!
//! **Directories:** every `.txt` file becomes one row of a single column holding the file's
//! contents. Pass `recurse_into_subfolders = true` to include nested directories.
//!
//! **Remote URIs:** paths containing `gs://` are downloaded into a staging directory first,
//! using the [`ingestion::ObjectStoreClient`] set in the options. Shapefiles stage all three of
//! their files. Enable the `gcs` feature for a ready-made Google Cloud Storage client.
//!
//! ## Table model
//!
//! Loading produces a [`types::Table`] whose columns are typed by inference from the data:
//!
//! - [`types::DataType::Int64`]
//! - [`types::DataType::Float64`]
//! - [`types::DataType::Bool`]
//! - [`types::DataType::Utf8`]
//! - [`types::DataType::Geometry`]
//!
//! Empty cells and explicit JSON `null` map to [`types::Value::Null`]. Columns mixing integers
//! and floats become floats; any other mix becomes text.
//!
//! ## Quick examples
//!
//! ```no_run
//! use mwdata::ingestion::{load, LoadOptions};
//!
//! # fn main() -> Result<(), mwdata::LoadError> {
//! // Auto-detects by extension (.csv/.json/.shp/.xlsx/...).
//! let table = load("data.csv", false, &LoadOptions::default())?;
//! println!("rows={}", table.row_count());
//!
//! // One row per .txt file, including subfolders.
//! let docs = load("notes/", true, &LoadOptions::default())?;
//! println!("documents={}", docs.row_count());
//! # Ok(())
//! # }
//! ```
//!
//! JSON arrays need `lines = false`:
//!
//! ```no_run
//! use mwdata::ingestion::{load, LoadOptions};
//!
//! # fn main() -> Result<(), mwdata::LoadError> {
//! let opts = LoadOptions {
//!     lines: false,
//!     ..Default::default()
//! };
//! let table = load("events.json", false, &opts)?;
//! println!("columns={:?}", table.column_names());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: the loader, extension dispatch, remote staging and format readers
//! - [`types`]: table model and type inference
//! - [`error`]: error types used across loading

pub mod error;
pub mod ingestion;
pub mod types;

pub use error::{LoadError, LoadResult};
