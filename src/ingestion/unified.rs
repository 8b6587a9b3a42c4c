//! Extension-based dispatch for single files.
//!
//! [`read_by_extension`] reads one local file or remote URI into a [`crate::types::Table`]:
//!
//! - If [`LoadOptions::format`] is `None`, the format is inferred from the file extension
//!   (case-sensitive). Unknown or missing extensions use the plain-text fallback.
//! - Remote URIs (`gs://...`) are staged into a local directory first. Shapefiles stage all
//!   three of their `.dbf`/`.shp`/`.shx` files.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{LoadError, LoadResult};
use crate::types::Table;

use super::observability::{LoadObserver, LoadSeverity};
use super::remote::{self, is_remote_uri, ObjectStoreClient, RemoteUri};
use super::{csv, json, shapefile};

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values (`.csv`).
    Csv,
    /// JSON records (`.json`).
    Json,
    /// ESRI shapefile (`.shp` with `.dbf`/`.shx` siblings).
    Shapefile,
    /// Excel workbook (`.xlsx`, feature-gated behind `excel`).
    Excel,
    /// Anything else: plain text split by [`LoadOptions::sep`].
    Text,
}

impl FileFormat {
    /// Map a file extension (without the dot) to a format. Matching is case-sensitive and
    /// never fails: unknown extensions are [`FileFormat::Text`].
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "csv" => Self::Csv,
            "json" => Self::Json,
            "shp" => Self::Shapefile,
            "xlsx" => Self::Excel,
            _ => Self::Text,
        }
    }

    /// Infer the format from the final path segment of a local path or remote URI.
    pub fn from_path(path: &str) -> Self {
        Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Text)
    }
}

/// How to choose sheet(s) when reading an Excel workbook.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExcelSheetSelection {
    /// Read the first sheet (default).
    #[default]
    First,
    /// Read a single named sheet.
    Sheet(String),
    /// Read all sheets and concatenate rows.
    AllSheets,
    /// Read only the listed sheets (in order) and concatenate rows.
    Sheets(Vec<String>),
}

/// Options controlling loading behavior.
///
/// Use [`Default`] for common cases. Options a reader does not understand are ignored by it.
#[derive(Clone)]
pub struct LoadOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<FileFormat>,
    /// Text encoding label for CSV, JSON, text and directory reads. `None` means UTF-8.
    pub encoding: Option<String>,
    /// JSON: one object per line (`true`, default) or a single document (`false`).
    pub lines: bool,
    /// Field separator. Defaults to `,` for CSV and `\n` (one column per line) for text.
    pub sep: Option<char>,
    /// Whether the first record is a header. Defaults to `true` for CSV, `false` for text.
    pub has_headers: Option<bool>,
    /// Cap on the number of objects listed per remote fetch. `None` lists everything.
    pub max_results: Option<usize>,
    /// Excel-specific options.
    pub excel_sheet_selection: ExcelSheetSelection,
    /// Where remote objects are staged. `None` uses the system temp directory.
    pub staging_dir: Option<PathBuf>,
    /// Client used for remote URIs.
    pub object_store: Option<Arc<dyn ObjectStoreClient>>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl LoadOptions {
    /// Directory remote objects are downloaded into.
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("encoding", &self.encoding)
            .field("lines", &self.lines)
            .field("sep", &self.sep)
            .field("has_headers", &self.has_headers)
            .field("max_results", &self.max_results)
            .field("excel_sheet_selection", &self.excel_sheet_selection)
            .field("staging_dir", &self.staging_dir)
            .field("object_store_set", &self.object_store.is_some())
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            encoding: None,
            lines: true,
            sep: None,
            has_headers: None,
            max_results: None,
            excel_sheet_selection: ExcelSheetSelection::default(),
            staging_dir: None,
            object_store: None,
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

/// Read a single file, choosing the reader by extension.
///
/// | extension | reader |
/// |-----------|--------|
/// | `.csv`    | CSV, `sep` (default `,`), headers on by default |
/// | `.json`   | JSON, `lines` (default `true`) |
/// | `.shp`    | shapefile; remote URIs stage `.dbf`/`.shp`/`.shx` first |
/// | `.xlsx`   | Excel (feature `excel`) |
/// | other     | text, `sep` (default `\n`: one single-column row per line) |
///
/// Reader errors are returned unchanged.
///
/// # Examples
///
/// ```no_run
/// use mwdata::ingestion::{read_by_extension, LoadOptions};
///
/// # fn main() -> Result<(), mwdata::LoadError> {
/// let table = read_by_extension("events.json", &LoadOptions::default())?;
/// println!("rows={}", table.row_count());
/// # Ok(())
/// # }
/// ```
///
/// Remote files need an object-store client:
///
/// ```no_run
/// use std::sync::Arc;
///
/// use mwdata::ingestion::{read_by_extension, LoadOptions, ObjectStoreClient};
///
/// # fn run(store: Arc<dyn ObjectStoreClient>) -> Result<(), mwdata::LoadError> {
/// let opts = LoadOptions {
///     object_store: Some(store),
///     ..Default::default()
/// };
/// let table = read_by_extension("gs://my-bucket/boundaries/region.shp", &opts)?;
/// println!("features={}", table.row_count());
/// # Ok(())
/// # }
/// ```
pub fn read_by_extension(path: &str, options: &LoadOptions) -> LoadResult<Table> {
    let format = options.format.unwrap_or_else(|| FileFormat::from_path(path));
    tracing::debug!("Reading {} as {:?}", path, format);

    if !is_remote_uri(path) {
        return read_local(Path::new(path), format, options);
    }

    let uri = RemoteUri::parse(path)?;
    let store = options
        .object_store
        .as_deref()
        .ok_or_else(|| LoadError::RemoteStoreNotConfigured {
            path: path.to_string(),
        })?;
    let staged = match format {
        FileFormat::Shapefile => remote::stage_remote_shapefile(&uri, store, options)?,
        _ => remote::stage_remote_file(&uri, store, options)?,
    };
    read_local(&staged, format, options)
}

fn read_local(path: &Path, format: FileFormat, options: &LoadOptions) -> LoadResult<Table> {
    let encoding = options.encoding.as_deref();
    match format {
        FileFormat::Csv => csv::read_csv_from_path(
            path,
            csv::delimiter_byte(options.sep.unwrap_or(','))?,
            options.has_headers.unwrap_or(true),
            encoding,
        ),
        FileFormat::Json => json::read_json_from_path(path, options.lines, encoding),
        FileFormat::Shapefile => shapefile::read_shapefile_from_path(path),
        FileFormat::Excel => read_excel_dispatch(path, &options.excel_sheet_selection),
        FileFormat::Text => {
            let has_headers = options.has_headers.unwrap_or(false);
            match options.sep.unwrap_or('\n') {
                '\n' => csv::read_lines_from_path(path, has_headers, encoding),
                sep => csv::read_csv_from_path(path, csv::delimiter_byte(sep)?, has_headers, encoding),
            }
        }
    }
}

fn read_excel_dispatch(path: &Path, sel: &ExcelSheetSelection) -> LoadResult<Table> {
    // Avoid unused warnings when the feature is off.
    let _ = (path, sel);

    #[cfg(feature = "excel")]
    {
        use super::excel;

        match sel {
            ExcelSheetSelection::First => excel::read_excel_from_path(path, None),
            ExcelSheetSelection::Sheet(name) => excel::read_excel_from_path(path, Some(name.as_str())),
            ExcelSheetSelection::AllSheets => excel::read_excel_workbook_from_path(path, None),
            ExcelSheetSelection::Sheets(names) => {
                let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
                excel::read_excel_workbook_from_path(path, Some(refs.as_slice()))
            }
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(LoadError::InvalidOption {
            message: "excel reading not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_matching_is_case_sensitive() {
        assert_eq!(FileFormat::from_path("data/people.csv"), FileFormat::Csv);
        assert_eq!(FileFormat::from_path("data/people.CSV"), FileFormat::Text);
        assert_eq!(FileFormat::from_path("gs://b/x/region.shp"), FileFormat::Shapefile);
        assert_eq!(FileFormat::from_path("book.xlsx"), FileFormat::Excel);
        assert_eq!(FileFormat::from_path("events.json"), FileFormat::Json);
    }

    #[test]
    fn missing_or_unknown_extension_falls_back_to_text() {
        assert_eq!(FileFormat::from_path("README"), FileFormat::Text);
        assert_eq!(FileFormat::from_path("notes.dat"), FileFormat::Text);
        assert_eq!(FileFormat::from_path(".hidden"), FileFormat::Text);
    }
}
