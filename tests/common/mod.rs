#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use mwdata::ingestion::ObjectStoreClient;
use mwdata::{LoadError, LoadResult};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, Writer};

/// Write `region.shp` (+ `.dbf`/`.shx`) with two points into `dir` and return the `.shp` path.
pub fn write_region_shapefile(dir: &Path) -> PathBuf {
    let path = dir.join("region.shp");
    let table = TableWriterBuilder::new()
        .add_character_field(FieldName::try_from("name").unwrap(), 20)
        .add_numeric_field(FieldName::try_from("pop").unwrap(), 10, 0);
    {
        let mut writer = Writer::from_path(&path, table).unwrap();
        for (name, pop, x, y) in [("north", 120.0, 1.0, 2.0), ("south", 80.0, 3.0, 4.0)] {
            let mut record = Record::default();
            record.insert("name".to_string(), FieldValue::Character(Some(name.to_string())));
            record.insert("pop".to_string(), FieldValue::Numeric(Some(pop)));
            writer.write_shape_and_record(&Point::new(x, y), &record).unwrap();
        }
    }
    path
}

/// In-memory object store that records every call.
#[derive(Default)]
pub struct FakeStore {
    objects: Vec<(String, String, Vec<u8>)>,
    fail_downloads: bool,
    pub list_calls: Mutex<Vec<(String, String, Option<usize>)>>,
    pub downloads: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, bucket: &str, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.objects.push((bucket.to_string(), name.to_string(), bytes.into()));
        self
    }

    pub fn failing_downloads(mut self) -> Self {
        self.fail_downloads = true;
        self
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }

    pub fn downloaded(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

impl ObjectStoreClient for FakeStore {
    fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        max_results: Option<usize>,
    ) -> LoadResult<Vec<String>> {
        self.list_calls
            .lock()
            .unwrap()
            .push((bucket.to_string(), prefix.to_string(), max_results));
        Ok(self
            .objects
            .iter()
            .filter(|(b, name, _)| b == bucket && name.starts_with(prefix))
            .map(|(_, name, _)| name.clone())
            .take(max_results.unwrap_or(usize::MAX))
            .collect())
    }

    fn download_to_file(&self, bucket: &str, object: &str, dest: &Path) -> LoadResult<()> {
        self.downloads.lock().unwrap().push(object.to_string());
        if self.fail_downloads {
            return Err(LoadError::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by fake store",
            )));
        }
        let (_, _, bytes) = self
            .objects
            .iter()
            .find(|(b, name, _)| b == bucket && name == object)
            .ok_or_else(|| LoadError::Io(io::Error::new(io::ErrorKind::NotFound, object.to_string())))?;
        std::fs::write(dest, bytes)?;
        Ok(())
    }
}
