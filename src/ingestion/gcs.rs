#![cfg(feature = "gcs")]

//! Google Cloud Storage client for remote staging (feature-gated behind `gcs`).

use std::fmt;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use object_store::gcp::{GoogleCloudStorage, GoogleCloudStorageBuilder};
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use tokio::runtime::{Builder, Runtime};

use crate::error::{LoadError, LoadResult};

use super::remote::ObjectStoreClient;

/// [`ObjectStoreClient`] backed by `object_store`'s GCS implementation.
///
/// Credentials are resolved from the environment (`GOOGLE_SERVICE_ACCOUNT`,
/// `GOOGLE_APPLICATION_CREDENTIALS`, ...) unless a service account file is given explicitly.
/// The async client is driven on a private current-thread runtime, so calls block.
pub struct GcsClient {
    runtime: Runtime,
    service_account_path: Option<PathBuf>,
}

impl GcsClient {
    /// Create a client using default credentials from the environment.
    pub fn new() -> LoadResult<Self> {
        Ok(Self {
            runtime: Builder::new_current_thread().enable_all().build()?,
            service_account_path: None,
        })
    }

    /// Create a client authenticating with the given service account key file.
    pub fn with_service_account_path(path: impl AsRef<Path>) -> LoadResult<Self> {
        let mut client = Self::new()?;
        client.service_account_path = Some(path.as_ref().to_path_buf());
        Ok(client)
    }

    fn bucket(&self, bucket: &str) -> LoadResult<GoogleCloudStorage> {
        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket);
        if let Some(path) = &self.service_account_path {
            builder = builder.with_service_account_path(path.to_string_lossy());
        }
        Ok(builder.build()?)
    }
}

impl fmt::Debug for GcsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcsClient")
            .field("service_account_path", &self.service_account_path)
            .finish()
    }
}

impl ObjectStoreClient for GcsClient {
    fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        max_results: Option<usize>,
    ) -> LoadResult<Vec<String>> {
        let store = self.bucket(bucket)?;
        let prefix = (!prefix.is_empty()).then(|| ObjectPath::from(prefix));

        self.runtime.block_on(async {
            let mut stream = store.list(prefix.as_ref());
            let mut names = Vec::new();
            while let Some(meta) = stream.next().await {
                if max_results.is_some_and(|max| names.len() >= max) {
                    break;
                }
                names.push(meta?.location.to_string());
            }
            Ok::<_, LoadError>(names)
        })
    }

    fn download_to_file(&self, bucket: &str, object: &str, dest: &Path) -> LoadResult<()> {
        let store = self.bucket(bucket)?;
        let location = ObjectPath::from(object);
        let bytes = self
            .runtime
            .block_on(async { store.get(&location).await?.bytes().await })?;
        std::fs::write(dest, &bytes)?;
        Ok(())
    }
}
