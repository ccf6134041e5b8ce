use crate::traits::{ObjectSummary, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use pixbatch_core::StorageKey;

/// S3-compatible storage implementation (Cloudflare R2, AWS S3, MinIO)
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// Credentials are taken only from the arguments; nothing is read from the
    /// process environment.
    ///
    /// # Arguments
    /// * `bucket` - Bucket name
    /// * `region` - Region identifier (`auto` for R2)
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers
    ///   (e.g., "https://{account}.r2.cloudflarestorage.com", "http://localhost:9000")
    /// * `access_key_id` / `secret_access_key` - Static credentials
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        access_key_id: String,
        secret_access_key: String,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_region(region)
            .with_bucket_name(bucket.clone())
            .with_access_key_id(access_key_id)
            .with_secret_access_key(secret_access_key);

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage { store, bucket })
    }
}

/// Map an object_store failure onto the two store failure classes.
pub(crate) fn classify_error(err: ObjectStoreError) -> StorageError {
    match err {
        ObjectStoreError::NotFound { .. }
        | ObjectStoreError::InvalidPath { .. }
        | ObjectStoreError::NotSupported { .. }
        | ObjectStoreError::NotImplemented { .. }
        | ObjectStoreError::AlreadyExists { .. }
        | ObjectStoreError::Precondition { .. }
        | ObjectStoreError::UnknownConfigurationKey { .. } => {
            StorageError::Rejected(err.to_string())
        }
        other => StorageError::Unavailable(other.to_string()),
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put(&self, storage_key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        let size = data.len() as u64;
        let location = Path::parse(storage_key)
            .map_err(|e| StorageError::InvalidKey(format!("{}: {}", storage_key, e)))?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let mut opts = PutOptions::default();
        opts.attributes = attributes;

        let start = std::time::Instant::now();

        let result = self
            .store
            .put_opts(&location, PutPayload::from(data), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 put failed"
            );
            classify_error(e)
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 put successful"
        );

        Ok(())
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectSummary>> {
        let start = std::time::Instant::now();
        let trimmed = prefix.trim_matches('/');
        let location = if trimmed.is_empty() {
            None
        } else {
            Some(
                Path::parse(trimmed)
                    .map_err(|e| StorageError::InvalidKey(format!("{}: {}", prefix, e)))?,
            )
        };

        let metas: Vec<_> = self
            .store
            .list(location.as_ref())
            .try_collect()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    prefix = %prefix,
                    "S3 list failed"
                );
                classify_error(e)
            })?;

        let mut objects: Vec<ObjectSummary> = metas
            .into_iter()
            .map(|meta| ObjectSummary {
                key: StorageKey::from(meta.location.to_string()),
                size: meta.size,
            })
            .collect();
        objects.sort_by(|a, b| a.key.cmp(&b.key));

        tracing::info!(
            bucket = %self.bucket,
            prefix = %prefix,
            count = objects.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 list successful"
        );

        Ok(objects)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
