use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use crate::compose::compositor::RenderedImage;
use crate::foundation::error::{GnxError, GnxResult};
use crate::supabase::{SupabaseClient, check_status};

/// Per-upload write options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadOptions {
    pub content_type: String,
    /// Cache lifetime in seconds.
    pub cache_control_secs: u32,
    /// Overwrite an existing object with the same key.
    pub upsert: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            content_type: RenderedImage::CONTENT_TYPE.to_string(),
            cache_control_secs: 3600,
            upsert: true,
        }
    }
}

/// Keyed blob storage with public read URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, key: &str, bytes: Vec<u8>, opts: &UploadOptions) -> GnxResult<()>;

    /// Publicly reachable URL for `key`. Does not check existence.
    fn public_url(&self, key: &str) -> GnxResult<Url>;

    async fn delete(&self, key: &str) -> GnxResult<()>;
}

/// Supabase Storage bucket.
#[derive(Clone, Debug)]
pub struct SupabaseStorage {
    client: SupabaseClient,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(client: SupabaseClient, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[derive(serde::Serialize)]
struct RemoveRequest<'a> {
    prefixes: [&'a str; 1],
}

#[async_trait]
impl ObjectStore for SupabaseStorage {
    #[tracing::instrument(skip(self, bytes, opts), fields(bucket = %self.bucket, len = bytes.len()))]
    async fn upload(&self, key: &str, bytes: Vec<u8>, opts: &UploadOptions) -> GnxResult<()> {
        let url = self
            .client
            .endpoint(&["storage", "v1", "object", &self.bucket, key])?;
        let resp = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, &opts.content_type)
            .header(
                reqwest::header::CACHE_CONTROL,
                format!("max-age={}", opts.cache_control_secs),
            )
            .header("x-upsert", if opts.upsert { "true" } else { "false" })
            .body(bytes)
            .send()
            .await
            .map_err(|e| GnxError::storage(format!("upload '{key}': {e}")))?;
        check_status(resp, "upload")
            .await
            .map_err(|e| GnxError::storage(e.to_string()))?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> GnxResult<Url> {
        self.client
            .endpoint(&["storage", "v1", "object", "public", &self.bucket, key])
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket))]
    async fn delete(&self, key: &str) -> GnxResult<()> {
        let url = self.client.endpoint(&["storage", "v1", "object", &self.bucket])?;
        let resp = self
            .client
            .delete(url)
            .json(&RemoveRequest { prefixes: [key] })
            .send()
            .await
            .map_err(|e| GnxError::storage(format!("delete '{key}': {e}")))?;
        check_status(resp, "delete")
            .await
            .map_err(|e| GnxError::storage(e.to_string()))?;
        Ok(())
    }
}

/// Stored object held by [`MemoryObjectStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub opts: UploadOptions,
}

/// In-process store for local runs and tests.
#[derive(Debug)]
pub struct MemoryObjectStore {
    base_url: Url,
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            objects: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.lock().ok()?.get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.lock()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> GnxResult<std::sync::MutexGuard<'_, BTreeMap<String, StoredObject>>> {
        self.objects
            .lock()
            .map_err(|_| GnxError::storage("memory store lock poisoned"))
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(&self, key: &str, bytes: Vec<u8>, opts: &UploadOptions) -> GnxResult<()> {
        let mut objects = self.lock()?;
        if !opts.upsert && objects.contains_key(key) {
            return Err(GnxError::storage(format!("object '{key}' already exists")));
        }
        objects.insert(
            key.to_string(),
            StoredObject {
                bytes,
                opts: opts.clone(),
            },
        );
        Ok(())
    }

    fn public_url(&self, key: &str) -> GnxResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GnxError::storage("memory store base url cannot be a base"))?
            .pop_if_empty()
            .push(key);
        Ok(url)
    }

    async fn delete(&self, key: &str) -> GnxResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/share/store.rs"]
mod tests;
