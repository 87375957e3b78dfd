use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::foundation::error::{GnxError, GnxResult};

/// Loads encoded source artwork from an image reference.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, reference: &str) -> GnxResult<Vec<u8>>;
}

/// Fetches `http(s)://` references over the network and anything else from disk.
#[derive(Clone, Debug)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// `timeout` of `None` lets a hung load stall the export.
    pub fn new(timeout: Option<Duration>) -> GnxResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| GnxError::config(format!("build http client: {e}")))?;
        Ok(Self { client })
    }
}

pub(crate) enum ImageRef {
    Remote(url::Url),
    Local(PathBuf),
}

pub(crate) fn classify(reference: &str) -> GnxResult<ImageRef> {
    if reference.trim().is_empty() {
        return Err(GnxError::validation("image reference must be non-empty"));
    }
    match url::Url::parse(reference) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => Ok(ImageRef::Remote(u)),
        Ok(u) if u.scheme() == "file" => u
            .to_file_path()
            .map(ImageRef::Local)
            .map_err(|_| GnxError::validation(format!("bad file url '{reference}'"))),
        Ok(u) if u.scheme().len() > 1 => Err(GnxError::validation(format!(
            "unsupported image scheme '{}'",
            u.scheme()
        ))),
        // Relative paths and Windows drive letters land here.
        _ => Ok(ImageRef::Local(PathBuf::from(reference))),
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, reference: &str) -> GnxResult<Vec<u8>> {
        match classify(reference)? {
            ImageRef::Remote(url) => {
                let resp = self.client.get(url).send().await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(GnxError::fetch(format!(
                        "image request returned {status}"
                    )));
                }
                Ok(resp.bytes().await?.to_vec())
            }
            ImageRef::Local(path) => tokio::fs::read(&path).await.map_err(|e| {
                GnxError::fetch(format!("failed to read image '{}': {e}", path.display()))
            }),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
