use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use url::Url;

use crate::compose::compositor::RenderedImage;
use crate::share::intent::{share_intent_url, share_link};
use crate::share::key::share_key;
use crate::share::scheduler::DeletionScheduler;
use crate::share::store::{ObjectStore, UploadOptions};

/// What a share action produced.
#[derive(Debug)]
pub struct ShareOutcome {
    /// Intent URL to open; always present.
    pub intent_url: String,
    /// Landing page link, absent when the upload failed.
    pub share_link: Option<Url>,
    /// Public URL of the uploaded image.
    pub image_url: Option<Url>,
    pub key: Option<String>,
    /// Pending deletion of the upload; completes once the retention window has passed.
    pub cleanup: Option<JoinHandle<()>>,
}

impl ShareOutcome {
    pub fn is_text_only(&self) -> bool {
        self.share_link.is_none()
    }
}

/// Upload-then-link share flow with delayed cleanup.
#[derive(Clone)]
pub struct ShareService {
    store: Arc<dyn ObjectStore>,
    scheduler: DeletionScheduler,
    site_url: Url,
    retention: Duration,
    upload: UploadOptions,
}

impl ShareService {
    pub fn new(store: Arc<dyn ObjectStore>, site_url: Url, retention: Duration) -> Self {
        let scheduler = DeletionScheduler::new(Arc::clone(&store));
        Self {
            store,
            scheduler,
            site_url,
            retention,
            upload: UploadOptions::default(),
        }
    }

    pub fn scheduler(&self) -> &DeletionScheduler {
        &self.scheduler
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Upload `image` and build the share intent for `caption`.
    ///
    /// Any upload or link failure is logged and degrades to a text-only intent.
    #[tracing::instrument(skip(self, image, caption, rng))]
    pub async fn share<R: Rng + ?Sized>(
        &self,
        image: &RenderedImage,
        caption: &str,
        vehicle: &str,
        artist: &str,
        unix_millis: i64,
        rng: &mut R,
    ) -> ShareOutcome {
        let key = share_key(unix_millis, rng, vehicle, artist);
        let upload = self
            .store
            .upload(&key, image.jpeg.clone(), &self.upload)
            .await;
        if let Err(err) = upload {
            tracing::error!(key = %key, error = %err, "share upload failed; sharing text only");
            return Self::text_only(caption);
        }

        let linked = self
            .store
            .public_url(&key)
            .and_then(|image_url| Ok((image_url, share_link(&self.site_url, &key)?)));
        let (image_url, link) = match linked {
            Ok(v) => v,
            Err(err) => {
                tracing::error!(key = %key, error = %err, "could not build share link; sharing text only");
                return Self::text_only(caption);
            }
        };

        let cleanup = self.scheduler.schedule(&key, self.retention);
        tracing::info!(key = %key, link = %link, "share uploaded");

        ShareOutcome {
            intent_url: share_intent_url(caption, Some(link.as_str())),
            share_link: Some(link),
            image_url: Some(image_url),
            key: Some(key),
            cleanup: Some(cleanup),
        }
    }

    fn text_only(caption: &str) -> ShareOutcome {
        ShareOutcome {
            intent_url: share_intent_url(caption, None),
            share_link: None,
            image_url: None,
            key: None,
            cleanup: None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/share/service.rs"]
mod tests;
