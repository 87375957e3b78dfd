use std::sync::{Arc, Mutex};

use crate::assets::fetch::ImageFetcher;
use crate::compose::compositor::{Compositor, RenderedImage};
use crate::export::guard::{ExportGuard, ExportTicket};
use crate::foundation::error::{GnxError, GnxResult};

/// Result of one export action.
#[derive(Debug)]
pub enum Export {
    Ready(RenderedImage),
    /// A newer export started while this one was in flight; its result was dropped.
    Superseded(ExportTicket),
}

impl Export {
    pub fn into_ready(self) -> Option<RenderedImage> {
        match self {
            Self::Ready(img) => Some(img),
            Self::Superseded(_) => None,
        }
    }
}

/// Load-then-draw pipeline shared by the download and share paths.
pub struct Exporter {
    fetcher: Arc<dyn ImageFetcher>,
    compositor: Mutex<Compositor>,
    guard: ExportGuard,
}

impl Exporter {
    pub fn new(fetcher: Arc<dyn ImageFetcher>, compositor: Compositor) -> Self {
        Self {
            fetcher,
            compositor: Mutex::new(compositor),
            guard: ExportGuard::new(),
        }
    }

    /// Fetch `image_ref`, caption it, and encode.
    ///
    /// The result is discarded when another export began after this one.
    #[tracing::instrument(skip(self, caption))]
    pub async fn render(&self, image_ref: &str, caption: &str) -> GnxResult<Export> {
        let ticket = self.guard.begin();
        let source = self.fetcher.fetch(image_ref).await?;

        if !self.guard.is_current(ticket) {
            tracing::debug!(seq = ticket.seq(), "export superseded before compositing");
            return Ok(Export::Superseded(ticket));
        }

        let rendered = {
            let mut compositor = self
                .compositor
                .lock()
                .map_err(|_| GnxError::render("compositor lock poisoned"))?;
            compositor.compose(&source, caption)?
        };
        tracing::info!(
            seq = ticket.seq(),
            width = rendered.canvas.width,
            height = rendered.canvas.height,
            bytes = rendered.jpeg.len(),
            "export rendered"
        );
        Ok(Export::Ready(rendered))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/exporter.rs"]
mod tests;
