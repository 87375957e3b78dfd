//! The cover-art generator session: catalog, selection, and the two export actions.

use std::path::{Path, PathBuf};

use rand::Rng;

use crate::caption::CaptionLimits;
use crate::catalog::loader::{CatalogState, load_catalog};
use crate::catalog::model::{Catalog, CatalogOrder, VehicleOption};
use crate::catalog::source::CatalogSource;
use crate::compose::compositor::RenderedImage;
use crate::export::download::{download_filename, save_download};
use crate::export::exporter::{Export, Exporter};
use crate::foundation::error::GnxResult;
use crate::selection::Selection;
use crate::share::service::{ShareOutcome, ShareService};

pub struct CoverArtGenerator {
    state: CatalogState,
    selection: Selection,
    exporter: Exporter,
}

impl CoverArtGenerator {
    /// Load the catalog once and select its first vehicle.
    pub async fn load(
        source: &dyn CatalogSource,
        order: CatalogOrder,
        limits: Option<CaptionLimits>,
        exporter: Exporter,
    ) -> Self {
        let state = load_catalog(source, order).await;
        Self::from_state(state, limits, exporter)
    }

    pub fn from_state(state: CatalogState, limits: Option<CaptionLimits>, exporter: Exporter) -> Self {
        let selection = Selection::initial(&state.catalog, limits);
        Self {
            state,
            selection,
            exporter,
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.state.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select_vehicle(&mut self, id: i64) -> GnxResult<()> {
        self.selection.select_vehicle(&self.state.catalog, id)
    }

    pub fn select_alternate(&mut self, name: &str) -> GnxResult<()> {
        self.selection.select_alternate(&self.state.catalog, name)
    }

    pub fn set_vehicle_text(&mut self, text: &str) {
        self.selection.set_vehicle_text(&self.state.catalog, text);
    }

    pub fn set_artist(&mut self, artist: &str) {
        self.selection.set_artist(artist);
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.selection.shuffle(&self.state.catalog, rng);
    }

    pub fn caption(&self) -> String {
        self.selection.caption()
    }

    pub fn vehicle(&self) -> Option<&VehicleOption> {
        self.selection.vehicle(&self.state.catalog)
    }

    pub fn download_filename(&self) -> String {
        download_filename(self.vehicle(), self.selection.artist())
    }

    /// Render the current selection once.
    ///
    /// Load and render failures are logged and yield `None`, as does a superseded export.
    pub async fn export(&self) -> Option<RenderedImage> {
        let Some(image_ref) = self.selection.image_url() else {
            tracing::warn!("no artwork selected; nothing to export");
            return None;
        };
        match self.exporter.render(image_ref, &self.caption()).await {
            Ok(Export::Ready(img)) => Some(img),
            Ok(Export::Superseded(ticket)) => {
                tracing::debug!(seq = ticket.seq(), "dropping superseded export");
                None
            }
            Err(err) => {
                tracing::error!(error = %err, image = image_ref, "export failed");
                None
            }
        }
    }

    /// Export and save under the download filename in `dir`.
    pub async fn download(&self, dir: &Path) -> GnxResult<Option<PathBuf>> {
        let filename = self.download_filename();
        let Some(img) = self.export().await else {
            return Ok(None);
        };
        save_download(dir, &filename, &img.jpeg).await.map(Some)
    }

    /// Export and share. `None` when the export itself produced nothing.
    pub async fn share<R: Rng + ?Sized>(
        &self,
        service: &ShareService,
        unix_millis: i64,
        rng: &mut R,
    ) -> Option<ShareOutcome> {
        let img = self.export().await?;
        let outcome = service
            .share(
                &img,
                &self.caption(),
                self.selection.term(),
                self.selection.artist(),
                unix_millis,
                rng,
            )
            .await;
        Some(outcome)
    }
}
