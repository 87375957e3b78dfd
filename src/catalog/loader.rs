use crate::catalog::model::{Catalog, CatalogOrder, VehicleOption};
use crate::catalog::source::CatalogSource;

/// Catalog as seen by the selection controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogState {
    pub catalog: Catalog,
    pub loading: bool,
}

impl CatalogState {
    /// State before the single fetch completes.
    pub fn pending() -> Self {
        Self {
            catalog: Catalog::default(),
            loading: true,
        }
    }

    /// Default selection: the first vehicle in fetch order.
    pub fn initial(&self) -> Option<&VehicleOption> {
        self.catalog.first()
    }
}

/// Issue exactly one read against `source`.
///
/// A failed read is logged and yields an empty catalog; there is no retry.
#[tracing::instrument(skip(source))]
pub async fn load_catalog(source: &dyn CatalogSource, order: CatalogOrder) -> CatalogState {
    match source.fetch_vehicles(order).await {
        Ok(rows) => {
            let catalog = Catalog::from_rows(rows);
            tracing::info!(vehicles = catalog.len(), "catalog loaded");
            CatalogState {
                catalog,
                loading: false,
            }
        }
        Err(err) => {
            tracing::error!(error = %err, "catalog fetch failed");
            CatalogState {
                catalog: Catalog::default(),
                loading: false,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/loader.rs"]
mod tests;
