use async_trait::async_trait;

use crate::catalog::model::{CatalogOrder, VehicleRow};
use crate::foundation::error::GnxResult;
use crate::supabase::{SupabaseClient, check_status};

/// Read-only provider of vehicle rows.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every vehicle row, sorted by `order`.
    async fn fetch_vehicles(&self, order: CatalogOrder) -> GnxResult<Vec<VehicleRow>>;
}

/// Vehicle table served over PostgREST.
#[derive(Clone, Debug)]
pub struct SupabaseCatalog {
    client: SupabaseClient,
    table: String,
}

impl SupabaseCatalog {
    pub fn new(client: SupabaseClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    pub(crate) fn query_url(&self, order: CatalogOrder) -> GnxResult<url::Url> {
        let mut url = self.client.endpoint(&["rest", "v1", &self.table])?;
        url.query_pairs_mut()
            .append_pair("select", &VehicleRow::COLUMNS.join(","))
            .append_pair("order", &format!("{}.asc", order.column()));
        Ok(url)
    }
}

#[async_trait]
impl CatalogSource for SupabaseCatalog {
    #[tracing::instrument(skip(self), fields(table = %self.table))]
    async fn fetch_vehicles(&self, order: CatalogOrder) -> GnxResult<Vec<VehicleRow>> {
        let url = self.query_url(order)?;
        let resp = self.client.get(url).send().await?;
        let resp = check_status(resp, "vehicle query").await?;
        let rows: Vec<VehicleRow> = resp.json().await?;
        tracing::debug!(rows = rows.len(), "fetched vehicle rows");
        Ok(rows)
    }
}

/// In-memory rows, used when no data store is configured.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    rows: Vec<VehicleRow>,
}

impl StaticCatalog {
    pub fn new(rows: Vec<VehicleRow>) -> Self {
        Self { rows }
    }

    /// The five vehicles offered before the catalog moved into the data store.
    pub fn presets(image_url: &str) -> Self {
        let presets = [
            ("Buick GNX", "GNX"),
            ("Pontiac Trans Am", "Trans Am"),
            ("Chevy Monte Carlo", "Monte Carlo"),
            ("Oldsmobile Cutlass", "Cutlass"),
            ("Buick Regal", "Regal"),
        ];
        let rows = presets
            .iter()
            .zip(1..)
            .map(|((label, term), id)| VehicleRow {
                id,
                display_name: label.to_string(),
                image_url: image_url.to_string(),
                alt_name_1: Some(term.to_string()),
                alt_name_2: None,
                alt_name_3: None,
                description: term.to_lowercase().replace(' ', "-"),
            })
            .collect();
        Self { rows }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_vehicles(&self, order: CatalogOrder) -> GnxResult<Vec<VehicleRow>> {
        let mut rows = self.rows.clone();
        if order == CatalogOrder::Alphabetical {
            rows.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        }
        Ok(rows)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/source.rs"]
mod tests;
