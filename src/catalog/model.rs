use std::collections::HashSet;

use crate::foundation::error::{GnxError, GnxResult};

/// Row shape returned by the vehicle table.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VehicleRow {
    pub id: i64,
    pub display_name: String,
    pub image_url: String,
    #[serde(default)]
    pub alt_name_1: Option<String>,
    #[serde(default)]
    pub alt_name_2: Option<String>,
    #[serde(default)]
    pub alt_name_3: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl VehicleRow {
    /// Columns requested from the data store, in projection order.
    pub const COLUMNS: &'static [&'static str] = &[
        "id",
        "display_name",
        "image_url",
        "alt_name_1",
        "alt_name_2",
        "alt_name_3",
        "description",
    ];
}

/// One selectable vehicle.
///
/// `alternate_names` holds the caption-eligible labels in column order; the first entry is the
/// default caption term. It never affects the artwork or download filename.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VehicleOption {
    pub id: i64,
    pub display_name: String,
    pub alternate_names: Vec<String>,
    pub image_url: String,
    pub description: String,
}

impl VehicleOption {
    /// Term substituted into the caption when this vehicle is picked.
    pub fn default_term(&self) -> &str {
        self.alternate_names
            .first()
            .map(String::as_str)
            .unwrap_or(&self.display_name)
    }

    /// Every label the caption term may be switched to without changing the vehicle.
    pub fn caption_terms(&self) -> impl Iterator<Item = &str> {
        self.alternate_names
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.display_name.as_str()))
    }
}

impl From<VehicleRow> for VehicleOption {
    fn from(row: VehicleRow) -> Self {
        let alternate_names = [row.alt_name_1, row.alt_name_2, row.alt_name_3]
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            id: row.id,
            display_name: row.display_name,
            alternate_names,
            image_url: row.image_url,
            description: row.description,
        }
    }
}

/// Ordering key applied by the data store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogOrder {
    #[default]
    Priority,
    Alphabetical,
}

impl CatalogOrder {
    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::Alphabetical => "display_name",
        }
    }
}

/// Vehicles in fetch order with unique ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    vehicles: Vec<VehicleOption>,
}

impl Catalog {
    /// Map fetched rows, keeping the first occurrence of any repeated id.
    pub fn from_rows(rows: Vec<VehicleRow>) -> Self {
        let mut seen = HashSet::with_capacity(rows.len());
        let mut vehicles = Vec::with_capacity(rows.len());
        for row in rows {
            if !seen.insert(row.id) {
                tracing::warn!(id = row.id, "dropping duplicate vehicle id");
                continue;
            }
            vehicles.push(VehicleOption::from(row));
        }
        Self { vehicles }
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn first(&self) -> Option<&VehicleOption> {
        self.vehicles.first()
    }

    pub fn get(&self, id: i64) -> Option<&VehicleOption> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn require(&self, id: i64) -> GnxResult<&VehicleOption> {
        self.get(id)
            .ok_or_else(|| GnxError::validation(format!("unknown vehicle id {id}")))
    }

    /// Look up a vehicle by the label shown in the selection list.
    pub fn by_display_name(&self, name: &str) -> Option<&VehicleOption> {
        self.vehicles.iter().find(|v| v.display_name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VehicleOption> {
        self.vehicles.iter()
    }

    pub fn as_slice(&self) -> &[VehicleOption] {
        &self.vehicles
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a VehicleOption;
    type IntoIter = std::slice::Iter<'a, VehicleOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.vehicles.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/model.rs"]
mod tests;
