use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::*;
use crate::catalog::model::VehicleRow;
use crate::foundation::error::{GnxError, GnxResult};

struct CountingSource {
    calls: AtomicUsize,
    result: Result<Vec<VehicleRow>, String>,
}

#[async_trait]
impl CatalogSource for CountingSource {
    async fn fetch_vehicles(&self, _order: CatalogOrder) -> GnxResult<Vec<VehicleRow>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(GnxError::catalog)
    }
}

fn gnx_row() -> VehicleRow {
    VehicleRow {
        id: 1,
        display_name: "Buick GNX".to_string(),
        image_url: "https://x/img.jpg".to_string(),
        alt_name_1: Some("GNX".to_string()),
        alt_name_2: None,
        alt_name_3: None,
        description: "gnx".to_string(),
    }
}

#[tokio::test]
async fn first_row_becomes_initial_selection() {
    let source = CountingSource {
        calls: AtomicUsize::new(0),
        result: Ok(vec![gnx_row()]),
    };
    let state = load_catalog(&source, CatalogOrder::Priority).await;

    assert!(!state.loading);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    let first = state.initial().unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(first.default_term(), "GNX");
    assert_eq!(first.image_url, "https://x/img.jpg");
}

#[tokio::test]
async fn failure_yields_empty_catalog_without_retry() {
    let source = CountingSource {
        calls: AtomicUsize::new(0),
        result: Err("connection refused".to_string()),
    };
    let state = load_catalog(&source, CatalogOrder::Priority).await;

    assert!(!state.loading);
    assert!(state.catalog.is_empty());
    assert!(state.initial().is_none());
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn pending_state_is_loading() {
    let state = CatalogState::pending();
    assert!(state.loading);
    assert!(state.catalog.is_empty());
}
