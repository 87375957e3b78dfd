use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::catalog::model::VehicleRow;

fn catalog() -> Catalog {
    let row = |id: i64, name: &str, alts: &[&str], desc: &str| VehicleRow {
        id,
        display_name: name.to_string(),
        image_url: format!("https://x/{id}.jpg"),
        alt_name_1: alts.first().map(|s| s.to_string()),
        alt_name_2: alts.get(1).map(|s| s.to_string()),
        alt_name_3: alts.get(2).map(|s| s.to_string()),
        description: desc.to_string(),
    };
    Catalog::from_rows(vec![
        row(1, "Buick GNX", &["GNX", "Grand National"], "gnx"),
        row(2, "Pontiac Trans Am", &["Trans Am"], "trans-am"),
        row(3, "Chevy Monte Carlo", &[], "monte-carlo"),
    ])
}

#[test]
fn initial_selection_follows_first_row() {
    let c = catalog();
    let sel = Selection::initial(&c, None);
    assert_eq!(sel.vehicle_id(), Some(1));
    assert_eq!(sel.term(), "GNX");
    assert_eq!(sel.image_url(), Some("https://x/1.jpg"));
    assert_eq!(sel.artist(), "Anita Baker");
    assert_eq!(sel.caption(), "Ridin' in my GNX with Anita Baker in the tape deck");
}

#[test]
fn empty_catalog_has_no_vehicle() {
    let sel = Selection::initial(&Catalog::default(), None);
    assert_eq!(sel.vehicle_id(), None);
    assert_eq!(sel.image_url(), None);
    assert_eq!(sel.term(), "");
}

#[test]
fn selecting_vehicle_updates_image_and_term_together() {
    let c = catalog();
    let mut sel = Selection::initial(&c, None);
    sel.select_vehicle(&c, 3).unwrap();
    assert_eq!(sel.vehicle_id(), Some(3));
    assert_eq!(sel.image_url(), Some("https://x/3.jpg"));
    assert_eq!(sel.term(), "Chevy Monte Carlo");

    assert!(sel.select_vehicle(&c, 42).is_err());
    assert_eq!(sel.vehicle_id(), Some(3));
}

#[test]
fn alternate_name_changes_only_the_term() {
    let c = catalog();
    let mut sel = Selection::initial(&c, None);
    sel.select_alternate(&c, "Grand National").unwrap();
    assert_eq!(sel.term(), "Grand National");
    assert_eq!(sel.vehicle_id(), Some(1));
    assert_eq!(sel.image_url(), Some("https://x/1.jpg"));

    sel.select_alternate(&c, "Buick GNX").unwrap();
    assert_eq!(sel.term(), "Buick GNX");
    assert!(sel.select_alternate(&c, "Trans Am").is_err());
}

#[test]
fn free_text_vehicle_matches_display_name_or_unresolves() {
    let c = catalog();
    let mut sel = Selection::initial(&c, None);

    sel.set_vehicle_text(&c, "Pontiac Trans Am");
    assert_eq!(sel.vehicle_id(), Some(2));
    assert_eq!(sel.term(), "Trans Am");

    sel.set_vehicle_text(&c, "Skateboard");
    assert_eq!(sel.vehicle_id(), None);
    assert_eq!(sel.term(), "Skateboard");
    assert_eq!(sel.image_url(), Some("https://x/2.jpg"));
    assert!(sel.vehicle(&c).is_none());
}

#[test]
fn limits_truncate_edits() {
    let c = catalog();
    let mut sel = Selection::initial(&c, Some(CaptionLimits::default()));
    sel.set_vehicle_text(&c, &"v".repeat(60));
    sel.set_artist(&"a".repeat(60));
    assert_eq!(sel.term().len(), 32);
    assert_eq!(sel.artist().len(), 40);
}

#[test]
fn shuffle_on_empty_catalog_keeps_vehicle() {
    let mut sel = Selection::initial(&Catalog::default(), None);
    let mut rng = StdRng::seed_from_u64(7);
    sel.shuffle(&Catalog::default(), &mut rng);
    assert_eq!(sel.vehicle_id(), None);
    assert!(PRESET_ARTISTS.contains(&sel.artist()));
}

#[test]
fn shuffle_is_roughly_uniform_and_independent() {
    let c = catalog();
    let mut sel = Selection::initial(&c, None);
    let mut rng = StdRng::seed_from_u64(0x6e78);

    let trials = 15_000;
    let mut vehicle_hits = [0usize; 3];
    let mut artist_hits = [0usize; 5];
    let mut pair_hits = [[0usize; 5]; 3];
    for _ in 0..trials {
        sel.shuffle(&c, &mut rng);
        let v = (sel.vehicle_id().unwrap() - 1) as usize;
        let a = PRESET_ARTISTS
            .iter()
            .position(|x| *x == sel.artist())
            .unwrap();
        vehicle_hits[v] += 1;
        artist_hits[a] += 1;
        pair_hits[v][a] += 1;
    }

    for hits in vehicle_hits {
        let p = hits as f64 / trials as f64;
        assert!((p - 1.0 / 3.0).abs() < 0.03, "vehicle share {p}");
    }
    for hits in artist_hits {
        let p = hits as f64 / trials as f64;
        assert!((p - 0.2).abs() < 0.03, "artist share {p}");
    }
    for row in pair_hits {
        for hits in row {
            let p = hits as f64 / trials as f64;
            assert!((p - 1.0 / 15.0).abs() < 0.02, "pair share {p}");
        }
    }
}
