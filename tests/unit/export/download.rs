use super::*;

fn gnx() -> VehicleOption {
    VehicleOption {
        id: 1,
        display_name: "Buick GNX".to_string(),
        alternate_names: vec!["GNX".to_string()],
        image_url: "https://x/img.jpg".to_string(),
        description: "gnx".to_string(),
    }
}

#[test]
fn filename_uses_description_and_artist() {
    assert_eq!(
        download_filename(Some(&gnx()), "Anita Baker"),
        "GNX-gnx-Anita Baker.jpg"
    );
}

#[test]
fn filename_falls_back_without_vehicle() {
    assert_eq!(download_filename(None, "Anita Baker"), "GNX-cover-art.jpg");
}

#[test]
fn filename_strips_path_separators() {
    assert_eq!(
        download_filename(Some(&gnx()), "AC/DC"),
        "GNX-gnx-AC-DC.jpg"
    );
}

#[tokio::test]
async fn save_writes_into_created_dir() {
    let dir = std::env::temp_dir()
        .join(format!("gnx_download_test_{}", std::process::id()))
        .join("nested");
    let path = save_download(&dir, "GNX-cover-art.jpg", &[0xff, 0xd8])
        .await
        .unwrap();
    assert_eq!(path, dir.join("GNX-cover-art.jpg"));
    assert_eq!(std::fs::read(&path).unwrap(), vec![0xff, 0xd8]);
    std::fs::remove_dir_all(dir.parent().unwrap()).ok();
}
