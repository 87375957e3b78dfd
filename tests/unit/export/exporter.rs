use std::io::Cursor;

use async_trait::async_trait;
use tokio::sync::Notify;

use super::*;

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Serves "slow" only after `release` is notified; everything else immediately.
struct GatedFetcher {
    release: Notify,
}

#[async_trait]
impl ImageFetcher for GatedFetcher {
    async fn fetch(&self, reference: &str) -> GnxResult<Vec<u8>> {
        match reference {
            "slow" => {
                self.release.notified().await;
                Ok(png(8, 8))
            }
            "fast" => Ok(png(16, 16)),
            other => Err(GnxError::fetch(format!("no such image '{other}'"))),
        }
    }
}

fn exporter() -> Arc<Exporter> {
    Arc::new(Exporter::new(
        Arc::new(GatedFetcher {
            release: Notify::new(),
        }),
        Compositor::new(Vec::new()),
    ))
}

#[tokio::test]
async fn single_export_is_ready() {
    let exporter = exporter();
    let out = exporter.render("fast", "").await.unwrap();
    let img = out.into_ready().unwrap();
    assert_eq!(img.canvas.width, 16);
}

#[tokio::test]
async fn load_failure_produces_no_output() {
    let exporter = exporter();
    let err = exporter.render("missing", "").await.unwrap_err();
    assert!(matches!(err, GnxError::Fetch(_)));
}

#[tokio::test]
async fn stale_export_is_superseded_by_newer_one() {
    let gated = Arc::new(GatedFetcher {
        release: Notify::new(),
    });
    let exporter = Exporter::new(gated.clone(), Compositor::new(Vec::new()));

    let slow = exporter.render("slow", "");
    let fast = async {
        let out = exporter.render("fast", "").await;
        gated.release.notify_one();
        out
    };
    let (slow, fast) = tokio::join!(slow, fast);

    assert!(matches!(slow.unwrap(), Export::Superseded(_)));
    let fast = fast.unwrap().into_ready().unwrap();
    assert_eq!(fast.canvas.width, 16);
}
