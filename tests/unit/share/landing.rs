use actix_web::test::{TestRequest, call_service, init_service, read_body};
use actix_web::{App, http::StatusCode};
use url::Url;

use super::*;
use crate::share::store::MemoryObjectStore;

fn state() -> LandingState {
    LandingState {
        store: Arc::new(MemoryObjectStore::new(
            Url::parse("https://cdn.test/social-shares/").unwrap(),
        )),
    }
}

#[test]
fn share_page_points_metadata_at_public_url() {
    let html = render_share_page("https://cdn.test/social-shares/1-abc.jpg");
    assert!(html.contains("<title>GNX World Creation</title>"));
    assert!(html.contains(
        r#"<meta property="og:image" content="https://cdn.test/social-shares/1-abc.jpg">"#
    ));
    assert!(html.contains(
        r#"<meta name="twitter:image" content="https://cdn.test/social-shares/1-abc.jpg">"#
    ));
    assert!(html.contains(r#"<meta name="twitter:card" content="summary_large_image">"#));
    assert!(html.contains("Check out my GNX World creation!"));
    assert!(html.contains("<a href=\"/\">"));
}

#[test]
fn attribute_values_are_escaped() {
    let html = render_share_page("https://x/\"><script>.jpg");
    assert!(!html.contains("<script>"));
    assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    assert_eq!(escape_html("Kendrick's"), "Kendrick&#39;s");
}

#[test]
fn index_page_carries_site_card() {
    let html = render_index_page();
    assert!(html.contains("<title>GNX World - AI Cover Art Generator</title>"));
    assert!(html.contains(r#"<meta property="og:site_name" content="GNX World">"#));
}

#[actix_web::test]
async fn share_route_renders_and_rejects_bad_ids() {
    let app = init_service(
        App::new()
            .app_data(Data::new(state()))
            .configure(configure),
    )
    .await;

    let req = TestRequest::get()
        .uri("/share/1700000000000-abc123-gnx.jpg")
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_body(resp).await;
    let body = std::str::from_utf8(&body).unwrap();
    assert!(body.contains("https://cdn.test/social-shares/1700000000000-abc123-gnx.jpg"));

    let req = TestRequest::get().uri("/share/a..b.jpg").to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::get().uri("/").to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
