//! Share-landing pages.
//!
//! `GET /share/{id}` resolves an uploaded key to its public URL and renders a preview page whose
//! Open Graph and Twitter metadata point at the image, so links unfurl with the cover art.
//! `GET /` renders the site card used when the bare site is shared.

use std::fmt::Write as _;
use std::sync::Arc;

use actix_web::web::{Data, Path, ServiceConfig, get};
use actix_web::{HttpResponse, Responder};

use crate::share::key::validate_key;
use crate::share::store::ObjectStore;

pub const SITE_NAME: &str = "GNX World";
pub const SITE_TITLE: &str = "GNX World - AI Cover Art Generator";
pub const SITE_DESCRIPTION: &str = "Create unique album covers with classic vehicles and legendary artists, inspired by Kendrick Lamar's GNX.";
pub const SHARE_TITLE: &str = "GNX World Creation";
pub const SHARE_DESCRIPTION: &str = "Check out my GNX World creation!";
const SHARE_FOOTER: &str = "Created with GNX World - Inspired by Kendrick Lamar.";
const TWITTER_CREATOR: &str = "@gill_works";

/// Shared state for the landing handlers.
#[derive(Clone)]
pub struct LandingState {
    pub store: Arc<dyn ObjectStore>,
}

/// Register the landing routes on an actix `App`.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.route("/", get().to(index))
        .route("/share/{id}", get().to(share_page));
}

async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_index_page())
}

async fn share_page(state: Data<LandingState>, id: Path<String>) -> impl Responder {
    let id = id.into_inner();
    if let Err(err) = validate_key(&id) {
        tracing::warn!(id = %id, error = %err, "rejected share id");
        return HttpResponse::BadRequest().body("invalid share id");
    }
    match state.store.public_url(&id) {
        Ok(url) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(render_share_page(url.as_str())),
        Err(err) => {
            tracing::error!(id = %id, error = %err, "could not resolve share url");
            HttpResponse::ServiceUnavailable().body("share unavailable")
        }
    }
}

/// Preview page for one uploaded image.
pub fn render_share_page(image_url: &str) -> String {
    let img = escape_html(image_url);
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(SHARE_TITLE));
    push_meta(&mut html, "name", "description", SHARE_DESCRIPTION);
    push_meta(&mut html, "property", "og:title", SHARE_TITLE);
    push_meta(&mut html, "property", "og:description", SHARE_DESCRIPTION);
    push_meta(&mut html, "property", "og:image", image_url);
    push_meta(&mut html, "name", "twitter:card", "summary_large_image");
    push_meta(&mut html, "name", "twitter:title", SHARE_TITLE);
    push_meta(&mut html, "name", "twitter:description", SHARE_DESCRIPTION);
    push_meta(&mut html, "name", "twitter:image", image_url);
    html.push_str("</head>\n<body>\n<main>\n");
    let _ = writeln!(
        html,
        "<img src=\"{img}\" alt=\"{}\">",
        escape_html(SHARE_TITLE)
    );
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(SHARE_TITLE));
    let _ = writeln!(html, "<p>{}</p>", escape_html(SHARE_FOOTER));
    html.push_str("</main>\n<a href=\"/\">Create your own &rarr;</a>\n</body>\n</html>\n");
    html
}

/// Site card for the root page.
pub fn render_index_page() -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(SITE_TITLE));
    push_meta(&mut html, "name", "description", SITE_DESCRIPTION);
    push_meta(&mut html, "property", "og:title", SITE_TITLE);
    push_meta(&mut html, "property", "og:description", SITE_DESCRIPTION);
    push_meta(&mut html, "property", "og:site_name", SITE_NAME);
    push_meta(&mut html, "property", "og:type", "website");
    push_meta(&mut html, "property", "og:locale", "en_US");
    push_meta(&mut html, "property", "og:image", "/preview.jpg");
    push_meta(&mut html, "name", "twitter:card", "summary_large_image");
    push_meta(&mut html, "name", "twitter:creator", TWITTER_CREATOR);
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(SITE_NAME));
    let _ = writeln!(html, "<p>{}</p>", escape_html(SITE_DESCRIPTION));
    html.push_str("</body>\n</html>\n");
    html
}

fn push_meta(html: &mut String, attr: &str, key: &str, content: &str) {
    let _ = writeln!(
        html,
        "<meta {attr}=\"{key}\" content=\"{}\">",
        escape_html(content)
    );
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/share/landing.rs"]
mod tests;
