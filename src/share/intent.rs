use url::Url;

use crate::foundation::error::{GnxError, GnxResult};
use crate::share::key::validate_key;

/// Social-network compose endpoint that accepts `text` and `url` parameters.
pub const TWEET_INTENT_URL: &str = "https://twitter.com/intent/tweet";

/// Share-intent URL carrying `text` and, when present, a link to the uploaded image.
pub fn share_intent_url(text: &str, link: Option<&str>) -> String {
    let mut params = vec![("text", text)];
    if let Some(link) = link {
        params.push(("url", link));
    }
    // The base is a constant absolute URL; parsing cannot fail.
    Url::parse_with_params(TWEET_INTENT_URL, &params)
        .map(String::from)
        .unwrap_or_else(|_| TWEET_INTENT_URL.to_string())
}

/// `{site}/share/{key}`: the landing page that unfurls an uploaded image.
pub fn share_link(site_url: &Url, key: &str) -> GnxResult<Url> {
    validate_key(key)?;
    let mut url = site_url.clone();
    url.path_segments_mut()
        .map_err(|_| GnxError::config("site url cannot be a base"))?
        .pop_if_empty()
        .push("share")
        .push(key);
    Ok(url)
}

#[cfg(test)]
#[path = "../../tests/unit/share/intent.rs"]
mod tests;
