//! Explicitly constructed HTTP client for the hosted data and object store.

use std::time::Duration;

use url::Url;

use crate::foundation::error::{GnxError, GnxResult};

/// Connection to one Supabase project, shared by the catalog source and the share store.
#[derive(Clone, Debug)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: Url,
    anon_key: String,
}

impl SupabaseClient {
    /// Build a client; `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: &str, anon_key: impl Into<String>, timeout: Option<Duration>) -> GnxResult<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| GnxError::config(format!("invalid supabase url '{base_url}': {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder
            .build()
            .map_err(|e| GnxError::config(format!("build http client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            anon_key: anon_key.into(),
        })
    }

    /// Join path segments onto the project URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> GnxResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|_| GnxError::config("supabase url cannot be a base"))?;
            parts.pop_if_empty();
            for seg in segments {
                parts.push(seg);
            }
        }
        Ok(url)
    }

    pub(crate) fn get(&self, url: Url) -> reqwest::RequestBuilder {
        self.authed(self.http.get(url))
    }

    pub(crate) fn post(&self, url: Url) -> reqwest::RequestBuilder {
        self.authed(self.http.post(url))
    }

    pub(crate) fn delete(&self, url: Url) -> reqwest::RequestBuilder {
        self.authed(self.http.delete(url))
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }
}

/// Turn a non-success response into an error carrying the body text.
pub(crate) async fn check_status(resp: reqwest::Response, what: &str) -> GnxResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(GnxError::fetch(format!("{what} failed with {status}: {body}")))
}

#[cfg(test)]
#[path = "../tests/unit/supabase.rs"]
mod tests;
