//! Runtime configuration: an optional JSON file overlaid with `GNX_*` environment variables.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::caption::CaptionLimits;
use crate::catalog::model::CatalogOrder;
use crate::compose::compositor::CaptionStyle;
use crate::foundation::error::{GnxError, GnxResult};
use crate::supabase::SupabaseClient;

pub const ENV_SUPABASE_URL: &str = "GNX_SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "GNX_SUPABASE_ANON_KEY";
pub const ENV_SITE_URL: &str = "GNX_SITE_URL";
pub const ENV_FONT_PATH: &str = "GNX_FONT_PATH";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub vehicle_table: String,
    pub catalog_order: CatalogOrder,
    pub share_bucket: String,
    /// Public origin of the share-landing pages.
    pub site_url: String,
    /// TTF/OTF used for captions.
    pub font_path: Option<PathBuf>,
    pub share_retention_secs: u64,
    /// Unset means image and catalog requests may hang indefinitely.
    pub fetch_timeout_secs: Option<u64>,
    pub truncate_caption: bool,
    pub caption_style: CaptionStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_anon_key: None,
            vehicle_table: "vehicles".to_string(),
            catalog_order: CatalogOrder::Priority,
            share_bucket: "social-shares".to_string(),
            site_url: "https://gnx.world".to_string(),
            font_path: None,
            share_retention_secs: 3600,
            fetch_timeout_secs: None,
            truncate_caption: true,
            caption_style: CaptionStyle::default(),
        }
    }
}

impl Config {
    pub fn from_reader<R: Read>(r: R) -> GnxResult<Self> {
        serde_json::from_reader(r).map_err(|e| GnxError::config(format!("parse config: {e}")))
    }

    /// Read `path` when given, then overlay the process environment and validate.
    pub fn load(path: Option<&Path>) -> GnxResult<Self> {
        let mut cfg = match path {
            Some(p) => {
                let f = File::open(p).map_err(|e| {
                    GnxError::config(format!("open config '{}': {e}", p.display()))
                })?;
                Self::from_reader(BufReader::new(f))?
            }
            None => Self::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Overlay values from `lookup`; empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_SUPABASE_URL) {
            self.supabase_url = Some(v);
        }
        if let Some(v) = get(ENV_SUPABASE_ANON_KEY) {
            self.supabase_anon_key = Some(v);
        }
        if let Some(v) = get(ENV_SITE_URL) {
            self.site_url = v;
        }
        if let Some(v) = get(ENV_FONT_PATH) {
            self.font_path = Some(PathBuf::from(v));
        }
    }

    pub fn validate(&self) -> GnxResult<()> {
        if self.share_retention_secs == 0 {
            return Err(GnxError::config("share_retention_secs must be > 0"));
        }
        if self.vehicle_table.trim().is_empty() || self.share_bucket.trim().is_empty() {
            return Err(GnxError::config("vehicle_table and share_bucket must be non-empty"));
        }
        self.site_url()?;
        let style = &self.caption_style;
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(style.font_scale) || !positive(style.line_spacing) {
            return Err(GnxError::config(
                "caption font_scale and line_spacing must be finite and > 0",
            ));
        }
        if !positive(style.wrap_ratio) || style.wrap_ratio > 1.0 {
            return Err(GnxError::config("caption wrap_ratio must be in (0, 1]"));
        }
        match (&self.supabase_url, &self.supabase_anon_key) {
            (Some(_), None) => Err(GnxError::config(format!(
                "supabase url set without an anon key ({ENV_SUPABASE_ANON_KEY})"
            ))),
            (Some(u), Some(_)) if u.trim().is_empty() => {
                Err(GnxError::config("supabase url must be non-empty"))
            }
            _ => Ok(()),
        }
    }

    pub fn site_url(&self) -> GnxResult<Url> {
        Url::parse(&self.site_url)
            .map_err(|e| GnxError::config(format!("invalid site url '{}': {e}", self.site_url)))
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.share_retention_secs)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }

    pub fn caption_limits(&self) -> Option<CaptionLimits> {
        self.truncate_caption.then(CaptionLimits::default)
    }

    /// Client for the hosted store, or `None` when no project is configured.
    pub fn supabase_client(&self) -> GnxResult<Option<SupabaseClient>> {
        match (&self.supabase_url, &self.supabase_anon_key) {
            (Some(url), Some(key)) => {
                Ok(Some(SupabaseClient::new(url, key.clone(), self.fetch_timeout())?))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
