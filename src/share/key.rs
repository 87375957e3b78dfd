use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::foundation::error::{GnxError, GnxResult};

const SUFFIX_LEN: usize = 6;
const MAX_KEY_LEN: usize = 200;

/// Lowercase ASCII token with runs of other characters collapsed to a single `-`.
pub fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Collision-resistant object key: `{unix_millis}-{random}-{vehicle}-{artist}.jpg`.
///
/// Empty tokens are left out.
pub fn share_key<R: Rng + ?Sized>(unix_millis: i64, rng: &mut R, vehicle: &str, artist: &str) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_lowercase())
        .collect();

    let mut parts = vec![unix_millis.to_string(), suffix];
    parts.extend([slug(vehicle), slug(artist)].into_iter().filter(|t| !t.is_empty()));
    let mut key = parts.join("-");
    if key.len() > MAX_KEY_LEN - 4 {
        key.truncate(MAX_KEY_LEN - 4);
    }
    key.push_str(".jpg");
    key
}

/// Reject keys that could escape the share bucket or the landing route.
pub fn validate_key(key: &str) -> GnxResult<()> {
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return Err(GnxError::validation("share key length out of range"));
    }
    if key.contains(['/', '\\']) || key.contains("..") {
        return Err(GnxError::validation("share key must be a single path component"));
    }
    if key.chars().any(char::is_control) {
        return Err(GnxError::validation("share key contains control characters"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/share/key.rs"]
mod tests;
