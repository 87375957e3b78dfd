//! Caption template and input limits.

/// Artists offered by the preset picker and drawn from by shuffle.
pub const PRESET_ARTISTS: &[&str] = &[
    "Anita Baker",
    "Luther Vandross",
    "Teddy Pendergrass",
    "Phyllis Hyman",
    "Marvin Gaye",
];

/// Artist used before the user picks one.
pub const DEFAULT_ARTIST: &str = "Anita Baker";

/// Render the fixed caption for a vehicle term and artist.
pub fn caption(term: &str, artist: &str) -> String {
    format!("Ridin' in my {term} with {artist} in the tape deck")
}

/// Maximum lengths, in characters, for the two caption inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CaptionLimits {
    pub vehicle: usize,
    pub artist: usize,
}

impl Default for CaptionLimits {
    fn default() -> Self {
        Self {
            vehicle: 32,
            artist: 40,
        }
    }
}

impl CaptionLimits {
    pub fn clamp_vehicle(&self, s: &str) -> String {
        truncate_chars(s, self.vehicle)
    }

    pub fn clamp_artist(&self, s: &str) -> String {
        truncate_chars(s, self.artist)
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
#[path = "../tests/unit/caption.rs"]
mod tests;
