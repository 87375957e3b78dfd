//! Vehicle and artist selection state driving the caption.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::caption::{CaptionLimits, DEFAULT_ARTIST, PRESET_ARTISTS, caption};
use crate::catalog::model::{Catalog, VehicleOption};
use crate::foundation::error::{GnxError, GnxResult};

/// Current picks. The vehicle id owns the artwork and filename; `term` is only the caption noun.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    vehicle_id: Option<i64>,
    image_url: Option<String>,
    term: String,
    artist: String,
    limits: Option<CaptionLimits>,
}

impl Selection {
    /// Start from the first catalog entry, or an empty vehicle when the catalog is empty.
    pub fn initial(catalog: &Catalog, limits: Option<CaptionLimits>) -> Self {
        let mut sel = Self {
            vehicle_id: None,
            image_url: None,
            term: String::new(),
            artist: DEFAULT_ARTIST.to_string(),
            limits,
        };
        if let Some(first) = catalog.first() {
            sel.apply_vehicle(first);
        }
        sel
    }

    pub fn vehicle_id(&self) -> Option<i64> {
        self.vehicle_id
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    /// Resolve the selected vehicle record, if any.
    pub fn vehicle<'a>(&self, catalog: &'a Catalog) -> Option<&'a VehicleOption> {
        self.vehicle_id.and_then(|id| catalog.get(id))
    }

    pub fn caption(&self) -> String {
        caption(&self.term, &self.artist)
    }

    /// Pick a vehicle by id; image and caption term change together.
    pub fn select_vehicle(&mut self, catalog: &Catalog, id: i64) -> GnxResult<()> {
        let vehicle = catalog.require(id)?;
        self.apply_vehicle(vehicle);
        Ok(())
    }

    /// Swap the caption term for another label of the current vehicle.
    pub fn select_alternate(&mut self, catalog: &Catalog, name: &str) -> GnxResult<()> {
        let vehicle = self
            .vehicle(catalog)
            .ok_or_else(|| GnxError::validation("no vehicle selected"))?;
        if !vehicle.caption_terms().any(|t| t == name) {
            return Err(GnxError::validation(format!(
                "'{name}' is not a name of {}",
                vehicle.display_name
            )));
        }
        self.term = self.clamp_vehicle(name);
        Ok(())
    }

    /// Free-text vehicle entry.
    ///
    /// Text matching a display name selects that vehicle. Any other text becomes the caption term
    /// and unresolves the vehicle while keeping the current artwork.
    pub fn set_vehicle_text(&mut self, catalog: &Catalog, text: &str) {
        if let Some(vehicle) = catalog.by_display_name(text) {
            self.apply_vehicle(vehicle);
            return;
        }
        self.vehicle_id = None;
        self.term = self.clamp_vehicle(text);
    }

    pub fn set_artist(&mut self, artist: &str) {
        self.artist = match &self.limits {
            Some(l) => l.clamp_artist(artist),
            None => artist.to_string(),
        };
    }

    /// Draw a vehicle and a preset artist independently and uniformly.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, catalog: &Catalog, rng: &mut R) {
        if let Some(vehicle) = catalog.as_slice().choose(rng) {
            self.apply_vehicle(vehicle);
        }
        if let Some(artist) = PRESET_ARTISTS.choose(rng) {
            self.set_artist(artist);
        }
    }

    fn apply_vehicle(&mut self, vehicle: &VehicleOption) {
        self.vehicle_id = Some(vehicle.id);
        self.image_url = Some(vehicle.image_url.clone());
        self.term = self.clamp_vehicle(vehicle.default_term());
    }

    fn clamp_vehicle(&self, s: &str) -> String {
        match &self.limits {
            Some(l) => l.clamp_vehicle(s),
            None => s.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/selection.rs"]
mod tests;
