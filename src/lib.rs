//! GNX World cover-art generator.
//!
//! Pick a vehicle and an artist, caption the vehicle's artwork with
//! `Ridin' in my {vehicle} with {artist} in the tape deck`, then download the JPEG or share it
//! through an object store and a share-landing page.
//!
//! - Load a [`Catalog`] from a [`CatalogSource`]
//! - Drive a [`Selection`] (or the whole [`CoverArtGenerator`] session)
//! - Render with the [`Compositor`] and share with a [`ShareService`]
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
pub mod caption;
pub mod catalog;
pub mod compose;
pub mod config;
pub mod export;
pub mod generator;
pub mod selection;
pub mod share;
pub mod supabase;

pub use crate::foundation::core::{Canvas, Point, Rgba8};
pub use crate::foundation::error::{GnxError, GnxResult};

pub use crate::assets::fetch::{HttpImageFetcher, ImageFetcher};
pub use crate::caption::{CaptionLimits, DEFAULT_ARTIST, PRESET_ARTISTS, caption};
pub use crate::catalog::loader::{CatalogState, load_catalog};
pub use crate::catalog::model::{Catalog, CatalogOrder, VehicleOption, VehicleRow};
pub use crate::catalog::source::{CatalogSource, StaticCatalog, SupabaseCatalog};
pub use crate::compose::compositor::{CaptionStyle, Compositor, RenderedImage};
pub use crate::config::Config;
pub use crate::export::exporter::{Export, Exporter};
pub use crate::generator::CoverArtGenerator;
pub use crate::selection::Selection;
pub use crate::share::service::{ShareOutcome, ShareService};
pub use crate::share::store::{MemoryObjectStore, ObjectStore, SupabaseStorage, UploadOptions};
pub use crate::supabase::SupabaseClient;
