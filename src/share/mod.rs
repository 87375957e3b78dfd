//! Share path: object keys, storage, intent links, delayed cleanup, and landing pages.

pub mod intent;
pub mod key;
pub mod landing;
pub mod scheduler;
pub mod service;
pub mod store;
