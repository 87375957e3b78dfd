//! Vehicle catalog: wire rows, the in-memory catalog, and the one-shot loader.

pub mod loader;
pub mod model;
pub mod source;
