//! Caption compositing and JPEG export.

pub mod compositor;
pub mod wrap;
