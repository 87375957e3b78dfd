//! Export actions: rendering with a latest-request-wins guard, and local downloads.

pub mod download;
pub mod exporter;
pub mod guard;
