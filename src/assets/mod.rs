//! Source artwork loading and decoding, plus caption font layout.

pub mod decode;
pub mod fetch;
pub mod text;
