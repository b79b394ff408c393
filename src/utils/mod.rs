//! Utility modules shared by the site pipeline and the content client.

pub mod mime;
pub mod minify;
