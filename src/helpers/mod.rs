//! Helper functions

pub mod html;
pub mod slugify;
pub mod url;
