//! Content Handlers

pub(crate) mod blocks;
pub(crate) mod languages;
pub(crate) mod testimonials;
