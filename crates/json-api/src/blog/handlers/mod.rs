//! Blog Handlers

pub(crate) mod categories;
pub(crate) mod get;
pub(crate) mod index;
