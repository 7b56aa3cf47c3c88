//! Media Handlers

pub(crate) mod delete;
pub(crate) mod folders;
pub(crate) mod get;
pub(crate) mod image;
pub(crate) mod index;
pub(crate) mod update;
pub(crate) mod upload;
pub(crate) mod upload_url;
