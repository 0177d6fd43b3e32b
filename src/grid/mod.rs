pub(crate) mod config;
pub(crate) mod document;
pub(crate) mod events;
pub(crate) mod model;
