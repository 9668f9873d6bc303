pub(crate) mod ease;
pub(crate) mod engine;
pub(crate) mod property;
pub(crate) mod timeline;
