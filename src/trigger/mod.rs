pub(crate) mod config;
pub(crate) mod phase;
pub(crate) mod registry;
pub(crate) mod toggle;
