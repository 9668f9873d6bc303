pub(crate) mod scroll_scene;
pub(crate) mod section;
pub(crate) mod spec;
