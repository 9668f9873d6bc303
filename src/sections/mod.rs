pub(crate) mod deco;
pub(crate) mod education;
pub(crate) mod hero;
pub(crate) mod projects;
pub(crate) mod reveal;
pub(crate) mod skills;
