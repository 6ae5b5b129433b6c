pub(crate) mod ease;
pub(crate) mod style;
pub(crate) mod timeline;
