//! Host seams and the in-memory doubles used by tests and the CLI.

pub(crate) mod document;
pub(crate) mod frames;
pub(crate) mod player;
pub(crate) mod surface;
