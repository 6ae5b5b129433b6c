pub(crate) mod physics;
