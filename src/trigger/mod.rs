pub(crate) mod binding;
pub(crate) mod coordinator;
pub(crate) mod region;
pub(crate) mod threshold;
