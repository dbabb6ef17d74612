//! The parsed, stateless composition artifact produced by loading.

pub(crate) mod model;
pub(crate) mod raw;
