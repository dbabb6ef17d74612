//! Descriptions of where a composition can be loaded from.

/// The closed set of composition source variants.
pub mod source;
