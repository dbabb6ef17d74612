//! Turning a [`crate::CompositionSpec`] into a parsed [`crate::Composition`].
//!
//! The loader owns every side effect: reading bundled resources, the filesystem, the network and
//! content URIs, plus memoizing results per spec.

pub(crate) mod cache;
pub(crate) mod fetch;
pub(crate) mod loader;
pub(crate) mod resolver;
pub(crate) mod resources;
