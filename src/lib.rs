//! Composition source specs and async loading of Lottie (bodymovin) animations.
//!
//! A [`CompositionSpec`] names exactly one place an animation definition lives: a bundled
//! resource, a URL, a filesystem path, an asset-relative path, inline JSON text, or a content URI.
//! It is a plain value with structural equality and no behavior of its own.
//!
//! A [`CompositionLoader`] turns a spec into a parsed, immutable [`Composition`]:
//!
//! 1. **Resolve**: read bytes from the [`ResourceTable`], the filesystem, a [`NetworkFetcher`] or a
//!    [`ContentResolver`], depending on the variant.
//! 2. **Parse**: decode the bodymovin JSON into a [`Composition`] and validate its timing.
//! 3. **Prepare**: decode image assets (embedded data URIs, or files in the configured images
//!    folder). Image failures become composition warnings, not errors.
//! 4. **Memoize**: results are cached per spec in a bounded [`CompositionCache`]; concurrent loads of
//!    an equal spec share one task.
//!
//! Every failure surfaces as a [`LottieError`] from the loader; building a spec cannot fail.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod composition;
mod foundation;
mod load;
mod spec;

pub use assets::decode::{decode_data_uri, decode_image, is_data_uri};
pub use assets::model::{ImageAsset, PreparedImage};
pub use composition::model::{
    BodymovinVersion, Composition, CompositionInfo, Font, Layer, LayerType, Marker,
};
pub use foundation::core::Rect;
pub use foundation::error::{LottieError, LottieResult};
pub use load::cache::{CacheKey, CompositionCache, DEFAULT_CACHE_CAPACITY};
pub use load::fetch::{FetchConfig, FetchedBody, NetworkFetcher, ReqwestFetcher};
pub use load::loader::{CompositionLoader, LoaderConfig, load_composition, normalize_rel_path};
pub use load::resolver::{ContentResolver, FileUriResolver};
pub use load::resources::{ResourceTable, Theme};
pub use spec::source::{CompositionSpec, ContentUri, ResourceId, SpecKind};
