use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::OnceCell;
use url::Url;

use crate::{
    assets::decode as assets_decode,
    composition::model::Composition,
    foundation::error::{LottieError, LottieResult},
    load::cache::{CacheKey, CompositionCache, DEFAULT_CACHE_CAPACITY},
    load::fetch::{FetchConfig, NetworkFetcher, ReqwestFetcher},
    load::resolver::{ContentResolver, FileUriResolver},
    load::resources::{ResourceTable, Theme},
    spec::source::CompositionSpec,
};

/// Everything a [`CompositionLoader`] needs besides the [`CompositionSpec`] to load.
#[derive(Clone)]
pub struct LoaderConfig {
    /// Root directory that [`CompositionSpec::Asset`] paths are resolved against.
    pub asset_root: PathBuf,
    /// Folder under `asset_root` holding image assets referenced by compositions.
    ///
    /// When unset, only images embedded as data URIs are decoded.
    pub image_assets_folder: Option<String>,
    /// Bundled resources for [`CompositionSpec::Resource`].
    pub resources: Arc<ResourceTable>,
    /// Fetcher override for [`CompositionSpec::Url`]. When `None`, a [`ReqwestFetcher`] is built
    /// from `fetch` on first use.
    pub fetcher: Option<Arc<dyn NetworkFetcher>>,
    /// Settings for the default fetcher.
    pub fetch: FetchConfig,
    /// Resolver for [`CompositionSpec::ContentUri`].
    pub content_resolver: Arc<dyn ContentResolver>,
    /// Theme used to pick resource variants.
    pub theme: Theme,
    /// Number of compositions memoized by the loader; `0` disables caching.
    pub cache_capacity: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            image_assets_folder: None,
            resources: Arc::new(ResourceTable::new()),
            fetcher: None,
            fetch: FetchConfig::default(),
            content_resolver: Arc::new(FileUriResolver),
            theme: Theme::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl std::fmt::Debug for LoaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderConfig")
            .field("asset_root", &self.asset_root)
            .field("image_assets_folder", &self.image_assets_folder)
            .field("resources", &self.resources)
            .field("custom_fetcher", &self.fetcher.is_some())
            .field("fetch", &self.fetch)
            .field("theme", &self.theme)
            .field("cache_capacity", &self.cache_capacity)
            .finish()
    }
}

/// Loads compositions from [`CompositionSpec`] values and memoizes the results.
///
/// ```no_run
/// # async fn demo() -> lottie_loader::LottieResult<()> {
/// use lottie_loader::{CompositionLoader, CompositionSpec, LoaderConfig};
///
/// let loader = CompositionLoader::new(LoaderConfig::default());
/// let comp = loader
///     .load(&CompositionSpec::asset("animations/loader.json"))
///     .await?;
/// println!("{} frames", comp.duration_frames());
/// # Ok(())
/// # }
/// ```
pub struct CompositionLoader {
    config: LoaderConfig,
    cache: CompositionCache,
    default_fetcher: OnceCell<Arc<dyn NetworkFetcher>>,
}

impl CompositionLoader {
    /// Loader with its own cache sized by `config.cache_capacity`.
    pub fn new(config: LoaderConfig) -> Self {
        let cache = CompositionCache::new(config.cache_capacity);
        Self {
            config,
            cache,
            default_fetcher: OnceCell::new(),
        }
    }

    /// Configuration this loader was built with.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load `spec`, reusing a cached or in-flight result for an equal spec.
    #[tracing::instrument(skip_all, fields(spec = %spec))]
    pub async fn load(&self, spec: &CompositionSpec) -> LottieResult<Arc<Composition>> {
        let key = self.cache_key(spec);
        self.cache
            .get_or_try_load(&key, || async {
                self.load_uncached(spec).await.map(Arc::new)
            })
            .await
    }

    /// Load `spec` without consulting or filling the cache.
    pub async fn load_uncached(&self, spec: &CompositionSpec) -> LottieResult<Composition> {
        let bytes = self.read_source(spec).await?;
        let mut comp = Composition::from_json_slice(&bytes)?;
        self.prepare_images(&mut comp).await;
        tracing::debug!(
            frames = comp.duration_frames(),
            layers = comp.layers().len(),
            "loaded composition"
        );
        Ok(comp)
    }

    /// Cached composition for `spec`, if a previous load completed and is still retained.
    pub fn cached(&self, spec: &CompositionSpec) -> Option<Arc<Composition>> {
        self.cache.get(&self.cache_key(spec))
    }

    /// Forget every cached composition.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn cache_key(&self, spec: &CompositionSpec) -> CacheKey {
        CacheKey::new(spec.clone(), self.config.theme)
    }

    async fn read_source(&self, spec: &CompositionSpec) -> LottieResult<Vec<u8>> {
        match spec {
            CompositionSpec::Resource(id) => self
                .config
                .resources
                .get(*id, self.config.theme)
                .map(<[u8]>::to_vec)
                .ok_or(LottieError::ResourceNotFound(*id)),
            CompositionSpec::Url(raw) => {
                let url = Url::parse(raw)
                    .map_err(|e| LottieError::validation(format!("invalid url '{raw}': {e}")))?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(LottieError::validation(format!(
                        "url '{raw}' must use http or https"
                    )));
                }
                let body = self.fetcher().await?.fetch(&url).await?;
                if body
                    .content_type
                    .as_deref()
                    .is_some_and(|ct| ct.contains("zip"))
                {
                    return Err(LottieError::unsupported(format!(
                        "zip archive served from '{url}'"
                    )));
                }
                Ok(body.bytes)
            }
            CompositionSpec::File(path) => read_file(Path::new(path)).await,
            CompositionSpec::Asset(rel) => {
                let norm = normalize_rel_path(rel)?;
                read_file(&self.config.asset_root.join(norm)).await
            }
            CompositionSpec::Json(text) => Ok(text.clone().into_bytes()),
            CompositionSpec::ContentUri(uri) => self.config.content_resolver.open(uri).await,
        }
    }

    async fn fetcher(&self) -> LottieResult<Arc<dyn NetworkFetcher>> {
        if let Some(f) = &self.config.fetcher {
            return Ok(Arc::clone(f));
        }
        self.default_fetcher
            .get_or_try_init(|| async {
                let fetcher: Arc<dyn NetworkFetcher> =
                    Arc::new(ReqwestFetcher::new(self.config.fetch.clone())?);
                Ok::<_, LottieError>(fetcher)
            })
            .await
            .cloned()
    }

    async fn prepare_images(&self, comp: &mut Composition) {
        let images_dir = self
            .config
            .image_assets_folder
            .as_deref()
            .map(|folder| self.config.asset_root.join(folder));

        let mut warnings = Vec::new();
        for image in comp.images_mut() {
            let bytes = if image.is_embedded() {
                assets_decode::decode_data_uri(&image.file_name)
            } else if let Some(dir) = &images_dir {
                match normalize_rel_path(&image.file_name) {
                    Ok(rel) => read_file(&dir.join(rel)).await,
                    Err(e) => Err(e),
                }
            } else {
                continue;
            };

            match bytes.and_then(|b| assets_decode::decode_image(&b)) {
                Ok(bitmap) => image.bitmap = Some(bitmap),
                Err(e) => {
                    tracing::warn!(image = %image.id, error = %e, "failed to load image asset");
                    warnings.push(format!("image '{}' could not be loaded: {e}", image.id));
                }
            }
        }
        for w in warnings {
            comp.push_warning(w);
        }
    }
}

impl std::fmt::Debug for CompositionLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositionLoader")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish()
    }
}

/// One-shot load of `spec` with `config`, bypassing any cache.
pub async fn load_composition(
    spec: &CompositionSpec,
    config: &LoaderConfig,
) -> LottieResult<Arc<Composition>> {
    let loader = CompositionLoader::new(LoaderConfig {
        cache_capacity: 0,
        ..config.clone()
    });
    loader.load_uncached(spec).await.map(Arc::new)
}

async fn read_file(path: &Path) -> LottieResult<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| LottieError::from_io(e, path.display().to_string()))
}

/// Normalize and validate asset-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> LottieResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(LottieError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(LottieError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(LottieError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(LottieError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/load/loader.rs"]
mod tests;
