use async_trait::async_trait;

use crate::{
    foundation::error::{LottieError, LottieResult},
    spec::source::ContentUri,
};

/// Capability that opens [`ContentUri`] values.
///
/// Hosts with their own URI indirection (sandboxed document providers, virtual filesystems)
/// implement this and hand it to the loader.
#[async_trait]
pub trait ContentResolver: Send + Sync {
    /// Read the full content behind `uri`.
    async fn open(&self, uri: &ContentUri) -> LottieResult<Vec<u8>>;
}

/// Resolver for `file://` URIs. Every other scheme is unresolvable.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileUriResolver;

#[async_trait]
impl ContentResolver for FileUriResolver {
    async fn open(&self, uri: &ContentUri) -> LottieResult<Vec<u8>> {
        if uri.scheme() != Some("file") {
            return Err(LottieError::unresolvable_uri(uri.as_str()));
        }
        let parsed = url::Url::parse(uri.as_str())
            .map_err(|e| LottieError::unresolvable_uri(format!("{uri}: {e}")))?;
        let path = parsed
            .to_file_path()
            .map_err(|()| LottieError::unresolvable_uri(uri.as_str()))?;

        tokio::fs::read(&path)
            .await
            .map_err(|e| LottieError::from_io(e, path.display().to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/load/resolver.rs"]
mod tests;
