use std::fmt;

/// Identifier of a bundled resource registered in a [`crate::ResourceTable`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ResourceId(pub u32);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ResourceId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Opaque URI handed to a [`crate::ContentResolver`].
///
/// The value is not parsed or validated on construction; interpreting it is up to the resolver.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ContentUri(String);

impl ContentUri {
    /// Wrap a URI string.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Borrow the raw URI text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Scheme portion before the first `:`, if any.
    pub fn scheme(&self) -> Option<&str> {
        let (scheme, _) = self.0.split_once(':')?;
        let valid = !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        valid.then_some(scheme)
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
/// Where a composition definition is loaded from.
///
/// Exactly one variant is active and its payload never changes after construction. The value
/// carries no loading state: hand it to a [`crate::CompositionLoader`] (or
/// [`crate::load_composition`]) and handle the returned `Result`. Every failure mode, from a
/// missing resource to malformed JSON, is reported there and never here.
///
/// Equality and hashing are structural, so a spec can key a memoization table directly.
pub enum CompositionSpec {
    /// A bundled resource registered ahead of time.
    Resource(ResourceId),
    /// A document fetched over the network.
    Url(String),
    /// A document read from an arbitrary filesystem path.
    File(String),
    /// A document read from the application asset tree, relative to the asset root.
    Asset(String),
    /// The full document text, already in memory.
    Json(String),
    /// A document opened through a content-resolution layer.
    ContentUri(ContentUri),
}

/// Fieldless discriminant of a [`CompositionSpec`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecKind {
    /// [`CompositionSpec::Resource`].
    Resource,
    /// [`CompositionSpec::Url`].
    Url,
    /// [`CompositionSpec::File`].
    File,
    /// [`CompositionSpec::Asset`].
    Asset,
    /// [`CompositionSpec::Json`].
    Json,
    /// [`CompositionSpec::ContentUri`].
    ContentUri,
}

impl CompositionSpec {
    /// Spec for a bundled resource.
    pub fn resource(id: impl Into<ResourceId>) -> Self {
        Self::Resource(id.into())
    }

    /// Spec for a remote URL.
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Spec for a filesystem path.
    pub fn file(path: impl Into<String>) -> Self {
        Self::File(path.into())
    }

    /// Spec for an asset-relative path.
    pub fn asset(path: impl Into<String>) -> Self {
        Self::Asset(path.into())
    }

    /// Spec for inline document text.
    pub fn json(text: impl Into<String>) -> Self {
        Self::Json(text.into())
    }

    /// Spec for a content URI.
    pub fn content_uri(uri: impl Into<String>) -> Self {
        Self::ContentUri(ContentUri::new(uri))
    }

    /// Which variant is active.
    pub fn kind(&self) -> SpecKind {
        match self {
            Self::Resource(_) => SpecKind::Resource,
            Self::Url(_) => SpecKind::Url,
            Self::File(_) => SpecKind::File,
            Self::Asset(_) => SpecKind::Asset,
            Self::Json(_) => SpecKind::Json,
            Self::ContentUri(_) => SpecKind::ContentUri,
        }
    }

    /// Resource id payload, if this is a [`CompositionSpec::Resource`].
    pub fn as_resource(&self) -> Option<ResourceId> {
        match self {
            Self::Resource(id) => Some(*id),
            _ => None,
        }
    }

    /// URL payload, if this is a [`CompositionSpec::Url`].
    pub fn as_url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            _ => None,
        }
    }

    /// Path payload, if this is a [`CompositionSpec::File`].
    pub fn as_file(&self) -> Option<&str> {
        match self {
            Self::File(path) => Some(path),
            _ => None,
        }
    }

    /// Relative path payload, if this is a [`CompositionSpec::Asset`].
    pub fn as_asset(&self) -> Option<&str> {
        match self {
            Self::Asset(path) => Some(path),
            _ => None,
        }
    }

    /// Document text, if this is a [`CompositionSpec::Json`].
    pub fn as_json(&self) -> Option<&str> {
        match self {
            Self::Json(text) => Some(text),
            _ => None,
        }
    }

    /// URI payload, if this is a [`CompositionSpec::ContentUri`].
    pub fn as_content_uri(&self) -> Option<&ContentUri> {
        match self {
            Self::ContentUri(uri) => Some(uri),
            _ => None,
        }
    }
}

impl fmt::Display for CompositionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource(id) => write!(f, "resource {id}"),
            Self::Url(url) => write!(f, "url '{url}'"),
            Self::File(path) => write!(f, "file '{path}'"),
            Self::Asset(path) => write!(f, "asset '{path}'"),
            Self::Json(text) => write!(f, "inline json ({} bytes)", text.len()),
            Self::ContentUri(uri) => write!(f, "content uri '{uri}'"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spec/source.rs"]
mod tests;
