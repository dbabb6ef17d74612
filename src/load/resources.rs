use std::{collections::HashMap, sync::Arc};

use crate::spec::source::ResourceId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// UI theme used to pick resource variants.
pub enum Theme {
    /// Light appearance; also the fallback for every lookup.
    #[default]
    Day,
    /// Dark appearance.
    Night,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Day => "day",
            Self::Night => "night",
        })
    }
}

#[derive(Clone)]
enum ResourceBytes {
    Static(&'static [u8]),
    Shared(Arc<[u8]>),
}

impl ResourceBytes {
    fn as_slice(&self) -> &[u8] {
        match self {
            Self::Static(b) => b,
            Self::Shared(b) => b,
        }
    }
}

#[derive(Clone, Default)]
/// Bundled compositions addressable by [`ResourceId`].
///
/// Typically filled at startup from `include_bytes!` data:
///
/// ```
/// use lottie_loader::{ResourceId, ResourceTable};
///
/// const LOADER: ResourceId = ResourceId(1);
/// let mut table = ResourceTable::new();
/// table.register_static(LOADER, br#"{"fr":30,"ip":0,"op":30}"#);
/// assert!(table.contains(LOADER));
/// ```
pub struct ResourceTable {
    entries: HashMap<(ResourceId, Theme), ResourceBytes>,
}

impl ResourceTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register static bytes as the default variant of `id`.
    pub fn register_static(&mut self, id: ResourceId, bytes: &'static [u8]) -> &mut Self {
        self.entries
            .insert((id, Theme::Day), ResourceBytes::Static(bytes));
        self
    }

    /// Register owned bytes as the default variant of `id`.
    pub fn register(&mut self, id: ResourceId, bytes: impl Into<Arc<[u8]>>) -> &mut Self {
        self.entries
            .insert((id, Theme::Day), ResourceBytes::Shared(bytes.into()));
        self
    }

    /// Register a theme-specific variant of `id`.
    pub fn register_themed(
        &mut self,
        id: ResourceId,
        theme: Theme,
        bytes: impl Into<Arc<[u8]>>,
    ) -> &mut Self {
        self.entries
            .insert((id, theme), ResourceBytes::Shared(bytes.into()));
        self
    }

    /// Bytes of `id` for `theme`, falling back to the default variant.
    pub fn get(&self, id: ResourceId, theme: Theme) -> Option<&[u8]> {
        self.entries
            .get(&(id, theme))
            .or_else(|| self.entries.get(&(id, Theme::Day)))
            .map(ResourceBytes::as_slice)
    }

    /// Whether any variant of `id` is registered.
    pub fn contains(&self, id: ResourceId) -> bool {
        self.entries.keys().any(|(k, _)| *k == id)
    }

    /// Number of registered entries, counting each theme variant.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ResourceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceTable")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/load/resources.rs"]
mod tests;
