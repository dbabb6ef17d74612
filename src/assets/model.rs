use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq)]
/// Image asset declared by a composition.
pub struct ImageAsset {
    /// Asset id referenced by image layers (`refId`).
    pub id: String,
    /// Declared width in pixels.
    pub width: u32,
    /// Declared height in pixels.
    pub height: u32,
    /// File name, or an inline `data:` URI.
    pub file_name: String,
    /// Directory prefix the exporter recorded. Informational; files are looked up by
    /// `file_name` inside the configured images folder.
    pub dir: String,
    /// Decoded pixels, when the loader could resolve them.
    pub bitmap: Option<PreparedImage>,
}

impl ImageAsset {
    /// Whether the image is embedded in the document as a data URI.
    pub fn is_embedded(&self) -> bool {
        crate::assets::decode::is_data_uri(&self.file_name)
    }
}
