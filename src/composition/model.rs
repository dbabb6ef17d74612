use std::{collections::BTreeMap, time::Duration};

use crate::{
    assets::model::ImageAsset,
    composition::raw::{RawComposition, RawLayer},
    foundation::core::Rect,
    foundation::error::{LottieError, LottieResult},
    foundation::math::lerp_f32,
};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const MIN_SUPPORTED_VERSION: BodymovinVersion = BodymovinVersion {
    major: 4,
    minor: 4,
    patch: 0,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
/// Exporter version recorded in the document's `v` field.
pub struct BodymovinVersion {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch component.
    pub patch: u32,
}

impl BodymovinVersion {
    /// Parse a dotted `major.minor.patch` string; missing components default to zero.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().split('.');
        let mut next = || -> Option<u32> {
            match parts.next() {
                Some(p) => p.trim().parse().ok(),
                None => Some(0),
            }
        };
        let major = next()?;
        let minor = next()?;
        let patch = next()?;
        Some(Self {
            major,
            minor,
            patch,
        })
    }
}

impl std::fmt::Display for BodymovinVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
/// Layer kind, from the `ty` field.
pub enum LayerType {
    /// Nested composition (`0`).
    Precomp,
    /// Solid color (`1`).
    Solid,
    /// Raster image (`2`).
    Image,
    /// Invisible transform parent (`3`).
    Null,
    /// Vector shapes (`4`).
    Shape,
    /// Text (`5`).
    Text,
    /// Anything else.
    Unknown,
}

impl LayerType {
    fn from_raw(ty: i64) -> Self {
        match ty {
            0 => Self::Precomp,
            1 => Self::Solid,
            2 => Self::Image,
            3 => Self::Null,
            4 => Self::Shape,
            5 => Self::Text,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Summary of one layer.
pub struct Layer {
    /// Layer index (`ind`), used for parenting.
    pub index: Option<i64>,
    /// Layer name.
    pub name: String,
    /// Layer kind.
    pub layer_type: LayerType,
    /// Parent layer index.
    pub parent: Option<i64>,
    /// Referenced asset id for image and precomp layers.
    pub ref_id: Option<String>,
    /// First frame the layer is visible.
    pub in_point: f32,
    /// Frame after which the layer is hidden.
    pub out_point: f32,
}

impl From<RawLayer> for Layer {
    fn from(raw: RawLayer) -> Self {
        Self {
            index: raw.index,
            name: raw.name.unwrap_or_default(),
            layer_type: LayerType::from_raw(raw.layer_type),
            parent: raw.parent,
            ref_id: raw.ref_id,
            in_point: raw.in_point,
            out_point: raw.out_point,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Named time range authored in After Effects.
pub struct Marker {
    /// Marker comment/name.
    pub name: String,
    /// Start frame.
    pub start_frame: f32,
    /// Length in frames.
    pub duration_frames: f32,
}

impl Marker {
    /// Compare against `name`, ignoring the trailing `\r` some exporters append.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.name.strip_suffix('\r') == Some(name)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Font declared in the document's font list.
pub struct Font {
    /// Family name.
    pub family: String,
    /// Full font name.
    pub name: String,
    /// Style name.
    pub style: String,
    /// Ascent, in percent of the font size.
    pub ascent: f32,
}

#[derive(Clone, Debug, PartialEq)]
/// A parsed Lottie composition.
///
/// Compositions are immutable once loaded and are shared behind `Arc` by the loader cache.
pub struct Composition {
    version: Option<BodymovinVersion>,
    name: Option<String>,
    width: u32,
    height: u32,
    frame_rate: f32,
    start_frame: f32,
    end_frame: f32,
    duration: Duration,
    layers: Vec<Layer>,
    precomps: BTreeMap<String, Vec<Layer>>,
    images: BTreeMap<String, ImageAsset>,
    markers: Vec<Marker>,
    fonts: Vec<Font>,
    warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Serializable overview of a [`Composition`].
pub struct CompositionInfo {
    /// Exporter version, when present.
    pub version: Option<String>,
    /// Composition name.
    pub name: Option<String>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frames per second.
    pub frame_rate: f32,
    /// First frame.
    pub start_frame: f32,
    /// Last frame.
    pub end_frame: f32,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Number of top-level layers.
    pub layer_count: usize,
    /// Number of precomposition assets.
    pub precomp_count: usize,
    /// Image asset ids.
    pub images: Vec<String>,
    /// Markers.
    pub markers: Vec<Marker>,
    /// Fonts.
    pub fonts: Vec<Font>,
    /// Non-fatal issues found while loading.
    pub warnings: Vec<String>,
}

impl Composition {
    /// Parse a bodymovin JSON document.
    pub fn from_json_slice(bytes: &[u8]) -> LottieResult<Self> {
        if bytes.starts_with(ZIP_MAGIC) {
            return Err(LottieError::unsupported(
                "zip archives (dotLottie) are not supported",
            ));
        }
        let raw: RawComposition = serde_json::from_slice(bytes)?;
        Self::from_raw(raw)
    }

    /// Parse a bodymovin JSON document from text.
    pub fn from_json_str(text: &str) -> LottieResult<Self> {
        Self::from_json_slice(text.as_bytes())
    }

    fn from_raw(raw: RawComposition) -> LottieResult<Self> {
        if !raw.frame_rate.is_finite() || raw.frame_rate <= 0.0 {
            return Err(LottieError::validation(
                "composition frame rate 'fr' must be finite and > 0",
            ));
        }
        if !raw.in_point.is_finite() || !raw.out_point.is_finite() {
            return Err(LottieError::validation(
                "composition 'ip'/'op' must be finite",
            ));
        }
        if raw.out_point < raw.in_point {
            return Err(LottieError::validation(
                "composition 'op' must be >= 'ip'",
            ));
        }
        let width = dimension(raw.width, "w")?;
        let height = dimension(raw.height, "h")?;
        let duration = duration_of(raw.in_point, raw.out_point, raw.frame_rate)?;

        let mut warnings = Vec::new();
        let version = match raw.version.as_deref() {
            Some(v) => {
                let parsed = BodymovinVersion::parse(v);
                match parsed {
                    Some(parsed) if parsed < MIN_SUPPORTED_VERSION => warnings.push(format!(
                        "bodymovin {parsed} is older than the supported minimum {MIN_SUPPORTED_VERSION}"
                    )),
                    Some(_) => {}
                    None => warnings.push(format!("unparseable bodymovin version '{v}'")),
                }
                parsed
            }
            None => None,
        };

        let mut precomps = BTreeMap::new();
        let mut images = BTreeMap::new();
        for asset in raw.assets {
            if let Some(layers) = asset.layers {
                precomps.insert(asset.id, layers.into_iter().map(Layer::from).collect());
                continue;
            }
            let Some(file_name) = asset.file_name else {
                warnings.push(format!("asset '{}' is neither a precomp nor an image", asset.id));
                continue;
            };
            let image = ImageAsset {
                id: asset.id.clone(),
                width: dimension(asset.width.unwrap_or(0.0), "asset w")?,
                height: dimension(asset.height.unwrap_or(0.0), "asset h")?,
                file_name,
                dir: asset.dir.unwrap_or_default(),
                bitmap: None,
            };
            images.insert(asset.id, image);
        }

        let layers: Vec<Layer> = raw.layers.into_iter().map(Layer::from).collect();
        for layer in &layers {
            if layer.layer_type == LayerType::Unknown {
                warnings.push(format!("layer '{}' has an unknown type", layer.name));
            }
            if let (LayerType::Precomp, Some(id)) = (layer.layer_type, layer.ref_id.as_deref())
                && !precomps.contains_key(id)
            {
                warnings.push(format!(
                    "layer '{}' references missing precomp '{id}'",
                    layer.name
                ));
            }
        }

        let markers = raw
            .markers
            .into_iter()
            .map(|m| Marker {
                name: m.name,
                start_frame: m.start_frame,
                duration_frames: m.duration_frames,
            })
            .collect();

        let fonts = raw
            .fonts
            .map(|f| f.list)
            .unwrap_or_default()
            .into_iter()
            .map(|f| Font {
                family: f.family,
                name: f.name,
                style: f.style,
                ascent: f.ascent,
            })
            .collect();

        for w in &warnings {
            tracing::warn!("{w}");
        }

        Ok(Self {
            version,
            name: raw.name,
            width,
            height,
            frame_rate: raw.frame_rate,
            start_frame: raw.in_point,
            end_frame: raw.out_point,
            duration,
            layers,
            precomps,
            images,
            markers,
            fonts,
            warnings,
        })
    }

    /// Exporter version, when present and parseable.
    pub fn version(&self) -> Option<BodymovinVersion> {
        self.version
    }

    /// Composition name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Canvas bounds at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Frames per second.
    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    /// First frame (`ip`).
    pub fn start_frame(&self) -> f32 {
        self.start_frame
    }

    /// Last frame (`op`).
    pub fn end_frame(&self) -> f32 {
        self.end_frame
    }

    /// Length in frames.
    pub fn duration_frames(&self) -> f32 {
        self.end_frame - self.start_frame
    }

    /// Wall-clock length at the authored frame rate.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Frame at `progress` in `[0, 1]`; out-of-range values are clamped.
    pub fn frame_for_progress(&self, progress: f32) -> f32 {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        lerp_f32(self.start_frame, self.end_frame, p)
    }

    /// Inverse of [`Composition::frame_for_progress`].
    pub fn progress_for_frame(&self, frame: f32) -> f32 {
        let len = self.duration_frames();
        if len <= 0.0 || frame.is_nan() {
            return 0.0;
        }
        ((frame - self.start_frame) / len).clamp(0.0, 1.0)
    }

    /// Top-level layers in document order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Top-level layer with the given `ind`.
    pub fn layer_by_index(&self, index: i64) -> Option<&Layer> {
        self.layers.iter().find(|l| l.index == Some(index))
    }

    /// Layers of the precomp asset `id`.
    pub fn precomp(&self, id: &str) -> Option<&[Layer]> {
        self.precomps.get(id).map(Vec::as_slice)
    }

    /// Image assets keyed by id.
    pub fn images(&self) -> &BTreeMap<String, ImageAsset> {
        &self.images
    }

    /// Image asset `id`.
    pub fn image(&self, id: &str) -> Option<&ImageAsset> {
        self.images.get(id)
    }

    pub(crate) fn images_mut(&mut self) -> impl Iterator<Item = &mut ImageAsset> {
        self.images.values_mut()
    }

    /// Markers in document order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// First marker matching `name`.
    pub fn marker(&self, name: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.matches_name(name))
    }

    /// Declared fonts.
    pub fn fonts(&self) -> &[Font] {
        &self.fonts
    }

    /// Non-fatal issues collected while parsing and loading.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub(crate) fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Serializable overview.
    pub fn summary(&self) -> CompositionInfo {
        CompositionInfo {
            version: self.version.map(|v| v.to_string()),
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            frame_rate: self.frame_rate,
            start_frame: self.start_frame,
            end_frame: self.end_frame,
            duration_secs: self.duration().as_secs_f64(),
            layer_count: self.layers.len(),
            precomp_count: self.precomps.len(),
            images: self.images.keys().cloned().collect(),
            markers: self.markers.clone(),
            fonts: self.fonts.clone(),
            warnings: self.warnings.clone(),
        }
    }
}

fn duration_of(in_point: f32, out_point: f32, frame_rate: f32) -> LottieResult<Duration> {
    let frames = out_point - in_point;
    if !frames.is_finite() {
        return Err(LottieError::validation(
            "composition length 'op' - 'ip' overflows",
        ));
    }
    Duration::try_from_secs_f64(f64::from(frames) / f64::from(frame_rate)).map_err(|e| {
        LottieError::validation(format!("composition duration is not representable: {e}"))
    })
}

fn dimension(v: f64, field: &str) -> LottieResult<u32> {
    if !v.is_finite() || v < 0.0 || v > f64::from(u32::MAX) {
        return Err(LottieError::validation(format!(
            "'{field}' must be a finite non-negative size"
        )));
    }
    Ok(v.round() as u32)
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
