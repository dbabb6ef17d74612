//! Serde mirror of the bodymovin JSON layout.
//!
//! Only the fields the loader needs are declared; everything else in the document is ignored.

#[derive(Debug, serde::Deserialize)]
pub(crate) struct RawComposition {
    #[serde(rename = "v", default)]
    pub version: Option<String>,
    #[serde(rename = "nm", default)]
    pub name: Option<String>,
    #[serde(rename = "w", default)]
    pub width: f64,
    #[serde(rename = "h", default)]
    pub height: f64,
    #[serde(rename = "fr")]
    pub frame_rate: f32,
    #[serde(rename = "ip", default)]
    pub in_point: f32,
    #[serde(rename = "op")]
    pub out_point: f32,
    #[serde(default)]
    pub layers: Vec<RawLayer>,
    #[serde(default)]
    pub assets: Vec<RawAsset>,
    #[serde(default)]
    pub markers: Vec<RawMarker>,
    #[serde(default)]
    pub fonts: Option<RawFonts>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct RawLayer {
    #[serde(rename = "ind", default)]
    pub index: Option<i64>,
    #[serde(rename = "nm", default)]
    pub name: Option<String>,
    #[serde(rename = "ty", default = "unknown_layer_type")]
    pub layer_type: i64,
    #[serde(default)]
    pub parent: Option<i64>,
    #[serde(rename = "refId", default)]
    pub ref_id: Option<String>,
    #[serde(rename = "ip", default)]
    pub in_point: f32,
    #[serde(rename = "op", default)]
    pub out_point: f32,
}

fn unknown_layer_type() -> i64 {
    -1
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct RawAsset {
    pub id: String,
    #[serde(default)]
    pub layers: Option<Vec<RawLayer>>,
    #[serde(rename = "w", default)]
    pub width: Option<f64>,
    #[serde(rename = "h", default)]
    pub height: Option<f64>,
    #[serde(rename = "p", default)]
    pub file_name: Option<String>,
    #[serde(rename = "u", default)]
    pub dir: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct RawMarker {
    #[serde(rename = "cm", default)]
    pub name: String,
    #[serde(rename = "tm", default)]
    pub start_frame: f32,
    #[serde(rename = "dr", default)]
    pub duration_frames: f32,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct RawFonts {
    #[serde(default)]
    pub list: Vec<RawFont>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct RawFont {
    #[serde(rename = "fFamily", default)]
    pub family: String,
    #[serde(rename = "fName", default)]
    pub name: String,
    #[serde(rename = "fStyle", default)]
    pub style: String,
    #[serde(default)]
    pub ascent: f32,
}
