use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::{
    assets::model::PreparedImage,
    foundation::error::{LottieError, LottieResult},
};

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> LottieResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Whether `source` is an inline `data:` URI rather than a file name.
pub fn is_data_uri(source: &str) -> bool {
    source.starts_with("data:")
}

/// Decode the payload of a base64 `data:<mime>;base64,<payload>` URI.
pub fn decode_data_uri(source: &str) -> LottieResult<Vec<u8>> {
    let rest = source
        .strip_prefix("data:")
        .ok_or_else(|| LottieError::validation("data uri must start with 'data:'"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| LottieError::validation("data uri is missing ',' separator"))?;
    if !meta.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(LottieError::unsupported(
            "only base64-encoded data uris are supported",
        ));
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| LottieError::validation(format!("invalid base64 in data uri: {e}")))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
