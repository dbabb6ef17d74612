use std::io::Cursor;

use base64::Engine as _;

use super::*;

fn png_1x1(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(1, 1, rgba.to_vec()).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let prepared = decode_image(&png_1x1([100, 50, 200, 128])).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn data_uri_roundtrips_png() {
    let png = png_1x1([1, 2, 3, 255]);
    let uri = format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&png)
    );
    assert!(is_data_uri(&uri));
    assert_eq!(decode_data_uri(&uri).unwrap(), png);
}

#[test]
fn data_uri_errors() {
    assert!(matches!(
        decode_data_uri("img_0.png"),
        Err(LottieError::Validation(_))
    ));
    assert!(matches!(
        decode_data_uri("data:image/png;base64"),
        Err(LottieError::Validation(_))
    ));
    assert!(matches!(
        decode_data_uri("data:text/plain,hello"),
        Err(LottieError::Unsupported(_))
    ));
    assert!(matches!(
        decode_data_uri("data:image/png;base64,@@@"),
        Err(LottieError::Validation(_))
    ));
}
