use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let prepared = decode_image(&buf).unwrap();
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
fn decode_garbage_is_an_error() {
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn from_premul_checks_length() {
    assert!(PreparedImage::from_premul(2, 2, vec![0; 16]).is_ok());
    assert!(PreparedImage::from_premul(2, 2, vec![0; 12]).is_err());
    assert!(PreparedImage::from_premul(0, 2, vec![]).is_err());
}

#[test]
fn unpremultiply_restores_opaque_and_half_alpha() {
    let mut px = vec![10u8, 20, 30, 255, 64, 32, 0, 128, 9, 9, 9, 0];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[10, 20, 30, 255]);
    assert_eq!(&px[4..8], &[128, 64, 0, 128]);
    assert_eq!(&px[8..12], &[0, 0, 0, 0]);
}
