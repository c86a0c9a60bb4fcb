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
fn parse_svg_ok_and_err() {
    let ok = br#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2"></svg>"#;
    let tree = parse_svg(ok).unwrap();
    assert_eq!(tree.size().width(), 4.0);
    assert!(parse_svg(b"not svg").is_err());
}

#[test]
fn svg_sniffing() {
    assert!(looks_like_svg(b"  <svg xmlns='x'/>"));
    assert!(looks_like_svg(b"<?xml version=\"1.0\"?>\n<svg/>"));
    assert!(!looks_like_svg(b"\x89PNG\r\n"));
    assert!(!looks_like_svg(b""));
}

#[test]
fn transparent_pixels_are_zeroed() {
    let mut px = [10u8, 20, 30, 0, 255, 255, 255, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [0, 0, 0, 0, 255, 255, 255, 255]);
}
