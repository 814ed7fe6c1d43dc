use super::*;

fn png_bytes(rgba: Vec<u8>, w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn png_decodes_to_premultiplied_pixels() {
    let prepared =
        decode_image("images/dot.png", &png_bytes(vec![100, 50, 200, 128], 1, 1)).unwrap();
    assert_eq!((prepared.width, prepared.height), (1, 1));
    assert_eq!(prepared.rgba8_premul.as_slice(), &[50, 25, 100, 128]);
}

#[test]
fn transparent_pixels_lose_their_color() {
    let prepared = decode_image(
        "images/pair.png",
        &png_bytes(vec![9, 9, 9, 0, 1, 2, 3, 255], 2, 1),
    )
    .unwrap();
    assert_eq!(prepared.rgba8_premul.as_slice(), &[0, 0, 0, 0, 1, 2, 3, 255]);
}

#[test]
fn format_comes_from_the_bytes() {
    // A PNG saved under a misleading extension still decodes.
    let prepared =
        decode_image("images/photo.jpg", &png_bytes(vec![0, 0, 0, 255], 1, 1)).unwrap();
    assert_eq!(prepared.rgba8_premul.as_slice(), &[0, 0, 0, 255]);
}

#[test]
fn unrecognized_bytes_name_the_source() {
    let err = decode_image("images/notes.txt", b"not an image").unwrap_err();
    assert!(matches!(err, CastError::Validation(_)));
    assert!(err.to_string().contains("images/notes.txt"));
}

#[test]
fn truncated_png_is_an_error() {
    let mut bytes = png_bytes(vec![1, 2, 3, 255], 1, 1);
    bytes.truncate(bytes.len() / 2);
    assert!(decode_image("images/cut.png", &bytes).is_err());
}
