use std::io::Cursor;

use super::*;

fn png(w: u32, h: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_premultiplies() {
    let bytes = png(1, 1, vec![100, 50, 200, 128]);
    let img = BackingImage::decode(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (1, 1));
    assert_eq!(
        img.data(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    let err = BackingImage::decode(b"definitely not an image").unwrap_err();
    assert!(matches!(err, PoppetError::Decode(_)));
}

#[test]
fn length_mismatch_is_rejected() {
    assert!(BackingImage::from_premul_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(BackingImage::from_premul_rgba8(0, 2, vec![]).is_err());
}

#[test]
fn png_round_trip_keeps_opaque_pixels() {
    let rgba: Vec<u8> = (0..16u8).flat_map(|i| [i * 10, 255 - i, i, 255]).collect();
    let img = BackingImage::from_premul_rgba8(4, 4, rgba.clone()).unwrap();
    let back = BackingImage::decode(&img.encode_png().unwrap()).unwrap();
    assert_eq!(back.data(), rgba.as_slice());
}

#[test]
fn sample_clamps_and_unpremultiplies() {
    let img = BackingImage::from_premul_rgba8(2, 1, vec![10, 20, 30, 255, 50, 0, 0, 128]).unwrap();
    assert_eq!(img.sample(Point::new(-5.0, 0.0)), Rgba8::new(10, 20, 30, 1.0));
    let right = img.sample(Point::new(99.0, 99.0));
    assert_eq!((right.r, right.g, right.b), (100, 0, 0));
}

#[test]
fn revision_tracks_mutation() {
    let mut img = BackingImage::from_premul_rgba8(40, 40, vec![255; 40 * 40 * 4]).unwrap();
    assert_eq!(img.revision(), 0);
    assert!(!img.apply_vortex(Point::new(20.0, 20.0), 0.0));
    assert_eq!(img.revision(), 0);
    assert!(img.apply_vortex(Point::new(20.0, 20.0), 1.0));
    assert_eq!(img.revision(), 1);

    let other = BackingImage::from_premul_rgba8(2, 2, vec![0; 16]).unwrap();
    img.replace_with(other);
    assert_eq!(img.width(), 2);
    assert_eq!(img.revision(), 2);
}
