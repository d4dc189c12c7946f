use std::io::Cursor;

use super::*;

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([90, 120, 150, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn script(json: &str) -> ImpactScript {
    serde_json::from_str(json).unwrap()
}

#[test]
fn parses_minimal_script_with_defaults() {
    let s = script(
        r#"{"canvas": {"width": 32, "height": 24},
            "impacts": [{"tool": "mallet", "x": 0.5, "y": 0.5}]}"#,
    );
    assert_eq!(s.impacts[0].strength, Strength::default());
    assert_eq!(s.impacts[0].at_ms, 0.0);
    assert!(s.face.is_none());
    assert!(s.render_at_ms.is_none());
}

#[test]
fn replay_renders_canvas_sized_frame() {
    let s = script(
        r#"{"canvas": {"width": 32, "height": 24},
            "opts": {"rng_seed": 3},
            "impacts": [
              {"tool": "fist_punch", "x": 0.5, "y": 0.5, "strength": 80},
              {"tool": "skull", "x": 0.5, "y": 0.5, "at_ms": 10}
            ],
            "render_at_ms": 100}"#,
    );
    let frame = s.replay(&png(16, 12)).unwrap();
    assert_eq!((frame.width, frame.height), (32, 24));
    let plain = script(r#"{"canvas": {"width": 32, "height": 24}, "impacts": []}"#)
        .replay(&png(16, 12))
        .unwrap();
    assert_ne!(frame.data, plain.data);
}

#[test]
fn replay_is_deterministic_with_a_seed() {
    let json = r#"{"canvas": {"width": 24, "height": 24},
        "opts": {"rng_seed": 11},
        "crack_seed": 5,
        "impacts": [
          {"tool": "crack", "x": 0.4, "y": 0.4, "strength": 80},
          {"tool": "hand", "x": 0.6, "y": 0.6, "at_ms": 50}
        ],
        "render_at_ms": 300}"#;
    let a = script(json).replay(&png(24, 24)).unwrap();
    let b = script(json).replay(&png(24, 24)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn invalid_canvas_is_rejected() {
    let s = script(r#"{"canvas": {"width": 0, "height": 24}, "impacts": []}"#);
    assert!(matches!(s.replay(&png(4, 4)), Err(PoppetError::Validation(_))));
}
