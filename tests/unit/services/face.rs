use super::*;

fn raw(x: f64, y: f64, width: f64, height: f64) -> RawFaceBox {
    RawFaceBox {
        x,
        y,
        width,
        height,
    }
}

#[test]
fn fractions_pass_through() {
    let r = normalize_face_box(raw(0.3, 0.2, 0.3, 0.4)).unwrap();
    assert_eq!((r.x, r.y, r.width, r.height), (0.3, 0.2, 0.3, 0.4));
}

#[test]
fn percentages_are_divided() {
    let r = normalize_face_box(raw(30.0, 20.0, 30.0, 40.0)).unwrap();
    assert!((r.x - 0.3).abs() < 1e-12);
    assert!((r.height - 0.4).abs() < 1e-12);
}

#[test]
fn one_large_component_switches_the_whole_box() {
    // Only width exceeds 1, so every value is read as a percentage.
    let r = normalize_face_box(raw(0.5, 0.5, 40.0, 0.9)).unwrap();
    assert!((r.x - 0.005).abs() < 1e-12);
    assert!((r.width - 0.4).abs() < 1e-12);
}

#[test]
fn out_of_range_boxes_are_dropped() {
    assert!(normalize_face_box(raw(0.8, 0.1, 0.3, 0.3)).is_none());
    assert!(normalize_face_box(raw(-0.1, 0.1, 0.3, 0.3)).is_none());
    assert!(normalize_face_box(raw(0.1, 0.1, 0.0, 0.3)).is_none());
    assert!(normalize_face_box(raw(f64::NAN, 0.1, 0.3, 0.3)).is_none());
    // Within the 5% edge slack.
    assert!(normalize_face_box(raw(0.8, 0.1, 0.24, 0.3)).is_some());
}
