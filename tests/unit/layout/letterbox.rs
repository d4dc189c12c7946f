use super::*;

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

#[test]
fn wide_canvas_pillarboxes() {
    let lb = Letterbox::fit(canvas(1000, 500), 400, 400).unwrap();
    let r = lb.drawn_rect();
    assert_eq!(r, Rect::new(250.0, 0.0, 750.0, 500.0));
    assert_eq!(lb.min_side(), 500.0);
}

#[test]
fn tall_canvas_letterboxes() {
    let lb = Letterbox::fit(canvas(400, 1000), 800, 600).unwrap();
    let r = lb.drawn_rect();
    assert_eq!(r.x0, 0.0);
    assert_eq!(r.width(), 400.0);
    assert_eq!(r.height(), 300.0);
    assert_eq!(r.y0, 350.0);
}

#[test]
fn pointer_outside_image_is_rejected() {
    let lb = Letterbox::fit(canvas(1000, 500), 400, 400).unwrap();
    assert!(lb.to_normalized(Point::new(100.0, 250.0)).is_none());
    assert!(lb.to_normalized(Point::new(900.0, 250.0)).is_none());
    assert!(lb.to_normalized(Point::new(f64::NAN, 250.0)).is_none());
    let edge = lb.to_normalized(Point::new(250.0, 0.0)).unwrap();
    assert_eq!(edge, NormPoint::new(0.0, 0.0));
}

#[test]
fn round_trip_within_a_pixel() {
    for (cw, ch, iw, ih) in [
        (800, 600, 800, 600),
        (1280, 720, 600, 900),
        (333, 777, 1920, 1080),
        (640, 640, 17, 5),
    ] {
        let lb = Letterbox::fit(canvas(cw, ch), iw, ih).unwrap();
        let r = lb.drawn_rect();
        for i in 0..=10 {
            for j in 0..=10 {
                let px = Point::new(
                    (r.x0 + r.width() * f64::from(i) / 10.0).round(),
                    (r.y0 + r.height() * f64::from(j) / 10.0).round(),
                );
                let Some(n) = lb.to_normalized(px) else {
                    continue;
                };
                let back = lb.to_canvas(n);
                assert!((back.x - px.x).abs() <= 1.0);
                assert!((back.y - px.y).abs() <= 1.0);
            }
        }
    }
}

#[test]
fn buffer_mapping_uses_intrinsic_size() {
    let lb = Letterbox::fit(canvas(400, 300), 1600, 1200).unwrap();
    let p = lb.to_buffer(NormPoint::new(0.5, 0.25));
    assert_eq!(p, Point::new(800.0, 300.0));
    let t = lb.image_transform();
    let mapped = t * Point::new(1600.0, 1200.0);
    assert!((mapped.x - 400.0).abs() < 1e-9);
    assert!((mapped.y - 300.0).abs() < 1e-9);
}

#[test]
fn empty_image_is_rejected() {
    assert!(Letterbox::fit(canvas(10, 10), 0, 10).is_err());
}

#[test]
fn contains_matches_drawn_rect() {
    // 400x100 canvas, square image: drawn at x in [150, 250].
    let lb = Letterbox::fit(canvas(400, 100), 50, 50).unwrap();
    assert!(lb.contains(Point::new(150.0, 0.0)));
    assert!(lb.contains(Point::new(250.0, 100.0)));
    assert!(!lb.contains(Point::new(149.9, 50.0)));
    assert!(!lb.contains(Point::new(f64::NAN, 50.0)));
}
