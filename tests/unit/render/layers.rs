use kurbo::{Circle, Rect};

use super::*;

fn black(w: u32, h: u32) -> Vec<u8> {
    [0u8, 0, 0, 255].repeat((w * h) as usize)
}

fn px(frame: &[u8], w: u32, x: usize, y: usize) -> [u8; 4] {
    let i = (y * w as usize + x) * 4;
    [frame[i], frame[i + 1], frame[i + 2], frame[i + 3]]
}

#[test]
fn solid_rect_fills_only_its_footprint() {
    let mut r = LayerRasterizer::new();
    let mut frame = black(10, 10);
    let layer = Layer::solid(Rect::new(2.0, 2.0, 6.0, 6.0), Rgba8::opaque(255, 0, 0));
    r.draw(&mut frame, 10, 10, &layer).unwrap();
    assert_eq!(px(&frame, 10, 3, 3), [255, 0, 0, 255]);
    assert_eq!(px(&frame, 10, 8, 8), [0, 0, 0, 255]);
    assert_eq!(px(&frame, 10, 1, 1), [0, 0, 0, 255]);
}

#[test]
fn layer_alpha_scales_coverage() {
    let mut r = LayerRasterizer::new();
    let mut frame = black(8, 8);
    let layer = Layer::solid(Rect::new(0.0, 0.0, 8.0, 8.0), Rgba8::opaque(255, 255, 255))
        .with_alpha(0.5);
    r.draw(&mut frame, 8, 8, &layer).unwrap();
    assert_eq!(px(&frame, 8, 4, 4), [128, 128, 128, 255]);
}

#[test]
fn offscreen_and_invisible_layers_are_skipped() {
    let mut r = LayerRasterizer::new();
    let mut frame = black(8, 8);
    let before = frame.clone();
    let far = Layer::solid(Circle::new((100.0, 100.0), 5.0), Rgba8::opaque(255, 0, 0));
    r.draw(&mut frame, 8, 8, &far).unwrap();
    let hidden =
        Layer::solid(Rect::new(0.0, 0.0, 8.0, 8.0), Rgba8::opaque(255, 0, 0)).with_alpha(0.0);
    r.draw(&mut frame, 8, 8, &hidden).unwrap();
    let mut nan = BezPath::new();
    nan.move_to((f64::NAN, 0.0));
    nan.line_to((4.0, 4.0));
    nan.line_to((0.0, 4.0));
    nan.close_path();
    r.draw(&mut frame, 8, 8, &Layer::solid(nan, Rgba8::opaque(255, 0, 0)))
        .unwrap();
    assert_eq!(frame, before);
}

#[test]
fn partially_offscreen_layer_is_clipped() {
    let mut r = LayerRasterizer::new();
    let mut frame = black(8, 8);
    let layer = Layer::solid(Rect::new(-20.0, -20.0, 4.0, 4.0), Rgba8::opaque(0, 255, 0));
    r.draw(&mut frame, 8, 8, &layer).unwrap();
    assert_eq!(px(&frame, 8, 0, 0), [0, 255, 0, 255]);
    assert_eq!(px(&frame, 8, 6, 6), [0, 0, 0, 255]);
}

#[test]
fn stroke_outline_widens_the_line() {
    let line = polyline(&[Point::new(10.0, 10.0), Point::new(30.0, 10.0)]);
    let outline = stroke_outline(&line, 4.0, Cap::Butt);
    let bb = outline.bounding_box();
    assert!((bb.y0 - 8.0).abs() < 1e-6);
    assert!((bb.y1 - 12.0).abs() < 1e-6);
    assert!((bb.x0 - 10.0).abs() < 1e-6);
}

#[test]
fn transformed_moves_the_shape() {
    let layer = Layer::solid(Rect::new(0.0, 0.0, 2.0, 2.0), Rgba8::opaque(1, 2, 3))
        .transformed(Affine::translate((5.0, 7.0)));
    let bb = layer.shape.bounding_box();
    assert_eq!((bb.x0, bb.y0, bb.x1, bb.y1), (5.0, 7.0, 7.0, 9.0));
}

#[test]
fn context_cache_follows_the_requested_size() {
    let mut cache = ContextCache::new();
    let size = cache
        .with_ctx_mut(8, 4, |ctx| Ok((ctx.width(), ctx.height())))
        .unwrap();
    assert_eq!(size, (8, 4));
    let size = cache
        .with_ctx_mut(3, 5, |ctx| Ok((ctx.width(), ctx.height())))
        .unwrap();
    assert_eq!(size, (3, 5));
    assert!(cache.with_ctx_mut(3, 5, |_| Ok(())).is_ok());
}
