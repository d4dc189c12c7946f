use super::*;
use crate::foundation::core::{Canvas, NormPoint};
use crate::scene::entities::EntityId;
use crate::scene::tools::Strength;

fn lb() -> Letterbox {
    Letterbox::fit(Canvas::new(800, 600).unwrap(), 800, 600).unwrap()
}

fn dent(created_at: f64) -> Dent {
    Dent {
        pos: NormPoint::new(0.5, 0.5),
        radius: 0.045,
        rotation: 0.3,
        shadow_color: Rgba8::new(10, 10, 10, 0.5),
        highlight_color: Rgba8::new(230, 230, 230, 0.5),
        created_at: TimeMs(created_at),
    }
}

#[test]
fn dent_has_ripple_only_inside_window() {
    let timing = EffectTiming::default();
    let mut out = Vec::new();
    dent_layers(&dent(0.0), TimeMs(100.0), &timing, &lb(), &mut out);
    assert_eq!(out.len(), 3);

    out.clear();
    dent_layers(&dent(0.0), TimeMs(500.0), &timing, &lb(), &mut out);
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|l| l.blend == BlendMode::Normal));
}

#[test]
fn dent_shadow_is_centered_on_impact() {
    let mut out = Vec::new();
    dent_layers(&dent(0.0), TimeMs(1e6), &EffectTiming::default(), &lb(), &mut out);
    let bb = out[0].shape.bounding_box();
    let c = bb.center();
    assert!((c.x - 400.0).abs() < 0.5 && (c.y - 300.0).abs() < 0.5);
    // radius 0.045 of a 600 px short side
    assert!(bb.width() <= 2.0 * 27.0 + 0.5);
}

#[test]
fn degenerate_radius_draws_nothing() {
    let mut d = dent(0.0);
    d.radius = 0.0;
    let mut out = Vec::new();
    dent_layers(&d, TimeMs(10.0), &EffectTiming::default(), &lb(), &mut out);
    assert!(out.is_empty());

    d.radius = f64::NAN;
    dent_layers(&d, TimeMs(10.0), &EffectTiming::default(), &lb(), &mut out);
    assert!(out.is_empty());
}

#[test]
fn bruise_uses_blend_stack() {
    let b = Bruise {
        pos: NormPoint::new(0.4, 0.6),
        radius: 0.02,
        rotation: 0.1,
        intensity: 0.8,
        aspect_ratio: 1.1,
    };
    let mut out = Vec::new();
    bruise_layers(&b, &lb(), &mut out);
    let modes: Vec<_> = out.iter().map(|l| l.blend).collect();
    assert_eq!(
        modes,
        vec![
            BlendMode::Overlay,
            BlendMode::Multiply,
            BlendMode::SoftLight,
            BlendMode::Overlay
        ]
    );
}

#[test]
fn faded_out_swelling_is_skipped() {
    let timing = EffectTiming::default();
    let s = Swelling {
        pos: NormPoint::new(0.5, 0.5),
        radius: 0.1,
        intensity: 0.7,
        aspect_ratio: 1.0,
        rotation: 0.0,
        created_at: TimeMs(0.0),
    };
    let mut out = Vec::new();
    swelling_layers(&s, TimeMs(0.0), &timing, &lb(), &mut out);
    assert!(out.is_empty());
    swelling_layers(&s, TimeMs(1000.0), &timing, &lb(), &mut out);
    assert_eq!(out.len(), 3);
    assert_eq!(out[2].blend, BlendMode::ColorBurn);
}

#[test]
fn crack_draws_three_passes_deterministically() {
    let c = Crack {
        id: EntityId(1),
        pos: NormPoint::new(0.5, 0.5),
        strength: 60.0,
        seed: 42,
        initial_angle: 1.0,
    };
    let mut a = Vec::new();
    let mut b = Vec::new();
    crack_layers(&c, &lb(), &mut a);
    crack_layers(&c, &lb(), &mut b);
    assert_eq!(a.len(), 3);
    assert_eq!(a, b);
    assert_eq!(a[1].blend, BlendMode::SoftLight);
}

#[test]
fn spider_and_needle_layer_counts() {
    let spider = Spider {
        id: EntityId(3),
        pos: NormPoint::new(0.5, 0.5),
        size: 0.03,
        rotation: 0.0,
        speed: 0.003,
        target: NormPoint::new(0.6, 0.6),
        created_at: TimeMs(0.0),
    };
    let mut out = Vec::new();
    spider_layers(&spider, &lb(), &mut out);
    assert_eq!(out.len(), 3);

    let needle = Needle {
        pos: NormPoint::new(0.3, 0.3),
        length: 0.06,
        rotation: 0.4,
        color: Rgba8::opaque(239, 68, 68),
    };
    out.clear();
    needle_layers(&needle, &lb(), &mut out);
    assert_eq!(out.len(), 6);
    assert_eq!(out[4].paint, Paint::Solid(needle.color));
}

#[test]
fn slap_hand_only_while_gesture_runs() {
    let timing = EffectTiming::default();
    let slap = Slap {
        id: EntityId(9),
        pos: NormPoint::new(0.5, 0.5),
        size: 0.15,
        rotation: 0.1,
        created_at: TimeMs(0.0),
        total_slaps: None,
        strength: Strength::new(50),
        fired: 1,
    };
    let mut out = Vec::new();
    slap_layers(&slap, TimeMs(100.0), &timing, &lb(), &mut out);
    assert_eq!(out.len(), 6);
    assert!(out.iter().all(|l| (l.alpha - 1.0).abs() < 1e-6));

    out.clear();
    slap_layers(&slap, TimeMs(400.0), &timing, &lb(), &mut out);
    assert!(out.is_empty());
}
