use super::*;

fn dent_at(t: f64) -> Dent {
    Dent {
        pos: NormPoint::new(0.5, 0.5),
        radius: 0.05,
        rotation: 0.0,
        shadow_color: Rgba8::new(0, 0, 0, 0.5),
        highlight_color: Rgba8::new(255, 255, 255, 0.5),
        created_at: TimeMs(t),
    }
}

fn swelling() -> Swelling {
    Swelling {
        pos: NormPoint::new(0.5, 0.5),
        radius: 0.1,
        intensity: 0.8,
        aspect_ratio: 1.0,
        rotation: 0.0,
        created_at: TimeMs(1000.0),
    }
}

fn slap(total: Option<u32>) -> Slap {
    Slap {
        id: EntityId(1),
        pos: NormPoint::new(0.5, 0.5),
        size: 0.1,
        rotation: 0.2,
        created_at: TimeMs(0.0),
        total_slaps: total,
        strength: Strength::new(50),
        fired: 0,
    }
}

#[test]
fn ripple_window_is_half_open() {
    let d = dent_at(100.0);
    assert!(d.ripple(TimeMs(99.0), 500.0).is_none());
    let r0 = d.ripple(TimeMs(100.0), 500.0).unwrap();
    assert_eq!(r0.radius_factor(), 1.0);
    assert_eq!(r0.opacity(), 1.0);
    let mid = d.ripple(TimeMs(350.0), 500.0).unwrap();
    assert!((mid.eased - (1.0 - 0.5f64.powi(3))).abs() < 1e-12);
    assert!(d.ripple(TimeMs(600.0), 500.0).is_none());
}

#[test]
fn swelling_lifecycle_rises_holds_and_falls_to_zero() {
    let timing = EffectTiming::default();
    let s = swelling();
    assert_eq!(s.effective_intensity(TimeMs(1000.0), &timing), 0.0);

    let mut prev = 0.0;
    for step in 1..=50 {
        let t = 1000.0 + timing.swell_fade_in_ms * f64::from(step) / 50.0;
        let v = s.effective_intensity(TimeMs(t), &timing);
        assert!(v >= prev, "fade-in must be monotonic");
        prev = v;
    }
    assert!((prev - 0.8).abs() < 1e-12);

    let hold = 1000.0 + timing.swell_fade_in_ms + timing.swell_hold_ms / 2.0;
    assert_eq!(s.effective_intensity(TimeMs(hold), &timing), 0.8);

    let end = 1000.0 + timing.swell_lifetime_ms();
    assert_eq!(s.effective_intensity(TimeMs(end), &timing), 0.0);
    assert!(s.is_expired(TimeMs(end), &timing));
    assert!(!s.is_expired(TimeMs(end - 1.0), &timing));
}

#[test]
fn single_slap_pose_approaches_then_retracts() {
    let timing = EffectTiming::default();
    let s = slap(None);
    let start = s.pose(TimeMs(0.0), &timing).unwrap();
    assert_eq!(start.distance, 2.5);
    assert_eq!(start.alpha, 0.0);

    let contact = s.pose(TimeMs(100.0), &timing).unwrap();
    assert!(contact.distance.abs() < 1e-9);
    assert!((contact.alpha - 1.0).abs() < 1e-9);

    let late = s.pose(TimeMs(399.0), &timing).unwrap();
    assert!(late.alpha < 0.05);
    assert!(late.distance > 1.2);

    assert!(s.pose(TimeMs(400.0), &timing).is_none());
    assert!(s.is_finished(TimeMs(400.0), &timing));
}

#[test]
fn multi_slap_subdivides_and_alternates_sides() {
    let timing = EffectTiming::default();
    let s = slap(Some(3));
    assert_eq!(s.duration_ms(&timing), 1200.0);
    assert_eq!(s.cycles_entered(TimeMs(0.0), &timing), 1);
    assert_eq!(s.cycles_entered(TimeMs(399.0), &timing), 1);
    assert_eq!(s.cycles_entered(TimeMs(400.0), &timing), 2);
    assert_eq!(s.cycles_entered(TimeMs(5000.0), &timing), 3);

    let a = s.pose(TimeMs(50.0), &timing).unwrap();
    let b = s.pose(TimeMs(450.0), &timing).unwrap();
    assert_eq!(a.cycle, 0);
    assert_eq!(b.cycle, 1);
    assert_eq!(a.rotation, -b.rotation);
    assert!((a.distance - b.distance).abs() < 1e-9);
}

#[test]
fn face_region_validation_and_containment() {
    assert!(FaceRegion::new(0.3, 0.2, 0.3, 0.4).is_ok());
    assert!(FaceRegion::new(0.5, 0.5, 0.56, 0.2).is_err());
    assert!(FaceRegion::new(0.0, 0.0, 0.0, 0.2).is_err());
    assert!(FaceRegion::new(-0.1, 0.0, 0.5, 0.2).is_err());
    assert!(FaceRegion::new(0.0, 0.0, f64::NAN, 0.2).is_err());

    let f = FaceRegion::new(0.3, 0.2, 0.3, 0.4).unwrap();
    assert!(f.contains(NormPoint::new(0.4, 0.3)));
    assert!(f.contains(NormPoint::new(0.3, 0.2)));
    assert!(!f.contains(NormPoint::new(0.1, 0.3)));
}
