use super::*;
use crate::foundation::core::NormPoint;
use crate::scene::entities::EntityId;

fn crack(id: u64, seed: u64, strength: f64) -> Crack {
    Crack {
        id: EntityId(id),
        pos: NormPoint::new(0.5, 0.5),
        strength,
        seed,
        initial_angle: 0.7,
    }
}

#[test]
fn same_seed_and_strength_give_identical_geometry() {
    let a = grow_fracture(&crack(1, 123, 80.0));
    let b = grow_fracture(&crack(2, 123, 80.0));
    assert!(!a.is_empty());
    assert_eq!(a, b);
    assert_eq!(a, grow_fracture(&crack(1, 123, 80.0)));
}

#[test]
fn different_seeds_diverge() {
    let a = grow_fracture(&crack(1, 1, 80.0));
    let b = grow_fracture(&crack(1, 2, 80.0));
    assert_ne!(a, b);
}

#[test]
fn network_starts_at_origin_and_stays_connected() {
    let segs = grow_fracture(&crack(1, 99, 100.0));
    assert_eq!(segs[0].from, Vec2::ZERO);
    for s in &segs[1..] {
        assert!(
            segs.iter().any(|p| p.to == s.from),
            "segment starting at {:?} is detached",
            s.from
        );
    }
}

#[test]
fn segment_budget_is_respected() {
    for strength in [0.0, 35.0, 80.0, 100.0] {
        for seed in 0..20 {
            let segs = grow_fracture(&crack(1, seed, strength));
            assert!(segs.len() <= max_segments(strength));
            assert!(segs.iter().all(|s| s.width > 0.0));
        }
    }
}

#[test]
fn lengths_shrink_to_the_threshold() {
    let params = FractureParams {
        min_length: 0.05,
        ..FractureParams::default()
    };
    let segs = grow_fracture_with(&crack(1, 5, 0.0), &params);
    assert!(segs.len() < max_segments(0.0));
    let first = (segs[0].to - segs[0].from).hypot();
    assert!((first - 0.04).abs() < 1e-12);
}

#[test]
fn initial_angle_is_a_function_of_the_seed() {
    let a = initial_angle_for(42);
    assert_eq!(a, initial_angle_for(42));
    assert!((0.0..std::f64::consts::TAU).contains(&a));
    assert_ne!(a, initial_angle_for(43));
}
