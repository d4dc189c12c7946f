use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;
use crate::foundation::core::TimeMs;
use crate::scene::entities::EntityId;

fn spider(pos: NormPoint, target: NormPoint) -> Spider {
    Spider {
        id: EntityId(7),
        pos,
        size: 0.02,
        rotation: 0.0,
        speed: 0.003,
        target,
        created_at: TimeMs(0.0),
    }
}

#[test]
fn step_moves_by_speed_towards_target() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let tuning = WanderTuning::default();
    let mut s = spider(NormPoint::new(0.1, 0.5), NormPoint::new(0.9, 0.5));
    let before = s.pos;
    step_spider(&mut s, None, &tuning, &mut rng);

    assert!((before.distance(s.pos) - 0.003).abs() < 1e-12);
    assert!(s.rotation.abs() <= tuning.wander_rad);
    assert!(s.pos.x > before.x);
    assert_eq!(s.target, NormPoint::new(0.9, 0.5));
}

#[test]
fn arrival_retargets_inside_face_and_rerolls_speed() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let tuning = WanderTuning::default();
    let face = FaceRegion::new(0.3, 0.2, 0.3, 0.4).unwrap();
    for _ in 0..50 {
        let mut s = spider(NormPoint::new(0.5, 0.5), NormPoint::new(0.51, 0.5));
        step_spider(&mut s, Some(face), &tuning, &mut rng);
        assert!(face.contains(s.target));
        assert!(s.speed >= tuning.speed_min && s.speed < tuning.speed_max);
    }
}

#[test]
fn without_face_targets_cover_unit_square() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..200 {
        let t = pick_target(None, &mut rng);
        assert!((0.0..1.0).contains(&t.x));
        assert!((0.0..1.0).contains(&t.y));
    }
}

#[test]
fn degenerate_tuning_does_not_panic() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let tuning = WanderTuning {
        arrive_epsilon: 1.0,
        speed_min: 0.004,
        speed_max: 0.004,
        wander_rad: 0.0,
    };
    let mut s = spider(NormPoint::new(0.5, 0.5), NormPoint::new(0.6, 0.5));
    step_spider(&mut s, None, &tuning, &mut rng);
    assert_eq!(s.speed, 0.004);
}

#[test]
fn seeded_walks_are_reproducible() {
    let tuning = WanderTuning::default();
    let walk = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut s = spider(NormPoint::new(0.5, 0.5), NormPoint::new(0.2, 0.2));
        for _ in 0..500 {
            step_spider(&mut s, None, &tuning, &mut rng);
        }
        s
    };
    assert_eq!(walk(9), walk(9));
}
