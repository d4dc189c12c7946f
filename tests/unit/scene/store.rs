use super::*;
use crate::foundation::core::{NormPoint, Rgba8};
use crate::scene::tools::Strength;

fn dent(t: f64) -> Dent {
    Dent {
        pos: NormPoint::new(0.2, 0.2),
        radius: 0.05,
        rotation: 0.0,
        shadow_color: Rgba8::new(0, 0, 0, 0.5),
        highlight_color: Rgba8::new(255, 255, 255, 0.5),
        created_at: TimeMs(t),
    }
}

fn swelling(t: f64) -> Swelling {
    Swelling {
        pos: NormPoint::new(0.5, 0.5),
        radius: 0.1,
        intensity: 0.5,
        aspect_ratio: 1.0,
        rotation: 0.0,
        created_at: TimeMs(t),
    }
}

fn needle() -> Needle {
    Needle {
        pos: NormPoint::new(0.3, 0.3),
        length: 0.05,
        rotation: 1.0,
        color: Rgba8::opaque(239, 68, 68),
    }
}

fn crack(store: &mut EffectStore) -> Crack {
    Crack {
        id: store.next_id(),
        pos: NormPoint::new(0.5, 0.5),
        strength: 80.0,
        seed: 42,
        initial_angle: 0.0,
    }
}

fn slap(store: &mut EffectStore, t: f64) -> Slap {
    Slap {
        id: store.next_id(),
        pos: NormPoint::new(0.5, 0.5),
        size: 0.1,
        rotation: 0.0,
        created_at: TimeMs(t),
        total_slaps: None,
        strength: Strength::new(40),
        fired: 0,
    }
}

#[test]
fn adds_are_appended_without_dedup() {
    let mut store = EffectStore::new();
    store.add_dent(dent(0.0));
    store.add_dent(dent(0.0));
    assert_eq!(store.dents().len(), 2);
    assert_eq!(store.counts().dents, 2);
    assert_eq!(store.counts().total(), 2);
}

#[test]
fn ids_are_unique_and_reset_by_clear_all() {
    let mut store = EffectStore::new();
    let a = store.next_id();
    let b = store.next_id();
    assert_ne!(a, b);
    let c = crack(&mut store);
    store.add_crack(c);
    store.clear_all();
    assert!(store.is_empty());
    assert_eq!(store.next_id(), EntityId(1));
}

#[test]
fn clear_one_family_leaves_the_rest() {
    let mut store = EffectStore::new();
    store.add_dent(dent(0.0));
    store.add_needle(needle());
    store.clear(Family::Dent);
    assert!(store.dents().is_empty());
    assert_eq!(store.needles().len(), 1);
}

#[test]
fn prune_expired_drops_finished_swellings_and_slaps() {
    let timing = EffectTiming::default();
    let mut store = EffectStore::new();
    store.add_swelling(swelling(0.0));
    store.add_swelling(swelling(4000.0));
    let s = slap(&mut store, 0.0);
    store.add_slap(s);
    store.add_dent(dent(0.0));

    store.prune_expired(TimeMs(4500.0), &timing);
    assert_eq!(store.swellings().len(), 1);
    assert!(store.slaps().is_empty());
    assert_eq!(store.dents().len(), 1);
}

#[test]
fn any_animating_tracks_the_open_windows() {
    let timing = EffectTiming::default();
    let mut store = EffectStore::new();
    assert!(!store.any_animating(TimeMs(0.0), &timing));

    store.add_dent(dent(100.0));
    assert!(store.any_animating(TimeMs(599.0), &timing));
    assert!(!store.any_animating(TimeMs(600.0), &timing));

    store.add_swelling(swelling(1000.0));
    assert!(store.any_animating(TimeMs(5499.0), &timing));
    assert!(!store.any_animating(TimeMs(5500.0), &timing));
}

#[test]
fn take_backup_hides_and_restore_is_exact() {
    let mut store = EffectStore::new();
    store.add_dent(dent(0.0));
    store.add_needle(needle());
    store.add_swelling(swelling(0.0));
    let c = crack(&mut store);
    store.add_crack(c);
    let before = store.clone();

    let backup = store.take_backup();
    assert!(!backup.is_empty());
    assert!(store.dents().is_empty());
    assert!(store.needles().is_empty());
    assert_eq!(store.cracks().len(), 1, "fractures are not part of the backup");

    store.restore(backup);
    assert_eq!(store, before);
}

#[test]
fn backup_copy_matches_take() {
    let mut store = EffectStore::new();
    store.add_dent(dent(0.0));
    let copy = store.backup();
    let taken = store.take_backup();
    assert_eq!(copy, taken);
}
