use crate::foundation::core::TimeMs;
use crate::scene::entities::{Bruise, Crack, Dent, EntityId, Needle, Slap, Spider, Swelling};
use crate::scene::timing::EffectTiming;
use crate::scene::tools::Impact;

/// Effect families held by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    Dent,
    Needle,
    Bruise,
    Swelling,
    Spider,
    Slap,
    Crack,
}

/// Borrowed view of one entity, handed to [`EffectStore::prune`] predicates.
#[derive(Clone, Copy, Debug)]
pub enum EntityRef<'a> {
    Dent(&'a Dent),
    Needle(&'a Needle),
    Bruise(&'a Bruise),
    Swelling(&'a Swelling),
    Spider(&'a Spider),
    Slap(&'a Slap),
    Crack(&'a Crack),
}

/// Snapshot of the five non-destructive families taken around an external effect.
///
/// In-flight slaps ride along so a rollback leaves the store exactly as it was.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectBackup {
    dents: Vec<Dent>,
    needles: Vec<Needle>,
    bruises: Vec<Bruise>,
    swellings: Vec<Swelling>,
    spiders: Vec<Spider>,
    slaps: Vec<Slap>,
}

impl EffectBackup {
    pub fn is_empty(&self) -> bool {
        self.dents.is_empty()
            && self.needles.is_empty()
            && self.bruises.is_empty()
            && self.swellings.is_empty()
            && self.spiders.is_empty()
            && self.slaps.is_empty()
    }
}

/// Per-family entity counts, for scorekeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct EffectCounts {
    pub dents: usize,
    pub needles: usize,
    pub bruises: usize,
    pub swellings: usize,
    pub spiders: usize,
    pub slaps: usize,
    pub cracks: usize,
}

impl EffectCounts {
    pub fn total(&self) -> usize {
        self.dents
            + self.needles
            + self.bruises
            + self.swellings
            + self.spiders
            + self.slaps
            + self.cracks
    }
}

/// Exclusive owner of every effect entity, one append-only list per family.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectStore {
    dents: Vec<Dent>,
    needles: Vec<Needle>,
    bruises: Vec<Bruise>,
    swellings: Vec<Swelling>,
    spiders: Vec<Spider>,
    slaps: Vec<Slap>,
    cracks: Vec<Crack>,
    next_id: u64,
}

impl EffectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next entity id.
    pub fn next_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    pub fn add_dent(&mut self, dent: Dent) {
        self.dents.push(dent);
    }

    pub fn add_needle(&mut self, needle: Needle) {
        self.needles.push(needle);
    }

    pub fn add_bruise(&mut self, bruise: Bruise) {
        self.bruises.push(bruise);
    }

    pub fn add_swelling(&mut self, swelling: Swelling) {
        self.swellings.push(swelling);
    }

    pub fn add_spider(&mut self, spider: Spider) {
        self.spiders.push(spider);
    }

    pub fn add_slap(&mut self, slap: Slap) {
        self.slaps.push(slap);
    }

    pub fn add_crack(&mut self, crack: Crack) {
        self.cracks.push(crack);
    }

    /// Append everything a tool produced.
    pub fn add_impact(&mut self, impact: Impact) {
        match impact {
            Impact::Dent(d) => self.add_dent(d),
            Impact::Slap(s) => self.add_slap(s),
            Impact::Spider(s) => self.add_spider(s),
            Impact::Needle(n) => self.add_needle(n),
            Impact::Bruises(b) => self.bruises.extend(b),
            Impact::Crack(c) => self.add_crack(c),
        }
    }

    pub fn dents(&self) -> &[Dent] {
        &self.dents
    }

    pub fn needles(&self) -> &[Needle] {
        &self.needles
    }

    pub fn bruises(&self) -> &[Bruise] {
        &self.bruises
    }

    pub fn swellings(&self) -> &[Swelling] {
        &self.swellings
    }

    pub fn spiders(&self) -> &[Spider] {
        &self.spiders
    }

    pub(crate) fn spiders_mut(&mut self) -> &mut [Spider] {
        &mut self.spiders
    }

    pub fn slaps(&self) -> &[Slap] {
        &self.slaps
    }

    pub(crate) fn slaps_mut(&mut self) -> &mut [Slap] {
        &mut self.slaps
    }

    pub fn cracks(&self) -> &[Crack] {
        &self.cracks
    }

    pub fn clear(&mut self, family: Family) {
        match family {
            Family::Dent => self.dents.clear(),
            Family::Needle => self.needles.clear(),
            Family::Bruise => self.bruises.clear(),
            Family::Swelling => self.swellings.clear(),
            Family::Spider => self.spiders.clear(),
            Family::Slap => self.slaps.clear(),
            Family::Crack => self.cracks.clear(),
        }
    }

    /// Empty every family and reset the id counter.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// Keep only the entities for which `keep` returns true.
    pub fn prune(&mut self, mut keep: impl FnMut(EntityRef<'_>) -> bool) {
        self.dents.retain(|e| keep(EntityRef::Dent(e)));
        self.needles.retain(|e| keep(EntityRef::Needle(e)));
        self.bruises.retain(|e| keep(EntityRef::Bruise(e)));
        self.swellings.retain(|e| keep(EntityRef::Swelling(e)));
        self.spiders.retain(|e| keep(EntityRef::Spider(e)));
        self.slaps.retain(|e| keep(EntityRef::Slap(e)));
        self.cracks.retain(|e| keep(EntityRef::Crack(e)));
    }

    /// Drop swellings, spiders and slaps whose lifetime has elapsed.
    pub fn prune_expired(&mut self, now: TimeMs, timing: &EffectTiming) {
        self.prune(|e| match e {
            EntityRef::Swelling(s) => !s.is_expired(now, timing),
            EntityRef::Spider(s) => !s.is_expired(now, timing),
            EntityRef::Slap(s) => !s.is_finished(now, timing),
            _ => true,
        });
    }

    /// Copy of the non-destructive families.
    pub fn backup(&self) -> EffectBackup {
        EffectBackup {
            dents: self.dents.clone(),
            needles: self.needles.clone(),
            bruises: self.bruises.clone(),
            swellings: self.swellings.clone(),
            spiders: self.spiders.clone(),
            slaps: self.slaps.clone(),
        }
    }

    /// Move the non-destructive families and in-flight slaps out, hiding them.
    pub fn take_backup(&mut self) -> EffectBackup {
        EffectBackup {
            dents: std::mem::take(&mut self.dents),
            needles: std::mem::take(&mut self.needles),
            bruises: std::mem::take(&mut self.bruises),
            swellings: std::mem::take(&mut self.swellings),
            spiders: std::mem::take(&mut self.spiders),
            slaps: std::mem::take(&mut self.slaps),
        }
    }

    /// Put a backup back, replacing the current contents of those families.
    pub fn restore(&mut self, backup: EffectBackup) {
        self.dents = backup.dents;
        self.needles = backup.needles;
        self.bruises = backup.bruises;
        self.swellings = backup.swellings;
        self.spiders = backup.spiders;
        self.slaps = backup.slaps;
    }

    pub fn counts(&self) -> EffectCounts {
        EffectCounts {
            dents: self.dents.len(),
            needles: self.needles.len(),
            bruises: self.bruises.len(),
            swellings: self.swellings.len(),
            spiders: self.spiders.len(),
            slaps: self.slaps.len(),
            cracks: self.cracks.len(),
        }
    }

    /// Whether any entity is still inside a time-bounded animation window.
    ///
    /// Spiders are excluded: they animate indefinitely on their own loop.
    pub fn any_animating(&self, now: TimeMs, timing: &EffectTiming) -> bool {
        self.dents
            .iter()
            .any(|d| d.ripple(now, timing.ripple_ms).is_some())
            || self.swellings.iter().any(|s| !s.is_expired(now, timing))
            || self.slaps.iter().any(|s| !s.is_finished(now, timing))
    }

    pub fn has_spiders(&self) -> bool {
        !self.spiders.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.counts().total() == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/store.rs"]
mod tests;
