pub(crate) mod backing;
pub(crate) mod blend;
pub(crate) mod compositor;
pub(crate) mod effects;
pub(crate) mod layers;
pub(crate) mod paint;
