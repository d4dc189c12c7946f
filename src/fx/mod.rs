pub(crate) mod fracture;
pub(crate) mod vortex;
pub(crate) mod wander;
