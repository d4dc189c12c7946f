pub(crate) mod collaborators;
pub(crate) mod face;
pub(crate) mod prompts;
