pub(crate) mod opts;
pub(crate) mod punch_session;
pub(crate) mod score;
pub(crate) mod script;
