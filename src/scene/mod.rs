pub(crate) mod entities;
pub(crate) mod store;
pub(crate) mod timing;
pub(crate) mod tools;
