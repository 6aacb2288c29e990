//! Layout definitions: the resource schema, where resources come from, and
//! the store that loads them once and serves lookups.

pub mod provider;
pub mod schema;
pub mod store;
