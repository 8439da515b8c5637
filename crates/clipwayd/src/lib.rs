//! Daemon internals — exposed as a library so integration tests can drive
//! the discovery loops in-process.

pub mod discovery;
pub mod notify;
