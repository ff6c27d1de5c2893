//! Konoha converts narutogen NPC exports into typed n5eb content-store
//! documents, reusing items that already exist in the working set or in a
//! configured library before synthesizing new ones. Each batch import is
//! tolerant of partial failure and always produces a full report.

pub mod cli;
pub mod content;
pub mod convert;
pub mod import;
pub mod schema;
pub mod server;
pub mod validate;
