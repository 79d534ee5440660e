//! Domain types: the persisted sales record and its loosely-typed input form.

pub mod raw;
pub mod record;
