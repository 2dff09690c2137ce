//! JSON value utilities: RFC-6901 pointers and merge semantics.

pub mod merge;
pub mod pointer;
