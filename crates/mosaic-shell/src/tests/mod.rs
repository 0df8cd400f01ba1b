//! Shared test support for the shell crate.

mod runner;
pub(crate) mod support;
