//! Library components of the wait-time CLI.

pub mod logging;
