//! Per-kind business-rule sets.

pub mod consultation;
pub mod emergency;
pub mod surgery;
