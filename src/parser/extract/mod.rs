//! Per-section extraction policies. Each works on one already-trimmed line.

pub mod entries;
pub mod fields;
pub mod stats;
pub mod tags;
