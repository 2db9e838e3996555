//! Batch driver and its CSV input/output formats.

pub mod batch;
pub mod csv;
