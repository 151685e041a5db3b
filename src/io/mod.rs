//! Export of posterior samples.

#[cfg(feature = "csv")]
pub mod csv;
