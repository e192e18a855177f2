pub mod envelope;
pub mod usage;
