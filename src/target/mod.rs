//! Targets of MoldenBridge conversions.

pub mod orbital;
