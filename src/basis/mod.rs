//! Atomic-orbital basis sets.

pub mod ao;
