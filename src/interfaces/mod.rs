//! Interfaces between MoldenBridge and the files and users it works with.

use anyhow;

pub mod cli;
pub mod input;
pub mod molden;
pub mod xmvb;

/// Trait for handling a parsed user input.
pub trait InputHandle {
    /// Handles the input and runs the appropriate conversion.
    fn handle(&self) -> Result<(), anyhow::Error>;
}
