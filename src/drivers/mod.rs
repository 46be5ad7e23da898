//! Drivers to carry out MoldenBridge conversions.

use anyhow;

pub mod guess_to_molden;
pub mod natural_orbitals_to_molden;
pub mod orbital_selection;
pub mod weight_ranking;

// =================
// Trait definitions
// =================

/// Trait defining behaviours of MoldenBridge drivers.
pub trait MoldenBridgeDriver {
    /// The type of the parameter structure controlling the driver.
    type Params;

    /// The type of the successful outcome when executing the driver.
    type Outcome;

    /// Executes the driver and stores the result internally.
    fn run(&mut self) -> Result<(), anyhow::Error>;

    /// Returns the result of the driver execution.
    fn result(&self) -> Result<&Self::Outcome, anyhow::Error>;
}
