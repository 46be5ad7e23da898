//! Helper items to assist the working of MoldenBridge.

pub mod atom;
