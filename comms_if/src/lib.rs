//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the software, i.e. the
//! structures exchanged with the vehicle state provider.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// State and command definitions for equipment (the vehicle and the road it's on)
pub mod eqpt;
