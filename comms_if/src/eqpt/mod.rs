//! # Equipment Interface
//!
//! This module defines the interface structures which are exchanged with the vehicle state
//! provider.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod car;
pub mod road;
