//! # Road Equipment Interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Snapshot of the road around the vehicle.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Road {
    /// Limits of the zone the vehicle is currently in
    pub current_speed_limit: SpeedLimit,

    /// Limits of the next zone and how far away it is
    pub speed_limit_ahead: SpeedLimitAhead,
}

/// Speed limits of a zone.
///
/// Units: meters/second
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpeedLimit {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Speed limits of the upcoming zone.
///
/// An absent `max` means the road beyond the boundary is unknown and the vehicle must stop. An
/// absent `remaining_distance_to_enforcement` means there is no upcoming zone at all.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpeedLimitAhead {
    /// Units: meters/second
    pub min: Option<f64>,

    /// Units: meters/second
    pub max: Option<f64>,

    /// Distance from the vehicle to the boundary of the upcoming zone.
    ///
    /// Units: meters
    pub remaining_distance_to_enforcement: Option<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Road {
    /// Returns true if there is an upcoming zone boundary.
    pub fn has_zone_ahead(&self) -> bool {
        self.speed_limit_ahead
            .remaining_distance_to_enforcement
            .is_some()
    }
}
