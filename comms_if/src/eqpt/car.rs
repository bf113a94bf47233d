//! # Vehicle Equipment Interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Lowest selectable course layout.
pub const MIN_COURSE_LAYOUT: u8 = 1;

/// Highest selectable course layout.
pub const MAX_COURSE_LAYOUT: u8 = 3;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Snapshot of the vehicle's state as reported by the state provider.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    /// Current velocity of the vehicle, if known.
    ///
    /// Units: meters/second
    pub current_velocity: Option<f64>,

    /// Descriptive engine status
    pub engine: Option<Engine>,

    /// Ignition state
    pub ignition: Ignition,

    /// Total distance travelled since the run was registered.
    ///
    /// Units: meters
    pub total_distance_travelled: Option<f64>,

    /// Total time travelled since the run was registered.
    ///
    /// Units: seconds
    pub total_time_travelled: Option<f64>,
}

/// Descriptive engine status.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Engine {
    /// Free text state such as "Idling"
    pub state: String,
}

/// An action to be taken by the vehicle, in the form accepted by the state provider.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarAction {
    /// The action to perform
    pub action: CarActionType,

    /// Force of the action. Only whole numbers are accepted by the provider, and the force is
    /// absent for ignition actions.
    ///
    /// Units: meters/second^2
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<i32>,
}

/// Request to register a new run on a course.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    /// The course layout to drive, between `MIN_COURSE_LAYOUT` and `MAX_COURSE_LAYOUT`
    pub course_layout: u8,

    /// Identifier of the user making the run
    pub name: String,
}

/// Token identifying a registered run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Token(pub String);

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// State of the vehicle's ignition.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignition {
    On,
    Off,
}

/// Actions understood by the state provider.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarActionType {
    Accelerate,
    Brake,
    IgnitionOn,
    IgnitionOff,
}

/// Errors in building interface structures.
#[derive(Debug, Error, PartialEq)]
pub enum CarIfError {
    #[error(
        "Course layout must be between {} and {}, found {0}",
        MIN_COURSE_LAYOUT,
        MAX_COURSE_LAYOUT
    )]
    InvalidCourseLayout(u8),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Car {
    /// Current velocity with an unknown velocity treated as stationary.
    pub fn velocity(&self) -> f64 {
        self.current_velocity.unwrap_or(0.0)
    }

    /// Returns true if the ignition is on.
    pub fn is_on(&self) -> bool {
        self.ignition == Ignition::On
    }
}

impl Default for Ignition {
    fn default() -> Self {
        Ignition::Off
    }
}

impl CarAction {
    /// Action with no force attached
    pub fn ignition(on: bool) -> Self {
        Self {
            action: match on {
                true => CarActionType::IgnitionOn,
                false => CarActionType::IgnitionOff,
            },
            force: None,
        }
    }
}

impl TokenRequest {
    /// Create a new request, checking the course layout is valid.
    pub fn new(course_layout: u8, name: &str) -> Result<Self, CarIfError> {
        if !(MIN_COURSE_LAYOUT..=MAX_COURSE_LAYOUT).contains(&course_layout) {
            return Err(CarIfError::InvalidCourseLayout(course_layout));
        }

        Ok(Self {
            course_layout,
            name: name.to_string(),
        })
    }
}
