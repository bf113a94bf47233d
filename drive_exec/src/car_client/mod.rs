//! # Car Client
//!
//! Interface to the vehicle state provider. The provider registers a run on a course, reports the
//! state of the vehicle and the road around it, and accepts actions. The driver is written against
//! the `CarService` trait so it can be run against any provider, such as the in-process
//! `SimClient`.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod clock;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

pub use clock::*;

use comms_if::eqpt::{
    car::{Car, CarAction, Token, TokenRequest},
    road::Road,
};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A provider of vehicle and road state which accepts actions for the vehicle.
pub trait CarService {
    /// Register a new run, returning the token identifying it.
    fn register(&mut self, request: &TokenRequest) -> Result<Token, CarClientError>;

    /// Get the current state of the vehicle.
    fn get_car(&mut self) -> Result<Car, CarClientError>;

    /// Get the current state of the road around the vehicle.
    fn get_road(&mut self) -> Result<Road, CarClientError>;

    /// Perform an action on the vehicle.
    fn do_action(&mut self, action: CarAction) -> Result<(), CarClientError>;
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CarClientError {
    #[error("No run has been registered with the provider")]
    NotRegistered,

    #[error("The provider has no course layout {0}")]
    UnknownCourse(u8),

    #[error("The course has no zones")]
    EmptyCourse,

    #[error("The provider rejected the action {0:?}")]
    InvalidAction(CarAction),
}
