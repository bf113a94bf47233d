//! # Drive Executable Parameters
//!
//! This module provide parameters for the drive executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DriveExecParams {

    /// Minimum level of messages written to the log, e.g. `"debug"`
    pub log_level: String,

    /// Maximum number of planning sections the driver will execute before giving up on the run
    pub max_sections: u64,

    /// Cap the simulation client's logging at `INFO`
    pub quiet_sim: bool,

    /// Time taken by each request to the simulation client
    pub sim_latency_ms: u64
}

impl Default for DriveExecParams {
    fn default() -> Self {
        Self {
            log_level: String::from("debug"),
            max_sections: 1000,
            quiet_sim: true,
            sim_latency_ms: 50
        }
    }
}
