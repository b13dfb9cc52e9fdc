//! Integration test modules for memovision
//!
//! - transport: Motion, switching, locating, declick contract
//! - zoom: Measure/region zoom round trips
//! - sync: Mapping between loaded tracks
//! - session: Commands, monitor, region saving, reset

pub mod session;
pub mod transport;
