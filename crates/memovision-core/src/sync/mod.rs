//! Synchronization between recordings of the same piece.
//!
//! [`SyncPoints`] holds the nearest-point correspondence tables,
//! [`LinearAxis`] the optional finer per-track axes, and [`SyncMapper`]
//! combines them into cross-track time conversion.

mod axis;
mod mapper;
mod points;

pub use axis::LinearAxis;
pub use mapper::SyncMapper;
pub use points::SyncPoints;
