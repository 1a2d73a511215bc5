//! # sgp4_kernel
//!
//! SGP4/SDP4 propagation of Earth satellites from mean orbital elements, producing position and
//! velocity in the TEME frame.
//!
//! ```
//! use sgp4_kernel::{earth_gravity::GravityModel, propagation::Satrec};
//!
//! let mut sat = Satrec::twoline2rv(
//!     "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991",
//!     "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482",
//!     GravityModel::Wgs72,
//! )
//! .unwrap();
//! let state = sat.propagate(360.0).unwrap();
//! assert!((state.position.norm() - 6784.0).abs() < 20.0);
//! ```
//!
//! ## Modules
//!
//! * [`propagation`]: the satellite record, its initializer and the propagator
//! * [`tle`] and [`omm`]: element-set readers and writers
//! * [`batch`]: propagation over arrays of dates and records
//! * [`earth_gravity`], [`params`]: configuration of a record
//! * [`time`]: Julian dates, sidereal time and epoch conversions

pub mod batch;
pub mod constants;
pub mod earth_gravity;
pub mod kepler;
pub mod omm;
pub mod orb_elem;
pub mod params;
pub mod propagation;
pub mod sgp4_errors;
pub mod time;
pub mod tle;

pub use batch::{BatchResult, SatrecArray};
pub use earth_gravity::{GravityConstants, GravityModel};
pub use params::{OperationMode, Sgp4Params};
pub use propagation::{ElementSet, Satrec, StateVector};
pub use sgp4_errors::{PropagationError, Sgp4Error};
