//! # Constants and type definitions
//!
//! This module centralizes the **numerical constants**, **unit conversion factors** and **type
//! aliases** shared by the SGP4/SDP4 kernel and the element-set readers and writers.
//!
//! ## Overview
//!
//! - Angle and time conversions (degrees ↔ radians, revolutions/day ↔ radians/minute)
//! - The reference epoch of the SGP4 day count (1949 December 31 00:00 UT)
//! - Julian-date anchors used by the sidereal-time models
//! - Type aliases documenting the units of public fields

// -------------------------------------------------------------------------------------------------
// Angles
// -------------------------------------------------------------------------------------------------

/// 2π
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees to radians
pub const DEG2RAD: f64 = std::f64::consts::PI / 180.0;

/// Two thirds, the exponent of Kepler's third law in mean-motion form
pub const X2O3: f64 = 2.0 / 3.0;

// -------------------------------------------------------------------------------------------------
// Time
// -------------------------------------------------------------------------------------------------

/// Number of minutes in a day
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Minutes per day divided by 2π: converts rad/min to revolutions/day (≈ 229.1831180523293)
pub const XPDOTP: f64 = MINUTES_PER_DAY / DPI;

/// Julian date of 1949 December 31 00:00 UT, origin of the SGP4 epoch day count
pub const JD_SGP4_EPOCH: f64 = 2_433_281.5;

/// Julian date of J2000.0 (2000-01-01 12:00:00)
pub const JD_J2000: f64 = 2_451_545.0;

/// Number of days in a Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Julian date of 1900 January 0.0, origin of the inverse calendar conversion
pub const JD_1900: f64 = 2_415_019.5;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Minutes since the element-set epoch
pub type Minutes = f64;
/// Julian date in days
pub type JulianDate = f64;
