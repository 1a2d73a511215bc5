//! # Earth gravity models
//!
//! SGP4 mean elements are only meaningful together with the geopotential they were fitted
//! against. Three historical constant sets are supported:
//!
//! | Model        | μ (km³/s²)    | Rₑ (km)  | Notes                                   |
//! |--------------|---------------|----------|-----------------------------------------|
//! | `Wgs72Old`   | 398600.79964  | 6378.135 | `xke` taken as published, not derived   |
//! | `Wgs72`      | 398600.8      | 6378.135 | standard choice for public TLE data     |
//! | `Wgs84`      | 398600.5      | 6378.137 | modern zonal harmonics                  |
//!
//! Each model is selected with [`GravityModel`] and materialized as an immutable
//! [`GravityConstants`] value that the initializer copies into every satellite record.

use std::fmt;
use std::str::FromStr;

use crate::sgp4_errors::Sgp4Error;

/// Selector for one of the canonical gravity constant sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GravityModel {
    Wgs72Old,
    #[default]
    Wgs72,
    Wgs84,
}

/// Geopotential constants in the canonical units of SGP4.
///
/// Units
/// -----
/// * `mu`: km³/s²
/// * `radius_earth_km`: km
/// * `xke`: √(μ) in Earth radii^1.5 per minute
/// * `tumin`: minutes per canonical time unit, `1 / xke`
/// * `j2`, `j3`, `j4`: dimensionless zonal harmonics, `j3oj2 = j3 / j2`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityConstants {
    pub tumin: f64,
    pub mu: f64,
    pub radius_earth_km: f64,
    pub xke: f64,
    pub j2: f64,
    pub j3: f64,
    pub j4: f64,
    pub j3oj2: f64,
}

impl GravityConstants {
    fn from_harmonics(mu: f64, radius_earth_km: f64, xke: f64, j2: f64, j3: f64, j4: f64) -> Self {
        GravityConstants {
            tumin: 1.0 / xke,
            mu,
            radius_earth_km,
            xke,
            j2,
            j3,
            j4,
            j3oj2: j3 / j2,
        }
    }

    /// Velocity scale from Earth radii per minute to km/s.
    pub fn vkmpersec(&self) -> f64 {
        self.radius_earth_km * self.xke / 60.0
    }
}

impl GravityModel {
    /// Build the constant set of this model.
    pub fn constants(self) -> GravityConstants {
        match self {
            GravityModel::Wgs72Old => GravityConstants::from_harmonics(
                398600.79964,
                6378.135,
                0.0743669161,
                0.001082616,
                -0.00000253881,
                -0.00000165597,
            ),
            GravityModel::Wgs72 => {
                let mu = 398600.8;
                let radius = 6378.135;
                GravityConstants::from_harmonics(
                    mu,
                    radius,
                    60.0 / (radius * radius * radius / mu).sqrt(),
                    0.001082616,
                    -0.00000253881,
                    -0.00000165597,
                )
            }
            GravityModel::Wgs84 => {
                let mu = 398600.5;
                let radius = 6378.137;
                GravityConstants::from_harmonics(
                    mu,
                    radius,
                    60.0 / (radius * radius * radius / mu).sqrt(),
                    0.00108262998905,
                    -0.00000253215306,
                    -0.00000161098761,
                )
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GravityModel::Wgs72Old => "wgs72old",
            GravityModel::Wgs72 => "wgs72",
            GravityModel::Wgs84 => "wgs84",
        }
    }
}

impl fmt::Display for GravityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GravityModel {
    type Err = Sgp4Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wgs72old" => Ok(GravityModel::Wgs72Old),
            "wgs72" => Ok(GravityModel::Wgs72),
            "wgs84" => Ok(GravityModel::Wgs84),
            _ => Err(Sgp4Error::UnknownGravityModel(s.to_string())),
        }
    }
}

impl From<GravityModel> for GravityConstants {
    fn from(model: GravityModel) -> Self {
        model.constants()
    }
}

#[cfg(test)]
mod earth_gravity_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wgs72_constants() {
        let c = GravityModel::Wgs72.constants();
        assert_relative_eq!(c.xke, 0.07436691613317342, epsilon = 1e-15);
        assert_relative_eq!(c.tumin, 1.0 / c.xke);
        assert_relative_eq!(c.j3oj2, -0.00000253881 / 0.001082616);
        assert_eq!(c.radius_earth_km, 6378.135);
    }

    #[test]
    fn test_wgs72old_keeps_published_xke() {
        let c = GravityModel::Wgs72Old.constants();
        assert_eq!(c.xke, 0.0743669161);
        assert_eq!(c.mu, 398600.79964);
    }

    #[test]
    fn test_wgs84_constants() {
        let c = GravityModel::Wgs84.constants();
        assert_eq!(c.radius_earth_km, 6378.137);
        assert_eq!(c.j2, 0.00108262998905);
        assert_relative_eq!(c.xke, 60.0 / (6378.137_f64.powi(3) / 398600.5).sqrt());
    }

    #[test]
    fn test_parse_model_name() {
        assert_eq!("wgs72".parse::<GravityModel>(), Ok(GravityModel::Wgs72));
        assert_eq!("WGS84".parse::<GravityModel>(), Ok(GravityModel::Wgs84));
        assert_eq!(
            "wgs72old".parse::<GravityModel>(),
            Ok(GravityModel::Wgs72Old)
        );
        assert_eq!(
            "egm96".parse::<GravityModel>(),
            Err(Sgp4Error::UnknownGravityModel("egm96".into()))
        );
        assert_eq!(GravityModel::Wgs84.to_string(), "wgs84");
    }
}
