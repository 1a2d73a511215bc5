//! # Osculating classical elements from a state vector
//!
//! Conversion of a Cartesian position/velocity pair into the classical orbital elements, with the
//! special cases (circular and/or equatorial orbits) where some angles are undefined.
//! Undefined quantities are reported as `None` instead of numeric sentinels.

use nalgebra::Vector3;

use crate::constants::DPI;
use crate::kepler::newtonnu;
use crate::propagation::{Satrec, StateVector};
use std::f64::consts::FRAC_PI_2;
use std::f64::consts::PI;

const SMALL: f64 = 1e-8;

/// Geometric family of an orbit, deciding which angles are defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitShape {
    /// Elliptical, parabolic or hyperbolic, inclined
    EllipticalInclined,
    /// Elliptical, parabolic or hyperbolic, equatorial
    EllipticalEquatorial,
    CircularInclined,
    CircularEquatorial,
}

/// Classical elements of an osculating orbit.
///
/// Units
/// -----
/// * `semi_latus_rectum`, `semi_major_axis`: same length unit as the input position
/// * all angles in radians, in [0, 2π) except `inclination` in [0, π]
///
/// Notes
/// -----
/// * `semi_major_axis` is `None` for a parabolic orbit (zero specific energy).
/// * `mean_anomaly` holds the argument of latitude for circular inclined orbits and the true
///   longitude for circular equatorial ones, as the only available phase angle.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassicalElements {
    pub shape: OrbitShape,
    pub semi_latus_rectum: f64,
    pub semi_major_axis: Option<f64>,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ascending_node_longitude: Option<f64>,
    pub periapsis_argument: Option<f64>,
    pub true_anomaly: Option<f64>,
    pub mean_anomaly: Option<f64>,
    pub argument_of_latitude: Option<f64>,
    pub true_longitude: Option<f64>,
    pub periapsis_longitude: Option<f64>,
}

/// Angle between two vectors in [0, π], `None` if either vector is (nearly) null.
pub fn angle(vec1: &Vector3<f64>, vec2: &Vector3<f64>) -> Option<f64> {
    let magv1 = vec1.norm();
    let magv2 = vec2.norm();
    if magv1 * magv2 > SMALL * SMALL {
        let temp = (vec1.dot(vec2) / (magv1 * magv2)).clamp(-1.0, 1.0);
        Some(temp.acos())
    } else {
        None
    }
}

/// Acos of a ratio clamped to [-1, 1].
fn clamped_acos(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos()
}

impl ClassicalElements {
    /// Compute the osculating elements of a state vector.
    ///
    /// Argument
    /// --------
    /// * `r`: position (km)
    /// * `v`: velocity (km/s)
    /// * `mu`: gravitational parameter (km³/s²)
    ///
    /// Return
    /// ------
    /// * `None` when the angular momentum vanishes (rectilinear motion)
    pub fn from_state(r: &Vector3<f64>, v: &Vector3<f64>, mu: f64) -> Option<Self> {
        let magr = r.norm();
        let magv = v.norm();

        let hbar = r.cross(v);
        let magh = hbar.norm();
        if magh <= SMALL {
            return None;
        }

        let nbar = Vector3::new(-hbar.y, hbar.x, 0.0);
        let magn = nbar.norm();
        let c1 = magv * magv - mu / magr;
        let rdotv = r.dot(v);
        let ebar = (c1 * r - rdotv * v) / mu;
        let ecc = ebar.norm();

        let sme = magv * magv * 0.5 - mu / magr;
        let semi_major_axis = (sme.abs() > SMALL).then(|| -mu / (2.0 * sme));
        let p = magh * magh / mu;

        let incl = (hbar.z / magh).acos();
        let equatorial = incl < SMALL || (incl - PI).abs() < SMALL;

        let shape = match (ecc < SMALL, equatorial) {
            (true, true) => OrbitShape::CircularEquatorial,
            (true, false) => OrbitShape::CircularInclined,
            (false, true) => OrbitShape::EllipticalEquatorial,
            (false, false) => OrbitShape::EllipticalInclined,
        };
        let elliptical = matches!(
            shape,
            OrbitShape::EllipticalInclined | OrbitShape::EllipticalEquatorial
        );

        let omega = (magn > SMALL).then(|| {
            let node = clamped_acos(nbar.x / magn);
            if nbar.y < 0.0 {
                DPI - node
            } else {
                node
            }
        });

        let argp = if shape == OrbitShape::EllipticalInclined {
            angle(&nbar, &ebar).map(|a| if ebar.z < 0.0 { DPI - a } else { a })
        } else {
            None
        };

        let nu = if elliptical {
            angle(&ebar, r).map(|a| if rdotv < 0.0 { DPI - a } else { a })
        } else {
            None
        };

        let mut m = None;

        let arglat = if shape == OrbitShape::CircularInclined {
            let a = angle(&nbar, r).map(|a| if r.z < 0.0 { DPI - a } else { a });
            m = a;
            a
        } else {
            None
        };

        let lonper = if ecc > SMALL && shape == OrbitShape::EllipticalEquatorial {
            let mut l = clamped_acos(ebar.x / ecc);
            if ebar.y < 0.0 {
                l = DPI - l;
            }
            if incl > FRAC_PI_2 {
                l = DPI - l;
            }
            Some(l)
        } else {
            None
        };

        let truelon = if magr > SMALL && shape == OrbitShape::CircularEquatorial {
            let mut l = clamped_acos(r.x / magr);
            if r.y < 0.0 {
                l = DPI - l;
            }
            if incl > FRAC_PI_2 {
                l = DPI - l;
            }
            m = Some(l);
            Some(l)
        } else {
            None
        };

        if elliptical {
            m = nu.map(|nu| newtonnu(ecc, nu).1);
        }

        Some(ClassicalElements {
            shape,
            semi_latus_rectum: p,
            semi_major_axis,
            eccentricity: ecc,
            inclination: incl,
            ascending_node_longitude: omega,
            periapsis_argument: argp,
            true_anomaly: nu,
            mean_anomaly: m,
            argument_of_latitude: arglat,
            true_longitude: truelon,
            periapsis_longitude: lonper,
        })
    }
}

impl Satrec {
    /// Osculating elements of a propagated state, using the gravitational parameter of the record.
    pub fn osculating_elements(&self, state: &StateVector) -> Option<ClassicalElements> {
        ClassicalElements::from_state(&state.position, &state.velocity, self.constants.mu)
    }
}
