//! Kepler's equation in the forms needed by the propagator and the element conversions.

use crate::constants::DPI;
use std::f64::consts::PI;

const SMALL: f64 = 1e-8;

/// Maximum number of Newton iterations in [`solve_kepler_equinoctial`].
pub const KEPLER_MAX_ITER: usize = 10;

/// Convergence tolerance on the Newton correction of [`solve_kepler_equinoctial`].
pub const KEPLER_TOLERANCE: f64 = 1.0e-12;

/// Largest Newton correction allowed per iteration.
const KEPLER_MAX_STEP: f64 = 0.95;

/// Result of the equinoctial Kepler solve: sine and cosine of the eccentric longitude used by the
/// short-period corrections, and the number of iterations performed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    pub sin_e: f64,
    pub cos_e: f64,
    pub iterations: usize,
}

/// Solve the modified Kepler equation `u = E - axn·sin(E) + ayn·cos(E)` used by SGP4.
///
/// Newton's method starts from `E = u`, limits each correction to ±0.95 rad and stops after
/// [`KEPLER_MAX_ITER`] iterations or when the correction falls below [`KEPLER_TOLERANCE`].
/// The returned sine and cosine are those evaluated at the start of the last iteration, which is
/// what the position and velocity recovery expects.
///
/// Argument
/// --------
/// * `u`: mean longitude minus node, in [0, 2π)
/// * `axnl`, `aynl`: long-period corrected equinoctial eccentricity components
pub fn solve_kepler_equinoctial(u: f64, axnl: f64, aynl: f64) -> KeplerSolution {
    let mut eo1 = u;
    let mut tem5: f64 = 9999.9;
    let mut sin_e = 0.0;
    let mut cos_e = 1.0;
    let mut iterations = 0;

    while tem5.abs() >= KEPLER_TOLERANCE && iterations < KEPLER_MAX_ITER {
        sin_e = eo1.sin();
        cos_e = eo1.cos();
        tem5 = 1.0 - cos_e * axnl - sin_e * aynl;
        tem5 = (u - aynl * cos_e + axnl * sin_e - eo1) / tem5;
        if tem5.abs() >= KEPLER_MAX_STEP {
            tem5 = if tem5 > 0.0 {
                KEPLER_MAX_STEP
            } else {
                -KEPLER_MAX_STEP
            };
        }
        eo1 += tem5;
        iterations += 1;
    }

    KeplerSolution {
        sin_e,
        cos_e,
        iterations,
    }
}

/// Eccentric (or hyperbolic/parabolic) anomaly and mean anomaly from the true anomaly.
///
/// Argument
/// --------
/// * `ecc`: eccentricity
/// * `nu`: true anomaly in radians
///
/// Return
/// ------
/// * `(e0, m)`: the eccentric, parabolic or hyperbolic anomaly, and the mean anomaly.
///   Both stay at `999999.9` when undefined (hyperbolic asymptote, parabolic beyond ±168°).
///   For elliptical orbits `m` lies in [0, 2π).
pub fn newtonnu(ecc: f64, nu: f64) -> (f64, f64) {
    let mut e0 = 999999.9;
    let mut m = 999999.9;

    if ecc.abs() < SMALL {
        // circular
        m = nu;
        e0 = nu;
    } else if ecc < 1.0 - SMALL {
        let sine = ((1.0 - ecc * ecc).sqrt() * nu.sin()) / (1.0 + ecc * nu.cos());
        let cose = (ecc + nu.cos()) / (1.0 + ecc * nu.cos());
        e0 = sine.atan2(cose);
        m = e0 - ecc * e0.sin();
    } else if ecc > 1.0 + SMALL {
        if nu.abs() + 0.00001 < PI - (1.0 / ecc).acos() {
            let sine = ((ecc * ecc - 1.0).sqrt() * nu.sin()) / (1.0 + ecc * nu.cos());
            e0 = sine.asinh();
            m = ecc * e0.sinh() - e0;
        }
    } else if nu.abs() < 168.0 * PI / 180.0 {
        // parabolic
        e0 = (nu * 0.5).tan();
        m = e0 + (e0 * e0 * e0) / 3.0;
    }

    if ecc < 1.0 {
        m %= DPI;
        if m < 0.0 {
            m += DPI;
        }
        e0 %= DPI;
    }

    (e0, m)
}
