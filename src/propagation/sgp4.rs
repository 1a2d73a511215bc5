//! Core SGP4/SDP4 propagation step.

use nalgebra::Vector3;

use crate::constants::{DPI, X2O3};
use crate::kepler::solve_kepler_equinoctial;
use crate::propagation::deep_space::{apply_periodics, PerturbedElements};
use crate::propagation::resonance::{dspace, ResonanceCheckpoint, ResonanceEpoch, SecularState};
use crate::propagation::{MeanElements, Method, Satrec, StateVector};
use crate::sgp4_errors::PropagationError;
use std::f64::consts::PI;

/// Smallest `1 + cos(i)` used as divisor of the long-period coefficient `xlcof`.
const RETROGRADE_DIVISOR: f64 = 1.5e-12;

/// Result of one propagation and the mean elements it went through.
///
/// `mean` is `None` when the call failed before the mean elements were recovered
/// (mean motion or mean eccentricity out of range).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Outcome {
    pub result: Result<StateVector, PropagationError>,
    pub mean: Option<MeanElements>,
}

impl Outcome {
    fn early_failure(err: PropagationError) -> Self {
        Outcome {
            result: Err(err),
            mean: None,
        }
    }

    fn failure(err: PropagationError, mean: MeanElements) -> Self {
        Outcome {
            result: Err(err),
            mean: Some(mean),
        }
    }
}

/// Long-period coefficients `(aycof, xlcof)` for an inclination given by its sine and cosine.
pub(crate) fn long_period_coefficients(j3oj2: f64, sin_i: f64, cos_i: f64) -> (f64, f64) {
    let aycof = -0.5 * j3oj2 * sin_i;
    let divisor = if (cos_i + 1.0).abs() > RETROGRADE_DIVISOR {
        1.0 + cos_i
    } else {
        RETROGRADE_DIVISOR
    };
    let xlcof = -0.25 * j3oj2 * sin_i * (3.0 + 5.0 * cos_i) / divisor;
    (aycof, xlcof)
}

/// Propagate `rec` to `t` minutes from epoch.
///
/// The resonance integrator of deep-space records starts from `checkpoint` when usable and
/// leaves its last whole step there. Near-earth records never touch it.
pub(crate) fn sgp4(
    rec: &Satrec,
    t: f64,
    checkpoint: &mut Option<ResonanceCheckpoint>,
) -> Outcome {
    let consts = &rec.constants;
    let sec = &rec.secular;

    // secular gravity and atmospheric drag
    let xmdf = rec.mo + sec.mdot * t;
    let argpdf = rec.argpo + sec.argpdot * t;
    let nodedf = rec.nodeo + sec.nodedot * t;
    let mut argpm = argpdf;
    let mut mm = xmdf;
    let t2 = t * t;
    let mut nodem = nodedf + sec.nodecf * t2;
    let mut tempa = 1.0 - sec.cc1 * t;
    let mut tempe = rec.bstar * sec.cc4 * t;
    let mut templ = sec.t2cof * t2;

    if let Method::NearEarth(Some(drag)) = &rec.method {
        let delomg = sec.omgcof * t;
        let delmtemp = 1.0 + sec.eta * xmdf.cos();
        let delm = sec.xmcof * (delmtemp * delmtemp * delmtemp - sec.delmo);
        let temp = delomg + delm;
        mm = xmdf + temp;
        argpm = argpdf - temp;
        let t3 = t2 * t;
        let t4 = t3 * t;
        tempa = tempa - drag.d2 * t2 - drag.d3 * t3 - drag.d4 * t4;
        tempe += rec.bstar * sec.cc5 * (mm.sin() - sec.sinmao);
        templ += drag.t3cof * t3 + t4 * (drag.t4cof + t * drag.t5cof);
    }

    let mut nm = rec.no_unkozai;
    let mut em = rec.ecco;
    let mut inclm = rec.inclo;

    if let Method::DeepSpace(ds) = &rec.method {
        let epoch = ResonanceEpoch {
            argpo: rec.argpo,
            argpdot: sec.argpdot,
            gsto: rec.gsto,
            no: rec.no_unkozai,
        };
        let state = SecularState {
            em,
            argpm,
            inclm,
            mm,
            nodem,
            nm,
        };
        let updated = dspace(&ds.resonance, &epoch, t, state, checkpoint);
        em = updated.em;
        argpm = updated.argpm;
        inclm = updated.inclm;
        mm = updated.mm;
        nodem = updated.nodem;
        nm = updated.nm;
    }

    if !(nm > 0.0) {
        return Outcome::early_failure(PropagationError::MeanMotion(nm));
    }

    let am = (consts.xke / nm).powf(X2O3) * tempa * tempa;
    nm = consts.xke / am.powf(1.5);
    em -= tempe;

    if !(em < 1.0 && em >= -0.001) {
        return Outcome::early_failure(PropagationError::MeanEccentricity(em));
    }
    if em < 1.0e-6 {
        em = 1.0e-6;
    }

    mm += rec.no_unkozai * templ;
    let xlm = mm + argpm + nodem;
    // truncated remainder keeps the sign of the node
    nodem %= DPI;
    argpm = argpm.rem_euclid(DPI);
    let xlm = xlm.rem_euclid(DPI);
    mm = (xlm - argpm - nodem).rem_euclid(DPI);

    let mean = MeanElements {
        am,
        em,
        im: inclm,
        nodem,
        argpm,
        mm,
        nm,
    };

    // long-period periodics
    let mut ep = em;
    let mut xincp = inclm;
    let mut argpp = argpm;
    let mut nodep = nodem;
    let mut mp = mm;

    let (aycof, xlcof, con41, x1mth2, x7thm1) = match &rec.method {
        Method::DeepSpace(ds) => {
            let perturbed = apply_periodics(
                &ds.periodics,
                t,
                PerturbedElements {
                    ep,
                    inclp: xincp,
                    nodep,
                    argpp,
                    mp,
                },
                rec.opsmode,
            );
            ep = perturbed.ep;
            xincp = perturbed.inclp;
            nodep = perturbed.nodep;
            argpp = perturbed.argpp;
            mp = perturbed.mp;

            if xincp < 0.0 {
                xincp = -xincp;
                nodep += PI;
                argpp -= PI;
            }
            if !(0.0..=1.0).contains(&ep) {
                return Outcome::failure(PropagationError::PerturbedEccentricity(ep), mean);
            }

            let sinip = xincp.sin();
            let cosip = xincp.cos();
            let (aycof, xlcof) = long_period_coefficients(consts.j3oj2, sinip, cosip);
            let cosisq = cosip * cosip;
            (
                aycof,
                xlcof,
                3.0 * cosisq - 1.0,
                1.0 - cosisq,
                7.0 * cosisq - 1.0,
            )
        }
        Method::NearEarth(_) => (sec.aycof, sec.xlcof, sec.con41, sec.x1mth2, sec.x7thm1),
    };
    let sinip = xincp.sin();
    let cosip = xincp.cos();

    let axnl = ep * argpp.cos();
    let temp = 1.0 / (am * (1.0 - ep * ep));
    let aynl = ep * argpp.sin() + temp * aycof;
    let xl = mp + argpp + nodep + temp * xlcof * axnl;

    // Kepler's equation
    let u = (xl - nodep).rem_euclid(DPI);
    let kepler = solve_kepler_equinoctial(u, axnl, aynl);
    let (sineo1, coseo1) = (kepler.sin_e, kepler.cos_e);

    // short-period preliminary quantities
    let ecose = axnl * coseo1 + aynl * sineo1;
    let esine = axnl * sineo1 - aynl * coseo1;
    let el2 = axnl * axnl + aynl * aynl;
    let pl = am * (1.0 - el2);
    if !(pl >= 0.0) {
        return Outcome::failure(PropagationError::SemiLatusRectum(pl), mean);
    }

    let rl = am * (1.0 - ecose);
    let rdotl = am.sqrt() * esine / rl;
    let rvdotl = pl.sqrt() / rl;
    let betal = (1.0 - el2).sqrt();
    let temp = esine / (1.0 + betal);
    let sinu = am / rl * (sineo1 - aynl - axnl * temp);
    let cosu = am / rl * (coseo1 - axnl + aynl * temp);
    let su = sinu.atan2(cosu);
    let sin2u = (cosu + cosu) * sinu;
    let cos2u = 1.0 - 2.0 * sinu * sinu;
    let temp = 1.0 / pl;
    let temp1 = 0.5 * consts.j2 * temp;
    let temp2 = temp1 * temp;

    // short-period periodics
    let mrt = rl * (1.0 - 1.5 * temp2 * betal * con41) + 0.5 * temp1 * x1mth2 * cos2u;
    let su = su - 0.25 * temp2 * x7thm1 * sin2u;
    let xnode = nodep + 1.5 * temp2 * cosip * sin2u;
    let xinc = xincp + 1.5 * temp2 * cosip * sinip * cos2u;
    let mvt = rdotl - nm * temp1 * x1mth2 * sin2u / consts.xke;
    let rvdot = rvdotl + nm * temp1 * (x1mth2 * cos2u + 1.5 * con41) / consts.xke;

    // orientation vectors
    let (sinsu, cossu) = su.sin_cos();
    let (snod, cnod) = xnode.sin_cos();
    let (sini, cosi) = xinc.sin_cos();
    let xmx = -snod * cosi;
    let xmy = cnod * cosi;
    let uvec = Vector3::new(xmx * sinsu + cnod * cossu, xmy * sinsu + snod * cossu, sini * sinsu);
    let vvec = Vector3::new(xmx * cossu - cnod * sinsu, xmy * cossu - snod * sinsu, sini * cossu);

    let state = StateVector {
        position: uvec * (mrt * consts.radius_earth_km),
        velocity: (uvec * mvt + vvec * rvdot) * consts.vkmpersec(),
    };

    if mrt < 1.0 {
        return Outcome::failure(PropagationError::Decayed { mrt, state }, mean);
    }

    Outcome {
        result: Ok(state),
        mean: Some(mean),
    }
}

#[cfg(test)]
mod sgp4_test {
    use super::*;
    use crate::params::Sgp4Params;
    use crate::propagation::ElementSet;
    use crate::tle::parse_tle;
    use approx::assert_relative_eq;

    /// ISS elements with a drag term far beyond any real satellite.
    fn heavy_drag_iss() -> Satrec {
        let tle = parse_tle(
            "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991",
            "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482",
        )
        .unwrap();
        let elements = ElementSet {
            bstar: 0.5,
            ..tle.element_set()
        };
        Satrec::sgp4init(&Sgp4Params::default(), &elements).unwrap()
    }

    #[test]
    fn test_mean_elements_follow_the_eccentricity_check() {
        let rec = heavy_drag_iss();

        let eccentricity = sgp4(&rec, 2670.0, &mut None);
        assert_eq!(eccentricity.result.unwrap_err().code(), 1);
        assert!(eccentricity.mean.is_none());

        let semilatus = sgp4(&rec, 3160.0, &mut None);
        assert_eq!(semilatus.result.unwrap_err().code(), 4);
        assert_eq!(semilatus.mean.map(|m| m.em), Some(1.0e-6));

        let mut stalled = rec.clone();
        stalled.no_unkozai = 0.0;
        let motion = sgp4(&stalled, 0.0, &mut None);
        assert_eq!(motion.result.unwrap_err(), PropagationError::MeanMotion(0.0));
        assert!(motion.mean.is_none());
    }

    #[test]
    fn test_long_period_coefficients_prograde() {
        let j3oj2 = -2.53881e-6 / 0.001082616;
        let (aycof, xlcof) = long_period_coefficients(j3oj2, 0.5, 0.75f64.sqrt());
        assert_relative_eq!(aycof, -0.25 * j3oj2);
        let expected = -0.25 * j3oj2 * 0.5 * (3.0 + 5.0 * 0.75f64.sqrt()) / (1.0 + 0.75f64.sqrt());
        assert_relative_eq!(xlcof, expected);
    }

    #[test]
    fn test_long_period_coefficients_retrograde_is_finite() {
        let (_, xlcof) = long_period_coefficients(-2.3, 0.0, -1.0);
        assert!(xlcof.is_finite());
    }
}
