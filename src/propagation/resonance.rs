//! Luni-solar secular rates and geopotential resonance of deep-space orbits.
//!
//! Orbits with a period close to one sidereal day (synchronous) or half a day (12 h, eccentric)
//! resonate with the tesseral harmonics of the geopotential. Their mean motion and mean longitude
//! are integrated numerically with a fixed 720 min step from epoch. A [`ResonanceCheckpoint`]
//! lets successive propagations resume from the last whole step instead of walking from epoch
//! every time.

use log::{debug, trace};

use crate::constants::{DPI, X2O3};
use crate::propagation::deep_space::{DeepSpaceCommon, ZNL, ZNS};
use std::f64::consts::PI;

/// Earth rotation rate in rad/min (7.29211514668855e-5 rad/s)
const RPTIM: f64 = 4.37526908801129966e-3;

const Q22: f64 = 1.7891679e-6;
const Q31: f64 = 2.1460748e-6;
const Q33: f64 = 2.2123015e-7;
const ROOT22: f64 = 1.7891679e-6;
const ROOT44: f64 = 7.3636953e-9;
const ROOT54: f64 = 2.1765803e-9;
const ROOT32: f64 = 3.7393792e-7;
const ROOT52: f64 = 1.1428639e-7;

const FASX2: f64 = 0.13130908;
const FASX4: f64 = 2.8843198;
const FASX6: f64 = 0.37448087;
const G22: f64 = 5.7686396;
const G32: f64 = 0.95240898;
const G44: f64 = 1.8014998;
const G52: f64 = 1.0508330;
const G54: f64 = 4.4108898;

/// Integration step of the resonance integrator, minutes.
pub const STEP: f64 = 720.0;
/// Half of the step squared, minutes².
const STEP2: f64 = 259_200.0;

/// Inclination margin (3°) inside which the node rates are not divided by sin(i).
const EQUATORIAL_MARGIN: f64 = 5.2359877e-2;

/// Warm-start state of the resonance integrator.
///
/// `atime` is always a whole number of steps from epoch, `xli` and `xni` are the integrated
/// mean longitude and mean motion at that time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResonanceCheckpoint {
    pub atime: f64,
    pub xli: f64,
    pub xni: f64,
}

/// Synchronous (24 h) resonance coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynchronousTerms {
    pub del1: f64,
    pub del2: f64,
    pub del3: f64,
}

/// Half-day (12 h) resonance coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfDayTerms {
    pub d2201: f64,
    pub d2211: f64,
    pub d3210: f64,
    pub d3222: f64,
    pub d4410: f64,
    pub d4422: f64,
    pub d5220: f64,
    pub d5232: f64,
    pub d5421: f64,
    pub d5433: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resonance {
    None,
    Synchronous(SynchronousTerms),
    HalfDay(HalfDayTerms),
}

impl Resonance {
    /// Historical resonance flag: 0, 1 (synchronous) or 2 (half-day).
    pub fn irez(&self) -> u8 {
        match self {
            Resonance::None => 0,
            Resonance::Synchronous(_) => 1,
            Resonance::HalfDay(_) => 2,
        }
    }
}

/// Luni-solar secular rates and resonance setup of a deep-space record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResonanceTerms {
    pub dedt: f64,
    pub didt: f64,
    pub dmdt: f64,
    pub dnodt: f64,
    pub domdt: f64,
    pub kind: Resonance,
    pub xfact: f64,
    pub xlamo: f64,
}

/// Epoch quantities needed by [`dsinit`].
pub(crate) struct ResonanceInput {
    pub xke: f64,
    pub argpo: f64,
    pub gsto: f64,
    pub mo: f64,
    pub mdot: f64,
    pub no: f64,
    pub nodeo: f64,
    pub nodedot: f64,
    pub xpidot: f64,
    pub ecco: f64,
    pub inclo: f64,
}

/// Secular luni-solar rates and resonance classification at epoch.
pub(crate) fn dsinit(common: &DeepSpaceCommon, input: &ResonanceInput) -> ResonanceTerms {
    let DeepSpaceCommon {
        sinim,
        cosim,
        emsq,
        solar: ss,
        lunar: s,
    } = *common;
    let nm = input.no;
    let em = input.ecco;
    let inclm = input.inclo;

    let kind_flag = if 8.26e-3 <= nm && nm <= 9.24e-3 && em >= 0.5 {
        2
    } else if 0.0034906585 < nm && nm < 0.0052359877 {
        1
    } else {
        0
    };

    let near_equatorial = inclm < EQUATORIAL_MARGIN || inclm > PI - EQUATORIAL_MARGIN;

    // solar terms
    let ses = ss.s1 * ZNS * ss.s5;
    let sis = ss.s2 * ZNS * (ss.z11 + ss.z13);
    let sls = -ZNS * ss.s3 * (ss.z1 + ss.z3 - 14.0 - 6.0 * emsq);
    let sghs = ss.s4 * ZNS * (ss.z31 + ss.z33 - 6.0);
    let mut shs = -ZNS * ss.s2 * (ss.z21 + ss.z23);
    if near_equatorial {
        shs = 0.0;
    }
    if sinim != 0.0 {
        shs /= sinim;
    }
    let sgs = sghs - cosim * shs;

    // lunar terms
    let dedt = ses + s.s1 * ZNL * s.s5;
    let didt = sis + s.s2 * ZNL * (s.z11 + s.z13);
    let dmdt = sls - ZNL * s.s3 * (s.z1 + s.z3 - 14.0 - 6.0 * emsq);
    let sghl = s.s4 * ZNL * (s.z31 + s.z33 - 6.0);
    let mut shll = -ZNL * s.s2 * (s.z21 + s.z23);
    if near_equatorial {
        shll = 0.0;
    }
    let mut domdt = sgs + sghl;
    let mut dnodt = shs;
    if sinim != 0.0 {
        domdt -= cosim / sinim * shll;
        dnodt += shll / sinim;
    }

    let theta = input.gsto.rem_euclid(DPI);
    let aonv = (nm / input.xke).powf(X2O3);

    let (kind, xfact, xlamo) = match kind_flag {
        2 => {
            let terms = half_day_terms(input.ecco, cosim, sinim, nm, aonv);
            let xlamo =
                (input.mo + input.nodeo + input.nodeo - theta - theta).rem_euclid(DPI);
            let xfact =
                input.mdot + dmdt + 2.0 * (input.nodedot + dnodt - RPTIM) - input.no;
            (Resonance::HalfDay(terms), xfact, xlamo)
        }
        1 => {
            let g200 = 1.0 + emsq * (-2.5 + 0.8125 * emsq);
            let g310 = 1.0 + 2.0 * emsq;
            let g300 = 1.0 + emsq * (-6.0 + 6.60937 * emsq);
            let f220 = 0.75 * (1.0 + cosim) * (1.0 + cosim);
            let f311 = 0.9375 * sinim * sinim * (1.0 + 3.0 * cosim) - 0.75 * (1.0 + cosim);
            let f330 = 1.0 + cosim;
            let f330 = 1.875 * f330 * f330 * f330;
            let del1 = 3.0 * nm * nm * aonv * aonv;
            let del2 = 2.0 * del1 * f220 * g200 * Q22;
            let del3 = 3.0 * del1 * f330 * g300 * Q33 * aonv;
            let del1 = del1 * f311 * g310 * Q31 * aonv;
            let xlamo = (input.mo + input.nodeo + input.argpo - theta).rem_euclid(DPI);
            let xfact = input.mdot + input.xpidot - RPTIM + dmdt + domdt + dnodt - input.no;
            (
                Resonance::Synchronous(SynchronousTerms { del1, del2, del3 }),
                xfact,
                xlamo,
            )
        }
        _ => (Resonance::None, 0.0, 0.0),
    };

    debug!(
        "deep-space resonance class {} (n = {:.10} rad/min, e = {:.7})",
        kind.irez(),
        nm,
        em
    );

    ResonanceTerms {
        dedt,
        didt,
        dmdt,
        dnodt,
        domdt,
        kind,
        xfact,
        xlamo,
    }
}

fn half_day_terms(ecco: f64, cosim: f64, sinim: f64, nm: f64, aonv: f64) -> HalfDayTerms {
    let cosisq = cosim * cosim;
    let em = ecco;
    let emsq = ecco * ecco;
    let eoc = em * emsq;
    let g201 = -0.306 - (em - 0.64) * 0.440;

    let (g211, g310, g322, g410, g422, g520);
    if em <= 0.65 {
        g211 = 3.616 - 13.2470 * em + 16.2900 * emsq;
        g310 = -19.302 + 117.3900 * em - 228.4190 * emsq + 156.5910 * eoc;
        g322 = -18.9068 + 109.7927 * em - 214.6334 * emsq + 146.5816 * eoc;
        g410 = -41.122 + 242.6940 * em - 471.0940 * emsq + 313.9530 * eoc;
        g422 = -146.407 + 841.8800 * em - 1629.014 * emsq + 1083.4350 * eoc;
        g520 = -532.114 + 3017.977 * em - 5740.032 * emsq + 3708.2760 * eoc;
    } else {
        g211 = -72.099 + 331.819 * em - 508.738 * emsq + 266.724 * eoc;
        g310 = -346.844 + 1582.851 * em - 2415.925 * emsq + 1246.113 * eoc;
        g322 = -342.585 + 1554.908 * em - 2366.899 * emsq + 1215.972 * eoc;
        g410 = -1052.797 + 4758.686 * em - 7193.992 * emsq + 3651.957 * eoc;
        g422 = -3581.690 + 16178.110 * em - 24462.770 * emsq + 12422.520 * eoc;
        g520 = if em > 0.715 {
            -5149.66 + 29936.92 * em - 54087.36 * emsq + 31324.56 * eoc
        } else {
            1464.74 - 4664.75 * em + 3763.64 * emsq
        };
    }

    let (g533, g521, g532);
    if em < 0.7 {
        g533 = -919.22770 + 4988.6100 * em - 9064.7700 * emsq + 5542.21 * eoc;
        g521 = -822.71072 + 4568.6173 * em - 8491.4146 * emsq + 5337.524 * eoc;
        g532 = -853.66600 + 4690.2500 * em - 8624.7700 * emsq + 5341.4 * eoc;
    } else {
        g533 = -37995.780 + 161616.52 * em - 229838.20 * emsq + 109377.94 * eoc;
        g521 = -51752.104 + 218913.95 * em - 309468.16 * emsq + 146349.42 * eoc;
        g532 = -40023.880 + 170470.89 * em - 242699.48 * emsq + 115605.82 * eoc;
    }

    let sini2 = sinim * sinim;
    let f220 = 0.75 * (1.0 + 2.0 * cosim + cosisq);
    let f221 = 1.5 * sini2;
    let f321 = 1.875 * sinim * (1.0 - 2.0 * cosim - 3.0 * cosisq);
    let f322 = -1.875 * sinim * (1.0 + 2.0 * cosim - 3.0 * cosisq);
    let f441 = 35.0 * sini2 * f220;
    let f442 = 39.3750 * sini2 * sini2;
    let f522 = 9.84375
        * sinim
        * (sini2 * (1.0 - 2.0 * cosim - 5.0 * cosisq)
            + 0.33333333 * (-2.0 + 4.0 * cosim + 6.0 * cosisq));
    let f523 = sinim
        * (4.92187512 * sini2 * (-2.0 - 4.0 * cosim + 10.0 * cosisq)
            + 6.56250012 * (1.0 + 2.0 * cosim - 3.0 * cosisq));
    let f542 = 29.53125
        * sinim
        * (2.0 - 8.0 * cosim + cosisq * (-12.0 + 8.0 * cosim + 10.0 * cosisq));
    let f543 = 29.53125
        * sinim
        * (-2.0 - 8.0 * cosim + cosisq * (12.0 + 8.0 * cosim - 10.0 * cosisq));

    let xno2 = nm * nm;
    let ainv2 = aonv * aonv;
    let mut temp1 = 3.0 * xno2 * ainv2;
    let mut temp = temp1 * ROOT22;
    let d2201 = temp * f220 * g201;
    let d2211 = temp * f221 * g211;
    temp1 *= aonv;
    temp = temp1 * ROOT32;
    let d3210 = temp * f321 * g310;
    let d3222 = temp * f322 * g322;
    temp1 *= aonv;
    temp = 2.0 * temp1 * ROOT44;
    let d4410 = temp * f441 * g410;
    let d4422 = temp * f442 * g422;
    temp1 *= aonv;
    temp = temp1 * ROOT52;
    let d5220 = temp * f522 * g520;
    let d5232 = temp * f523 * g532;
    temp = 2.0 * temp1 * ROOT54;
    let d5421 = temp * f542 * g521;
    let d5433 = temp * f543 * g533;

    HalfDayTerms {
        d2201,
        d2211,
        d3210,
        d3222,
        d4410,
        d4422,
        d5220,
        d5232,
        d5421,
        d5433,
    }
}

/// Mean elements flowing through the deep-space secular update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SecularState {
    pub em: f64,
    pub argpm: f64,
    pub inclm: f64,
    pub mm: f64,
    pub nodem: f64,
    pub nm: f64,
}

/// Epoch quantities needed by [`dspace`].
pub(crate) struct ResonanceEpoch {
    pub argpo: f64,
    pub argpdot: f64,
    pub gsto: f64,
    pub no: f64,
}

/// Apply the luni-solar secular rates and integrate the resonance up to `t` minutes.
///
/// The integrator resumes from `checkpoint` unless it is unset, on the other side of epoch, or
/// farther from epoch than `t`; in those cases it restarts at epoch. On return the checkpoint
/// holds the last whole step reached.
pub(crate) fn dspace(
    terms: &ResonanceTerms,
    epoch: &ResonanceEpoch,
    t: f64,
    state: SecularState,
    checkpoint: &mut Option<ResonanceCheckpoint>,
) -> SecularState {
    let theta = (epoch.gsto + t * RPTIM).rem_euclid(DPI);
    let mut out = SecularState {
        em: state.em + terms.dedt * t,
        inclm: state.inclm + terms.didt * t,
        argpm: state.argpm + terms.domdt * t,
        nodem: state.nodem + terms.dnodt * t,
        mm: state.mm + terms.dmdt * t,
        nm: state.nm,
    };

    if terms.kind == Resonance::None {
        return out;
    }

    let mut cp = match *checkpoint {
        Some(cp) if cp.atime != 0.0 && t * cp.atime > 0.0 && t.abs() >= cp.atime.abs() => cp,
        _ => {
            trace!("resonance integrator restarts from epoch for t = {t}");
            ResonanceCheckpoint {
                atime: 0.0,
                xli: terms.xlamo,
                xni: epoch.no,
            }
        }
    };

    let delt = if t > 0.0 { STEP } else { -STEP };

    let (ft, xndt, xnddt, xldot) = loop {
        let (xndt, xnddt, xldot) = resonance_rates(terms, epoch, &cp);
        if (t - cp.atime).abs() >= STEP {
            cp.xli += xldot * delt + xndt * STEP2;
            cp.xni += xndt * delt + xnddt * STEP2;
            cp.atime += delt;
        } else {
            break (t - cp.atime, xndt, xnddt, xldot);
        }
    };
    *checkpoint = Some(cp);

    let nm = cp.xni + xndt * ft + xnddt * ft * ft * 0.5;
    let xl = cp.xli + xldot * ft + xndt * ft * ft * 0.5;
    out.mm = match terms.kind {
        Resonance::Synchronous(_) => xl - out.nodem - out.argpm + theta,
        _ => xl - 2.0 * out.nodem + 2.0 * theta,
    };
    let dndt = nm - epoch.no;
    out.nm = epoch.no + dndt;
    out
}

/// Time derivatives of mean motion and mean longitude at the checkpoint.
///
/// Return
/// ------
/// * `(xndt, xnddt, xldot)`
fn resonance_rates(
    terms: &ResonanceTerms,
    epoch: &ResonanceEpoch,
    cp: &ResonanceCheckpoint,
) -> (f64, f64, f64) {
    let xli = cp.xli;
    let xldot = cp.xni + terms.xfact;
    match terms.kind {
        Resonance::Synchronous(SynchronousTerms { del1, del2, del3 }) => {
            let xndt = del1 * (xli - FASX2).sin()
                + del2 * (2.0 * (xli - FASX4)).sin()
                + del3 * (3.0 * (xli - FASX6)).sin();
            let xnddt = del1 * (xli - FASX2).cos()
                + 2.0 * del2 * (2.0 * (xli - FASX4)).cos()
                + 3.0 * del3 * (3.0 * (xli - FASX6)).cos();
            (xndt, xnddt * xldot, xldot)
        }
        Resonance::HalfDay(d) => {
            let xomi = epoch.argpo + epoch.argpdot * cp.atime;
            let x2omi = xomi + xomi;
            let x2li = xli + xli;
            let xndt = d.d2201 * (x2omi + xli - G22).sin()
                + d.d2211 * (xli - G22).sin()
                + d.d3210 * (xomi + xli - G32).sin()
                + d.d3222 * (-xomi + xli - G32).sin()
                + d.d4410 * (x2omi + x2li - G44).sin()
                + d.d4422 * (x2li - G44).sin()
                + d.d5220 * (xomi + xli - G52).sin()
                + d.d5232 * (-xomi + xli - G52).sin()
                + d.d5421 * (xomi + x2li - G54).sin()
                + d.d5433 * (-xomi + x2li - G54).sin();
            let xnddt = d.d2201 * (x2omi + xli - G22).cos()
                + d.d2211 * (xli - G22).cos()
                + d.d3210 * (xomi + xli - G32).cos()
                + d.d3222 * (-xomi + xli - G32).cos()
                + d.d5220 * (xomi + xli - G52).cos()
                + d.d5232 * (-xomi + xli - G52).cos()
                + 2.0
                    * (d.d4410 * (x2omi + x2li - G44).cos()
                        + d.d4422 * (x2li - G44).cos()
                        + d.d5421 * (xomi + x2li - G54).cos()
                        + d.d5433 * (-xomi + x2li - G54).cos());
            (xndt, xnddt * xldot, xldot)
        }
        Resonance::None => (0.0, 0.0, xldot),
    }
}

#[cfg(test)]
mod resonance_test {
    use super::*;
    use crate::propagation::deep_space::dscom;
    use approx::assert_relative_eq;

    fn geo_terms() -> (ResonanceTerms, ResonanceEpoch) {
        let no = DPI / 1436.0;
        let (common, _) = dscom(18_000.0, 0.0002, 1.0, 0.0, 0.001, 1.5, no);
        let input = ResonanceInput {
            xke: 0.07436691613317342,
            argpo: 1.0,
            gsto: 2.0,
            mo: 0.5,
            mdot: no,
            no,
            nodeo: 1.5,
            nodedot: 0.0,
            xpidot: 0.0,
            ecco: 0.0002,
            inclo: 0.001,
        };
        let epoch = ResonanceEpoch {
            argpo: 1.0,
            argpdot: 0.0,
            gsto: 2.0,
            no,
        };
        (dsinit(&common, &input), epoch)
    }

    fn start(no: f64) -> SecularState {
        SecularState {
            em: 0.0002,
            argpm: 1.0,
            inclm: 0.001,
            mm: 0.5,
            nodem: 1.5,
            nm: no,
        }
    }

    #[test]
    fn test_geostationary_is_synchronous() {
        let (terms, _) = geo_terms();
        assert_eq!(terms.kind.irez(), 1);
        assert!((0.0..DPI).contains(&terms.xlamo));
    }

    #[test]
    fn test_checkpoint_resume_matches_restart() {
        let (terms, epoch) = geo_terms();
        let mut checkpoint = None;
        let _ = dspace(&terms, &epoch, 3000.0, start(epoch.no), &mut checkpoint);
        let cp = checkpoint.unwrap();
        assert_eq!(cp.atime, 2880.0);

        let resumed = dspace(&terms, &epoch, 9000.0, start(epoch.no), &mut checkpoint);
        let fresh = dspace(&terms, &epoch, 9000.0, start(epoch.no), &mut None);
        assert_eq!(resumed, fresh);
        assert_eq!(checkpoint.unwrap().atime, 8640.0);
    }

    #[test]
    fn test_checkpoint_discarded_when_going_backwards() {
        let (terms, epoch) = geo_terms();
        let mut checkpoint = None;
        let _ = dspace(&terms, &epoch, 5000.0, start(epoch.no), &mut checkpoint);
        let back = dspace(&terms, &epoch, -1000.0, start(epoch.no), &mut checkpoint);
        assert_eq!(checkpoint.unwrap().atime, -720.0);
        let fresh = dspace(&terms, &epoch, -1000.0, start(epoch.no), &mut None);
        assert_eq!(back, fresh);
    }

    #[test]
    fn test_no_integration_within_first_step() {
        let (terms, epoch) = geo_terms();
        let mut checkpoint = None;
        let out = dspace(&terms, &epoch, 0.0, start(epoch.no), &mut checkpoint);
        assert_eq!(checkpoint.unwrap().atime, 0.0);
        assert_relative_eq!(out.nm, epoch.no, max_relative = 1e-12);
    }
}
