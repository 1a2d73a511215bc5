//! Luni-solar terms of the deep-space theory.
//!
//! [`dscom`] evaluates, once at initialization, the solar and lunar coupling coefficients
//! shared by the long-period periodics and the resonance setup. [`apply_periodics`] adds the
//! long-period periodic contributions to the secularly updated elements at every propagation.

use crate::constants::DPI;
use crate::params::OperationMode;
use std::f64::consts::PI;

const ZES: f64 = 0.01675;
const ZEL: f64 = 0.05490;
pub(crate) const ZNS: f64 = 1.19459e-5;
pub(crate) const ZNL: f64 = 1.5835218e-4;
const C1SS: f64 = 2.9864797e-6;
const C1L: f64 = 4.7968065e-7;
const ZSINIS: f64 = 0.39785416;
const ZCOSIS: f64 = 0.91744867;
const ZCOSGS: f64 = 0.1945905;
const ZSINGS: f64 = -0.98088458;

/// Inclination below which the Lyddane form of the periodics is used (≈ 11.46°).
const LYDDANE_INCLINATION: f64 = 0.2;

/// Long-period periodic coefficients, solar (`s*`) and lunar (`x*`, `e3`, `ee2`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LunarSolarPeriodics {
    pub e3: f64,
    pub ee2: f64,
    pub se2: f64,
    pub se3: f64,
    pub sgh2: f64,
    pub sgh3: f64,
    pub sgh4: f64,
    pub sh2: f64,
    pub sh3: f64,
    pub si2: f64,
    pub si3: f64,
    pub sl2: f64,
    pub sl3: f64,
    pub sl4: f64,
    pub xgh2: f64,
    pub xgh3: f64,
    pub xgh4: f64,
    pub xh2: f64,
    pub xh3: f64,
    pub xi2: f64,
    pub xi3: f64,
    pub xl2: f64,
    pub xl3: f64,
    pub xl4: f64,
    /// Lunar mean anomaly at epoch
    pub zmol: f64,
    /// Solar mean anomaly at epoch
    pub zmos: f64,
}

/// Coupling of the orbit with one perturbing body.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BodyCoupling {
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub s4: f64,
    pub s5: f64,
    pub s6: f64,
    pub s7: f64,
    pub z1: f64,
    pub z2: f64,
    pub z3: f64,
    pub z11: f64,
    pub z12: f64,
    pub z13: f64,
    pub z21: f64,
    pub z22: f64,
    pub z23: f64,
    pub z31: f64,
    pub z32: f64,
    pub z33: f64,
}

/// Intermediate quantities of [`dscom`] consumed by the resonance setup.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DeepSpaceCommon {
    pub sinim: f64,
    pub cosim: f64,
    pub emsq: f64,
    pub solar: BodyCoupling,
    pub lunar: BodyCoupling,
}

/// Orientation of a perturbing body relative to the orbit plane.
struct BodyGeometry {
    zcosg: f64,
    zsing: f64,
    zcosi: f64,
    zsini: f64,
    zcosh: f64,
    zsinh: f64,
    cc: f64,
}

/// Orbit quantities entering the coupling computation.
struct OrbitGeometry {
    sinim: f64,
    cosim: f64,
    sinomm: f64,
    cosomm: f64,
    em: f64,
    emsq: f64,
    betasq: f64,
    rtemsq: f64,
    xnoi: f64,
}

fn coupling(body: &BodyGeometry, orbit: &OrbitGeometry) -> BodyCoupling {
    let BodyGeometry {
        zcosg,
        zsing,
        zcosi,
        zsini,
        zcosh,
        zsinh,
        cc,
    } = *body;
    let OrbitGeometry {
        sinim,
        cosim,
        sinomm,
        cosomm,
        em,
        emsq,
        betasq,
        rtemsq,
        xnoi,
    } = *orbit;

    let a1 = zcosg * zcosh + zsing * zcosi * zsinh;
    let a3 = -zsing * zcosh + zcosg * zcosi * zsinh;
    let a7 = -zcosg * zsinh + zsing * zcosi * zcosh;
    let a8 = zsing * zsini;
    let a9 = zsing * zsinh + zcosg * zcosi * zcosh;
    let a10 = zcosg * zsini;
    let a2 = cosim * a7 + sinim * a8;
    let a4 = cosim * a9 + sinim * a10;
    let a5 = -sinim * a7 + cosim * a8;
    let a6 = -sinim * a9 + cosim * a10;

    let x1 = a1 * cosomm + a2 * sinomm;
    let x2 = a3 * cosomm + a4 * sinomm;
    let x3 = -a1 * sinomm + a2 * cosomm;
    let x4 = -a3 * sinomm + a4 * cosomm;
    let x5 = a5 * sinomm;
    let x6 = a6 * sinomm;
    let x7 = a5 * cosomm;
    let x8 = a6 * cosomm;

    let z31 = 12.0 * x1 * x1 - 3.0 * x3 * x3;
    let z32 = 24.0 * x1 * x2 - 6.0 * x3 * x4;
    let z33 = 12.0 * x2 * x2 - 3.0 * x4 * x4;
    let z1 = 3.0 * (a1 * a1 + a2 * a2) + z31 * emsq;
    let z2 = 6.0 * (a1 * a3 + a2 * a4) + z32 * emsq;
    let z3 = 3.0 * (a3 * a3 + a4 * a4) + z33 * emsq;
    let z11 = -6.0 * a1 * a5 + emsq * (-24.0 * x1 * x7 - 6.0 * x3 * x5);
    let z12 = -6.0 * (a1 * a6 + a3 * a5)
        + emsq * (-24.0 * (x2 * x7 + x1 * x8) - 6.0 * (x3 * x6 + x4 * x5));
    let z13 = -6.0 * a3 * a6 + emsq * (-24.0 * x2 * x8 - 6.0 * x4 * x6);
    let z21 = 6.0 * a2 * a5 + emsq * (24.0 * x1 * x5 - 6.0 * x3 * x7);
    let z22 = 6.0 * (a4 * a5 + a2 * a6)
        + emsq * (24.0 * (x2 * x5 + x1 * x6) - 6.0 * (x4 * x7 + x3 * x8));
    let z23 = 6.0 * a4 * a6 + emsq * (24.0 * x2 * x6 - 6.0 * x4 * x8);
    let z1 = z1 + z1 + betasq * z31;
    let z2 = z2 + z2 + betasq * z32;
    let z3 = z3 + z3 + betasq * z33;

    let s3 = cc * xnoi;
    let s2 = -0.5 * s3 / rtemsq;
    let s4 = s3 * rtemsq;
    let s1 = -15.0 * em * s4;
    let s5 = x1 * x3 + x2 * x4;
    let s6 = x2 * x3 + x1 * x4;
    let s7 = x2 * x4 - x1 * x3;

    BodyCoupling {
        s1,
        s2,
        s3,
        s4,
        s5,
        s6,
        s7,
        z1,
        z2,
        z3,
        z11,
        z12,
        z13,
        z21,
        z22,
        z23,
        z31,
        z32,
        z33,
    }
}

/// Solar and lunar coupling coefficients of an orbit.
///
/// Argument
/// --------
/// * `epoch`: days since 1949 December 31 00:00 UT
/// * `ep`, `argpp`, `inclp`, `nodep`, `np`: eccentricity, argument of perigee, inclination,
///   node (radians) and un-Kozai'd mean motion (rad/min) at epoch
/// * `tc`: minutes past epoch at which the geometry is evaluated
pub(crate) fn dscom(
    epoch: f64,
    ep: f64,
    argpp: f64,
    tc: f64,
    inclp: f64,
    nodep: f64,
    np: f64,
) -> (DeepSpaceCommon, LunarSolarPeriodics) {
    let nm = np;
    let em = ep;
    let snodm = nodep.sin();
    let cnodm = nodep.cos();
    let sinomm = argpp.sin();
    let cosomm = argpp.cos();
    let sinim = inclp.sin();
    let cosim = inclp.cos();
    let emsq = em * em;
    let betasq = 1.0 - emsq;
    let rtemsq = betasq.sqrt();

    // lunar orbit orientation
    let day = epoch + 18261.5 + tc / 1440.0;
    let xnodce = (4.5236020 - 9.2422029e-4 * day).rem_euclid(DPI);
    let stem = xnodce.sin();
    let ctem = xnodce.cos();
    let zcosil = 0.91375164 - 0.03568096 * ctem;
    let zsinil = (1.0 - zcosil * zcosil).sqrt();
    let zsinhl = 0.089683511 * stem / zsinil;
    let zcoshl = (1.0 - zsinhl * zsinhl).sqrt();
    let gam = 5.8351514 + 0.0019443680 * day;
    let zx = 0.39785416 * stem / zsinil;
    let zy = zcoshl * ctem + 0.91744867 * zsinhl * stem;
    let zx = gam + zx.atan2(zy) - xnodce;
    let zcosgl = zx.cos();
    let zsingl = zx.sin();

    let orbit = OrbitGeometry {
        sinim,
        cosim,
        sinomm,
        cosomm,
        em,
        emsq,
        betasq,
        rtemsq,
        xnoi: 1.0 / nm,
    };

    let solar = coupling(
        &BodyGeometry {
            zcosg: ZCOSGS,
            zsing: ZSINGS,
            zcosi: ZCOSIS,
            zsini: ZSINIS,
            zcosh: cnodm,
            zsinh: snodm,
            cc: C1SS,
        },
        &orbit,
    );
    let lunar = coupling(
        &BodyGeometry {
            zcosg: zcosgl,
            zsing: zsingl,
            zcosi: zcosil,
            zsini: zsinil,
            zcosh: zcoshl * cnodm + zsinhl * snodm,
            zsinh: snodm * zcoshl - cnodm * zsinhl,
            cc: C1L,
        },
        &orbit,
    );

    let ss = &solar;
    let s = &lunar;
    let periodics = LunarSolarPeriodics {
        zmol: (4.7199672 + 0.22997150 * day - gam).rem_euclid(DPI),
        zmos: (6.2565837 + 0.017201977 * day).rem_euclid(DPI),

        se2: 2.0 * ss.s1 * ss.s6,
        se3: 2.0 * ss.s1 * ss.s7,
        si2: 2.0 * ss.s2 * ss.z12,
        si3: 2.0 * ss.s2 * (ss.z13 - ss.z11),
        sl2: -2.0 * ss.s3 * ss.z2,
        sl3: -2.0 * ss.s3 * (ss.z3 - ss.z1),
        sl4: -2.0 * ss.s3 * (-21.0 - 9.0 * emsq) * ZES,
        sgh2: 2.0 * ss.s4 * ss.z32,
        sgh3: 2.0 * ss.s4 * (ss.z33 - ss.z31),
        sgh4: -18.0 * ss.s4 * ZES,
        sh2: -2.0 * ss.s2 * ss.z22,
        sh3: -2.0 * ss.s2 * (ss.z23 - ss.z21),

        ee2: 2.0 * s.s1 * s.s6,
        e3: 2.0 * s.s1 * s.s7,
        xi2: 2.0 * s.s2 * s.z12,
        xi3: 2.0 * s.s2 * (s.z13 - s.z11),
        xl2: -2.0 * s.s3 * s.z2,
        xl3: -2.0 * s.s3 * (s.z3 - s.z1),
        xl4: -2.0 * s.s3 * (-21.0 - 9.0 * emsq) * ZEL,
        xgh2: 2.0 * s.s4 * s.z32,
        xgh3: 2.0 * s.s4 * (s.z33 - s.z31),
        xgh4: -18.0 * s.s4 * ZEL,
        xh2: -2.0 * s.s2 * s.z22,
        xh3: -2.0 * s.s2 * (s.z23 - s.z21),
    };

    (
        DeepSpaceCommon {
            sinim,
            cosim,
            emsq,
            solar,
            lunar,
        },
        periodics,
    )
}

/// Elements perturbed by the long-period periodics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PerturbedElements {
    pub ep: f64,
    pub inclp: f64,
    pub nodep: f64,
    pub argpp: f64,
    pub mp: f64,
}

/// Add the luni-solar long-period periodics at `t` minutes past epoch.
///
/// Below 0.2 rad of perturbed inclination the node and perigee corrections go through the
/// Lyddane formulation to avoid the singularity of the classical form. The node then keeps
/// continuity with its unperturbed value. In AFSPC mode negative nodes are wrapped into [0, 2π).
pub(crate) fn apply_periodics(
    p: &LunarSolarPeriodics,
    t: f64,
    elements: PerturbedElements,
    opsmode: OperationMode,
) -> PerturbedElements {
    let PerturbedElements {
        mut ep,
        mut inclp,
        mut nodep,
        mut argpp,
        mut mp,
    } = elements;

    // solar terms
    let zm = p.zmos + ZNS * t;
    let zf = zm + 2.0 * ZES * zm.sin();
    let sinzf = zf.sin();
    let f2 = 0.5 * sinzf * sinzf - 0.25;
    let f3 = -0.5 * sinzf * zf.cos();
    let ses = p.se2 * f2 + p.se3 * f3;
    let sis = p.si2 * f2 + p.si3 * f3;
    let sls = p.sl2 * f2 + p.sl3 * f3 + p.sl4 * sinzf;
    let sghs = p.sgh2 * f2 + p.sgh3 * f3 + p.sgh4 * sinzf;
    let shs = p.sh2 * f2 + p.sh3 * f3;

    // lunar terms
    let zm = p.zmol + ZNL * t;
    let zf = zm + 2.0 * ZEL * zm.sin();
    let sinzf = zf.sin();
    let f2 = 0.5 * sinzf * sinzf - 0.25;
    let f3 = -0.5 * sinzf * zf.cos();
    let sel = p.ee2 * f2 + p.e3 * f3;
    let sil = p.xi2 * f2 + p.xi3 * f3;
    let sll = p.xl2 * f2 + p.xl3 * f3 + p.xl4 * sinzf;
    let sghl = p.xgh2 * f2 + p.xgh3 * f3 + p.xgh4 * sinzf;
    let shll = p.xh2 * f2 + p.xh3 * f3;

    let pe = ses + sel;
    let pinc = sis + sil;
    let pl = sls + sll;
    let mut pgh = sghs + sghl;
    let mut ph = shs + shll;

    inclp += pinc;
    ep += pe;
    let sinip = inclp.sin();
    let cosip = inclp.cos();

    if inclp >= LYDDANE_INCLINATION {
        ph /= sinip;
        pgh -= cosip * ph;
        argpp += pgh;
        nodep += ph;
        mp += pl;
    } else {
        let sinop = nodep.sin();
        let cosop = nodep.cos();
        let dalf = ph * cosop + pinc * cosip * sinop;
        let dbet = -ph * sinop + pinc * cosip * cosop;
        let alfdp = sinip * sinop + dalf;
        let betdp = sinip * cosop + dbet;

        // truncated remainder keeps the sign of the node
        nodep %= DPI;
        if nodep < 0.0 && opsmode == OperationMode::Afspc {
            nodep += DPI;
        }
        let xls = mp + argpp + pl + pgh + (cosip - pinc * sinip) * nodep;
        let xnoh = nodep;
        nodep = alfdp.atan2(betdp);
        if nodep < 0.0 && opsmode == OperationMode::Afspc {
            nodep += DPI;
        }
        if (xnoh - nodep).abs() > PI {
            if nodep < xnoh {
                nodep += DPI;
            } else {
                nodep -= DPI;
            }
        }
        mp += pl;
        argpp = xls - mp - cosip * nodep;
    }

    PerturbedElements {
        ep,
        inclp,
        nodep,
        argpp,
        mp,
    }
}
