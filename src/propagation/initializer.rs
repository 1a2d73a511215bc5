//! Initialization of a [`Satrec`] from a mean element set.
//!
//! The initializer recovers the Brouwer mean motion from the Kozai one, derives the secular and
//! drag coefficients, selects the near-earth or deep-space theory and finally propagates once to
//! epoch to make sure the coefficients are usable.

use log::{debug, warn};

use crate::constants::{Minutes, DPI, JD_SGP4_EPOCH, X2O3};
use crate::earth_gravity::GravityConstants;
use crate::params::{OperationMode, Sgp4Params};
use crate::propagation::deep_space::dscom;
use crate::propagation::resonance::{dsinit, ResonanceInput};
use crate::propagation::sgp4::{self, long_period_coefficients};
use crate::propagation::{
    DeepSpaceTerms, HigherOrderDrag, MeanElements, Method, Satrec, SecularTerms,
};
use crate::sgp4_errors::{PropagationError, Sgp4Error};
use crate::time::{gstime, gstime_afspc, invjday, jday, round_to_digits};

/// Orbital period (minutes) from which the deep-space theory is used.
pub const DEEP_SPACE_PERIOD: Minutes = 225.0;

/// Perigee height (km) under which the higher-order drag terms are dropped.
const SIMPLIFIED_DRAG_PERIGEE_KM: f64 = 220.0;

/// Mean element set accepted by [`Satrec::sgp4init`].
///
/// Units
/// -----
/// * `epoch`: days since 1949 December 31 00:00 UT
/// * `bstar`: inverse Earth radii
/// * `ndot`: rad/min², `nddot`: rad/min³
/// * angles in radians, `no_kozai` in rad/min
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementSet {
    pub satnum: u32,
    pub epoch: f64,
    pub bstar: f64,
    pub ndot: f64,
    pub nddot: f64,
    pub ecco: f64,
    pub argpo: f64,
    pub inclo: f64,
    pub mo: f64,
    pub no_kozai: f64,
    pub nodeo: f64,
}

impl ElementSet {
    /// Reject element sets the theory cannot represent.
    fn validate(&self) -> Result<(), Sgp4Error> {
        let fields = [
            ("epoch", self.epoch),
            ("bstar", self.bstar),
            ("ndot", self.ndot),
            ("nddot", self.nddot),
            ("ecco", self.ecco),
            ("argpo", self.argpo),
            ("inclo", self.inclo),
            ("mo", self.mo),
            ("no_kozai", self.no_kozai),
            ("nodeo", self.nodeo),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Sgp4Error::InvalidElement(format!("{name} = {value}")));
        }
        if !(self.ecco < 1.0 && self.ecco >= -0.001) {
            return Err(Sgp4Error::Initialization(
                PropagationError::MeanEccentricity(self.ecco),
            ));
        }
        if self.no_kozai <= 0.0 {
            return Err(Sgp4Error::Initialization(PropagationError::MeanMotion(
                self.no_kozai,
            )));
        }
        Ok(())
    }
}

/// Epoch quantities derived from the Kozai mean motion.
struct EpochGeometry {
    no_unkozai: f64,
    ao: f64,
    con41: f64,
    con42: f64,
    cosio: f64,
    cosio2: f64,
    omeosq: f64,
    posq: f64,
    rp: f64,
    rteosq: f64,
    sinio: f64,
    gsto: f64,
}

/// Un-Kozai the mean motion and compute the sidereal time at epoch.
fn initl(
    consts: &GravityConstants,
    ecco: f64,
    epoch: f64,
    inclo: f64,
    no_kozai: f64,
    opsmode: OperationMode,
) -> EpochGeometry {
    let eccsq = ecco * ecco;
    let omeosq = 1.0 - eccsq;
    let rteosq = omeosq.sqrt();
    let cosio = inclo.cos();
    let cosio2 = cosio * cosio;

    let ak = (consts.xke / no_kozai).powf(X2O3);
    let d1 = 0.75 * consts.j2 * (3.0 * cosio2 - 1.0) / (rteosq * omeosq);
    let del = d1 / (ak * ak);
    let adel = ak * (1.0 - del * del - del * (1.0 / 3.0 + 134.0 * del * del / 81.0));
    let del = d1 / (adel * adel);
    let no_unkozai = no_kozai / (1.0 + del);

    let ao = (consts.xke / no_unkozai).powf(X2O3);
    let po = ao * omeosq;
    let con42 = 1.0 - 5.0 * cosio2;

    let gsto = match opsmode {
        OperationMode::Afspc => gstime_afspc(epoch),
        OperationMode::Improved => gstime(epoch + JD_SGP4_EPOCH),
    };

    EpochGeometry {
        no_unkozai,
        ao,
        con41: -con42 - cosio2 - cosio2,
        con42,
        cosio,
        cosio2,
        omeosq,
        posq: po * po,
        rp: ao * (1.0 - ecco),
        rteosq,
        sinio: inclo.sin(),
        gsto,
    }
}

impl Satrec {
    /// Initialize a record from a mean element set.
    ///
    /// Argument
    /// --------
    /// * `params`: gravity model, operation mode and epoch handling
    /// * `elements`: the mean elements, see [`ElementSet`] for units
    ///
    /// Return
    /// ------
    /// * the initialized record. Its epoch fields (`jdsatepoch`, `jdsatepoch_f`, `epochyr`,
    ///   `epochdays`) are derived from `elements.epoch`.
    /// * [`Sgp4Error::InvalidElement`] for non-finite elements
    /// * [`Sgp4Error::Initialization`] when the elements are out of range or when the
    ///   propagation to epoch fails fatally
    ///
    /// A satellite already below the surface at epoch initializes fine: the decay is recorded
    /// in the `error` field and reported again by every propagation.
    ///
    /// A mean eccentricity outside [-0.001, 1) or a non-positive mean motion is rejected before
    /// any coefficient is computed. The error is the one the self-check at epoch reports, since
    /// the drag terms vanish at t = 0: code 1 carrying the eccentricity, or code 2 carrying the
    /// mean motion. No record exists for such elements, so no mean elements are recorded either.
    pub fn sgp4init(params: &Sgp4Params, elements: &ElementSet) -> Result<Satrec, Sgp4Error> {
        elements.validate()?;

        let consts = params.gravity.constants();
        let re = consts.radius_earth_km;
        let ElementSet {
            satnum,
            epoch,
            bstar,
            ndot,
            nddot,
            ecco,
            argpo,
            inclo,
            mo,
            no_kozai,
            nodeo,
        } = *elements;

        // split epoch
        let whole = epoch.floor();
        let mut fraction = epoch - whole;
        let digits = params.epoch_fraction_digits;
        if round_to_digits(epoch, digits) == epoch {
            fraction = round_to_digits(fraction, digits);
        }
        let jdsatepoch = whole + JD_SGP4_EPOCH;
        let (year, ..) = invjday(jdsatepoch);
        let (jan0, jan0_fraction) = jday(year, 1, 0, 0, 0, 0.0);
        let epochdays = jdsatepoch - (jan0 + jan0_fraction) + fraction;

        let ss = 78.0 / re + 1.0;
        let qzms2t = ((120.0 - 78.0) / re).powi(4);

        let geo = initl(&consts, ecco, epoch, inclo, no_kozai, params.opsmode);
        let no = geo.no_unkozai;
        let a = (no * consts.tumin).powf(-X2O3);

        let simplified = geo.rp < SIMPLIFIED_DRAG_PERIGEE_KM / re + 1.0;

        // atmospheric density fit below 156 km of perigee
        let mut sfour = ss;
        let mut qzms24 = qzms2t;
        let perige = (geo.rp - 1.0) * re;
        if perige < 156.0 {
            sfour = if perige < 98.0 { 20.0 } else { perige - 78.0 };
            qzms24 = ((120.0 - sfour) / re).powi(4);
            sfour = sfour / re + 1.0;
        }

        let ao = geo.ao;
        let pinvsq = 1.0 / geo.posq;
        let tsi = 1.0 / (ao - sfour);
        let eta = ao * ecco * tsi;
        let etasq = eta * eta;
        let eeta = ecco * eta;
        let psisq = (1.0 - etasq).abs();
        let coef = qzms24 * tsi.powi(4);
        let coef1 = coef / psisq.powf(3.5);
        let cc2 = coef1
            * no
            * (ao * (1.0 + 1.5 * etasq + eeta * (4.0 + etasq))
                + 0.375 * consts.j2 * tsi / psisq * geo.con41 * (8.0 + 3.0 * etasq * (8.0 + etasq)));
        let cc1 = bstar * cc2;
        let cc3 = if ecco > 1.0e-4 {
            -2.0 * coef * tsi * consts.j3oj2 * no * geo.sinio / ecco
        } else {
            0.0
        };
        let x1mth2 = 1.0 - geo.cosio2;
        let cc4 = 2.0
            * no
            * coef1
            * ao
            * geo.omeosq
            * (eta * (2.0 + 0.5 * etasq) + ecco * (0.5 + 2.0 * etasq)
                - consts.j2 * tsi / (ao * psisq)
                    * (-3.0 * geo.con41 * (1.0 - 2.0 * eeta + etasq * (1.5 - 0.5 * eeta))
                        + 0.75 * x1mth2 * (2.0 * etasq - eeta * (1.0 + etasq)) * (2.0 * argpo).cos()));
        let cc5 = 2.0 * coef1 * ao * geo.omeosq * (1.0 + 2.75 * (etasq + eeta) + eeta * etasq);

        // secular rates
        let cosio2 = geo.cosio2;
        let cosio4 = cosio2 * cosio2;
        let temp1 = 1.5 * consts.j2 * pinvsq * no;
        let temp2 = 0.5 * temp1 * consts.j2 * pinvsq;
        let temp3 = -0.46875 * consts.j4 * pinvsq * pinvsq * no;
        let mdot = no
            + 0.5 * temp1 * geo.rteosq * geo.con41
            + 0.0625 * temp2 * geo.rteosq * (13.0 - 78.0 * cosio2 + 137.0 * cosio4);
        let argpdot = -0.5 * temp1 * geo.con42
            + 0.0625 * temp2 * (7.0 - 114.0 * cosio2 + 395.0 * cosio4)
            + temp3 * (3.0 - 36.0 * cosio2 + 49.0 * cosio4);
        let xhdot1 = -temp1 * geo.cosio;
        let nodedot = xhdot1
            + (0.5 * temp2 * (4.0 - 19.0 * cosio2) + 2.0 * temp3 * (3.0 - 7.0 * cosio2))
                * geo.cosio;
        let xpidot = argpdot + nodedot;
        let xmcof = if ecco > 1.0e-4 {
            -X2O3 * coef * bstar / eeta
        } else {
            0.0
        };
        let (aycof, xlcof) = long_period_coefficients(consts.j3oj2, geo.sinio, geo.cosio);
        let delmotemp = 1.0 + eta * mo.cos();

        let secular = SecularTerms {
            mdot,
            argpdot,
            nodedot,
            nodecf: 3.5 * geo.omeosq * xhdot1 * cc1,
            cc1,
            cc4,
            cc5,
            t2cof: 1.5 * cc1,
            omgcof: bstar * cc3 * argpo.cos(),
            xmcof,
            eta,
            delmo: delmotemp * delmotemp * delmotemp,
            sinmao: mo.sin(),
            xlcof,
            aycof,
            con41: geo.con41,
            x1mth2,
            x7thm1: 7.0 * cosio2 - 1.0,
        };

        let method = if DPI / no >= DEEP_SPACE_PERIOD {
            let (common, periodics) = dscom(epoch, ecco, argpo, 0.0, inclo, nodeo, no);
            let resonance = dsinit(
                &common,
                &ResonanceInput {
                    xke: consts.xke,
                    argpo,
                    gsto: geo.gsto,
                    mo,
                    mdot,
                    no,
                    nodeo,
                    nodedot,
                    xpidot,
                    ecco,
                    inclo,
                },
            );
            Method::DeepSpace(Box::new(DeepSpaceTerms {
                periodics,
                resonance,
            }))
        } else if simplified {
            Method::NearEarth(None)
        } else {
            let cc1sq = cc1 * cc1;
            let d2 = 4.0 * ao * tsi * cc1sq;
            let temp = d2 * tsi * cc1 / 3.0;
            let d3 = (17.0 * ao + sfour) * temp;
            let d4 = 0.5 * temp * ao * tsi * (221.0 * ao + 31.0 * sfour) * cc1;
            Method::NearEarth(Some(HigherOrderDrag {
                d2,
                d3,
                d4,
                t3cof: d2 + 2.0 * cc1sq,
                t4cof: 0.25 * (3.0 * d3 + cc1 * (12.0 * d2 + 10.0 * cc1sq)),
                t5cof: 0.2
                    * (3.0 * d4 + 12.0 * cc1 * d3 + 6.0 * d2 * d2 + 15.0 * cc1sq * (2.0 * d2 + cc1sq)),
            }))
        };

        let mut rec = Satrec {
            satnum,
            classification: 'U',
            intldesg: String::new(),
            ephtype: 0,
            elnum: 0,
            revnum: 0,
            epochyr: year.rem_euclid(100),
            epochdays,
            jdsatepoch,
            jdsatepoch_f: fraction,
            gravity: params.gravity,
            constants: consts,
            opsmode: params.opsmode,
            reuse_resonance_checkpoint: params.reuse_resonance_checkpoint,
            bstar,
            ndot,
            nddot,
            ecco,
            argpo,
            inclo,
            mo,
            no_kozai,
            nodeo,
            no_unkozai: no,
            a,
            alta: a * (1.0 + ecco) - 1.0,
            altp: a * (1.0 - ecco) - 1.0,
            gsto: geo.gsto,
            secular,
            method,
            t: 0.0,
            error: 0,
            error_message: None,
            mean: MeanElements::default(),
            checkpoint: None,
        };

        debug!(
            "initialized satellite {satnum}: method '{}', simplified drag {}, resonance {}, \
             no_unkozai {:.10} rad/min, perigee {:.3} km",
            rec.method.as_char(),
            rec.method.is_simplified(),
            rec.irez(),
            no,
            perige
        );

        let outcome = sgp4::sgp4(&rec, 0.0, &mut None);
        rec.record_outcome(0.0, &outcome);
        match outcome.result {
            Err(err) if err.is_fatal() => Err(Sgp4Error::Initialization(err)),
            Err(err) => {
                warn!("satellite {satnum} at epoch: {err}");
                Ok(rec)
            }
            Ok(_) => Ok(rec),
        }
    }
}
