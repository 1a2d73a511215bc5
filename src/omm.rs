//! # Orbit Mean-Elements Messages
//!
//! Reading and writing of the CCSDS OMM keyword set, as distributed in CSV and XML form.
//!
//! Reading takes two steps: [`parse_csv`] or [`parse_xml`] recover the keyword values of each
//! message as [`OmmFields`], then [`initialize`] builds a [`Satrec`] from them.
//! [`export_omm`] goes the other way.
//!
//! Units follow the message conventions: degrees, revolutions per day and its derivatives,
//! `BSTAR` in inverse Earth radii and an ISO 8601 UTC `EPOCH`.

use std::io::Read;

use quick_xml::de::from_str;
use serde::{Deserialize, Serialize};

use crate::constants::{DEG2RAD, JD_SGP4_EPOCH, MINUTES_PER_DAY, XPDOTP};
use crate::params::Sgp4Params;
use crate::propagation::{ElementSet, Satrec};
use crate::sgp4_errors::Sgp4Error;
use crate::time::{format_epoch_iso, parse_epoch_iso};

/// Keyword values of one OMM.
///
/// Every field is optional when reading. [`initialize`] reports the first missing one it needs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct OmmFields {
    pub object_name: Option<String>,
    pub object_id: Option<String>,
    pub center_name: Option<String>,
    pub ref_frame: Option<String>,
    pub time_system: Option<String>,
    pub mean_element_theory: Option<String>,
    pub epoch: Option<String>,
    pub mean_motion: Option<f64>,
    pub eccentricity: Option<f64>,
    pub inclination: Option<f64>,
    pub ra_of_asc_node: Option<f64>,
    pub arg_of_pericenter: Option<f64>,
    pub mean_anomaly: Option<f64>,
    pub ephemeris_type: Option<u8>,
    pub classification_type: Option<String>,
    pub norad_cat_id: Option<u32>,
    pub element_set_no: Option<u32>,
    pub rev_at_epoch: Option<u32>,
    pub bstar: Option<f64>,
    pub mean_motion_dot: Option<f64>,
    pub mean_motion_ddot: Option<f64>,
}

// -------------------------------------------------------------------------------------------------
// XML layout
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Ndm {
    #[serde(rename = "omm", default)]
    omms: Vec<OmmXml>,
}

#[derive(Debug, Deserialize)]
struct OmmXml {
    body: Body,
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(default)]
    segment: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    metadata: Metadata,
    data: Data,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct Metadata {
    object_name: Option<String>,
    object_id: Option<String>,
    center_name: Option<String>,
    ref_frame: Option<String>,
    time_system: Option<String>,
    mean_element_theory: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Data {
    #[serde(rename = "meanElements")]
    mean_elements: MeanElementsXml,
    #[serde(rename = "tleParameters")]
    tle_parameters: Option<TleParametersXml>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct MeanElementsXml {
    epoch: Option<String>,
    mean_motion: Option<f64>,
    eccentricity: Option<f64>,
    inclination: Option<f64>,
    ra_of_asc_node: Option<f64>,
    arg_of_pericenter: Option<f64>,
    mean_anomaly: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct TleParametersXml {
    ephemeris_type: Option<u8>,
    classification_type: Option<String>,
    norad_cat_id: Option<u32>,
    element_set_no: Option<u32>,
    rev_at_epoch: Option<u32>,
    bstar: Option<f64>,
    mean_motion_dot: Option<f64>,
    mean_motion_ddot: Option<f64>,
}

impl From<Segment> for OmmFields {
    fn from(segment: Segment) -> Self {
        let Segment { metadata, data } = segment;
        let elements = data.mean_elements;
        let tle = data.tle_parameters.unwrap_or_default();
        OmmFields {
            object_name: metadata.object_name,
            object_id: metadata.object_id,
            center_name: metadata.center_name,
            ref_frame: metadata.ref_frame,
            time_system: metadata.time_system,
            mean_element_theory: metadata.mean_element_theory,
            epoch: elements.epoch,
            mean_motion: elements.mean_motion,
            eccentricity: elements.eccentricity,
            inclination: elements.inclination,
            ra_of_asc_node: elements.ra_of_asc_node,
            arg_of_pericenter: elements.arg_of_pericenter,
            mean_anomaly: elements.mean_anomaly,
            ephemeris_type: tle.ephemeris_type,
            classification_type: tle.classification_type,
            norad_cat_id: tle.norad_cat_id,
            element_set_no: tle.element_set_no,
            rev_at_epoch: tle.rev_at_epoch,
            bstar: tle.bstar,
            mean_motion_dot: tle.mean_motion_dot,
            mean_motion_ddot: tle.mean_motion_ddot,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Readers
// -------------------------------------------------------------------------------------------------

/// Read every message of a CSV file with a header row of OMM keywords.
///
/// Unknown columns are ignored and empty cells read as missing values.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<OmmFields>, Sgp4Error> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let fields = csv_reader
        .deserialize::<OmmFields>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(fields)
}

/// Read every segment of an OMM XML document.
///
/// The root may be an `<ndm>` wrapping several `<omm>` messages, or a single `<omm>`.
pub fn parse_xml(xml: &str) -> Result<Vec<OmmFields>, Sgp4Error> {
    let ndm: Ndm = from_str(xml)?;
    let omms = if ndm.omms.is_empty() {
        vec![from_str::<OmmXml>(xml)?]
    } else {
        ndm.omms
    };
    Ok(omms
        .into_iter()
        .flat_map(|omm| omm.body.segment)
        .map(OmmFields::from)
        .collect())
}

fn required<T: Clone>(value: &Option<T>, name: &'static str) -> Result<T, Sgp4Error> {
    value.clone().ok_or(Sgp4Error::MissingOmmField(name))
}

/// Build a record from the keyword values of one message.
///
/// Return
/// ------
/// * [`Sgp4Error::MissingOmmField`] when a keyword needed by the theory is absent
/// * [`Sgp4Error::InvalidEpoch`] for an `EPOCH` that is not an ISO 8601 timestamp
/// * any error of [`Satrec::sgp4init`]
pub fn initialize(fields: &OmmFields, params: &Sgp4Params) -> Result<Satrec, Sgp4Error> {
    let epoch_text = required(&fields.epoch, "EPOCH")?;
    let (jd, fr) = parse_epoch_iso(&epoch_text)?;

    let elements = ElementSet {
        satnum: required(&fields.norad_cat_id, "NORAD_CAT_ID")?,
        epoch: (jd - JD_SGP4_EPOCH) + fr,
        bstar: required(&fields.bstar, "BSTAR")?,
        ndot: required(&fields.mean_motion_dot, "MEAN_MOTION_DOT")? / (XPDOTP * MINUTES_PER_DAY),
        nddot: required(&fields.mean_motion_ddot, "MEAN_MOTION_DDOT")?
            / (XPDOTP * MINUTES_PER_DAY * MINUTES_PER_DAY),
        ecco: required(&fields.eccentricity, "ECCENTRICITY")?,
        argpo: required(&fields.arg_of_pericenter, "ARG_OF_PERICENTER")? * DEG2RAD,
        inclo: required(&fields.inclination, "INCLINATION")? * DEG2RAD,
        mo: required(&fields.mean_anomaly, "MEAN_ANOMALY")? * DEG2RAD,
        no_kozai: required(&fields.mean_motion, "MEAN_MOTION")? / XPDOTP,
        nodeo: required(&fields.ra_of_asc_node, "RA_OF_ASC_NODE")? * DEG2RAD,
    };

    let mut sat = Satrec::sgp4init(params, &elements)?;
    sat.classification = fields
        .classification_type
        .as_deref()
        .and_then(|c| c.trim().chars().next())
        .unwrap_or('U');
    sat.intldesg = fields
        .object_id
        .as_deref()
        .map(|id| id.get(2..).unwrap_or("").replace('-', ""))
        .unwrap_or_default();
    sat.ephtype = fields.ephemeris_type.unwrap_or(0);
    sat.elnum = fields.element_set_no.unwrap_or(0);
    sat.revnum = fields.rev_at_epoch.unwrap_or(0);
    Ok(sat)
}

// -------------------------------------------------------------------------------------------------
// Writer
// -------------------------------------------------------------------------------------------------

/// International designator `YYNNNAAA` expanded to the OMM `YYYY-NNNAAA` form.
fn object_id(intldesg: &str) -> String {
    let intldesg = intldesg.trim();
    match (intldesg.get(..2), intldesg.get(2..)) {
        (Some(yy), Some(rest)) if !rest.is_empty() => {
            let century = match yy.parse::<u32>() {
                Ok(y) if y < 57 => "20",
                _ => "19",
            };
            format!("{century}{yy}-{rest}")
        }
        _ => intldesg.to_string(),
    }
}

/// Keyword values describing a record, for writing an OMM.
pub fn export_omm(sat: &Satrec, object_name: &str) -> OmmFields {
    OmmFields {
        object_name: Some(object_name.to_string()),
        object_id: Some(object_id(&sat.intldesg)),
        center_name: Some("EARTH".to_string()),
        ref_frame: Some("TEME".to_string()),
        time_system: Some("UTC".to_string()),
        mean_element_theory: Some("SGP4".to_string()),
        epoch: Some(format_epoch_iso(sat.epoch_year(), sat.epochdays)),
        mean_motion: Some(sat.no_kozai * XPDOTP),
        eccentricity: Some(sat.ecco),
        inclination: Some(sat.inclo / DEG2RAD),
        ra_of_asc_node: Some(sat.nodeo / DEG2RAD),
        arg_of_pericenter: Some(sat.argpo / DEG2RAD),
        mean_anomaly: Some(sat.mo / DEG2RAD),
        ephemeris_type: Some(sat.ephtype),
        classification_type: Some(sat.classification.to_string()),
        norad_cat_id: Some(sat.satnum),
        element_set_no: Some(sat.elnum),
        rev_at_epoch: Some(sat.revnum),
        bstar: Some(sat.bstar),
        mean_motion_dot: Some(sat.ndot * XPDOTP * MINUTES_PER_DAY),
        mean_motion_ddot: Some(sat.nddot * XPDOTP * MINUTES_PER_DAY * MINUTES_PER_DAY),
    }
}
