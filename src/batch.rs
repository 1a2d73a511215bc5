//! Propagation over arrays of dates and records.
//!
//! Dates come as two parallel slices, whole Julian dates and fractions, so that each sample keeps
//! full precision. Failed samples do not stop the batch: their error code is stored and their
//! vectors are NaN, except for decayed satellites (code 6) whose vectors stay finite.

use itertools::{iproduct, Itertools};
use log::debug;

use crate::constants::JulianDate;
use crate::propagation::{Satrec, StateVector};
use crate::sgp4_errors::Sgp4Error;

/// Outcome of a batch, one entry per sample.
///
/// Samples are stored row-major: for `n` records and `m` dates, sample `(i, j)` is at index
/// `i * m + j`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchResult {
    pub n_records: usize,
    pub n_times: usize,
    pub errors: Vec<i32>,
    pub positions: Vec<[f64; 3]>,
    pub velocities: Vec<[f64; 3]>,
}

impl BatchResult {
    fn with_capacity(n_records: usize, n_times: usize) -> Self {
        let size = n_records * n_times;
        BatchResult {
            n_records,
            n_times,
            errors: Vec::with_capacity(size),
            positions: Vec::with_capacity(size),
            velocities: Vec::with_capacity(size),
        }
    }

    fn push(&mut self, sample: (i32, [f64; 3], [f64; 3])) {
        let (error, position, velocity) = sample;
        self.errors.push(error);
        self.positions.push(position);
        self.velocities.push(velocity);
    }

    /// Error code, position and velocity of record `record` at date `time`.
    pub fn get(&self, record: usize, time: usize) -> Option<(i32, [f64; 3], [f64; 3])> {
        if record >= self.n_records || time >= self.n_times {
            return None;
        }
        let index = record * self.n_times + time;
        Some((self.errors[index], self.positions[index], self.velocities[index]))
    }

    /// Samples that hold a usable state vector, decayed ones included.
    pub fn states(&self) -> impl Iterator<Item = Option<StateVector>> + '_ {
        self.positions
            .iter()
            .zip(&self.velocities)
            .map(|(position, velocity)| {
                let state = StateVector {
                    position: (*position).into(),
                    velocity: (*velocity).into(),
                };
                (!state.position.x.is_nan()).then_some(state)
            })
    }
}

fn check_lengths(jd: &[JulianDate], fr: &[f64]) -> Result<(), Sgp4Error> {
    if jd.len() != fr.len() {
        return Err(Sgp4Error::LengthMismatch(jd.len(), fr.len()));
    }
    Ok(())
}

impl Satrec {
    /// Propagate one record to every date `jd[k] + fr[k]`.
    ///
    /// Return
    /// ------
    /// * [`Sgp4Error::LengthMismatch`] if the two slices differ in length
    pub fn sgp4_array(
        &mut self,
        jd: &[JulianDate],
        fr: &[f64],
    ) -> Result<BatchResult, Sgp4Error> {
        check_lengths(jd, fr)?;
        let mut result = BatchResult::with_capacity(1, jd.len());
        for (&jd, &fr) in jd.iter().zip(fr) {
            result.push(self.sgp4(jd, fr));
        }
        Ok(result)
    }
}

/// A set of records propagated together.
#[derive(Debug, Clone, Default)]
pub struct SatrecArray {
    pub records: Vec<Satrec>,
}

impl SatrecArray {
    pub fn new(records: Vec<Satrec>) -> Self {
        SatrecArray { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Propagate every record to every date `jd[k] + fr[k]`, records outermost.
    ///
    /// Return
    /// ------
    /// * [`Sgp4Error::LengthMismatch`] if the two slices differ in length
    pub fn sgp4(&mut self, jd: &[JulianDate], fr: &[f64]) -> Result<BatchResult, Sgp4Error> {
        check_lengths(jd, fr)?;
        debug!(
            "propagating {} records over {} dates",
            self.records.len(),
            jd.len()
        );
        let dates = jd.iter().copied().zip_eq(fr.iter().copied()).collect_vec();
        let mut result = BatchResult::with_capacity(self.records.len(), dates.len());
        for (record, &(jd, fr)) in iproduct!(0..self.records.len(), dates.iter()) {
            result.push(self.records[record].sgp4(jd, fr));
        }
        Ok(result)
    }
}

impl From<Vec<Satrec>> for SatrecArray {
    fn from(records: Vec<Satrec>) -> Self {
        SatrecArray::new(records)
    }
}
