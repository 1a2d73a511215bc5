use approx::assert_relative_eq;
use sgp4_kernel::{GravityModel, Satrec, StateVector};

pub const ISS: (&str, &str) = (
    "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991",
    "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482",
);

/// Near-earth, eccentric, period just over 2 h.
pub const VANGUARD: (&str, &str) = (
    "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753",
    "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667",
);

/// 12 h Molniya orbit, half-day resonance.
pub const MOLNIYA: (&str, &str) = (
    "1 08195U 75081A   06176.33215444  .00000099  00000-0  11873-3 0   813",
    "2 08195  64.1586 279.0717 6877146 264.7651  20.2257  2.00491383225656",
);

/// Geostationary, synchronous resonance.
pub const GEO: (&str, &str) = (
    "1 25954U 99060A   04039.68057285 -.00000108  00000-0  00000-0 0  6847",
    "2 25954   0.0004 243.8136 0001765  15.5294  22.7134  1.00271289 15615",
);

/// Transfer orbit inclined 6.9°, deep space without resonance, perturbed below the Lyddane
/// inclination.
pub const TRANSFER: (&str, &str) = (
    "1 23599U 95029B   06171.76535463  .00085586  12891-6  12956-2 0  2905",
    "2 23599   6.9327   0.2849 5782022 274.4436  25.2425  4.47796565123555",
);

/// Re-entering object, decays about an hour after epoch.
pub const DECAYING: (&str, &str) = (
    "1 28872U 05037B   05333.02012661  .25992681  00000-0  24476-3 0  1534",
    "2 28872  96.4736 157.9986 0303955 244.0492 110.6523 16.46015938 10708",
);

pub fn satrec(tle: (&str, &str)) -> Satrec {
    Satrec::twoline2rv(tle.0, tle.1, GravityModel::Wgs72).unwrap()
}

/// Compare a state with reference vectors, positions in km and velocities in km/s.
pub fn assert_state_close(actual: &StateVector, position: [f64; 3], velocity: [f64; 3]) {
    for k in 0..3 {
        assert_relative_eq!(actual.position[k], position[k], epsilon = 1e-5);
        assert_relative_eq!(actual.velocity[k], velocity[k], epsilon = 1e-8);
    }
}
