mod common;

use approx::assert_relative_eq;
use common::{assert_state_close, satrec, DECAYING, GEO, ISS, MOLNIYA, TRANSFER, VANGUARD};
use sgp4_kernel::propagation::{ElementSet, Method};
use sgp4_kernel::tle::parse_tle;
use sgp4_kernel::{OperationMode, PropagationError, Satrec, Sgp4Error, Sgp4Params};

/// Record initialized from a TLE with its drag term replaced.
fn with_bstar(tle: (&str, &str), bstar: f64) -> Satrec {
    let elements = ElementSet {
        bstar,
        ..parse_tle(tle.0, tle.1).unwrap().element_set()
    };
    Satrec::sgp4init(&Sgp4Params::default(), &elements).unwrap()
}

fn all_nan(position: [f64; 3], velocity: [f64; 3]) -> bool {
    position.iter().chain(&velocity).all(|x| x.is_nan())
}

#[test]
fn test_iss_near_earth() {
    let mut sat = satrec(ISS);
    assert_eq!(sat.method.as_char(), 'n');
    assert_relative_eq!(sat.no_unkozai, 0.06762851133317717, epsilon = 1e-14);
    assert_relative_eq!(sat.gsto, 5.720451405425919, epsilon = 1e-10);

    let state = sat.propagate(0.0).unwrap();
    assert_state_close(
        &state,
        [3469.947984448025, -2690.388430365502, 5175.8319246510355],
        [5.810229142098143, 4.802261184575433, -1.3882803330121878],
    );

    let state = sat.propagate(360.0).unwrap();
    assert_state_close(
        &state,
        [-1189.0000152285443, -4867.2965123761205, 4575.095816294599],
        [6.926666193747094, 1.1932507290528882, 3.0671733281489995],
    );
    assert_eq!(sat.error, 0);
    assert_eq!(sat.t, 360.0);

    let state = sat.propagate(-1440.0).unwrap();
    assert_state_close(
        &state,
        [-3332.13167924569, 2726.792367791995, -5262.687548399113],
        [-5.650278615669805, -5.068306100232222, 0.9592250627358757],
    );
}

#[test]
fn test_vanguard_eccentric_near_earth() {
    let sat = satrec(VANGUARD);
    assert_eq!(sat.method.as_char(), 'n');
    assert!(!sat.method.is_simplified());
    assert_relative_eq!(sat.no_unkozai, 0.04720630155917529, epsilon = 1e-14);
    assert_relative_eq!(sat.gsto, 3.4691723423794016, epsilon = 1e-10);
    assert_relative_eq!(sat.jdsatepoch + sat.jdsatepoch_f, 2451723.28495062, epsilon = 1e-8);

    let expected = [
        (
            0.0,
            [7022.465292664066, -1400.0829675535485, 0.03995155416986172],
            [1.8938410145129438, 6.405893759209845, 4.5348072503547385],
        ),
        (
            360.0,
            [-7154.031202015714, -3783.1768250365603, -3536.194122942211],
            [4.741887408996148, -4.151817765373696, -2.09393542490737],
        ),
        (
            4320.0,
            [-9060.473735694448, 4658.709525022627, 813.6867315341087],
            [-2.2328327827424985, -4.110453489937017, -3.1573454334573743],
        ),
    ];
    for (tsince, position, velocity) in expected {
        let state = sat.propagate_from_epoch(tsince).unwrap();
        assert_state_close(&state, position, velocity);
    }
}

#[test]
fn test_molniya_half_day_resonance() {
    let mut sat = satrec(MOLNIYA);
    assert_eq!(sat.method.as_char(), 'd');
    assert_eq!(sat.irez(), 2);

    let expected = [
        (
            0.0,
            [2349.8948335004975, -14785.938115615298, 0.021193784113113737],
            [2.7214880955588274, -3.256811654658797, 4.498416672371418],
        ),
        (
            360.0,
            [19089.297629681238, 3107.894950177246, 39958.14661369903],
            [-0.41030803408321015, 1.6403322771134132, -0.3068738176577778],
        ),
        (
            720.0,
            [2622.1322220726047, -15125.15464924492, 474.5104839821853],
            [2.688287198776586, -3.0784266641267344, 4.4949795304489095],
        ),
        (
            1080.0,
            [19048.562015231724, 3260.4322311907513, 39923.39143966544],
            [-0.4180155357908755, 1.6393469527790003, -0.32609484009266876],
        ),
        (
            1440.0,
            [2890.8063826772895, -15446.439523001167, 948.7701017642999],
            [2.6544074895934386, -2.9093448948293354, 4.486437361921106],
        ),
        (
            2880.0,
            [3417.209315864676, -16038.795106653064, 1894.7493405778603],
            [2.585515864060444, -2.596818145614589, 4.456882556194726],
        ),
    ];
    for (tsince, position, velocity) in expected {
        let state = sat.propagate(tsince).unwrap();
        assert_state_close(&state, position, velocity);
    }
    assert!(sat.checkpoint().is_some());
}

#[test]
fn test_geostationary_synchronous_resonance() {
    let sat = satrec(GEO);
    assert!(sat.is_deep_space());
    assert_eq!(sat.irez(), 1);

    let expected = [
        (
            0.0,
            [8827.156604720616, -41223.00971237347, 3.6348296285816697],
            [3.0070873185186304, 0.6437013231314681, 0.0009416630000092782],
        ),
        (
            1440.0,
            [9533.27750818389, -41065.523902136294, 3.3075648210731163],
            [2.9955961712664156, 0.6952002362638994, 0.0009385247868215388],
        ),
        (
            -1440.0,
            [8118.185192209667, -41368.40537377722, 4.110466873303029],
            [3.0176967405173363, 0.5919942965820959, 0.0009330158220801516],
        ),
    ];
    for (tsince, position, velocity) in expected {
        let state = sat.propagate_from_epoch(tsince).unwrap();
        assert_state_close(&state, position, velocity);
    }
}

#[test]
fn test_call_order_does_not_matter() {
    let times = [2880.0, 0.0, 4320.0, -1440.0, 720.0, 10_000.0, 1080.0];

    let mut stateful = satrec(MOLNIYA);
    let stateless = satrec(MOLNIYA);
    let mut checkpoint = None;
    for tsince in times {
        let reference = stateless.propagate_from_epoch(tsince).unwrap();
        assert_eq!(stateful.propagate(tsince).unwrap(), reference);
        assert_eq!(
            stateless
                .propagate_with_checkpoint(tsince, &mut checkpoint)
                .unwrap(),
            reference
        );
    }

    // a fresh record gives the same answer as one that has been used
    let fresh = satrec(MOLNIYA);
    assert_eq!(
        fresh.propagate_from_epoch(1080.0),
        stateful.propagate_from_epoch(1080.0)
    );
}

#[test]
fn test_checkpoint_can_be_disabled() {
    let params = Sgp4Params::builder()
        .reuse_resonance_checkpoint(false)
        .build()
        .unwrap();
    let mut sat = Satrec::from_tle_with(MOLNIYA.0, MOLNIYA.1, &params).unwrap();
    let state = sat.propagate(2880.0).unwrap();
    assert!(sat.checkpoint().is_none());
    assert_eq!(state, satrec(MOLNIYA).propagate_from_epoch(2880.0).unwrap());
}

#[test]
fn test_decayed_satellite_keeps_its_state() {
    let mut sat = satrec(DECAYING);
    assert!(sat.propagate(0.0).is_ok());
    assert!(sat.propagate(50.0).is_ok());

    let err = sat.propagate(60.0).unwrap_err();
    assert_eq!(err.code(), 6);
    assert!(!err.is_fatal());
    assert_eq!(sat.error, 6);
    assert!(sat.error_message.as_deref().unwrap().contains("decayed"));
    assert_state_close(
        &err.state().unwrap(),
        [2568.424060778358, -1713.3245649471346, -5535.752829419957],
        [-6.715660094299387, 2.243020402936857, -3.800314400104134],
    );

    let (code, position, velocity) = sat.sgp4_tsince(1440.0);
    assert_eq!(code, 6);
    assert!(position.iter().chain(&velocity).all(|x| x.is_finite()));

    // a later successful call clears the error
    sat.propagate(0.0).unwrap();
    assert_eq!(sat.error, 0);
    assert_eq!(sat.error_message, None);
}

#[test]
fn test_hyperbolic_elements_are_rejected() {
    let mut elements = parse_tle(ISS.0, ISS.1).unwrap().element_set();
    elements.ecco = 1.3;
    let err = Satrec::sgp4init(&Sgp4Params::default(), &elements).unwrap_err();
    assert_eq!(
        err,
        Sgp4Error::Initialization(PropagationError::MeanEccentricity(1.3))
    );
    match err {
        Sgp4Error::Initialization(cause) => assert_eq!(cause.code(), 1),
        other => panic!("unexpected error {other:?}"),
    }

    elements.ecco = -0.002;
    let err = Satrec::sgp4init(&Sgp4Params::default(), &elements).unwrap_err();
    assert_eq!(
        err,
        Sgp4Error::Initialization(PropagationError::MeanEccentricity(-0.002))
    );
    assert_eq!(
        err.to_string(),
        "Initialization self-check failed with error 1: \
         mean eccentricity -0.002000 not within range 0.0 <= e < 1.0"
    );

    // the lower tolerance still initializes
    elements.ecco = -0.0005;
    assert!(Satrec::sgp4init(&Sgp4Params::default(), &elements).is_ok());
}

#[test]
fn test_mean_motion_derivatives_are_ignored() {
    let elements: ElementSet = parse_tle(ISS.0, ISS.1).unwrap().element_set();
    let sat = Satrec::sgp4init(&Sgp4Params::default(), &elements).unwrap();
    let altered = ElementSet {
        ndot: 1.0e-3,
        nddot: -2.0e-7,
        ..elements
    };
    let other = Satrec::sgp4init(&Sgp4Params::default(), &altered).unwrap();
    for tsince in [0.0, 720.0, -300.0] {
        assert_eq!(
            sat.propagate_from_epoch(tsince),
            other.propagate_from_epoch(tsince)
        );
    }
}

#[test]
fn test_simplified_drag_for_low_perigee() {
    let sat = satrec(DECAYING);
    // perigee below 220 km
    assert!(sat.method.is_simplified());
    assert!(matches!(sat.method, Method::NearEarth(None)));
}

#[test]
fn test_julian_date_entry_points_agree() {
    let mut sat = satrec(ISS);
    let (jd, fr) = (sat.jdsatepoch, sat.jdsatepoch_f + 0.25);
    let (code, position, velocity) = sat.sgp4(jd, fr);
    assert_eq!(code, 0);
    let state = satrec(ISS)
        .propagate_from_epoch(sat.minutes_since_epoch(jd, fr))
        .unwrap();
    assert_eq!(position, state.position_array());
    assert_eq!(velocity, state.velocity_array());
    assert_relative_eq!(sat.t, 360.0, epsilon = 1e-6);
}

#[test]
fn test_low_inclination_deep_space_in_both_modes() {
    let params = Sgp4Params::builder()
        .opsmode(OperationMode::Afspc)
        .build()
        .unwrap();
    let afspc = Satrec::from_tle_with(TRANSFER.0, TRANSFER.1, &params).unwrap();
    let improved = satrec(TRANSFER);
    assert!(improved.is_deep_space());
    assert_eq!(improved.irez(), 0);
    assert!(improved.inclo < 0.2);

    // identical while the perturbed node stays positive
    let shared = [
        (
            0.0,
            [9892.637943407042, 35.76144969085113, -1.0822883764699749],
            [3.5566432367146295, 6.456009375101949, 0.7836108898499564],
        ),
        (
            120.0,
            [816.6409154575687, 24118.986754746224, 2932.694594275261],
            [-2.6268380101386337, 0.5045027625462473, 0.0623443064751871],
        ),
        (
            -720.0,
            [-13356.240738232256, 8988.766270733599, 1114.2104365563855],
            [0.09676474863200142, -4.838475236450781, -0.5887245159464249],
        ),
    ];
    for (tsince, position, velocity) in shared {
        assert_state_close(&afspc.propagate_from_epoch(tsince).unwrap(), position, velocity);
        assert_state_close(&improved.propagate_from_epoch(tsince).unwrap(), position, velocity);
    }

    let afspc_expected = [
        (
            720.0,
            [7141.247425264589, 20538.971151583606, 2501.180599656912],
            [-2.2930796234725443, 2.333598992900791, 0.2827274412808922],
        ),
        (
            1440.0,
            [-4850.70302734396, 23699.33018806533, 2874.433157314286],
            [-2.511699509345946, -0.8740565495359713, -0.11016513756118314],
        ),
    ];
    for (tsince, position, velocity) in afspc_expected {
        assert_state_close(&afspc.propagate_from_epoch(tsince).unwrap(), position, velocity);
    }

    let improved_expected = [
        (
            720.0,
            [7140.419458836719, 20539.254853364968, 2501.2146936783442],
            [-2.2931736838689294, 2.3335079118614868, 0.28271631079728743],
        ),
        (
            1440.0,
            [-4851.70699880921, 23699.12785588119, 2874.407019506873],
            [-2.511662457546092, -0.8741614079817872, -0.11017783983650128],
        ),
    ];
    for (tsince, position, velocity) in improved_expected {
        assert_state_close(&improved.propagate_from_epoch(tsince).unwrap(), position, velocity);
    }
}

#[test]
fn test_drag_pushes_mean_eccentricity_out_of_range() {
    let mut sat = with_bstar(ISS, 0.5);
    let decayed = sat.propagate(2000.0).unwrap_err();
    assert_eq!(decayed.code(), 6);
    let last_mean = sat.mean;

    let err = sat.propagate(2670.0).unwrap_err();
    assert!(matches!(err, PropagationError::MeanEccentricity(em) if em < -0.001));
    assert!(err.is_fatal());
    assert!(err.state().is_none());
    assert_eq!(sat.error, 1);
    assert_eq!(
        sat.error_message.as_deref(),
        Some("mean eccentricity -0.001029 not within range 0.0 <= e < 1.0")
    );
    // mean elements are not recovered
    assert_eq!(sat.mean, last_mean);

    let (code, position, velocity) = sat.sgp4_tsince(2670.0);
    assert_eq!(code, 1);
    assert!(all_nan(position, velocity));
}

#[test]
fn test_negative_semilatus_rectum_is_fatal() {
    let mut sat = with_bstar(ISS, 0.5);
    let err = sat.propagate(3160.0).unwrap_err();
    assert!(matches!(err, PropagationError::SemiLatusRectum(pl) if pl < 0.0));
    assert_eq!(err.code(), 4);
    assert_eq!(sat.error, 4);
    assert_eq!(
        sat.error_message.as_deref(),
        Some("semilatus rectum -0.031499 is less than zero")
    );
    // mean elements of the failed call, eccentricity at its floor
    assert_eq!(sat.mean.em, 1.0e-6);
    assert_relative_eq!(sat.mean.am, 2.6817043324061346e-5, max_relative = 1e-8);

    let (code, position, velocity) = sat.sgp4_tsince(3160.0);
    assert_eq!(code, 4);
    assert!(all_nan(position, velocity));
}

#[test]
fn test_perturbed_eccentricity_out_of_range() {
    let mut sat = with_bstar(TRANSFER, -0.5);
    assert!(sat.propagate(13000.0).is_ok());

    let err = sat.propagate(13180.0).unwrap_err();
    assert!(matches!(err, PropagationError::PerturbedEccentricity(ep) if ep > 1.0));
    assert_eq!(sat.error, 3);
    assert_eq!(
        sat.error_message.as_deref(),
        Some("perturbed eccentricity 1.000063 not within range 0.0 <= e <= 1.0")
    );
    assert_relative_eq!(sat.mean.em, 0.9995633320359101, epsilon = 1e-9);

    let (code, position, velocity) = sat.sgp4_tsince(13180.0);
    assert_eq!(code, 3);
    assert!(all_nan(position, velocity));

    // the record recovers at an earlier time
    sat.propagate(13000.0).unwrap();
    assert_eq!(sat.error, 0);
}

#[test]
fn test_nonpositive_mean_motion_is_fatal() {
    let mut sat = satrec(ISS);
    sat.propagate(0.0).unwrap();
    let last_mean = sat.mean;

    sat.no_unkozai = 0.0;
    let (code, position, velocity) = sat.sgp4_tsince(60.0);
    assert_eq!(code, 2);
    assert!(all_nan(position, velocity));
    assert_eq!(
        sat.error_message.as_deref(),
        Some("mean motion 0.000000 is less than zero")
    );
    assert_eq!(sat.mean, last_mean);
}
