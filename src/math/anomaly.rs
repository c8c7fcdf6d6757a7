use std::f64::consts::{PI, TAU};

/// Number of Newton steps taken by [`mean_to_eccentric`]. The count is fixed so
/// the cost per call is the same for every body and every orbit sample.
pub const KEPLER_ITERATIONS: usize = 10;

/// Above this eccentricity, Newton's method is started from pi rather than
/// from the mean anomaly. Starting at M overshoots wildly for nearly
/// parabolic orbits and does not recover within the fixed iteration budget.
const HIGH_ECCENTRICITY: f64 = 0.8;

/// Solves Kepler's equation `M = E - e sin(E)` for the eccentric anomaly.
///
/// The mean anomaly may be any real number; it is wrapped into `[0, 2pi)`
/// before solving, so the result lies (approximately) in the same range.
/// Only elliptic orbits are supported: `e` must lie in `[0, 1)`.
pub fn mean_to_eccentric(mean_anomaly: f64, e: f64) -> f64 {
    let mean_anomaly = mean_anomaly.rem_euclid(TAU);

    let mut ecc_anomaly = initial_guess(mean_anomaly, e);

    for _ in 0..KEPLER_ITERATIONS {
        let f = ecc_anomaly - e * ecc_anomaly.sin() - mean_anomaly;
        let f_prime = 1.0 - e * ecc_anomaly.cos();
        ecc_anomaly -= f / f_prime;
    }

    ecc_anomaly
}

fn initial_guess(mean_anomaly: f64, e: f64) -> f64 {
    if e < HIGH_ECCENTRICITY {
        mean_anomaly
    } else {
        PI
    }
}

pub fn eccentric_to_mean(eccentric_anomaly: f64, e: f64) -> f64 {
    eccentric_anomaly - e * eccentric_anomaly.sin()
}

pub fn eccentric_to_true(eccentric_anomaly: f64, e: f64) -> f64 {
    // tan(v/2) = sqrt((1+e)/(1-e)) tan(E/2), but atan2 keeps the right
    // quadrant all the way around the orbit
    let half = eccentric_anomaly / 2.0;
    2.0 * f64::atan2((1.0 + e).sqrt() * half.sin(), (1.0 - e).sqrt() * half.cos())
}

pub fn mean_to_true(mean_anomaly: f64, e: f64) -> f64 {
    eccentric_to_true(mean_to_eccentric(mean_anomaly, e), e)
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    fn kepler_residual(mean_anomaly: f64, e: f64) -> f64 {
        let ecc_anomaly = mean_to_eccentric(mean_anomaly, e);
        (eccentric_to_mean(ecc_anomaly, e) - mean_anomaly).abs()
    }

    #[test]
    fn test_kepler_convergence() {
        for i in 0..=99 {
            let e = i as f64 / 100.0;
            for j in 0..720 {
                let mean_anomaly = TAU * j as f64 / 720.0;
                let residual = kepler_residual(mean_anomaly, e);
                assert!(
                    residual < 1e-4,
                    "e = {}, M = {}: residual was {}",
                    e,
                    mean_anomaly,
                    residual
                );
            }
        }
    }

    #[test]
    fn test_nearly_parabolic_orbits_start_newton_at_pi() {
        assert_eq!(initial_guess(0.3, 0.5), 0.3);
        assert_eq!(initial_guess(0.3, 0.79), 0.3);
        assert_eq!(initial_guess(0.3, 0.8), PI);
        assert_eq!(initial_guess(5.0, 0.99), PI);
    }

    #[test]
    fn test_kepler_low_eccentricity_is_tight() {
        for j in 0..360 {
            let mean_anomaly = TAU * j as f64 / 360.0;
            assert!(kepler_residual(mean_anomaly, 0.1) < 1e-12);
            assert!(kepler_residual(mean_anomaly, 0.0167) < 1e-12);
        }
    }

    #[test]
    fn test_circular_anomalies_agree() {
        // With e = 0, all three anomalies are the same angle
        for j in 0..36 {
            let mean_anomaly = TAU * j as f64 / 36.0;
            let ecc_anomaly = mean_to_eccentric(mean_anomaly, 0.0);
            assert_abs_diff_eq!(ecc_anomaly, mean_anomaly, epsilon = 1e-12);

            let true_anomaly = eccentric_to_true(ecc_anomaly, 0.0).rem_euclid(TAU);
            assert_abs_diff_eq!(true_anomaly, mean_anomaly, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_mean_anomaly_is_wrapped() {
        let e = 0.3;
        let inside = mean_to_eccentric(1.0, e);
        assert_relative_eq!(mean_to_eccentric(1.0 + TAU, e), inside, max_relative = 1e-12);
        assert_relative_eq!(mean_to_eccentric(1.0 - 2.0 * TAU, e), inside, max_relative = 1e-12);
    }

    #[test]
    fn test_apsides() {
        // Periapsis and apoapsis are fixed points of every anomaly conversion
        for e in [0.0, 0.2, 0.6, 0.95] {
            assert_abs_diff_eq!(mean_to_true(0.0, e), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(mean_to_true(PI, e), PI, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_true_anomaly_leads_at_periapsis() {
        // Near periapsis the body moves faster than average, so the true
        // anomaly runs ahead of the mean anomaly.
        let e = 0.5;
        let mean_anomaly = 0.5;
        assert!(mean_to_true(mean_anomaly, e) > mean_anomaly);
    }
}
