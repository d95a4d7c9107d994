//! Sample filtering for a location acquisition session.
//!
//! These functions only look at the current best fix and the incoming
//! sample; the update loop applies the resulting verdict to the model.

use crate::model::{duration_ms, LocationSample, UnixTimeMs, ValidatedCoordinate};
use crate::{MAX_SAMPLE_AGE, STALL_DURATION, STATIONARY_DISTANCE_M, TARGET_ACCURACY_M};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// Older than the freshness window; usually replayed from a cache.
    Stale { age_ms: u64 },
    /// The source flags unusable readings with a negative accuracy.
    InvalidAccuracy,
    InvalidCoordinate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleVerdict {
    Rejected(Rejection),
    /// New best fix.
    Accepted {
        reached_target: bool,
        /// Distance from the previous best, `f64::MAX` when there was none.
        distance_m: f64,
    },
    /// No better than the best fix and the device has not moved for too long.
    Stalled,
    /// No better than the best fix; keep listening.
    NotImproved,
}

impl SampleVerdict {
    /// The fix is at a different place than the previous best.
    #[must_use]
    pub fn moved(&self) -> bool {
        matches!(self, Self::Accepted { distance_m, .. } if *distance_m > 0.0)
    }
}

#[must_use]
pub fn is_stale(sample: &LocationSample, received_at: UnixTimeMs) -> bool {
    received_at.elapsed_since(sample.timestamp) > duration_ms(MAX_SAMPLE_AGE)
}

#[must_use]
pub fn is_better_than(candidate: &LocationSample, best: Option<&LocationSample>) -> bool {
    match best {
        Some(best) => candidate.horizontal_accuracy_m < best.horizontal_accuracy_m,
        None => true,
    }
}

#[must_use]
pub fn meets_target(sample: &LocationSample) -> bool {
    sample.horizontal_accuracy_m <= TARGET_ACCURACY_M
}

/// Distance from `best` to `sample`, `f64::MAX` without a usable best.
#[must_use]
pub fn distance_from_best(best: Option<&LocationSample>, sample: ValidatedCoordinate) -> f64 {
    best.and_then(|b| b.coordinate.validate().ok())
        .map_or(f64::MAX, |b| b.distance_to(sample))
}

#[must_use]
pub fn is_stalled(best: &LocationSample, sample: &LocationSample, distance_m: f64) -> bool {
    distance_m < STATIONARY_DISTANCE_M
        && sample.timestamp.elapsed_since(best.timestamp) > duration_ms(STALL_DURATION)
}

#[must_use]
pub fn evaluate_sample(
    best: Option<&LocationSample>,
    sample: &LocationSample,
    received_at: UnixTimeMs,
) -> SampleVerdict {
    if is_stale(sample, received_at) {
        return SampleVerdict::Rejected(Rejection::Stale {
            age_ms: received_at.elapsed_since(sample.timestamp),
        });
    }

    if sample.horizontal_accuracy_m.is_nan() || sample.horizontal_accuracy_m < 0.0 {
        return SampleVerdict::Rejected(Rejection::InvalidAccuracy);
    }

    let Ok(coordinate) = sample.coordinate.validate() else {
        return SampleVerdict::Rejected(Rejection::InvalidCoordinate);
    };

    let distance_m = distance_from_best(best, coordinate);

    match best {
        Some(best) if !is_better_than(sample, Some(best)) => {
            if is_stalled(best, sample, distance_m) {
                SampleVerdict::Stalled
            } else {
                SampleVerdict::NotImproved
            }
        }
        _ => SampleVerdict::Accepted {
            reached_target: meets_target(sample),
            distance_m,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LAT: f64 = 37.3317;
    const LON: f64 = -122.0302;

    fn sample(accuracy: f64, secs: u64) -> LocationSample {
        LocationSample::new(LAT, LON, accuracy, UnixTimeMs::from_secs(secs))
    }

    #[test]
    fn first_sample_is_accepted() {
        let verdict = evaluate_sample(None, &sample(50.0, 0), UnixTimeMs::from_secs(0));
        assert_eq!(
            verdict,
            SampleVerdict::Accepted {
                reached_target: false,
                distance_m: f64::MAX
            }
        );
        assert!(verdict.moved());
    }

    #[test]
    fn sample_exactly_five_seconds_old_is_fresh() {
        let s = sample(50.0, 10);
        assert!(!is_stale(&s, UnixTimeMs::from_secs(15)));
        assert!(is_stale(&s, UnixTimeMs(15_001)));
    }

    #[test]
    fn stale_sample_is_rejected() {
        let verdict = evaluate_sample(None, &sample(5.0, 0), UnixTimeMs::from_secs(6));
        assert_eq!(
            verdict,
            SampleVerdict::Rejected(Rejection::Stale { age_ms: 6_000 })
        );
    }

    #[test]
    fn nan_accuracy_is_rejected() {
        let verdict = evaluate_sample(None, &sample(f64::NAN, 0), UnixTimeMs::from_secs(0));
        assert_eq!(verdict, SampleVerdict::Rejected(Rejection::InvalidAccuracy));
    }

    #[test]
    fn out_of_range_coordinate_is_rejected() {
        let s = LocationSample::new(120.0, LON, 5.0, UnixTimeMs(0));
        let verdict = evaluate_sample(None, &s, UnixTimeMs(0));
        assert_eq!(verdict, SampleVerdict::Rejected(Rejection::InvalidCoordinate));
    }

    #[test]
    fn target_accuracy_is_inclusive() {
        let verdict = evaluate_sample(None, &sample(10.0, 0), UnixTimeMs(0));
        assert!(matches!(
            verdict,
            SampleVerdict::Accepted {
                reached_target: true,
                ..
            }
        ));
    }

    #[test]
    fn better_fix_at_same_spot_has_not_moved() {
        let best = sample(50.0, 0);
        let verdict = evaluate_sample(Some(&best), &sample(8.0, 1), UnixTimeMs::from_secs(1));
        assert_eq!(
            verdict,
            SampleVerdict::Accepted {
                reached_target: true,
                distance_m: 0.0
            }
        );
        assert!(!verdict.moved());
    }

    #[test]
    fn stationary_for_eleven_seconds_stalls() {
        let best = sample(100.0, 0);
        let verdict = evaluate_sample(Some(&best), &sample(100.0, 11), UnixTimeMs::from_secs(11));
        assert_eq!(verdict, SampleVerdict::Stalled);
    }

    #[test]
    fn stationary_for_exactly_ten_seconds_keeps_listening() {
        let best = sample(100.0, 0);
        let verdict = evaluate_sample(Some(&best), &sample(100.0, 10), UnixTimeMs::from_secs(10));
        assert_eq!(verdict, SampleVerdict::NotImproved);
    }

    #[test]
    fn moving_without_improvement_keeps_listening() {
        let best = sample(100.0, 0);
        let far = LocationSample::new(LAT + 0.001, LON, 100.0, UnixTimeMs::from_secs(30));
        let verdict = evaluate_sample(Some(&best), &far, UnixTimeMs::from_secs(30));
        assert_eq!(verdict, SampleVerdict::NotImproved);
    }

    proptest! {
        #[test]
        fn negative_accuracy_never_accepted(
            accuracy in -1_000.0f64..-f64::EPSILON,
            best_accuracy in proptest::option::of(0.0f64..1_000.0),
        ) {
            let best = best_accuracy.map(|a| sample(a, 0));
            let verdict = evaluate_sample(best.as_ref(), &sample(accuracy, 0), UnixTimeMs(0));
            prop_assert_eq!(verdict, SampleVerdict::Rejected(Rejection::InvalidAccuracy));
        }

        #[test]
        fn old_samples_never_accepted(age_ms in 5_001u64..10_000_000, accuracy in 0.0f64..1_000.0) {
            let now = UnixTimeMs(20_000_000);
            let s = LocationSample::new(LAT, LON, accuracy, UnixTimeMs(now.0 - age_ms));
            let verdict = evaluate_sample(None, &s, now);
            prop_assert!(matches!(verdict, SampleVerdict::Rejected(Rejection::Stale { .. })), "verdict was {:?}", verdict);
        }

        #[test]
        fn acceptance_is_strict_improvement(best_accuracy in 0.0f64..500.0, accuracy in 0.0f64..500.0) {
            let best = sample(best_accuracy, 0);
            let verdict = evaluate_sample(Some(&best), &sample(accuracy, 1), UnixTimeMs::from_secs(1));
            let accepted = matches!(verdict, SampleVerdict::Accepted { .. });
            prop_assert_eq!(accepted, accuracy < best_accuracy);
        }
    }
}
